use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use blockfont::ExportFormat;

/// Print rendered lines as they are, or save them to `output`.
pub fn print_lines(lines: &[String], output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let mut content = lines.join("\n");
            content.push('\n');
            fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), "saved rendered text");
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for line in lines {
                writeln!(out, "{line}")?;
            }
        }
    }
    Ok(())
}

/// The file an export goes to: `output` with its file name sanitized and the
/// format's extension appended when missing.
fn export_path(output: &Path, format: ExportFormat) -> Result<PathBuf> {
    let name = output
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| format.file_name(n))
        .with_context(|| format!("invalid output file name {}", output.display()))?;
    Ok(output.with_file_name(name))
}

/// Generate `format` from the rendered lines and print it, or save it.
///
/// Binary formats are only ever written to a file.
pub fn write_export(lines: &[String], format: ExportFormat, output: Option<&Path>) -> Result<()> {
    match output {
        Some(output) => {
            let path = export_path(output, format)?;
            let content = format
                .generate(lines)
                .with_context(|| format!("generating {format} export"))?;
            fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), %format, "exported");
            println!("Exported {} to {}", format.description(), path.display());
        }
        None => {
            let Some(source) = format.source(lines) else {
                anyhow::bail!("{format} export needs --output");
            };
            let stdout = io::stdout();
            let mut out = stdout.lock();
            writeln!(out, "{source}")?;
        }
    }
    Ok(())
}
