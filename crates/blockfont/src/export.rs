//! Turning rendered lines into files: plain text or small programs that print them.
use std::{fmt, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    error::{Result, ValidationError},
    raster,
};

/// Longest file stem produced by [`sanitize_filename`].
pub const MAX_FILENAME_LEN: usize = 200;

pub(crate) static ANSI_SGR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("SGR pattern is valid"));

/// Remove ANSI SGR escape sequences.
pub fn strip_ansi(s: &str) -> String {
    ANSI_SGR.replace_all(s, "").into_owned()
}

/// Printable characters in `s` once escapes are removed.
pub fn visible_width(s: &str) -> usize {
    if s.contains('\x1b') {
        strip_ansi(s).chars().count()
    } else {
        s.chars().count()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Txt,
    Go,
    Js,
    Py,
    Rs,
    Sh,
    Png,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 7] = [
        ExportFormat::Txt,
        ExportFormat::Go,
        ExportFormat::Js,
        ExportFormat::Py,
        ExportFormat::Rs,
        ExportFormat::Sh,
        ExportFormat::Png,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Txt => ".txt",
            ExportFormat::Go => ".go",
            ExportFormat::Js => ".js",
            ExportFormat::Py => ".py",
            ExportFormat::Rs => ".rs",
            ExportFormat::Sh => ".sh",
            ExportFormat::Png => ".png",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ExportFormat::Txt => "Plain text file",
            ExportFormat::Go => "Go source code",
            ExportFormat::Js => "JavaScript source code",
            ExportFormat::Py => "Python source code",
            ExportFormat::Rs => "Rust source code",
            ExportFormat::Sh => "Bash script",
            ExportFormat::Png => "PNG image (16x scale, transparent)",
        }
    }

    pub fn is_binary(self) -> bool {
        self == ExportFormat::Png
    }

    /// Text contents for `lines`, or `None` for binary formats.
    pub fn source(self, lines: &[String]) -> Option<String> {
        let source = match self {
            ExportFormat::Txt => strip_ansi(&lines.join("\n")),
            ExportFormat::Go => go_source(lines),
            ExportFormat::Js => js_source(lines),
            ExportFormat::Py => python_source(lines),
            ExportFormat::Rs => rust_source(lines),
            ExportFormat::Sh => bash_source(lines),
            ExportFormat::Png => return None,
        };
        Some(source)
    }

    /// File contents for `lines` in this format.
    pub fn generate(self, lines: &[String]) -> Result<Vec<u8>> {
        match self.source(lines) {
            Some(source) => Ok(source.into_bytes()),
            None => raster::encode_png(lines, raster::CELL_SIZE),
        }
    }

    /// `name` sanitized and given this format's extension.
    pub fn file_name(self, name: &str) -> Option<String> {
        let mut name = sanitize_filename(name);
        if name.is_empty() {
            return None;
        }
        if !name.ends_with(self.extension()) {
            name.push_str(self.extension());
        }
        Some(name)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension()[1..].to_ascii_uppercase())
    }
}

impl FromStr for ExportFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(ExportFormat::Txt),
            "go" => Ok(ExportFormat::Go),
            "js" | "javascript" => Ok(ExportFormat::Js),
            "py" | "python" => Ok(ExportFormat::Py),
            "rs" | "rust" => Ok(ExportFormat::Rs),
            "sh" | "bash" => Ok(ExportFormat::Sh),
            "png" => Ok(ExportFormat::Png),
            _ => Err(ValidationError::InvalidChoice {
                field: "export_format",
                value: s.to_string(),
                expected: "txt, go, js, py, rs, sh, png",
            }),
        }
    }
}

fn escape_quoted(line: &str, extra: &[(char, &str)]) -> String {
    let mut out = String::with_capacity(line.len());
    for ch in line.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\x1b' => out.push_str("\\x1b"),
            _ => match extra.iter().find(|(c, _)| *c == ch) {
                Some((_, rep)) => out.push_str(rep),
                None => out.push(ch),
            },
        }
    }
    out
}

fn go_source(lines: &[String]) -> String {
    let mut out = String::from("package main\n\nimport (\n\t\"fmt\"\n)\n\nfunc main() {\n\tlines := []string{\n");
    for line in lines {
        out.push_str(&format!("\t\t\"{}\",\n", escape_quoted(line, &[])));
    }
    out.push_str("\t}\n\n\tfor _, line := range lines {\n\t\tfmt.Println(line)\n\t}\n}\n");
    out
}

fn js_source(lines: &[String]) -> String {
    let mut out = String::from("/* Generated JavaScript ANSI Art */\n\nconst ansiArtLines = [\n");
    for line in lines {
        out.push_str(&format!("  \"{}\",\n", escape_quoted(line, &[])));
    }
    out.push_str(
        "];\n\nfunction displayAnsiArt() {\n  ansiArtLines.forEach(function(line) {\n    console.log(line);\n  });\n}\n\ndisplayAnsiArt();\n",
    );
    out
}

fn python_source(lines: &[String]) -> String {
    let mut out = String::from("# Generated Python ANSI Art\n\nansi_art_lines = [\n");
    for line in lines {
        out.push_str(&format!("    \"{}\",\n", escape_quoted(line, &[('\'', "\\'")])));
    }
    out.push_str(
        "]\n\ndef display_ansi_art():\n    for line in ansi_art_lines:\n        print(line)\n\nif __name__ == \"__main__\":\n    display_ansi_art()\n",
    );
    out
}

fn rust_source(lines: &[String]) -> String {
    let mut out = String::from("// Generated Rust ANSI Art\nfn main() {\n    let ansi_art_lines = [\n");
    for line in lines {
        out.push_str(&format!("        \"{}\",\n", escape_quoted(line, &[])));
    }
    out.push_str("    ];\n\n    for line in ansi_art_lines {\n        println!(\"{}\", line);\n    }\n}\n");
    out
}

fn bash_source(lines: &[String]) -> String {
    let mut out = String::from("#!/bin/bash\n# Generated Bash ANSI Art\n\nansi_art_lines=(\n");
    for line in lines {
        out.push_str(&format!(
            "    \"{}\"\n",
            escape_quoted(line, &[('$', "\\$"), ('`', "\\`")])
        ));
    }
    out.push_str(
        ")\n\ndisplay_ansi_art() {\n    for line in \"${ansi_art_lines[@]}\"; do\n        echo -e \"$line\"\n    done\n}\n\n# Call the function\ndisplay_ansi_art\n",
    );
    out
}

/// Make `name` safe to use as a file name in the current directory.
///
/// Path separators, parent references, control characters and characters
/// reserved on common filesystems are removed, and the result is truncated to
/// [`MAX_FILENAME_LEN`] characters. May return an empty string.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .replace("..", "")
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect();
    cleaned
        .trim_matches(|c: char| c == '.' || c.is_whitespace())
        .chars()
        .take(MAX_FILENAME_LEN)
        .collect()
}
