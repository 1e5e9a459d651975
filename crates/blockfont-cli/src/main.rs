use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use blockfont::{
    color::parse_color_spec,
    glyph::{has_half_pixel_conflict, GlyphResolver},
    options::SCALE_FACTORS,
    try_render_text, Alignment, ColorMode, ExportFormat, Font, FontRegistry, GradientDirection,
    RenderOptions, ShadowStyle,
};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::Level;

use crate::console::{print_lines, write_export};
mod console;

/// Compiled into the binary so rendering works without any font files.
const BUILTIN_FONT: &str = include_str!("../fonts/blocky.bit");

const DEFAULT_TEXT: &str = "Hello";

/// Starting options when no `--config` is given.
fn cli_defaults() -> RenderOptions {
    RenderOptions {
        char_spacing: 2,
        shadow_style: ShadowStyle::Medium,
        ..Default::default()
    }
}

#[derive(Parser)]
#[command(
    name = "blockfont",
    version,
    about = "Render text as colored block-character art"
)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Render text with a font
    Render(RenderArgs),
    /// List available fonts
    List {
        /// Font file or directory to load (repeatable)
        #[arg(long)]
        load: Vec<PathBuf>,
    },
    /// Inspect font metadata
    Inspect {
        /// Font name or path to a .bit/.zip file
        font: String,
        #[arg(long)]
        load: Vec<PathBuf>,
    },
}

#[derive(Args)]
struct RenderArgs {
    /// Text to render; `\n` starts a new line
    text: Vec<String>,
    /// Font name or path to a .bit/.zip file (default: first available font)
    #[arg(short, long)]
    font: Option<String>,
    /// Font file or directory to load (repeatable)
    #[arg(long)]
    load: Vec<PathBuf>,
    /// JSON file with render options; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Text color: ANSI code (31) or hex (#FF0000)
    #[arg(long)]
    color: Option<String>,
    /// Gradient end color: ANSI code (34) or hex (#0000FF)
    #[arg(long)]
    gradient: Option<String>,
    /// Gradient direction: down, up, right, left
    #[arg(long)]
    direction: Option<GradientDirection>,
    /// Cycle each pixel through a rainbow palette
    #[arg(long)]
    rainbow: bool,
    /// Rainbow animation frame
    #[arg(long)]
    frame: Option<u64>,
    /// Character spacing (0 to 10, default 2)
    #[arg(long)]
    char_spacing: Option<i32>,
    /// Word spacing (0 to 20)
    #[arg(long)]
    word_spacing: Option<i32>,
    /// Line spacing (0 to 10)
    #[arg(long)]
    line_spacing: Option<i32>,
    /// Text scale: 0.5, 1, 2 or 4
    #[arg(long, value_parser = parse_scale)]
    scale: Option<f64>,
    /// Cast a drop shadow
    #[arg(long)]
    shadow: bool,
    /// Shadow horizontal offset (-5 to 5)
    #[arg(long, allow_negative_numbers = true)]
    shadow_h: Option<i32>,
    /// Shadow vertical offset (-5 to 5)
    #[arg(long, allow_negative_numbers = true)]
    shadow_v: Option<i32>,
    /// Shadow style: light, medium, dark (default medium)
    #[arg(long)]
    shadow_style: Option<ShadowStyle>,
    /// Text alignment: left, center, right
    #[arg(long)]
    align: Option<Alignment>,
    /// Export as txt, go, js, py, rs, sh or png instead of printing
    #[arg(long)]
    export: Option<ExportFormat>,
    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn parse_scale(s: &str) -> std::result::Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if SCALE_FACTORS.contains(&value) {
        Ok(value)
    } else {
        Err(format!("scale must be one of 0.5, 1, 2, 4 (got {s})"))
    }
}

fn color_arg(flag: &str, spec: &str) -> Result<String> {
    parse_color_spec(spec)
        .with_context(|| format!("invalid {flag} {spec:?}: expected #RRGGBB or an ANSI code"))
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn load_registry(load: &[PathBuf]) -> Result<FontRegistry> {
    let mut registry = FontRegistry::new();
    registry.insert(Font::from_json(BUILTIN_FONT).context("built-in font is invalid")?);
    for path in load {
        registry
            .register_path(path)
            .with_context(|| format!("loading fonts from {}", path.display()))?;
    }
    Ok(registry)
}

fn select_font(registry: &FontRegistry, requested: Option<&str>) -> Result<Font> {
    let Some(requested) = requested else {
        return registry.first().cloned().context("no fonts available");
    };
    if let Some(font) = registry.get(requested) {
        return Ok(font.clone());
    }
    let path = PathBuf::from(requested);
    if path.is_file() {
        return Font::load(&path).with_context(|| format!("loading font {}", path.display()));
    }
    anyhow::bail!(
        "font '{requested}' not found (available: {})",
        registry.names().join(", ")
    )
}

fn build_options(args: &RenderArgs) -> Result<RenderOptions> {
    let mut options = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => cli_defaults(),
    };

    if let Some(color) = &args.color {
        options.text_color = color_arg("--color", color)?;
    }
    if args.rainbow {
        options.color_mode = ColorMode::Rainbow;
    } else if let Some(gradient) = &args.gradient {
        options.gradient_color = color_arg("--gradient", gradient)?;
        options.use_gradient = true;
        options.color_mode = ColorMode::Gradient;
    }
    if let Some(direction) = args.direction {
        options.gradient_direction = direction;
    }
    if let Some(frame) = args.frame {
        options.rainbow_frame = frame;
    }

    if let Some(v) = args.char_spacing {
        options.char_spacing = v;
    }
    if let Some(v) = args.word_spacing {
        options.word_spacing = v;
    }
    if let Some(v) = args.line_spacing {
        options.line_spacing = v;
    }
    if let Some(scale) = args.scale {
        options.scale_factor = scale;
    }
    if let Some(alignment) = args.align {
        options.alignment = alignment;
    }

    if args.shadow {
        options.shadow_enabled = true;
        if !options.has_shadow_offset() {
            options.shadow_horizontal_offset = 1;
            options.shadow_vertical_offset = 1;
        }
    }
    if let Some(h) = args.shadow_h {
        options.shadow_horizontal_offset = h;
    }
    if let Some(v) = args.shadow_v {
        options.shadow_vertical_offset = v;
    }
    if let Some(style) = args.shadow_style {
        options.shadow_style = style;
    }

    options.validate()?;
    Ok(options)
}

fn render(args: RenderArgs) -> Result<()> {
    let registry = load_registry(&args.load)?;
    let font = select_font(&registry, args.font.as_deref())?;
    let options = build_options(&args)?;

    let mut text = args.text.join(" ");
    if text.is_empty() {
        text = DEFAULT_TEXT.to_string();
    }
    let text = text.replace("\\n", "\n");
    tracing::info!(font = font.name(), ?options, "rendering");

    let lines = try_render_text(&text, &font, &options)?;
    match args.export {
        Some(format) => write_export(&lines, format, args.output.as_deref()),
        None => print_lines(&lines, args.output.as_deref()),
    }
}

fn inspect(font: &str, load: &[PathBuf]) -> Result<()> {
    let registry = load_registry(load)?;
    let font = select_font(&registry, Some(font))?;
    let all_chars: String = font.iter_glyphs().map(|(ch, _)| ch).collect();

    println!("Font: {}", font.name());
    if !font.author.is_empty() {
        println!("  Author: {}", font.author);
    }
    if !font.license.is_empty() {
        println!("  License: {}", font.license);
    }
    println!("  Defined characters: {}", font.char_count());
    println!("  Line height: {}", GlyphResolver::new(&font, 1.0).line_height());
    println!(
        "  Half-block pixels: {}",
        if has_half_pixel_conflict(&all_chars, &font, 1.0) {
            "yes"
        } else {
            "no"
        }
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Cmd::Render(args) => render(args)?,
        Cmd::List { load } => {
            let registry = load_registry(&load)?;
            println!("Available fonts:");
            for name in registry.names() {
                println!("  {name}");
            }
        }
        Cmd::Inspect { font, load } => inspect(&font, &load)?,
    }
    Ok(())
}
