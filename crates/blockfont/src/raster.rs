//! Rasterizing rendered ANSI rows into images.
//!
//! Every terminal cell becomes a `cell x cell` pixel square. Full blocks fill
//! the square, half blocks fill their half, shade characters fill it with
//! partial alpha and spaces stay transparent.
use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    color::Rgb,
    error::{FontError, Result},
    export::{visible_width, ANSI_SGR},
    glyph::{FULL_BLOCK, LOWER_HALF_BLOCK, UPPER_HALF_BLOCK},
};

/// Default pixel size of one terminal cell.
pub const CELL_SIZE: u32 = 16;

const LIGHT_SHADE_ALPHA: u8 = 64;
const MEDIUM_SHADE_ALPHA: u8 = 128;
const DARK_SHADE_ALPHA: u8 = 191;

static FOREGROUND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\x1b\[38;2;(\d+);(\d+);(\d+)m$").expect("foreground pattern is valid")
});

fn foreground(sequence: &str) -> Option<Rgb> {
    let caps = FOREGROUND.captures(sequence)?;
    let channel = |i: usize| caps[i].parse::<u8>().ok();
    Some(Rgb::new(channel(1)?, channel(2)?, channel(3)?))
}

/// Visible characters of `line` paired with the foreground color in effect.
///
/// Characters before any color escape are white. A reset keeps the last color,
/// which only matters for the spaces that follow it.
fn colored_chars(line: &str) -> Vec<(char, Rgb)> {
    let mut out = Vec::new();
    let mut color = Rgb::WHITE;
    let mut rest = 0;
    for sgr in ANSI_SGR.find_iter(line) {
        out.extend(line[rest..sgr.start()].chars().map(|ch| (ch, color)));
        if let Some(c) = foreground(sgr.as_str()) {
            color = c;
        }
        rest = sgr.end();
    }
    out.extend(line[rest..].chars().map(|ch| (ch, color)));
    out
}

fn fill(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, pixel: Rgba<u8>) {
    for py in y..(y + h).min(img.height()) {
        for px in x..(x + w).min(img.width()) {
            img.put_pixel(px, py, pixel);
        }
    }
}

fn draw_cell(img: &mut RgbaImage, col: u32, row: u32, ch: char, color: Rgb, cell: u32) {
    let (x, y) = (col * cell, row * cell);
    let half = cell / 2;
    let solid = |alpha| Rgba([color.r, color.g, color.b, alpha]);
    match ch {
        ' ' => {}
        UPPER_HALF_BLOCK => fill(img, x, y, cell, half, solid(255)),
        LOWER_HALF_BLOCK => fill(img, x, y + half, cell, half, solid(255)),
        '░' => fill(img, x, y, cell, cell, solid(LIGHT_SHADE_ALPHA)),
        '▒' => fill(img, x, y, cell, cell, solid(MEDIUM_SHADE_ALPHA)),
        '▓' => fill(img, x, y, cell, cell, solid(DARK_SHADE_ALPHA)),
        FULL_BLOCK => fill(img, x, y, cell, cell, solid(255)),
        c if !c.is_control() => fill(img, x, y, cell, cell, solid(255)),
        _ => {}
    }
}

/// Paint rendered rows onto a transparent image, `cell` pixels per character.
pub fn rasterize(lines: &[String], cell: u32) -> Result<RgbaImage> {
    if lines.is_empty() {
        return Err(FontError::EmptyExport);
    }
    let columns = lines.iter().map(|l| visible_width(l)).max().unwrap_or(0).max(1);
    let mut img = RgbaImage::new(columns as u32 * cell, lines.len() as u32 * cell);
    for (row, line) in lines.iter().enumerate() {
        for (col, (ch, color)) in colored_chars(line).into_iter().enumerate() {
            draw_cell(&mut img, col as u32, row as u32, ch, color, cell);
        }
    }
    Ok(img)
}

/// [`rasterize`] and encode the result as PNG.
pub fn encode_png(lines: &[String], cell: u32) -> Result<Vec<u8>> {
    let img = rasterize(lines, cell)?;
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    tracing::debug!(width = img.width(), height = img.height(), "encoded png");
    Ok(buf.into_inner())
}
