//! Test support utilities for blockfont.
//!
//! Small builders and inspectors that make rendered output easy to assert on.
//! Not part of the rendering API.

use crate::{export::strip_ansi, Font};

/// Build a font from `(char, rows)` pairs.
pub fn font_from_glyphs(name: &str, glyphs: &[(char, &[&str])]) -> Font {
    let mut font = Font::new(name);
    for (ch, rows) in glyphs {
        font.add_glyph(*ch, rows);
    }
    font
}

/// Rendered rows with every escape sequence removed.
pub fn plain_rows(rows: &[String]) -> Vec<String> {
    rows.iter().map(|r| strip_ansi(r)).collect()
}

/// Number of colored pixels (24-bit foreground escapes) in `row`.
pub fn painted_cells(row: &str) -> usize {
    row.matches("\x1b[38;2;").count()
}

/// Column of the first non-space character in a plain row.
pub fn first_ink(row: &str) -> Option<usize> {
    row.chars().position(|c| c != ' ')
}

/// Column of the last non-space character in a plain row.
pub fn last_ink(row: &str) -> Option<usize> {
    let chars: Vec<char> = row.chars().collect();
    chars.iter().rposition(|&c| c != ' ')
}
