//! Glyph resolution: scaling, baseline placement and fallback glyphs.
use std::collections::HashMap;

use crate::font::Font;

pub const FULL_BLOCK: char = '█';
pub const UPPER_HALF_BLOCK: char = '▀';
pub const LOWER_HALF_BLOCK: char = '▄';

/// Horizontal advance of a space, in pixels.
pub const SPACE_ADVANCE: f64 = 0.5;

/// Width used for missing characters when the font offers no better guess.
pub const DEFAULT_MISSING_WIDTH: usize = 4;

/// Consulted in order for a missing-character width when the font has no space.
const WIDTH_PROBES: [char; 3] = ['x', 'M', '!'];

/// Lowercase letters whose ink normally hangs below the baseline. They never
/// serve as baseline references.
const DESCENDER_LETTERS: &str = "gjpqy";

/// Characters assumed to hang into the descent zone when their bitmap is
/// shorter than the line.
const DESCENDER_CHARS: &str = "gjpqy,;";

pub(crate) fn has_ink(row: &str) -> bool {
    row.chars().any(|c| c != ' ')
}

pub(crate) fn row_width(row: &str) -> usize {
    row.chars().count()
}

/// Widest row of a bitmap, in characters.
pub fn bitmap_width<S: AsRef<str>>(rows: &[S]) -> usize {
    rows.iter().map(|r| row_width(r.as_ref())).max().unwrap_or(0)
}

fn scaled_len(len: usize, factor: f64) -> usize {
    if len == 0 {
        0
    } else {
        ((len as f64 * factor).ceil() as usize).max(1)
    }
}

fn source_index(target: usize, factor: f64, len: usize) -> usize {
    ((target as f64 / factor).floor() as usize).min(len - 1)
}

fn scale_row(row: &str, factor: f64) -> String {
    let chars: Vec<char> = row.chars().collect();
    (0..scaled_len(chars.len(), factor))
        .map(|x| chars[source_index(x, factor, chars.len())])
        .collect()
}

/// Nearest-neighbour resample of a bitmap on both axes.
///
/// Every output cell copies exactly one source cell, so block characters are
/// preserved as-is; factors above one repeat cells, factors below one select
/// every `1/factor`-th cell starting with the first.
pub fn scale_bitmap<S: AsRef<str>>(rows: &[S], factor: f64) -> Vec<String> {
    if factor == 1.0 || rows.is_empty() {
        return rows.iter().map(|r| r.as_ref().to_string()).collect();
    }
    (0..scaled_len(rows.len(), factor))
        .map(|y| scale_row(rows[source_index(y, factor, rows.len())].as_ref(), factor))
        .collect()
}

/// Scaled bitmap with zero-length rows removed.
fn prepared_rows(raw: &[String], factor: f64) -> Vec<String> {
    scale_bitmap(raw, factor)
        .into_iter()
        .filter(|r| !r.is_empty())
        .collect()
}

/// `true` iff any character of `text` that the font defines contains a
/// half-block pixel after scaling. Whole-cell shadow offsets cannot follow
/// such glyphs.
pub fn has_half_pixel_conflict(text: &str, font: &Font, scale_factor: f64) -> bool {
    let mut seen = Vec::new();
    for ch in text.chars() {
        if seen.contains(&ch) {
            continue;
        }
        seen.push(ch);
        let Some(raw) = font.glyph(ch) else {
            continue;
        };
        let conflict = scale_bitmap(raw, scale_factor)
            .iter()
            .any(|row| row.contains(|c| c == UPPER_HALF_BLOCK || c == LOWER_HALF_BLOCK));
        if conflict {
            return true;
        }
    }
    false
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct InkExtent {
    height: usize,
    top: usize,
    bottom: usize,
}

impl InkExtent {
    fn of(rows: &[String]) -> Option<Self> {
        let top = rows.iter().position(|r| has_ink(r))?;
        let bottom = rows.iter().rposition(|r| has_ink(r))?;
        Some(Self {
            height: rows.len(),
            top,
            bottom,
        })
    }

    fn ink_rows(&self) -> usize {
        self.bottom - self.top + 1
    }
}

/// Baseline placement of one glyph at one scale.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DescenderInfo {
    pub has_descender: bool,
    /// Rows of the glyph body, from its first ink row down to the baseline.
    pub baseline_height: usize,
    /// Rows of ink below the shared baseline.
    pub descender_height: usize,
    pub total_height: usize,
    /// Blank rows to insert above the glyph inside the line.
    pub vertical_offset: usize,
}

/// Pin every inked glyph of `font` to a shared baseline.
///
/// The baseline is the lower of the last ink rows of two reference glyphs: the
/// one with the most ink rows and the one whose ink starts lowest. References
/// are alphanumerics without descenders when the font has any.
///
/// Fonts without rows below that baseline have no descender zone; the result
/// is then empty and callers center short glyphs instead.
pub fn analyze_descenders(font: &Font, scale_factor: f64) -> HashMap<char, DescenderInfo> {
    let extents: Vec<(char, InkExtent)> = font
        .iter_glyphs()
        .filter(|(ch, _)| *ch != ' ')
        .filter_map(|(ch, raw)| InkExtent::of(&prepared_rows(raw, scale_factor)).map(|e| (ch, e)))
        .collect();
    let Some(line_rows) = extents.iter().map(|(_, e)| e.height).max() else {
        return HashMap::new();
    };

    let mut reference: Vec<&(char, InkExtent)> = extents
        .iter()
        .filter(|(ch, _)| ch.is_ascii_alphanumeric() && !DESCENDER_LETTERS.contains(*ch))
        .collect();
    if reference.is_empty() {
        reference = extents.iter().collect();
    }
    let (Some(tallest), Some(lowest)) = (
        reference.iter().max_by_key(|(_, e)| e.ink_rows()),
        reference.iter().max_by_key(|(_, e)| e.top),
    ) else {
        return HashMap::new();
    };
    let baseline = tallest.1.bottom.max(lowest.1.bottom);
    let descent = (line_rows - 1).saturating_sub(baseline);
    if descent == 0 {
        return HashMap::new();
    }

    extents
        .iter()
        .map(|&(ch, e)| {
            let info = if e.height == line_rows {
                let depth = e.bottom.saturating_sub(baseline);
                DescenderInfo {
                    has_descender: depth > 0,
                    baseline_height: (baseline + 1).saturating_sub(e.top),
                    descender_height: depth,
                    total_height: e.height,
                    vertical_offset: 0,
                }
            } else if DESCENDER_CHARS.contains(ch) {
                let depth = descent.min(e.height);
                DescenderInfo {
                    has_descender: true,
                    baseline_height: e.height - depth,
                    descender_height: depth,
                    total_height: e.height,
                    vertical_offset: line_rows - e.height,
                }
            } else {
                DescenderInfo {
                    has_descender: false,
                    baseline_height: e.height,
                    descender_height: 0,
                    total_height: e.height,
                    vertical_offset: baseline.saturating_sub(e.bottom).min(line_rows - e.height),
                }
            };
            (ch, info)
        })
        .collect()
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GlyphKind {
    /// The space character; advances half a pixel and never has ink.
    Space,
    /// A font glyph with at least one ink pixel.
    Ink,
    /// A font glyph whose scaled bitmap has no ink; laid out like a space.
    Collapsed,
    /// A character the font does not define.
    Missing,
}

/// A character ready for layout at one scale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedGlyph {
    pub ch: char,
    pub kind: GlyphKind,
    /// Scaled bitmap rows, without vertical offset applied.
    pub rows: Vec<String>,
    pub width: usize,
    /// Rows the glyph spans in the line; the full line height for glyphs
    /// pinned to the baseline.
    pub height: usize,
    pub vertical_offset: usize,
}

impl ResolvedGlyph {
    fn space_like(ch: char, kind: GlyphKind, line_height: usize) -> Self {
        let width = SPACE_ADVANCE.ceil() as usize;
        Self {
            ch,
            kind,
            rows: if kind == GlyphKind::Space {
                Vec::new()
            } else {
                vec![" ".repeat(width)]
            },
            width,
            height: line_height,
            vertical_offset: 0,
        }
    }

    pub fn is_space(&self) -> bool {
        self.kind == GlyphKind::Space
    }

    /// The part of the glyph that falls on `line_row` of the text line.
    pub fn row(&self, line_row: usize) -> Option<&str> {
        line_row
            .checked_sub(self.vertical_offset)
            .and_then(|r| self.rows.get(r))
            .map(String::as_str)
    }

    /// Bitmap as laid into the line: offset rows first, then the glyph rows.
    pub fn placed_rows(&self) -> Vec<String> {
        let mut out = vec![" ".repeat(self.width); self.vertical_offset];
        out.extend(self.rows.iter().cloned());
        out
    }
}

/// Resolves characters of one font at one scale, caching per character.
///
/// A resolver belongs to a single render call; it is never shared.
pub struct GlyphResolver<'a> {
    font: &'a Font,
    scale_factor: f64,
    line_height: usize,
    missing_width: usize,
    descenders: HashMap<char, DescenderInfo>,
    cache: HashMap<char, ResolvedGlyph>,
}

impl<'a> GlyphResolver<'a> {
    pub fn new(font: &'a Font, scale_factor: f64) -> Self {
        let descenders = analyze_descenders(font, scale_factor);

        let tallest = font
            .iter_glyphs()
            .map(|(_, raw)| prepared_rows(raw, scale_factor).len())
            .max()
            .unwrap_or(0);
        let placed = descenders
            .values()
            .map(|d| d.total_height + d.vertical_offset)
            .max()
            .unwrap_or(0);

        Self {
            font,
            scale_factor,
            line_height: tallest.max(placed),
            missing_width: missing_char_width(font),
            descenders,
            cache: HashMap::new(),
        }
    }

    /// Rows in every composed text line.
    pub fn line_height(&self) -> usize {
        self.line_height
    }

    pub fn resolve(&mut self, ch: char) -> &ResolvedGlyph {
        if !self.cache.contains_key(&ch) {
            let glyph = self.build(ch);
            self.cache.insert(ch, glyph);
        }
        &self.cache[&ch]
    }

    /// A glyph previously produced by [`resolve`](Self::resolve).
    pub(crate) fn cached(&self, ch: char) -> Option<&ResolvedGlyph> {
        self.cache.get(&ch)
    }

    fn build(&self, ch: char) -> ResolvedGlyph {
        if ch == ' ' {
            return ResolvedGlyph::space_like(ch, GlyphKind::Space, self.line_height);
        }
        let Some(raw) = self.font.glyph(ch) else {
            tracing::trace!(%ch, width = self.missing_width, "character missing from font");
            return ResolvedGlyph {
                ch,
                kind: GlyphKind::Missing,
                rows: vec![" ".repeat(self.missing_width); self.line_height],
                width: self.missing_width,
                height: self.line_height,
                vertical_offset: 0,
            };
        };

        let rows = prepared_rows(raw, self.scale_factor);
        if !rows.iter().any(|r| has_ink(r)) {
            return ResolvedGlyph::space_like(ch, GlyphKind::Collapsed, self.line_height);
        }

        // baseline-placed glyphs occupy the whole line once their offset rows are counted
        let (height, vertical_offset) = match self.descenders.get(&ch) {
            Some(info) => (
                self.line_height.max(info.vertical_offset + rows.len()),
                info.vertical_offset,
            ),
            None => (rows.len(), self.line_height.saturating_sub(rows.len()) / 2),
        };
        ResolvedGlyph {
            ch,
            kind: GlyphKind::Ink,
            width: bitmap_width(&rows),
            rows,
            height,
            vertical_offset,
        }
    }
}

/// Width given to characters the font lacks: the font's space width, else the
/// width of the first probe character it defines, else [`DEFAULT_MISSING_WIDTH`].
fn missing_char_width(font: &Font) -> usize {
    std::iter::once(' ')
        .chain(WIDTH_PROBES)
        .find_map(|ch| font.glyph(ch).and_then(|rows| rows.first()))
        .map(|row| row_width(row))
        .unwrap_or(DEFAULT_MISSING_WIDTH)
}

/// Resolve a single character without keeping the resolver around.
pub fn resolve_glyph(ch: char, font: &Font, scale_factor: f64) -> ResolvedGlyph {
    GlyphResolver::new(font, scale_factor).resolve(ch).clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(r: &[&str]) -> Vec<String> {
        r.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn scale_identity() {
        assert_eq!(scale_bitmap(&["█ █"], 1.0), rows(&["█ █"]));
    }

    #[test]
    fn scale_double_repeats_cells() {
        assert_eq!(
            scale_bitmap(&["█ ", " ▀"], 2.0),
            rows(&["██  ", "██  ", "  ▀▀", "  ▀▀"])
        );
    }

    #[test]
    fn scale_half_selects_even_cells() {
        assert_eq!(
            scale_bitmap(&["█ █ █", "     ", "▄▄▄▄▄"], 0.5),
            rows(&["███", "▄▄▄"])
        );
    }

    #[test]
    fn scale_half_keeps_single_cell() {
        assert_eq!(scale_bitmap(&["▀"], 0.5), rows(&["▀"]));
    }

    #[test]
    fn missing_width_prefers_space_then_probes() {
        let mut font = Font::new("w");
        font.add_glyph('M', &["█████"]);
        assert_eq!(missing_char_width(&font), 5);
        font.add_glyph('x', &["███"]);
        assert_eq!(missing_char_width(&font), 3);
        font.add_glyph(' ', &["  "]);
        assert_eq!(missing_char_width(&font), 2);
        assert_eq!(missing_char_width(&Font::new("empty")), DEFAULT_MISSING_WIDTH);
    }

    #[test]
    fn descender_zone_detected_for_full_height_glyphs() {
        let mut font = Font::new("d");
        font.add_glyph('A', &["██", "██", "██", "  "]);
        font.add_glyph('a', &["  ", "██", "██", "  "]);
        font.add_glyph('g', &["  ", "██", "██", "██"]);
        let info = analyze_descenders(&font, 1.0);
        assert!(info[&'g'].has_descender);
        assert_eq!(info[&'g'].descender_height, 1);
        assert!(!info[&'a'].has_descender);
        assert_eq!(info[&'A'].vertical_offset, 0);
    }

    #[test]
    fn cropped_glyphs_sit_on_baseline() {
        let mut font = Font::new("c");
        font.add_glyph('A', &["█", "█", "█"]);
        font.add_glyph('a', &["█", "█"]);
        font.add_glyph('g', &["█", "█", "█", "█"]);
        let info = analyze_descenders(&font, 1.0);
        // line is 4 rows, baseline row 2
        assert_eq!(info[&'a'].vertical_offset, 1);
        assert_eq!(info[&'A'].vertical_offset, 0);
        assert_eq!(info[&'g'].vertical_offset, 0);
        assert!(info[&'g'].has_descender);

        let a = resolve_glyph('a', &font, 1.0);
        assert_eq!(a.rows.len(), 2);
        assert_eq!(a.height, 4);
    }

    #[test]
    fn no_descender_zone_means_no_info() {
        let mut font = Font::new("n");
        font.add_glyph('A', &["██", "██"]);
        font.add_glyph('-', &["██"]);
        assert!(analyze_descenders(&font, 1.0).is_empty());
        let glyph = resolve_glyph('-', &font, 1.0);
        assert_eq!(glyph.vertical_offset, 0);
        assert_eq!(glyph.height, 1);
    }
}
