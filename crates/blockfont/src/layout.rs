//! Horizontal layout of one text line.
use std::collections::HashMap;

use crate::{
    font::Font,
    glyph::{GlyphResolver, ResolvedGlyph, SPACE_ADVANCE},
    kerning::kern,
};

/// Length of the run of non-space characters that ends just before `from`,
/// after skipping any spaces immediately before it.
fn run_before(chars: &[char], from: usize) -> usize {
    chars[..from]
        .iter()
        .rev()
        .skip_while(|&&c| c == ' ')
        .take_while(|&&c| c != ' ')
        .count()
}

/// Length of the run of non-space characters that starts after `from`,
/// after skipping any spaces immediately after it.
fn run_after(chars: &[char], from: usize) -> usize {
    chars[from + 1..]
        .iter()
        .skip_while(|&&c| c == ' ')
        .take_while(|&&c| c != ' ')
        .count()
}

/// A space separates words only when the tokens on both sides are longer
/// than one character; otherwise it is letter spacing and gets no word gap.
pub fn is_word_boundary(chars: &[char], index: usize) -> bool {
    if chars.get(index) != Some(&' ') {
        return false;
    }
    run_before(chars, index) > 1 && run_after(chars, index) > 1
}

/// Composes text lines for one render call.
///
/// Holds the call-scoped caches: resolved glyphs (through the resolver) and
/// kerning per character pair.
pub struct LineComposer<'a> {
    resolver: GlyphResolver<'a>,
    kerning: HashMap<(char, char), i32>,
    char_spacing: i32,
    word_spacing: f64,
}

impl<'a> LineComposer<'a> {
    pub fn new(font: &'a Font, char_spacing: i32, word_spacing: i32, scale_factor: f64) -> Self {
        Self {
            resolver: GlyphResolver::new(font, scale_factor),
            kerning: HashMap::new(),
            char_spacing,
            word_spacing: f64::from(word_spacing),
        }
    }

    pub fn line_height(&self) -> usize {
        self.resolver.line_height()
    }

    fn kerning(&mut self, left: char, right: char) -> i32 {
        if left == ' ' || right == ' ' {
            return 0;
        }
        if let Some(k) = self.kerning.get(&(left, right)) {
            return *k;
        }
        let a = self.resolver.resolve(left).placed_rows();
        let b = self.resolver.resolve(right).placed_rows();
        let k = kern(&a, &b);
        self.kerning.insert((left, right), k);
        k
    }

    /// Lay out `line` into exactly [`line_height`](Self::line_height) rows,
    /// each with trailing spaces trimmed.
    pub fn compose(&mut self, line: &str) -> Vec<String> {
        let chars: Vec<char> = line.chars().collect();
        if chars.is_empty() {
            return Vec::new();
        }
        for &ch in &chars {
            self.resolver.resolve(ch);
        }
        let kerns: Vec<i32> = chars
            .windows(2)
            .map(|pair| self.kerning(pair[0], pair[1]))
            .collect();
        let boundaries: Vec<bool> = (0..chars.len())
            .map(|i| is_word_boundary(&chars, i))
            .collect();

        let Some(glyphs) = chars
            .iter()
            .map(|&ch| self.resolver.cached(ch))
            .collect::<Option<Vec<_>>>()
        else {
            return Vec::new();
        };

        (0..self.resolver.line_height())
            .map(|row| {
                let positions = self.positions(&glyphs, &kerns, &boundaries, row);
                place_row(&glyphs, &positions, row)
            })
            .collect()
    }

    /// Exact (fractional) start column of every glyph on `row`.
    fn positions(
        &self,
        glyphs: &[&ResolvedGlyph],
        kerns: &[i32],
        boundaries: &[bool],
        row: usize,
    ) -> Vec<f64> {
        let mut positions = Vec::with_capacity(glyphs.len());
        let mut x = 0.0;
        positions.push(x);
        for idx in 1..glyphs.len() {
            let prev = glyphs[idx - 1];
            let cur = glyphs[idx];
            let advance = if prev.is_space() {
                if boundaries[idx - 1] {
                    SPACE_ADVANCE + self.word_spacing
                } else {
                    SPACE_ADVANCE
                }
            } else {
                let mut advance =
                    prev.width as f64 + f64::from(kerns[idx - 1]) + f64::from(self.char_spacing);
                // odd height difference: shift half a pixel below the shorter glyph
                let diff = prev.height as i64 - cur.height as i64;
                if diff % 2 != 0 && row >= prev.height.min(cur.height) {
                    advance += 0.5;
                }
                advance
            };
            x += advance;
            positions.push(x);
        }
        positions
    }
}

/// Stamp the glyph fragments of one row at their rounded columns.
///
/// Rounding remainders accumulate from glyph to glyph so fractional advances
/// do not drift. Ink only lands on cells that are still blank.
fn place_row(glyphs: &[&ResolvedGlyph], positions: &[f64], row: usize) -> String {
    let mut buf: Vec<char> = Vec::new();
    let mut carried = 0.0;
    for (glyph, &position) in glyphs.iter().zip(positions) {
        let exact = position + carried;
        let col = exact.round();
        carried += exact - col;
        let col = col as i64;

        if glyph.is_space() {
            continue;
        }
        let Some(fragment) = glyph.row(row) else {
            continue;
        };
        for (i, ch) in fragment.chars().enumerate() {
            let target = col + i as i64;
            if target < 0 || ch == ' ' {
                continue;
            }
            let target = target as usize;
            if target >= buf.len() {
                buf.resize(target + 1, ' ');
            }
            if buf[target] == ' ' {
                buf[target] = ch;
            }
        }
    }
    let line: String = buf.into_iter().collect();
    line.trim_end_matches(' ').to_string()
}

/// Compose a single line with a fresh set of caches.
pub fn compose_line(
    line: &str,
    font: &Font,
    char_spacing: i32,
    word_spacing: i32,
    scale_factor: f64,
) -> Vec<String> {
    LineComposer::new(font, char_spacing, word_spacing, scale_factor).compose(line)
}
