//! Optical kerning between two glyph bitmaps.
use crate::glyph::bitmap_width;

/// Pad `glyph` to `height` rows, each padded with spaces to the glyph's own width.
fn normalize<S: AsRef<str>>(glyph: &[S], height: usize) -> Vec<Vec<char>> {
    let width = bitmap_width(glyph);
    (0..height)
        .map(|y| {
            let mut row: Vec<char> = glyph
                .get(y)
                .map_or_else(Vec::new, |r| r.as_ref().chars().collect());
            row.resize(width, ' ');
            row
        })
        .collect()
}

fn is_ink(c: char) -> bool {
    c != ' ' && c != '\0'
}

/// Horizontal adjustment that makes the closest ink of `right` land exactly
/// one column after the closest ink of `left`, assuming `right` would
/// otherwise start at the declared width of `left`.
///
/// Rows are compared pairwise and the tightest row wins. When no row has ink
/// in both glyphs the global right edge of `left` and left edge of `right`
/// are used instead. A glyph without any ink yields 0.
pub fn kern<A: AsRef<str>, B: AsRef<str>>(left: &[A], right: &[B]) -> i32 {
    if left.is_empty() || right.is_empty() {
        return 0;
    }
    let height = left.len().max(right.len());
    let a = normalize(left, height);
    let b = normalize(right, height);

    let width_a = a.iter().map(Vec::len).max().unwrap_or(0) as i32;
    if width_a == 0 {
        return 0;
    }

    let mut tightest: Option<i32> = None;
    let mut right_edge_a: Option<i32> = None;
    let mut left_edge_b: Option<i32> = None;

    for (row_a, row_b) in a.iter().zip(&b) {
        let max_a = row_a.iter().rposition(|&c| is_ink(c)).map(|x| x as i32);
        let min_b = row_b.iter().position(|&c| is_ink(c)).map(|x| x as i32);

        right_edge_a = right_edge_a.max(max_a);
        if let Some(mb) = min_b {
            left_edge_b = Some(left_edge_b.map_or(mb, |cur| cur.min(mb)));
        }

        if let (Some(ma), Some(mb)) = (max_a, min_b) {
            let dist = width_a + mb - ma;
            tightest = Some(tightest.map_or(dist, |cur| cur.min(dist)));
        }
    }

    let dist = match (tightest, right_edge_a, left_edge_b) {
        (Some(d), _, _) => d,
        (None, Some(ma), Some(mb)) => width_a + mb - ma,
        _ => return 0,
    };
    1 - dist
}
