//! Multi-line assembly: per-line layout, alignment and stacking.
use crate::{
    export::visible_width,
    font::Font,
    layout::LineComposer,
    options::{Alignment, RenderOptions},
};

/// Drop leading and trailing rows that contain only whitespace.
pub fn strip_blank_rows(rows: Vec<String>) -> Vec<String> {
    let Some(start) = rows.iter().position(|r| !r.trim().is_empty()) else {
        return Vec::new();
    };
    let end = rows
        .iter()
        .rposition(|r| !r.trim().is_empty())
        .unwrap_or(start);
    rows.into_iter().skip(start).take(end - start + 1).collect()
}

/// Widest row, ignoring ANSI escapes.
pub fn block_width<S: AsRef<str>>(rows: &[S]) -> usize {
    rows.iter()
        .map(|r| visible_width(r.as_ref()))
        .max()
        .unwrap_or(0)
}

/// Left padding for a block of `width` inside `target` columns.
pub fn left_padding(alignment: Alignment, width: usize, target: usize) -> usize {
    let slack = target.saturating_sub(width);
    match alignment {
        Alignment::Left => 0,
        Alignment::Center => slack / 2,
        Alignment::Right => slack,
    }
}

/// Pad every row of one line block to `target` columns, shifting the whole
/// block by the same left padding.
pub fn align_block(rows: &[String], target: usize, alignment: Alignment) -> Vec<String> {
    let width = block_width(rows);
    if width >= target {
        return rows.to_vec();
    }
    let left = left_padding(alignment, width, target);
    rows.iter()
        .map(|row| {
            let right = target.saturating_sub(visible_width(row) + left);
            format!("{}{}{}", " ".repeat(left), row, " ".repeat(right))
        })
        .collect()
}

/// Right-pad all rows with spaces to the widest visible row.
pub fn pad_to_uniform_width(rows: &mut [String]) {
    let width = block_width(rows);
    for row in rows.iter_mut() {
        let missing = width - visible_width(row);
        row.extend(std::iter::repeat(' ').take(missing));
    }
}

/// Render `text` into an uncolored block of equal-width rows.
///
/// Each `\n`-separated line is composed on its own and trimmed of blank
/// rows above and below, then aligned against the widest line. Line blocks
/// are separated by `line_spacing` blank rows; an empty input line stands for
/// a single blank row.
pub fn assemble(text: &str, font: &Font, options: &RenderOptions) -> Vec<String> {
    if text.is_empty() || font.is_empty() {
        return Vec::new();
    }
    let mut composer = LineComposer::new(
        font,
        options.char_spacing,
        options.word_spacing,
        options.scale_factor,
    );

    let blocks: Vec<Vec<String>> = text
        .split('\n')
        .map(|line| strip_blank_rows(composer.compose(line)))
        .collect();
    let max_width = blocks.iter().map(|b| block_width(b)).max().unwrap_or(0);

    let mut out: Vec<String> = Vec::new();
    for (i, block) in blocks.iter().enumerate() {
        if block.is_empty() {
            if i > 0 {
                out.push(String::new());
            }
            continue;
        }
        if i > 0 && !out.is_empty() {
            out.extend(std::iter::repeat(String::new()).take(options.line_spacing.max(0) as usize));
        }
        out.extend(align_block(block, max_width, options.alignment));
    }

    pad_to_uniform_width(&mut out);
    out
}
