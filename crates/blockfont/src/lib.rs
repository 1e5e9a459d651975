//! blockfont: large-type terminal text from bitmap block fonts.
//!
//! A [`Font`] maps characters to small bitmaps of block characters. Rendering
//! resolves and scales each glyph, kerns neighbours, lays out and aligns every
//! line, then colors the block and optionally casts a shadow, producing rows of
//! 24-bit ANSI escaped text.

pub mod block;
pub mod color;
mod error;
pub mod export;
mod font;
pub mod glyph;
pub mod kerning;
pub mod layout;
pub mod options;
pub mod raster;
mod registry;
pub mod style;

pub use error::{FontError, Result, ValidationError};
pub use export::ExportFormat;
pub use font::Font;
pub use options::{Alignment, ColorMode, GradientDirection, RenderOptions, ShadowStyle};
pub use registry::FontRegistry;
pub use style::Style;

// Test utilities
pub mod test_support;

/// Render `text` with `font`.
///
/// Returns one string per output row, all of the same visible width. An empty
/// text or a font without glyphs yields no rows. Options are not validated
/// here; see [`try_render_text`].
pub fn render_text(text: &str, font: &Font, options: &RenderOptions) -> Vec<String> {
    if text.is_empty() || font.is_empty() {
        return Vec::new();
    }
    let half_pixel_conflict = options.has_shadow_offset()
        && glyph::has_half_pixel_conflict(text, font, options.scale_factor);
    let style = Style::resolve(options, half_pixel_conflict);

    let plain = block::assemble(text, font, options);
    let mut rows = style::apply_style(&plain, &style);
    block::pad_to_uniform_width(&mut rows);
    tracing::trace!(font = font.name(), rows = rows.len(), "rendered text");
    rows
}

/// Validate `options`, then render.
pub fn try_render_text(text: &str, font: &Font, options: &RenderOptions) -> Result<Vec<String>> {
    options.validate()?;
    Ok(render_text(text, font, options))
}
