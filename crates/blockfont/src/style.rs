//! Coloring and drop shadows for a plain rendered block.
use crate::{
    color::{Rgb, DEFAULT_RAINBOW},
    options::{ColorMode, GradientDirection, RenderOptions},
};

/// How main-text pixels get their color, decided once per render.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedColorMode {
    Solid,
    Gradient {
        end: Rgb,
        direction: GradientDirection,
    },
    Rainbow {
        palette: Vec<Rgb>,
        frame: u64,
        speed: u64,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Shadow {
    pub dx: i32,
    pub dy: i32,
    pub glyph: char,
    pub color: Rgb,
}

/// Resolved styling for one render call.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    pub text_color: Rgb,
    pub mode: ResolvedColorMode,
    pub shadow: Option<Shadow>,
}

impl Style {
    /// Collapse the option fields into one coloring decision.
    ///
    /// An explicit color mode wins; a solid mode with the legacy
    /// `use_gradient` flag and a distinct gradient color becomes a gradient.
    /// A displaced shadow is dropped when `half_pixel_conflict` is set; the
    /// options themselves are left untouched.
    pub fn resolve(options: &RenderOptions, half_pixel_conflict: bool) -> Self {
        let text_color = Rgb::from_hex(&options.text_color).unwrap_or(Rgb::BLACK);
        let gradient_end = Rgb::from_hex(&options.gradient_color);

        let mode = match options.color_mode {
            ColorMode::Rainbow => {
                let mut palette: Vec<Rgb> = options
                    .rainbow_colors
                    .iter()
                    .filter_map(|c| Rgb::from_hex(c))
                    .collect();
                if palette.is_empty() {
                    palette = DEFAULT_RAINBOW.iter().filter_map(|c| Rgb::from_hex(c)).collect();
                }
                ResolvedColorMode::Rainbow {
                    palette,
                    frame: options.rainbow_frame,
                    speed: options.rainbow_speed,
                }
            }
            ColorMode::Gradient => ResolvedColorMode::Gradient {
                end: gradient_end.unwrap_or(Rgb::BLACK),
                direction: options.gradient_direction,
            },
            ColorMode::Solid => match gradient_end {
                Some(end) if options.use_gradient && end != text_color => {
                    ResolvedColorMode::Gradient {
                        end,
                        direction: options.gradient_direction,
                    }
                }
                _ => ResolvedColorMode::Solid,
            },
        };

        let suppressed = options.has_shadow_offset() && half_pixel_conflict;
        if suppressed {
            tracing::debug!("shadow disabled: text uses half-block pixels");
        }
        let shadow = (options.shadow_enabled && !suppressed).then(|| Shadow {
            dx: options.shadow_horizontal_offset,
            dy: options.shadow_vertical_offset,
            glyph: options.shadow_style.glyph(),
            color: options.shadow_style.color().unwrap_or(text_color),
        });

        Self {
            text_color,
            mode,
            shadow,
        }
    }

    fn cell_color(&self, cell: &Cell, canvas_x: usize, geometry: &Geometry) -> Rgb {
        match &self.mode {
            ResolvedColorMode::Rainbow {
                palette,
                frame,
                speed,
            } if cell.is_main && !palette.is_empty() => {
                let shift = if *speed > 0 { frame / speed } else { 0 };
                let idx = ((cell.col + cell.row) as u64).wrapping_add(shift) % palette.len() as u64;
                palette[idx as usize]
            }
            ResolvedColorMode::Gradient { end, direction } => {
                let factor = gradient_factor(*direction, cell.row, canvas_x, geometry);
                self.text_color.lerp(*end, factor)
            }
            _ => match (&self.shadow, cell.is_main) {
                (Some(shadow), false) => shadow.color,
                _ => self.text_color,
            },
        }
    }
}

fn gradient_factor(direction: GradientDirection, row: usize, canvas_x: usize, g: &Geometry) -> f64 {
    let factor = if direction.is_vertical() {
        if g.block_height > 1 {
            row as f64 / (g.block_height - 1) as f64
        } else {
            return 0.0;
        }
    } else if g.canvas_width > 1 {
        // whole canvas, so glyphs of differing height share one ramp
        canvas_x as f64 / (g.canvas_width - 1) as f64
    } else {
        0.0
    };
    if direction.is_reversed() {
        1.0 - factor
    } else {
        factor
    }
}

/// One stamped canvas pixel.
///
/// `row`/`col` are the pixel's coordinates in the unshifted block, so shadow
/// pixels color exactly like the text pixel they were cast from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub is_main: bool,
    pub row: usize,
    pub col: usize,
}

struct Geometry {
    block_height: usize,
    canvas_width: usize,
}

/// Composite the shadow and the text of `plain_block` and encode every pixel
/// as a 24-bit ANSI foreground escape. Spaces stay bare; each row has its
/// trailing spaces trimmed.
pub fn apply_style<S: AsRef<str>>(plain_block: &[S], style: &Style) -> Vec<String> {
    if plain_block.is_empty() {
        return Vec::new();
    }
    let rows: Vec<Vec<char>> = plain_block.iter().map(|r| r.as_ref().chars().collect()).collect();
    let block_height = rows.len();
    let block_width = rows.iter().map(Vec::len).max().unwrap_or(0);

    let (dx, dy) = style.shadow.map_or((0, 0), |s| (s.dx as i64, s.dy as i64));
    let canvas_width = block_width + dx.unsigned_abs() as usize;
    let canvas_height = block_height + dy.unsigned_abs() as usize;
    let origin_x = (-dx).max(0);
    let origin_y = (-dy).max(0);

    let mut canvas: Vec<Vec<Option<Cell>>> = vec![vec![None; canvas_width]; canvas_height];
    let mut stamp = |x: i64, y: i64, cell: Cell| {
        if x < 0 || y < 0 {
            return;
        }
        if let Some(slot) = canvas.get_mut(y as usize).and_then(|r| r.get_mut(x as usize)) {
            *slot = Some(cell);
        }
    };

    if let Some(shadow) = style.shadow {
        for (y, row) in rows.iter().enumerate() {
            for (x, &ch) in row.iter().enumerate() {
                if ch != ' ' {
                    let cell = Cell {
                        ch: shadow.glyph,
                        is_main: false,
                        row: y,
                        col: x,
                    };
                    stamp(origin_x + dx + x as i64, origin_y + dy + y as i64, cell);
                }
            }
        }
    }
    for (y, row) in rows.iter().enumerate() {
        for (x, &ch) in row.iter().enumerate() {
            if ch != ' ' {
                let cell = Cell {
                    ch,
                    is_main: true,
                    row: y,
                    col: x,
                };
                stamp(origin_x + x as i64, origin_y + y as i64, cell);
            }
        }
    }

    let geometry = Geometry {
        block_height,
        canvas_width,
    };
    canvas
        .iter()
        .map(|line| {
            let mut out = String::new();
            for (x, slot) in line.iter().enumerate() {
                match slot {
                    Some(cell) => out.push_str(&style.cell_color(cell, x, &geometry).paint(cell.ch)),
                    None => out.push(' '),
                }
            }
            out.trim_end_matches(' ').to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ShadowStyle;

    fn white() -> Style {
        Style::resolve(&RenderOptions::default(), false)
    }

    #[test]
    fn solid_paints_every_pixel() {
        let out = apply_style(&["█ █"], &white());
        let px = Rgb::WHITE.paint('█');
        assert_eq!(out, vec![format!("{px} {px}")]);
    }

    #[test]
    fn trailing_blanks_are_trimmed() {
        let out = apply_style(&["█  ", "   "], &white());
        assert_eq!(out, vec![Rgb::WHITE.paint('█'), String::new()]);
    }

    #[test]
    fn legacy_gradient_flag_switches_mode() {
        let options = RenderOptions {
            use_gradient: true,
            gradient_color: "#000000".into(),
            ..Default::default()
        };
        assert!(matches!(
            Style::resolve(&options, false).mode,
            ResolvedColorMode::Gradient { end: Rgb::BLACK, .. }
        ));

        let same = RenderOptions {
            use_gradient: true,
            gradient_color: "#FFFFFF".into(),
            ..Default::default()
        };
        assert_eq!(Style::resolve(&same, false).mode, ResolvedColorMode::Solid);
    }

    #[test]
    fn vertical_gradient_ends_at_both_colors() {
        let options = RenderOptions {
            color_mode: ColorMode::Gradient,
            gradient_color: "#000000".into(),
            ..Default::default()
        };
        let out = apply_style(&["█", "█", "█"], &Style::resolve(&options, false));
        assert_eq!(out[0], Rgb::WHITE.paint('█'));
        assert_eq!(out[1], Rgb::new(127, 127, 127).paint('█'));
        assert_eq!(out[2], Rgb::BLACK.paint('█'));
    }

    #[test]
    fn rainbow_cycles_with_frame() {
        let options = RenderOptions {
            color_mode: ColorMode::Rainbow,
            rainbow_colors: vec!["#FF0000".into(), "#00FF00".into()],
            rainbow_speed: 1,
            ..Default::default()
        };
        let red = Rgb::new(255, 0, 0).paint('█');
        let green = Rgb::new(0, 255, 0).paint('█');
        assert_eq!(
            apply_style(&["██"], &Style::resolve(&options, false)),
            vec![format!("{red}{green}")]
        );
        let next = RenderOptions {
            rainbow_frame: 1,
            ..options
        };
        assert_eq!(
            apply_style(&["██"], &Style::resolve(&next, false)),
            vec![format!("{green}{red}")]
        );
    }

    #[test]
    fn zero_speed_ignores_frame() {
        let options = RenderOptions {
            color_mode: ColorMode::Rainbow,
            rainbow_speed: 0,
            rainbow_frame: 99,
            ..Default::default()
        };
        let style = Style::resolve(&options, false);
        let ResolvedColorMode::Rainbow { palette, .. } = &style.mode else {
            panic!("expected rainbow mode");
        };
        assert_eq!(palette.len(), DEFAULT_RAINBOW.len());
        assert_eq!(apply_style(&["█"], &style), vec![palette[0].paint('█')]);
    }

    #[test]
    fn shadow_sits_behind_text() {
        let options = RenderOptions {
            shadow_enabled: true,
            shadow_horizontal_offset: 1,
            shadow_vertical_offset: 1,
            shadow_style: ShadowStyle::Dark,
            ..Default::default()
        };
        let out = apply_style(&["██"], &Style::resolve(&options, false));
        let text = Rgb::WHITE.paint('█');
        let shade = Rgb::WHITE.paint('▓');
        assert_eq!(out, vec![format!("{text}{text}"), format!(" {shade}{shade}")]);
    }

    #[test]
    fn negative_offset_shifts_text_right() {
        let options = RenderOptions {
            shadow_enabled: true,
            shadow_horizontal_offset: -2,
            ..Default::default()
        };
        let out = apply_style(&["█"], &Style::resolve(&options, false));
        assert_eq!(out, vec![format!("{} {}", Rgb::WHITE.paint('░'), Rgb::WHITE.paint('█'))]);
    }

    #[test]
    fn half_pixel_conflict_drops_displaced_shadow() {
        let options = RenderOptions {
            shadow_enabled: true,
            shadow_vertical_offset: 1,
            ..Default::default()
        };
        assert!(Style::resolve(&options, true).shadow.is_none());
        assert!(Style::resolve(&options, false).shadow.is_some());
        assert!(options.shadow_enabled);
    }
}
