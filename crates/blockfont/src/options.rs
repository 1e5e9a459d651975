//! Render options and their validation.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    color::{is_valid_hex, Rgb},
    error::ValidationError,
};

pub const MIN_CHAR_SPACING: i32 = 0;
pub const MAX_CHAR_SPACING: i32 = 10;
pub const MIN_WORD_SPACING: i32 = 0;
pub const MAX_WORD_SPACING: i32 = 20;
pub const MIN_LINE_SPACING: i32 = 0;
pub const MAX_LINE_SPACING: i32 = 10;
pub const MIN_SCALE_FACTOR: f64 = 0.5;
pub const MAX_SCALE_FACTOR: f64 = 4.0;
pub const MIN_SHADOW_OFFSET: i32 = -5;
pub const MAX_SHADOW_OFFSET: i32 = 5;

/// The scale factors offered to users.
pub const SCALE_FACTORS: [f64; 4] = [0.5, 1.0, 2.0, 4.0];

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GradientDirection {
    #[default]
    UpDown,
    DownUp,
    LeftRight,
    RightLeft,
}

impl GradientDirection {
    pub fn is_vertical(self) -> bool {
        matches!(self, GradientDirection::UpDown | GradientDirection::DownUp)
    }

    pub fn is_reversed(self) -> bool {
        matches!(self, GradientDirection::DownUp | GradientDirection::RightLeft)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorMode {
    #[default]
    Solid,
    Gradient,
    Rainbow,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShadowStyle {
    #[default]
    Light,
    Medium,
    Dark,
}

impl ShadowStyle {
    pub const ALL: [ShadowStyle; 3] = [ShadowStyle::Light, ShadowStyle::Medium, ShadowStyle::Dark];

    /// Character stamped for every shadow pixel.
    pub fn glyph(self) -> char {
        match self {
            ShadowStyle::Light => '░',
            ShadowStyle::Medium => '▒',
            ShadowStyle::Dark => '▓',
        }
    }

    /// Fixed shadow color, if the style has one. `None` inherits the text color.
    pub fn color(self) -> Option<Rgb> {
        None
    }

    pub fn name(self) -> &'static str {
        match self {
            ShadowStyle::Light => "Light Shade",
            ShadowStyle::Medium => "Medium Shade",
            ShadowStyle::Dark => "Dark Shade",
        }
    }
}

macro_rules! choice_from_str {
    ($ty:ty, $field:literal, $expected:literal, { $($($pat:literal)|+ => $variant:expr),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($($pat)|+ => Ok($variant),)+
                    _ => Err(ValidationError::InvalidChoice {
                        field: $field,
                        value: s.to_string(),
                        expected: $expected,
                    }),
                }
            }
        }
    };
}

choice_from_str!(Alignment, "alignment", "left, center, right", {
    "left" => Alignment::Left,
    "center" | "centre" => Alignment::Center,
    "right" => Alignment::Right,
});

choice_from_str!(GradientDirection, "gradient_direction", "down, up, right, left", {
    "down" | "up-down" => GradientDirection::UpDown,
    "up" | "down-up" => GradientDirection::DownUp,
    "right" | "left-right" => GradientDirection::LeftRight,
    "left" | "right-left" => GradientDirection::RightLeft,
});

choice_from_str!(ColorMode, "color_mode", "solid, gradient, rainbow", {
    "solid" | "single" => ColorMode::Solid,
    "gradient" => ColorMode::Gradient,
    "rainbow" => ColorMode::Rainbow,
});

choice_from_str!(ShadowStyle, "shadow_style", "light, medium, dark", {
    "light" | "0" => ShadowStyle::Light,
    "medium" | "1" => ShadowStyle::Medium,
    "dark" | "2" => ShadowStyle::Dark,
});

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        })
    }
}

impl fmt::Display for GradientDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GradientDirection::UpDown => "up-down",
            GradientDirection::DownUp => "down-up",
            GradientDirection::LeftRight => "left-right",
            GradientDirection::RightLeft => "right-left",
        })
    }
}

/// Everything that shapes one render call.
///
/// Values are never clamped: [`RenderOptions::validate`] either accepts the
/// whole set or names the first field that is out of its domain. Deserializing
/// fills absent fields from [`RenderOptions::default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub char_spacing: i32,
    pub word_spacing: i32,
    pub line_spacing: i32,

    pub alignment: Alignment,

    /// Primary `#RRGGBB` color; also the gradient start.
    pub text_color: String,
    /// Gradient end color.
    pub gradient_color: String,
    pub gradient_direction: GradientDirection,
    /// Legacy switch: gradient towards `gradient_color` while `color_mode` is solid.
    pub use_gradient: bool,

    pub color_mode: ColorMode,
    /// Custom rainbow palette; empty selects [`crate::color::DEFAULT_RAINBOW`].
    pub rainbow_colors: Vec<String>,
    pub rainbow_frame: u64,
    /// Frames per palette step. Zero disables the frame offset.
    pub rainbow_speed: u64,

    pub scale_factor: f64,

    pub shadow_enabled: bool,
    pub shadow_horizontal_offset: i32,
    pub shadow_vertical_offset: i32,
    pub shadow_style: ShadowStyle,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            char_spacing: 1,
            word_spacing: 2,
            line_spacing: 1,
            alignment: Alignment::Center,
            text_color: "#FFFFFF".to_string(),
            gradient_color: String::new(),
            gradient_direction: GradientDirection::UpDown,
            use_gradient: false,
            color_mode: ColorMode::Solid,
            rainbow_colors: Vec::new(),
            rainbow_frame: 0,
            rainbow_speed: 5,
            scale_factor: 1.0,
            shadow_enabled: false,
            shadow_horizontal_offset: 0,
            shadow_vertical_offset: 0,
            shadow_style: ShadowStyle::Light,
        }
    }
}

fn check_range(
    field: &'static str,
    value: i32,
    min: i32,
    max: i32,
) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value: i64::from(value),
            min: i64::from(min),
            max: i64::from(max),
        })
    }
}

fn check_color(field: &str, value: &str) -> Result<(), ValidationError> {
    if is_valid_hex(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidColor {
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}

impl RenderOptions {
    /// Check every field against its domain, reporting the first violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range(
            "char_spacing",
            self.char_spacing,
            MIN_CHAR_SPACING,
            MAX_CHAR_SPACING,
        )?;
        check_range(
            "word_spacing",
            self.word_spacing,
            MIN_WORD_SPACING,
            MAX_WORD_SPACING,
        )?;
        check_range(
            "line_spacing",
            self.line_spacing,
            MIN_LINE_SPACING,
            MAX_LINE_SPACING,
        )?;

        if !(MIN_SCALE_FACTOR..=MAX_SCALE_FACTOR).contains(&self.scale_factor) {
            return Err(ValidationError::ScaleOutOfRange {
                value: self.scale_factor,
                min: MIN_SCALE_FACTOR,
                max: MAX_SCALE_FACTOR,
            });
        }

        check_range(
            "shadow_horizontal_offset",
            self.shadow_horizontal_offset,
            MIN_SHADOW_OFFSET,
            MAX_SHADOW_OFFSET,
        )?;
        check_range(
            "shadow_vertical_offset",
            self.shadow_vertical_offset,
            MIN_SHADOW_OFFSET,
            MAX_SHADOW_OFFSET,
        )?;

        check_color("text_color", &self.text_color)?;
        if self.use_gradient || self.color_mode == ColorMode::Gradient {
            check_color("gradient_color", &self.gradient_color)?;
        }
        if self.color_mode == ColorMode::Rainbow {
            for (i, color) in self.rainbow_colors.iter().enumerate() {
                check_color(&format!("rainbow_colors[{i}]"), color)?;
            }
        }
        Ok(())
    }

    /// Shadow is on and actually displaced from the main text.
    pub fn has_shadow_offset(&self) -> bool {
        self.shadow_enabled
            && (self.shadow_horizontal_offset != 0 || self.shadow_vertical_offset != 0)
    }
}
