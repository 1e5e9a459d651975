//! RGB colors, `#RRGGBB` parsing and the built-in palettes.

use std::fmt;

/// Palette used by rainbow mode when the options do not supply one.
pub const DEFAULT_RAINBOW: [&str; 7] = [
    "#FF0000", // red
    "#FF7F00", // orange
    "#FFFF00", // yellow
    "#00FF00", // green
    "#00FFFF", // cyan
    "#0000FF", // blue
    "#8B00FF", // violet
];

/// ANSI SGR foreground codes and the truecolor value they are rendered as.
pub const ANSI_COLORS: [(&str, &str); 16] = [
    ("30", "#000000"),
    ("31", "#CD3131"),
    ("32", "#0DBC79"),
    ("33", "#E5E510"),
    ("34", "#2472C8"),
    ("35", "#BC3FBC"),
    ("36", "#11A8CD"),
    ("37", "#E5E5E5"),
    ("90", "#666666"),
    ("91", "#F14C4C"),
    ("92", "#23D18B"),
    ("93", "#F5F543"),
    ("94", "#3B8EEA"),
    ("95", "#D670D6"),
    ("96", "#29B8DB"),
    ("97", "#FFFFFF"),
];

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a strict `#RRGGBB` string.
    pub fn from_hex(hex: &str) -> Option<Self> {
        if !is_valid_hex(hex) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(1)?, channel(3)?, channel(5)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Linear blend towards `end`; `factor` 0 yields `self`, 1 yields `end`.
    ///
    /// Each channel is truncated towards zero and clamped to `0..=255`.
    pub fn lerp(self, end: Rgb, factor: f64) -> Rgb {
        let mix = |a: u8, b: u8| {
            let v = f64::from(a) + factor * (f64::from(b) - f64::from(a));
            (v as i32).clamp(0, 255) as u8
        };
        Rgb::new(mix(self.r, end.r), mix(self.g, end.g), mix(self.b, end.b))
    }

    /// Wrap `ch` in a 24-bit foreground escape followed by a reset.
    pub fn paint(self, ch: char) -> String {
        format!("\x1b[38;2;{};{};{}m{}\x1b[0m", self.r, self.g, self.b, ch)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// `true` iff `color` is `#` followed by exactly six hex digits.
pub fn is_valid_hex(color: &str) -> bool {
    let bytes = color.as_bytes();
    bytes.len() == 7 && bytes[0] == b'#' && bytes[1..].iter().all(u8::is_ascii_hexdigit)
}

/// Hex value for an ANSI foreground code such as `"31"`.
pub fn ansi_code_to_hex(code: &str) -> Option<&'static str> {
    ANSI_COLORS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, hex)| *hex)
}

/// Accept either a `#RRGGBB` literal or an ANSI code, returning the hex form.
pub fn parse_color_spec(spec: &str) -> Option<String> {
    if spec.starts_with('#') {
        return is_valid_hex(spec).then(|| spec.to_ascii_uppercase());
    }
    ansi_code_to_hex(spec).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing_is_strict() {
        assert_eq!(Rgb::from_hex("#FF8000"), Some(Rgb::new(255, 128, 0)));
        assert_eq!(Rgb::from_hex("#ff8000"), Some(Rgb::new(255, 128, 0)));
        assert_eq!(Rgb::from_hex("FF8000"), None);
        assert_eq!(Rgb::from_hex("#FF80"), None);
        assert_eq!(Rgb::from_hex("#FF800Z"), None);
        assert_eq!(Rgb::from_hex("#ÿÿÿ"), None);
    }

    #[test]
    fn lerp_truncates_channels() {
        let mid = Rgb::WHITE.lerp(Rgb::BLACK, 0.5);
        assert_eq!(mid, Rgb::new(127, 127, 127));
        assert_eq!(Rgb::BLACK.lerp(Rgb::WHITE, 1.5), Rgb::WHITE);
        assert_eq!(Rgb::new(10, 20, 30).lerp(Rgb::WHITE, 0.0), Rgb::new(10, 20, 30));
    }

    #[test]
    fn color_specs() {
        assert_eq!(parse_color_spec("31").as_deref(), Some("#CD3131"));
        assert_eq!(parse_color_spec("#abcdef").as_deref(), Some("#ABCDEF"));
        assert_eq!(parse_color_spec("38"), None);
        assert_eq!(parse_color_spec("#abc"), None);
    }
}
