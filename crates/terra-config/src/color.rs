//! sRGB colors stored as CSS-style strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// An 8-bit sRGB color, serialized as `"#rrggbb"`.
///
/// Parsing also accepts `#rgb` shorthand and a few CSS color names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SrgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const NAMED_COLORS: &[(&str, SrgbColor)] = &[
    ("black", SrgbColor::rgb(0x00, 0x00, 0x00)),
    ("white", SrgbColor::rgb(0xff, 0xff, 0xff)),
    ("red", SrgbColor::rgb(0xff, 0x00, 0x00)),
    ("green", SrgbColor::rgb(0x00, 0x80, 0x00)),
    ("blue", SrgbColor::rgb(0x00, 0x00, 0xff)),
    ("yellow", SrgbColor::rgb(0xff, 0xff, 0x00)),
    ("orange", SrgbColor::rgb(0xff, 0xa5, 0x00)),
    ("cyan", SrgbColor::rgb(0x00, 0xff, 0xff)),
    ("magenta", SrgbColor::rgb(0xff, 0x00, 0xff)),
];

impl SrgbColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`, `#rgb`, or a CSS color name.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let trimmed = input.trim();
        let invalid = || ConfigError::InvalidColor(input.to_string());

        let Some(hex) = trimmed.strip_prefix('#') else {
            return NAMED_COLORS
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(trimmed))
                .map(|(_, color)| *color)
                .ok_or_else(invalid);
        };

        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        match hex.len() {
            6 => {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
                match (channel(0), channel(2), channel(4)) {
                    (Ok(r), Ok(g), Ok(b)) => Ok(Self::rgb(r, g, b)),
                    _ => Err(invalid()),
                }
            }
            3 => {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
                match (channel(0), channel(1), channel(2)) {
                    (Ok(r), Ok(g), Ok(b)) => Ok(Self::rgb(r, g, b)),
                    _ => Err(invalid()),
                }
            }
            _ => Err(invalid()),
        }
    }

    /// Channels as sRGB-encoded floats in `[0, 1]`.
    pub fn to_srgb_f32(self) -> [f32; 3] {
        [self.r, self.g, self.b].map(|c| c as f32 / 255.0)
    }

    /// Channels decoded to linear light, for shader uniforms and clear colors.
    pub fn to_linear(self) -> [f32; 3] {
        self.to_srgb_f32().map(srgb_channel_to_linear)
    }
}

fn srgb_channel_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

impl fmt::Display for SrgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for SrgbColor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SrgbColor {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SrgbColor> for String {
    fn from(color: SrgbColor) -> Self {
        color.to_string()
    }
}
