use crate::error::{Result, TextureError};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Parse a `RRGGBB` or `#RRGGBB` hex string
    ///
    /// Parsing is strict: exactly six hex digits after an optional `#`.
    /// Anything else is a caller error.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = |reason| TextureError::InvalidColor {
            input: hex.to_string(),
            reason,
        };

        if digits.len() != 6 {
            return Err(invalid("expected 6 hex digits"));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid("non-hex digit"));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid("non-hex digit"))
        };

        Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Format as lowercase `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub const fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    /// Sum of the three channels, a cheap brightness proxy
    pub fn luminance_sum(self) -> u32 {
        self.r as u32 + self.g as u32 + self.b as u32
    }
}

/// Linear interpolation between two colors
///
/// `t` is clamped to [0, 1] first and each channel is rounded to the
/// nearest integer.
pub fn lerp_color(from: Rgb, to: Rgb, t: f64) -> Rgb {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let mix = |a: u8, b: u8| {
        let a = a as f64;
        (a + (b as f64 - a) * t).round().clamp(0.0, 255.0) as u8
    };
    Rgb::new(mix(from.r, to.r), mix(from.g, to.g), mix(from.b, to.b))
}

/// Add `amount` to every channel, clamping to [0, 255]
pub fn adjust_color(color: Rgb, amount: i32) -> Rgb {
    let shift = |c: u8| (c as i32 + amount).clamp(0, 255) as u8;
    Rgb::new(shift(color.r), shift(color.g), shift(color.b))
}

/// Multiply every channel by `factor`, rounding and clamping to [0, 255]
pub fn scale_color(color: Rgb, factor: f64) -> Rgb {
    let scale = |c: u8| (c as f64 * factor).round().clamp(0.0, 255.0) as u8;
    Rgb::new(scale(color.r), scale(color.g), scale(color.b))
}

/// Derive a terrain seed from a pair of color strings
///
/// Runs a 31-multiplier polynomial hash with 32-bit wraparound over the
/// UTF-16 code units of the concatenated strings, then reduces the absolute
/// value modulo 1000. The same pair always yields the same seed.
pub fn seed_from_colors(base: &str, secondary: &str) -> u32 {
    let hash = base
        .encode_utf16()
        .chain(secondary.encode_utf16())
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as i32));
    hash.unsigned_abs() % 1000
}

/// The two caller-supplied colors of a texture request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub base: Rgb,
    pub secondary: Rgb,
}

impl Palette {
    pub const fn new(base: Rgb, secondary: Rgb) -> Self {
        Palette { base, secondary }
    }

    pub fn from_hex(base: &str, secondary: &str) -> Result<Self> {
        Ok(Palette::new(Rgb::from_hex(base)?, Rgb::from_hex(secondary)?))
    }
}
