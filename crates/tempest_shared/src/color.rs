//! 8-bit RGB colour used by effect palettes and render snapshots.

use std::fmt;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// An opaque 24-bit colour.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// White.
    pub const WHITE: Self = Self::new(0xff, 0xff, 0xff);

    /// Creates a colour from channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Creates a colour from a packed `0xRRGGBB` literal.
    #[must_use]
    pub const fn from_hex(hex: u32) -> Self {
        Self::new(((hex >> 16) & 0xff) as u8, ((hex >> 8) & 0xff) as u8, (hex & 0xff) as u8)
    }

    /// Parses `#rrggbb` (leading `#` optional). Returns `None` when malformed.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('#').unwrap_or(text);
        if digits.len() != 6 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::from_hex)
    }

    /// Channel-wise linear interpolation, rounded to the nearest integer.
    #[must_use]
    pub fn lerp(self, target: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            let v = f32::from(a) + (f32::from(b) - f32::from(a)) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Self::new(mix(self.r, target.r), mix(self.g, target.g), mix(self.b, target.b))
    }

    /// Normalised RGBA with the given alpha, for GPU upload.
    #[must_use]
    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            alpha,
        ]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip_display() {
        let c = Rgb::from_hex(0xff6600);
        assert_eq!(c, Rgb::new(255, 102, 0));
        assert_eq!(c.to_string(), "#ff6600");
        assert_eq!(Rgb::parse("#ff6600"), Some(c));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(Rgb::parse("#fff"), None);
        assert_eq!(Rgb::parse("zzzzzz"), None);
    }

    #[test]
    fn test_lerp_endpoints_and_midpoint() {
        let black = Rgb::new(0, 0, 0);
        assert_eq!(black.lerp(Rgb::WHITE, 0.0), black);
        assert_eq!(black.lerp(Rgb::WHITE, 1.0), Rgb::WHITE);
        assert_eq!(black.lerp(Rgb::WHITE, 0.5), Rgb::new(128, 128, 128));
    }
}
