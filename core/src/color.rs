//! Color value types and hex encoding.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// An 8-bit RGB color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Attach an alpha byte.
    pub const fn with_alpha(self, a: u8) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    /// Attach an alpha given as opacity in `[0, 1]`.
    pub fn with_opacity(self, opacity: f32) -> Rgba {
        self.with_alpha(alpha_from_opacity(opacity))
    }

    /// Linear interpolation per channel, rounded and clamped to `[0, 255]`.
    pub fn lerp(self, other: Rgb, factor: f64) -> Rgb {
        let mix = |a: u8, b: u8| -> u8 {
            let a = a as f64;
            let b = b as f64;
            (a + factor * (b - a)).round().clamp(0.0, 255.0) as u8
        };
        Rgb {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }

    /// `#rrggbb`, lowercase.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels as floats in `[0, 1]`.
    pub fn to_f32(&self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(&self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    /// `#rrggbbaa`, lowercase.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }

    /// Channels as floats in `[0, 1]`.
    pub fn to_f32(&self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

impl From<Rgba> for image::Rgba<u8> {
    fn from(c: Rgba) -> Self {
        image::Rgba([c.r, c.g, c.b, c.a])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        parse_hex_color(&s)
            .map(|c| c.rgb())
            .ok_or_else(|| format!("invalid hex color: {s}"))
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_hex()
    }
}

/// Alpha byte for an opacity: `floor(opacity * 255)`, clamped.
pub fn alpha_from_opacity(opacity: f32) -> u8 {
    (opacity * 255.0).floor().clamp(0.0, 255.0) as u8
}

/// Parse a hex color (`#rrggbb` or `#rrggbbaa`, `#` optional).
///
/// Six-digit input gets full alpha.
pub fn parse_hex_color(hex: &str) -> Option<Rgba> {
    let hex = hex.trim_start_matches('#');
    if (hex.len() != 6 && hex.len() != 8) || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let r = channel(0)?;
    let g = channel(2)?;
    let b = channel(4)?;
    let a = if hex.len() == 8 { channel(6)? } else { 255 };
    Some(Rgba::new(r, g, b, a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#E12175"), Some(Rgba::new(225, 33, 117, 255)));
        assert_eq!(parse_hex_color("99f1c6"), Some(Rgba::new(153, 241, 198, 255)));
        assert_eq!(parse_hex_color("#ffffff80"), Some(Rgba::new(255, 255, 255, 128)));
        assert_eq!(parse_hex_color("invalid"), None);
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#gg0000"), None);
    }

    #[test]
    fn test_hex_encoding() {
        assert_eq!(Rgb::new(23, 129, 217).to_hex(), "#1781d9");
        assert_eq!(Rgb::new(23, 129, 217).with_alpha(0).to_hex(), "#1781d900");
        assert_eq!(Rgba::new(1, 2, 3, 204).to_string(), "#010203cc");
    }

    #[test]
    fn test_alpha_from_opacity_floors() {
        assert_eq!(alpha_from_opacity(0.8), 204);
        assert_eq!(alpha_from_opacity(1.0), 255);
        assert_eq!(alpha_from_opacity(0.0), 0);
        assert_eq!(alpha_from_opacity(0.0099), 2);
        assert_eq!(alpha_from_opacity(1.5), 255);
        assert_eq!(alpha_from_opacity(-0.1), 0);
    }

    #[test]
    fn test_lerp_rounds_and_hits_endpoints() {
        let a = Rgb::new(225, 33, 117);
        let b = Rgb::new(246, 155, 46);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgb::new(236, 94, 82));
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&Rgb::new(255, 0, 16)).unwrap();
        assert_eq!(json, "\"#ff0010\"");
        let back: Rgb = serde_json::from_str("\"#CBED8E\"").unwrap();
        assert_eq!(back, Rgb::new(203, 237, 142));
        assert!(serde_json::from_str::<Rgb>("\"nope\"").is_err());
    }
}
