//! Color representation with WCAG contrast calculations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// RGBA color with values in the range [0.0, 1.0].
///
/// Deserializes from a hex string (`"#1976d2"`, `"1976d2cc"`) or from its
/// components (`{r, g, b, a}`, alpha defaulting to opaque).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr")]
pub struct Color {
    /// Red component [0.0, 1.0]
    pub r: f32,
    /// Green component [0.0, 1.0]
    pub g: f32,
    /// Blue component [0.0, 1.0]
    pub b: f32,
    /// Alpha component [0.0, 1.0]
    pub a: f32,
}

impl Color {
    /// Create a new color, clamping values to [0.0, 1.0].
    #[must_use]
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Create an opaque color from RGB values.
    #[must_use]
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Parse a hex color string (e.g., "#1976d2" or "1976d2").
    ///
    /// Supports 6-character RGB and 8-character RGBA formats.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 && hex.len() != 8 {
            return Err(ColorParseError::InvalidLength);
        }

        let channel = |range: std::ops::Range<usize>| -> Result<f32, ColorParseError> {
            let byte = hex
                .get(range)
                .ok_or(ColorParseError::InvalidHex)
                .and_then(|s| u8::from_str_radix(s, 16).map_err(|_| ColorParseError::InvalidHex))?;
            Ok(f32::from(byte) / 255.0)
        };

        let alpha = if hex.len() == 8 { channel(6..8)? } else { 1.0 };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, alpha))
    }

    /// Convert to a CSS hex string (RGB only).
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8
        )
    }

    /// Calculate relative luminance per WCAG 2.1.
    #[must_use]
    pub fn relative_luminance(&self) -> f32 {
        let r = Self::linearize(self.r);
        let g = Self::linearize(self.g);
        let b = Self::linearize(self.b);

        0.0722f32.mul_add(b, 0.2126f32.mul_add(r, 0.7152 * g))
    }

    /// Contrast ratio between two colors per WCAG 2.1, in [1.0, 21.0].
    #[must_use]
    pub fn contrast_ratio(&self, other: &Self) -> f32 {
        let l1 = self.relative_luminance();
        let l2 = other.relative_luminance();

        let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };

        (lighter + 0.05) / (darker + 0.05)
    }

    fn linearize(c: f32) -> f32 {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    /// Black color
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    /// White color
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Hex(String),
    Rgba {
        r: f32,
        g: f32,
        b: f32,
        #[serde(default = "opaque")]
        a: f32,
    },
}

const fn opaque() -> f32 {
    1.0
}

impl TryFrom<ColorRepr> for Color {
    type Error = ColorParseError;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Hex(hex) => Self::from_hex(&hex),
            ColorRepr::Rgba { r, g, b, a } => Ok(Self::new(r, g, b, a)),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Error type for color parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// Invalid hex characters
    #[error("invalid hex characters")]
    InvalidHex,
    /// Invalid string length
    #[error("invalid hex string length (expected 6 or 8)")]
    InvalidLength,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex("#ff0000").unwrap();
        assert_eq!(c, Color::rgb(1.0, 0.0, 0.0));

        let c = Color::from_hex("0000ff80").unwrap();
        assert_eq!(c.b, 1.0);
        assert!((c.a - 0.502).abs() < 0.01);
    }

    #[test]
    fn test_color_from_hex_invalid() {
        assert_eq!(
            Color::from_hex("#gg0000"),
            Err(ColorParseError::InvalidHex)
        );
        assert_eq!(Color::from_hex("#ff"), Err(ColorParseError::InvalidLength));
        // Multi-byte characters must not panic on slicing
        assert!(Color::from_hex("ééé").is_err());
    }

    #[test]
    fn test_color_deserialize_hex_or_components() {
        let hex: Color = serde_json::from_str(r##""#ff0000""##).unwrap();
        assert_eq!(hex, Color::rgb(1.0, 0.0, 0.0));

        let parts: Color = serde_json::from_str(r#"{"r": 0.0, "g": 2.0, "b": 0.5}"#).unwrap();
        assert_eq!(parts, Color::rgb(0.0, 1.0, 0.5));

        let back: Color = serde_json::from_value(serde_json::to_value(parts).unwrap()).unwrap();
        assert_eq!(back, parts);

        let err = serde_json::from_str::<Color>(r##""#zz0000""##).unwrap_err();
        assert!(err.to_string().contains("invalid hex characters"));
    }

    #[test]
    fn test_color_to_hex() {
        assert_eq!(Color::rgb(1.0, 0.0, 0.0).to_hex(), "#ff0000");
        assert_eq!(Color::WHITE.to_hex(), "#ffffff");
    }

    #[test]
    fn test_color_contrast_ratio_black_white() {
        let ratio = Color::BLACK.contrast_ratio(&Color::WHITE);
        assert!((ratio - 21.0).abs() < 0.1);
    }

    #[test]
    fn test_color_parse_error_display() {
        assert_eq!(
            ColorParseError::InvalidLength.to_string(),
            "invalid hex string length (expected 6 or 8)"
        );
    }

    proptest! {
        #[test]
        fn prop_color_clamps_to_valid_range(r in -1.0f32..2.0, g in -1.0f32..2.0, b in -1.0f32..2.0) {
            let c = Color::rgb(r, g, b);
            prop_assert!((0.0..=1.0).contains(&c.r));
            prop_assert!((0.0..=1.0).contains(&c.g));
            prop_assert!((0.0..=1.0).contains(&c.b));
        }

        #[test]
        fn prop_contrast_ratio_symmetric(r in 0.0f32..1.0, g in 0.0f32..1.0, b in 0.0f32..1.0) {
            let c = Color::rgb(r, g, b);
            prop_assert_eq!(c.contrast_ratio(&Color::WHITE), Color::WHITE.contrast_ratio(&c));
        }
    }
}
