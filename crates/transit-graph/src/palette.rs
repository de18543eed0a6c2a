//! Fixed palette of transit line colours.
//!
//! Route colours in the input are free-form RGB values; the renderer only
//! supports a fixed set of named colours, so every input colour is snapped to
//! the nearest palette entry before it reaches a line.

use thiserror::Error;

/// An RGB colour from the palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Pack into the document's RGBA representation with full opacity.
    pub fn rgba(self) -> u32 {
        (self.r as u32) << 24 | (self.g as u32) << 16 | (self.b as u32) << 8 | 0xFF
    }

    fn distance_sq(self, other: Rgb) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{0}' is not a 6-digit hex colour")]
pub struct ParseColorError(String);

/// The colours supported by the scheme renderer.
const TRANSIT_PALETTE: &[(&str, Rgb)] = &[
    ("red", Rgb { r: 0xE5, g: 0x39, b: 0x35 }),
    ("darkRed", Rgb { r: 0xB7, g: 0x1C, b: 0x1C }),
    ("orange", Rgb { r: 0xFB, g: 0x8C, b: 0x00 }),
    ("yellow", Rgb { r: 0xFD, g: 0xD8, b: 0x35 }),
    ("lightGreen", Rgb { r: 0x9C, g: 0xCC, b: 0x65 }),
    ("green", Rgb { r: 0x43, g: 0xA0, b: 0x47 }),
    ("darkGreen", Rgb { r: 0x1B, g: 0x5E, b: 0x20 }),
    ("cyan", Rgb { r: 0x00, g: 0xAC, b: 0xC1 }),
    ("lightBlue", Rgb { r: 0x42, g: 0xA5, b: 0xF5 }),
    ("blue", Rgb { r: 0x1E, g: 0x88, b: 0xE5 }),
    ("darkBlue", Rgb { r: 0x0D, g: 0x47, b: 0xA1 }),
    ("violet", Rgb { r: 0x7E, g: 0x57, b: 0xC2 }),
    ("purple", Rgb { r: 0x8E, g: 0x24, b: 0xAA }),
    ("pink", Rgb { r: 0xEC, g: 0x40, b: 0x7A }),
    ("brown", Rgb { r: 0x6D, g: 0x4C, b: 0x41 }),
    ("gray", Rgb { r: 0x75, g: 0x75, b: 0x75 }),
    ("black", Rgb { r: 0x21, g: 0x21, b: 0x21 }),
    ("white", Rgb { r: 0xFA, g: 0xFA, b: 0xFA }),
];

/// Nearest-match lookup over the fixed transit palette.
pub struct Palette {
    colors: &'static [(&'static str, Rgb)],
}

impl Palette {
    pub fn new() -> Self {
        Self {
            colors: TRANSIT_PALETTE,
        }
    }

    /// Snap a 6-digit hex colour (optional `#` prefix) to the nearest
    /// palette entry by squared RGB distance. Ties resolve to the earliest
    /// palette entry, so the result is deterministic.
    pub fn nearest_color(&self, spec: &str) -> Result<Rgb, ParseColorError> {
        let target = parse_hex(spec)?;
        let nearest = self
            .colors
            .iter()
            .min_by_key(|(_, rgb)| rgb.distance_sq(target))
            .map(|(_, rgb)| *rgb)
            .unwrap_or(target);
        Ok(nearest)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_hex(spec: &str) -> Result<Rgb, ParseColorError> {
    let digits = spec.strip_prefix('#').unwrap_or(spec);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ParseColorError(spec.to_string()));
    }
    let value = u32::from_str_radix(digits, 16).map_err(|_| ParseColorError(spec.to_string()))?;
    Ok(Rgb {
        r: (value >> 16) as u8,
        g: (value >> 8) as u8,
        b: value as u8,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("e53935"), Ok(Rgb { r: 0xE5, g: 0x39, b: 0x35 }));
        assert_eq!(parse_hex("#1e88e5"), Ok(Rgb { r: 0x1E, g: 0x88, b: 0xE5 }));
        assert!(parse_hex("fff").is_err());
        assert!(parse_hex("not-a-colour").is_err());
    }

    #[test]
    fn test_exact_palette_colour_resolves_to_itself() {
        let palette = Palette::new();
        let rgb = palette.nearest_color("e53935").unwrap();
        assert_eq!(rgb, Rgb { r: 0xE5, g: 0x39, b: 0x35 });
    }

    #[test]
    fn test_off_palette_colour_snaps_to_nearest() {
        let palette = Palette::new();
        // Slightly off the palette red.
        let rgb = palette.nearest_color("e03a31").unwrap();
        assert_eq!(rgb, Rgb { r: 0xE5, g: 0x39, b: 0x35 });
    }

    #[test]
    fn test_rgba_packing() {
        let rgb = Rgb { r: 0x12, g: 0x34, b: 0x56 };
        assert_eq!(rgb.rgba(), 0x1234_56FF);
    }
}
