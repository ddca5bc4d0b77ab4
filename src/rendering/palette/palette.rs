use bevy::color::{HexColorError, Srgba};
use serde::Deserialize;

const fn rgb8(r: u8, g: u8, b: u8) -> Srgba {
    Srgba::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}

pub const NEON_COLORS: [Srgba; 4] = [
    rgb8(0xff, 0x00, 0x80), // Electric pink
    rgb8(0x00, 0xf0, 0xff), // Cyan glow
    rgb8(0xb0, 0x00, 0xff), // Violet
    rgb8(0xff, 0xff, 0xff), // Pure white
];

/// Accent used by the control panel (matches the cyan swatch).
pub const ACCENT: Srgba = rgb8(0x00, 0xf0, 0xff);

/// One palette entry. Deserializes from `"#rrggbb"` (or `"#rrggbbaa"`) strings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct PaletteColor(pub Srgba);

impl TryFrom<String> for PaletteColor {
    type Error = HexColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Srgba::hex(value.trim()).map(Self)
    }
}

impl From<Srgba> for PaletteColor {
    fn from(value: Srgba) -> Self {
        Self(value)
    }
}

pub fn neon_palette() -> Vec<PaletteColor> {
    NEON_COLORS.iter().copied().map(PaletteColor).collect()
}

/// Palette lookup that wraps instead of panicking on a stale index.
#[inline]
pub fn color_for_index(palette: &[PaletteColor], i: usize) -> Srgba {
    if palette.is_empty() {
        return Srgba::WHITE;
    }
    palette[i % palette.len()].0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_entries_deserialize() {
        let parsed: Vec<PaletteColor> = ron::from_str(r##"["#ff0080", "#00F0FF"]"##).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].0, NEON_COLORS[0]);
        assert!((parsed[1].0.green - 240.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn bad_hex_is_a_deserialize_error() {
        let parsed: Result<Vec<PaletteColor>, _> = ron::from_str(r#"["not-a-color"]"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn index_wraps() {
        let p = neon_palette();
        assert_eq!(color_for_index(&p, 5), NEON_COLORS[1]);
        assert_eq!(color_for_index(&[], 3), Srgba::WHITE);
    }
}
