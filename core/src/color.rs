use std::{error::Error, fmt, str::FromStr};

use bytemuck::{Pod, Zeroable};

pub const DEFAULT_BACKGROUND_COLOR: Chip8Color = Chip8Color::new(0, 0, 0);
pub const DEFAULT_FOREGROUND_COLOR: Chip8Color = Chip8Color::new(255, 255, 255);

/// One RGBX8888 pixel, laid out so a `&[Chip8Color]` can be handed to SDL as raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C, packed)]
pub struct Chip8Color {
    padding: u8,
    pub b: u8,
    pub g: u8,
    pub r: u8,
}

impl Chip8Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Chip8Color {
        Chip8Color { r, g, b, padding: 0 }
    }
}

impl FromStr for Chip8Color {
    type Err = Chip8ColorParseError;

    /// Parses `RRGGBB` or `0xRRGGBB`.
    fn from_str(s: &str) -> Result<Chip8Color, Chip8ColorParseError> {
        let s = s.strip_prefix("0x").unwrap_or(s);

        if s.len() != 6 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Chip8ColorParseError);
        }

        let rgb = u32::from_str_radix(s, 16).map_err(|_| Chip8ColorParseError)?;
        let [_, r, g, b] = rgb.to_be_bytes();

        Ok(Chip8Color::new(r, g, b))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip8ColorParseError;

impl fmt::Display for Chip8ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        "expected hex color 0xRRGGBB".fmt(f)
    }
}

impl Error for Chip8ColorParseError {}

/// Fills `out` with one color per framebuffer pixel.
///
/// `out` must be at least as long as `pixels`; extra entries are left alone.
pub fn paint(pixels: &[bool], foreground: Chip8Color, background: Chip8Color, out: &mut [Chip8Color]) {
    for (dst, on) in out.iter_mut().zip(pixels) {
        *dst = if *on { foreground } else { background };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("0xAABBFF".parse::<Chip8Color>(), Ok(Chip8Color::new(0xAA, 0xBB, 0xFF)));
        assert_eq!("102030".parse::<Chip8Color>(), Ok(Chip8Color::new(0x10, 0x20, 0x30)));
    }

    #[test]
    fn test_parse_invalid() {
        for s in ["", "0x", "0xABC", "0xAABBCCDD", "0xGG0000", "+12345", "0x+1234"] {
            assert_eq!(s.parse::<Chip8Color>(), Err(Chip8ColorParseError), "{:?}", s);
        }
    }

    #[test]
    fn test_rgbx_layout() {
        let color = Chip8Color::new(0x11, 0x22, 0x33);
        let pixel: u32 = bytemuck::cast(color);

        assert_eq!(pixel.to_le_bytes(), [0x00, 0x33, 0x22, 0x11]);
        assert_eq!(pixel, 0x1122_3300);
    }

    #[test]
    fn test_paint() {
        let fg = Chip8Color::new(1, 2, 3);
        let bg = Chip8Color::new(4, 5, 6);
        let mut out = [Chip8Color::zeroed(); 4];

        paint(&[true, false, true], fg, bg, &mut out);

        assert_eq!(out, [fg, bg, fg, Chip8Color::zeroed()]);
        assert_eq!(bytemuck::cast_slice::<_, u8>(&out).len(), 16);
    }
}
