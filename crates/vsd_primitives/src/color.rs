use byteorder::ReadBytesExt;
use std::fmt;
use std::io::{self, Read};

/// RGBA color, 8 bits per channel.
///
/// VSD palettes store colours this way; alpha is carried through even
/// though the painter contract only consumes it for fills that need it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Reads a colour as RGBA (4 bytes), the layout used by the Colors substream.
    #[inline]
    pub fn from_reader(reader: &mut (impl Read + ?Sized)) -> io::Result<Self> {
        Ok(Self {
            r: reader.read_u8()?,
            g: reader.read_u8()?,
            b: reader.read_u8()?,
            a: reader.read_u8()?,
        })
    }

    /// Formats as a CSS-style `#rrggbb` hex string, as used in `svg:stroke-color`
    /// and `svg:stop-color` values. Alpha is not represented; callers needing it
    /// read `.a` directly.
    pub fn to_hex_string(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_string())
    }
}
