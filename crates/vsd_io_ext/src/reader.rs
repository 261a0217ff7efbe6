use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use vsd_primitives::Color;

#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    #[error("IO error - {0}")]
    Io(#[from] io::Error),
}

pub type ReaderResult<T> = core::result::Result<T, ReaderError>;

/// Little-endian primitive reads shared by every chunk and record handler.
///
/// All VSD11 integers and doubles are little-endian (§4.1), so this trait
/// hard-codes the byte order rather than taking it as a parameter.
pub trait ReaderExt: Read {
    #[inline]
    fn read_u8_le(&mut self) -> io::Result<u8> {
        self.read_u8()
    }

    #[inline]
    fn read_u16_le(&mut self) -> io::Result<u16> {
        self.read_u16::<LittleEndian>()
    }

    #[inline]
    fn read_u32_le(&mut self) -> io::Result<u32> {
        self.read_u32::<LittleEndian>()
    }

    #[inline]
    fn read_f64_le(&mut self) -> io::Result<f64> {
        self.read_f64::<LittleEndian>()
    }

    #[inline]
    fn read_bool(&mut self) -> io::Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Reads a field preceded by a single skipped byte, the
    /// one-byte-prefix-per-double encoding used throughout `XForm` and
    /// path primitive records (§4.6-4.8).
    #[inline]
    fn read_prefixed_f64(&mut self) -> io::Result<f64> {
        self.read_u8()?;
        self.read_f64_le()
    }

    /// Reads an RGBA palette colour (4 bytes).
    #[inline]
    fn read_color(&mut self) -> io::Result<Color> {
        Color::from_reader(self)
    }
}

impl<R: Read + ?Sized> ReaderExt for R {}
