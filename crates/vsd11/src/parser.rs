//! Public entry points (§6): `is_supported`, `Parser`.

use std::io::{self, Read, Seek, SeekFrom};

use vsd_io_ext::{Decompressor, IdentityDecompressor, ReaderExt};

use crate::error::Result;
use crate::painter::Painter;
use crate::state::ParserState;
use crate::trailer::walk_trailer;

/// Heuristic check that `input` looks like a VSD11 stream: the top-level
/// trailer pointer region must at least be readable and declare a non-empty
/// length. Rewinds the input afterwards regardless of outcome (§6
/// "consumes input and rewinds").
pub fn is_supported<R: Read + Seek + ?Sized>(input: &mut R) -> bool {
    let probe: io::Result<bool> = (|| {
        input.seek(SeekFrom::Start(0x24))?;
        input.seek(SeekFrom::Current(8))?;
        let _offset = input.read_u32_le()?;
        let length = input.read_u32_le()?;
        let _format = input.read_u16_le()?;
        Ok(length > 0)
    })();
    let _ = input.seek(SeekFrom::Start(0));
    probe.unwrap_or(false)
}

/// Runs the VSD11 parse pipeline against an input stream, replaying
/// drawing calls onto a [`Painter`] (§6 `parse`).
pub struct Parser {
    decompressor: Box<dyn Decompressor>,
}

impl Parser {
    pub fn new(decompressor: Box<dyn Decompressor>) -> Self {
        Self { decompressor }
    }

    /// Parses `input`, replaying every page onto `painter`.
    ///
    /// Returns `Ok(true)` if the file was walked structurally (even if
    /// individual chunks were malformed and skipped), `Ok(false)` if the
    /// top-level trailer pointer couldn't be read at all (§7).
    pub fn parse<R: Read + Seek + ?Sized>(&self, input: &mut R, painter: &mut dyn Painter) -> Result<bool> {
        let mut state = ParserState::default();
        walk_trailer(input, self.decompressor.as_ref(), &mut state, painter)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(Box::new(IdentityDecompressor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn is_supported_rejects_short_input() {
        let mut cursor = Cursor::new(vec![0u8; 4]);
        assert!(!is_supported(&mut cursor));
    }

    #[test]
    fn is_supported_rewinds_on_success_and_failure() {
        let mut cursor = Cursor::new(vec![0u8; 4]);
        is_supported(&mut cursor);
        assert_eq!(cursor.position(), 0);
    }
}
