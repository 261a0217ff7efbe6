//! Chunk header decoding (C4): §4.2.

use std::io::{self, Read, Seek, SeekFrom};

use vsd_io_ext::ReaderExt;

/// Chunk types that always force a trailer, regardless of `level`/`unknown`.
const ALWAYS_EIGHT_BYTE_TRAILER: [u32; 8] = [0x71, 0x70, 0x6b, 0x6a, 0x69, 0x66, 0x65, 0x2c];
const ALWAYS_FOUR_BYTE_TRAILER: [u32; 8] = [0x69, 0x6a, 0x6b, 0x71, 0xb6, 0xb9, 0xa9, 0x92];
const NEVER_TRAILER: [u32; 2] = [0x1f, 0xc9];

/// `{ chunkType, id, list, dataLength, level, unknown, trailer }` (§3).
///
/// `trailer` is derived, not read from the stream; it's computed by
/// [`trailer_bytes`] from the other fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub chunk_type: u32,
    pub id: u32,
    pub list: u32,
    pub data_length: u32,
    pub level: u16,
    pub unknown: u8,
    pub trailer: u32,
}

impl ChunkHeader {
    /// Total payload bytes (body + trailer) following the header.
    pub fn total_payload_len(&self) -> u64 {
        u64::from(self.data_length) + u64::from(self.trailer)
    }
}

/// The trailer-byte decision table (§4.2), expressed as a single pure
/// function of the four header fields it depends on, per the Design Notes'
/// "mark the rule set as a single pure function... so it can be
/// unit-tested in isolation."
///
/// These rules are empirical and reverse-engineered from observed files;
/// they're preserved verbatim rather than simplified.
pub fn trailer_bytes(chunk_type: u32, list: u32, level: u16, unknown: u8) -> u32 {
    if NEVER_TRAILER.contains(&chunk_type) {
        return 0;
    }

    let mut trailer = 0u32;

    if list != 0 || ALWAYS_EIGHT_BYTE_TRAILER.contains(&chunk_type) {
        trailer += 8;
    }

    if list != 0
        || (level == 2 && unknown == 0x55)
        || (level == 2 && unknown == 0x54 && chunk_type == 0xaa)
        || (level == 3 && unknown != 0x50 && unknown != 0x54)
        || ALWAYS_FOUR_BYTE_TRAILER.contains(&chunk_type)
    {
        trailer += 4;
    }

    trailer
}

/// Reads the next chunk header at the reader's current position (§4.2).
///
/// Returns `Ok(None)` once null padding runs to end-of-stream, which the
/// callers in this crate all treat as "no more chunks" rather than an error.
pub fn read_chunk_header<R: Read + Seek + ?Sized>(reader: &mut R) -> io::Result<Option<ChunkHeader>> {
    let mut byte = [0u8; 1];
    loop {
        if reader.read(&mut byte)? == 0 {
            return Ok(None);
        }
        if byte[0] != 0 {
            reader.seek(SeekFrom::Current(-1))?;
            break;
        }
    }

    let chunk_type = reader.read_u32_le()?;
    let id = reader.read_u32_le()?;
    let list = reader.read_u32_le()?;
    let data_length = reader.read_u32_le()?;
    let level = reader.read_u16_le()?;
    let unknown = reader.read_u8_le()?;
    let trailer = trailer_bytes(chunk_type, list, level, unknown);

    Ok(Some(ChunkHeader {
        chunk_type,
        id,
        list,
        data_length,
        level,
        unknown,
        trailer,
    }))
}

/// Seeks from `chunk_start` (the position right after the header was read)
/// to the chunk's end, accounting for however many bytes the body handler
/// already consumed. This is the "caller seeks (dataLength + trailer) -
/// bytes already consumed" rule that closes out every chunk handler in
/// §4.2/§4.6/§4.8.
pub fn seek_to_chunk_end<R: Read + Seek + ?Sized>(
    reader: &mut R,
    chunk_start: u64,
    header: &ChunkHeader,
) -> io::Result<()> {
    let consumed = reader.stream_position()? - chunk_start;
    let remaining = header.total_payload_len() as i64 - consumed as i64;
    reader.seek(SeekFrom::Current(remaining))?;
    Ok(())
}

/// Reads up to `len` bytes, tolerating a source that ends early (§7
/// `TruncatedSubstream`/`ShortChunkBody`).
pub fn read_tolerant<R: Read + ?Sized>(reader: &mut R, len: usize) -> io::Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..])? {
            0 => break,
            n => total += n,
        }
    }
    buf.truncate(total);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_forces_zero_regardless_of_list() {
        assert_eq!(trailer_bytes(0x1f, 7, 3, 0x99), 0);
        assert_eq!(trailer_bytes(0xc9, 7, 3, 0x99), 0);
    }

    #[test]
    fn nonzero_list_forces_both_contributions() {
        assert_eq!(trailer_bytes(0x01, 1, 0, 0), 12);
    }

    #[test]
    fn always_eight_byte_types() {
        for &t in &ALWAYS_EIGHT_BYTE_TRAILER {
            assert!(trailer_bytes(t, 0, 0, 0) >= 8, "type {t:#x}");
        }
    }

    #[test]
    fn level2_unknown_0x55_adds_four() {
        assert_eq!(trailer_bytes(0x01, 0, 2, 0x55), 4);
    }

    #[test]
    fn level2_unknown_0x54_requires_chunk_type_aa() {
        assert_eq!(trailer_bytes(0x01, 0, 2, 0x54), 0);
        assert_eq!(trailer_bytes(0xaa, 0, 2, 0x54), 4);
    }

    #[test]
    fn level3_adds_four_unless_0x50_or_0x54() {
        assert_eq!(trailer_bytes(0x01, 0, 3, 0x50), 0);
        assert_eq!(trailer_bytes(0x01, 0, 3, 0x54), 0);
        assert_eq!(trailer_bytes(0x01, 0, 3, 0x01), 4);
    }

    #[test]
    fn chunk_type_0x92_always_adds_four() {
        assert_eq!(trailer_bytes(0x92, 0, 0, 0), 4);
    }

    #[test]
    fn unrelated_chunk_has_no_trailer() {
        assert_eq!(trailer_bytes(0x8a, 0, 1, 0), 0);
    }

    #[test]
    fn reads_header_skipping_null_padding() {
        let mut bytes = vec![0u8, 0, 0];
        bytes.extend_from_slice(&0x8au32.to_le_bytes()); // chunkType
        bytes.extend_from_slice(&1u32.to_le_bytes()); // id
        bytes.extend_from_slice(&0u32.to_le_bytes()); // list
        bytes.extend_from_slice(&10u32.to_le_bytes()); // dataLength
        bytes.extend_from_slice(&2u16.to_le_bytes()); // level
        bytes.push(0x50); // unknown

        let mut cursor = io::Cursor::new(bytes);
        let header = read_chunk_header(&mut cursor).unwrap().unwrap();
        assert_eq!(header.chunk_type, 0x8a);
        assert_eq!(header.id, 1);
        assert_eq!(header.data_length, 10);
        assert_eq!(header.trailer, 0);
    }

    #[test]
    fn eof_during_padding_returns_none() {
        let mut cursor = io::Cursor::new(vec![0u8; 4]);
        assert!(read_chunk_header(&mut cursor).unwrap().is_none());
    }
}
