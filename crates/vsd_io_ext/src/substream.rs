use std::io::{self, Cursor, Read, Seek, SeekFrom};

/// The LZ-style decompression primitive behind compressed VSD substreams.
///
/// Decompression itself is outside this reader's scope: container formats
/// vary in which compression scheme they use for a given substream, so the
/// caller supplies an implementation. [`IdentityDecompressor`] is a stand-in
/// that only handles the uncompressed case and errors otherwise.
pub trait Decompressor {
    /// Decompresses `compressed` into a buffer of at least `min_len` bytes.
    fn decompress(&self, compressed: &[u8], min_len: usize) -> io::Result<Vec<u8>>;
}

/// A [`Decompressor`] that refuses to decompress anything.
///
/// Useful for callers that only ever see uncompressed substreams, or as a
/// placeholder until a real codec is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityDecompressor;

impl Decompressor for IdentityDecompressor {
    fn decompress(&self, _compressed: &[u8], _min_len: usize) -> io::Result<Vec<u8>> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "substream is flagged compressed but no decompressor was provided",
        ))
    }
}

/// A decompressed, length-bounded, randomly-seekable view over a region of
/// the compound-document byte stream (§4.1).
///
/// Compressed substreams are materialized once, up front; every seek and
/// read afterwards operates on the in-memory buffer.
pub struct SubstreamView {
    cursor: Cursor<Vec<u8>>,
}

impl SubstreamView {
    /// Opens the byte range `[offset, offset+length)` of `source`, decompressing
    /// it through `decompressor` if `compressed` is set.
    ///
    /// Tolerates a source shorter than `length`: the raw read is best-effort,
    /// matching the "tolerate truncated input" requirement in §7.
    pub fn open<R: Read + Seek + ?Sized>(
        source: &mut R,
        offset: u64,
        length: u64,
        compressed: bool,
        decompressor: &dyn Decompressor,
    ) -> io::Result<Self> {
        source.seek(SeekFrom::Start(offset))?;

        let mut raw = vec![0u8; length as usize];
        let read = read_best_effort(source, &mut raw)?;
        raw.truncate(read);

        let data = if compressed {
            decompressor.decompress(&raw, length as usize)?
        } else {
            raw
        };

        Ok(Self {
            cursor: Cursor::new(data),
        })
    }

    /// Wraps an already-decompressed buffer directly; used by tests and by
    /// recursive pointer tables that reuse an already-materialized view.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    pub fn len(&self) -> u64 {
        self.cursor.get_ref().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn tell(&mut self) -> io::Result<u64> {
        self.cursor.stream_position()
    }

    pub fn at_end(&mut self) -> bool {
        self.cursor.position() >= self.len()
    }
}

impl Read for SubstreamView {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Seek for SubstreamView {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

fn read_best_effort<R: Read>(source: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match source.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncompressed_view_reads_exact_region() {
        let source: Vec<u8> = (0..32u8).collect();
        let mut cursor = Cursor::new(source);
        let mut view =
            SubstreamView::open(&mut cursor, 4, 8, false, &IdentityDecompressor).unwrap();
        assert_eq!(view.len(), 8);
        let mut buf = [0u8; 8];
        view.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [4, 5, 6, 7, 8, 9, 10, 11]);
        assert!(view.at_end());
    }

    #[test]
    fn truncated_source_is_tolerated() {
        let source: Vec<u8> = vec![1, 2, 3];
        let mut cursor = Cursor::new(source);
        let view = SubstreamView::open(&mut cursor, 0, 16, false, &IdentityDecompressor).unwrap();
        assert_eq!(view.len(), 3);
    }

    #[test]
    fn compressed_without_decompressor_errors() {
        let source: Vec<u8> = vec![1, 2, 3, 4];
        let mut cursor = Cursor::new(source);
        let result = SubstreamView::open(&mut cursor, 0, 4, true, &IdentityDecompressor);
        assert!(result.is_err());
    }
}
