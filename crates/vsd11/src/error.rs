//! Error types for VSD11 parsing.

/// Errors that can occur while reading a VSD11 stream.
///
/// Per the error-handling policy (spec §7), most malformed-record cases are
/// logged and skipped rather than raised here; `ParseError` is reserved for
/// failures that make it impossible to continue reading a substream at all.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The top-level trailer pointer could not be read at all.
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// An I/O error occurred while reading the container or a substream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A substream's compression flag was set but decompression failed.
    #[error("decompression failed for a substream: {0}")]
    DecompressionFailure(std::io::Error),

    /// A reader extension error occurred.
    #[error("reader error: {0}")]
    Reader(#[from] vsd_io_ext::ReaderError),
}

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, ParseError>;
