//! I/O primitives shared by the VSD11 reader: little-endian byte reads and
//! a decompressed, length-bounded substream view.

mod reader;
mod substream;

pub use reader::{ReaderError, ReaderExt, ReaderResult};
pub use substream::{Decompressor, IdentityDecompressor, SubstreamView};
