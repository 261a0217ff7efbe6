//! Reader for the Visio 2003 (VSD11) binary drawing format.
//!
//! Ingests a compound-document byte stream (already opened to its raw
//! drawing stream by the caller), walks the chunked record structure it
//! contains, and replays a sequence of vector drawing calls onto a
//! [`Painter`] implementation.

mod chunk;
mod error;
mod flush;
mod foreign;
mod geometry;
mod page;
mod painter;
mod parser;
mod shape;
mod state;
mod style;
mod svg;
mod trailer;
mod xform;

pub use error::{ParseError, Result};
pub use geometry::PathElement;
pub use painter::{EllipseProps, GraphicObjectProps, GraphicsProps, Painter};
pub use parser::{is_supported, Parser};
pub use style::{Fill, GradientStop, StyleState};
pub use svg::SvgPainter;
pub use vsd_io_ext::{Decompressor, IdentityDecompressor};
pub use vsd_primitives::Color;
pub use xform::XForm;

use std::io::{Read, Seek};

/// Parses `input` and renders it directly to an SVG document string,
/// using the built-in [`SvgPainter`] (§6 `generateSVG`).
pub fn generate_svg<R: Read + Seek + ?Sized>(input: &mut R, decompressor: Box<dyn Decompressor>) -> Result<String> {
    let parser = Parser::new(decompressor);
    let mut painter = SvgPainter::new();
    parser.parse(input, &mut painter)?;
    Ok(painter.into_svg())
}
