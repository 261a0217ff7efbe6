//! Page Driver (C10): §4.5.

use std::io::{self, Read, Seek, SeekFrom};

use indexmap::IndexMap;
use vsd_io_ext::ReaderExt;

use crate::chunk::{read_chunk_header, seek_to_chunk_end};
use crate::error::{ParseError, Result};
use crate::foreign::read_foreign_record;
use crate::painter::{GraphicsProps, Painter};
use crate::shape::{read_group, read_shape, ShapeCtx};
use crate::state::ParserState;

const CHUNK_GROUP: u32 = 0x47;
const CHUNK_SHAPE: u32 = 0x48;
const CHUNK_FOREIGN: u32 = 0x4e;
const CHUNK_PAGE_PROPERTIES: u32 = 0x92;

/// Unwraps a nested handler's error down to the underlying I/O error, so a
/// truncated-input failure can be tolerated the same way as a local read
/// failure instead of propagating past the page loop (§5/§7).
fn into_io_error(err: ParseError) -> io::Error {
    match err {
        ParseError::Io(io_err) => io_err,
        other => io::Error::new(io::ErrorKind::Other, other.to_string()),
    }
}

/// Drives one `0x15 Page` substream's chunk list, dispatching groups,
/// shapes and foreign objects and handling the page-properties record that
/// opens/closes `startGraphics`/`endGraphics`.
pub fn drive_page<R: Read + Seek + ?Sized>(
    reader: &mut R,
    state: &mut ParserState,
    painter: &mut dyn Painter,
) -> Result<()> {
    state.group_transforms = IndexMap::new();

    loop {
        let header = match read_chunk_header(reader) {
            Ok(Some(header)) => header,
            Ok(None) => break,
            Err(err) => {
                log::debug!("truncated page substream while reading a chunk header: {err}");
                break;
            }
        };
        let chunk_start = reader.stream_position()?;

        let outcome: io::Result<()> = (|| {
            match header.chunk_type {
                CHUNK_GROUP | CHUNK_SHAPE | CHUNK_FOREIGN => {
                    state.current_shape_id = header.id;
                    seek_to_chunk_end(reader, chunk_start, &header)?;

                    let ctx = ShapeCtx {
                        palette: &state.palette,
                        current_shape_id: state.current_shape_id,
                        page_height: state.page_height,
                        scale: state.scale,
                    };
                    match header.chunk_type {
                        CHUNK_GROUP => read_group(reader, &mut state.geometry, &mut state.group_transforms, &ctx, painter)
                            .map_err(into_io_error)?,
                        CHUNK_SHAPE => read_shape(reader, &mut state.geometry, &mut state.group_transforms, &ctx, painter)
                            .map_err(into_io_error)?,
                        CHUNK_FOREIGN => read_foreign_record(reader, state.page_height, state.scale, painter)
                            .map_err(into_io_error)?,
                        _ => unreachable!(),
                    }
                    return Ok(());
                }
                CHUNK_PAGE_PROPERTIES => {
                    reader.seek(SeekFrom::Current(1))?;
                    state.page_width = reader.read_f64_le()?;
                    reader.seek(SeekFrom::Current(1))?;
                    state.page_height = reader.read_f64_le()?;
                    reader.seek(SeekFrom::Current(19))?;
                    let _scale = reader.read_f64_le()?;

                    if state.is_page_started {
                        painter.end_graphics();
                    }
                    painter.start_graphics(GraphicsProps {
                        width: state.scale * state.page_width,
                        height: state.scale * state.page_height,
                    });
                    state.is_page_started = true;
                }
                _ => {}
            }

            seek_to_chunk_end(reader, chunk_start, &header)?;
            Ok(())
        })();

        if let Err(err) = outcome {
            log::debug!("truncated page substream while driving a chunk: {err}");
            break;
        }
    }

    Ok(())
}
