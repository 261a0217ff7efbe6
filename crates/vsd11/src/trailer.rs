//! Trailer Walker (C3): §4.3-4.4.

use std::io::{self, Read, Seek, SeekFrom};

use vsd_io_ext::{Decompressor, ReaderExt, SubstreamView};
use vsd_primitives::Color;

use crate::error::Result;
use crate::page::drive_page;
use crate::painter::Painter;
use crate::state::ParserState;

const STREAM_PAGE: u32 = 0x15;
const STREAM_COLORS: u32 = 0x16;
const STREAM_PAGES: u32 = 0x27;

#[derive(Debug, Clone, Copy)]
struct PointerRecord {
    ptr_type: u32,
    offset: u32,
    length: u32,
    format: u16,
}

fn read_pointer_records<R: Read + Seek + ?Sized>(reader: &mut R, count: u32) -> io::Result<Vec<PointerRecord>> {
    let mut pointers = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let ptr_type = reader.read_u32_le()?;
        reader.seek(SeekFrom::Current(4))?;
        let offset = reader.read_u32_le()?;
        let length = reader.read_u32_le()?;
        let format = reader.read_u16_le()?;
        pointers.push(PointerRecord {
            ptr_type,
            offset,
            length,
            format,
        });
    }
    Ok(pointers)
}

/// Reads the pointer table inside the top-level trailer substream (§4.3):
/// the list starts 4 bytes past the substream's own leading field.
fn read_trailer_pointer_table<R: Read + Seek + ?Sized>(reader: &mut R) -> io::Result<Vec<PointerRecord>> {
    reader.seek(SeekFrom::Start(4))?;
    let offset = reader.read_u32_le()?;
    reader.seek(SeekFrom::Start(u64::from(offset) + 4))?;
    let pointer_count = reader.read_u32_le()?;
    reader.seek(SeekFrom::Current(4))?;
    read_pointer_records(reader, pointer_count)
}

/// Reads the pointer table nested inside a `0x27 Pages` substream: the same
/// record layout, but consumed starting at the substream's own offset 0
/// (§4.3).
fn read_pages_pointer_table<R: Read + Seek + ?Sized>(reader: &mut R) -> io::Result<Vec<PointerRecord>> {
    let offset = reader.read_u32_le()?;
    reader.seek(SeekFrom::Start(u64::from(offset)))?;
    let pointer_count = reader.read_u32_le()?;
    reader.seek(SeekFrom::Current(4))?;
    read_pointer_records(reader, pointer_count)
}

/// Loads the colour palette (§4.4): seek to 6, read `u8 numColours`, skip
/// 1, then `numColours` RGBA entries.
fn load_palette<R: Read + Seek + ?Sized>(reader: &mut R) -> io::Result<Vec<Color>> {
    reader.seek(SeekFrom::Start(6))?;
    let num_colours = reader.read_u8_le()?;
    reader.seek(SeekFrom::Current(1))?;
    (0..num_colours).map(|_| reader.read_color()).collect()
}

/// Walks the top-level trailer and every substream it points to (§4.3),
/// driving pages onto `painter` as they're found.
///
/// Returns `Ok(false)` only when the trailer pointer itself can't be read
/// at all — per §7, everything past that point is lenient.
pub fn walk_trailer<R: Read + Seek + ?Sized>(
    root: &mut R,
    decompressor: &dyn Decompressor,
    state: &mut ParserState,
    painter: &mut dyn Painter,
) -> Result<bool> {
    let header: io::Result<(u32, u32, u16)> = (|| {
        root.seek(SeekFrom::Start(0x24))?;
        root.seek(SeekFrom::Current(8))?;
        let offset = root.read_u32_le()?;
        let length = root.read_u32_le()?;
        let format = root.read_u16_le()?;
        Ok((offset, length, format))
    })();
    let Ok((offset, length, format)) = header else {
        return Ok(false);
    };

    let compressed = format & 2 != 0;
    let mut trailer_view = match SubstreamView::open(root, u64::from(offset), u64::from(length), compressed, decompressor) {
        Ok(view) => view,
        Err(err) => {
            log::debug!("could not open top-level trailer substream: {err}");
            return Ok(false);
        }
    };
    let pointers = match read_trailer_pointer_table(&mut trailer_view) {
        Ok(pointers) => pointers,
        Err(err) => {
            log::debug!("could not read top-level pointer table: {err}");
            return Ok(false);
        }
    };

    dispatch_pointers(root, &pointers, decompressor, state, painter)?;

    if state.is_page_started {
        painter.end_graphics();
        state.is_page_started = false;
    }

    Ok(true)
}

fn dispatch_pointers<R: Read + Seek + ?Sized>(
    root: &mut R,
    pointers: &[PointerRecord],
    decompressor: &dyn Decompressor,
    state: &mut ParserState,
    painter: &mut dyn Painter,
) -> Result<()> {
    for ptr in pointers {
        if !matches!(ptr.ptr_type, STREAM_PAGE | STREAM_COLORS | STREAM_PAGES) {
            log::debug!("unknown stream pointer type {:#x} ignored", ptr.ptr_type);
            continue;
        }

        let compressed = ptr.format & 2 != 0;
        let mut view = match SubstreamView::open(root, u64::from(ptr.offset), u64::from(ptr.length), compressed, decompressor) {
            Ok(view) => view,
            Err(err) => {
                log::debug!("failed to open substream for type {:#x}: {err}", ptr.ptr_type);
                continue;
            }
        };

        match ptr.ptr_type {
            STREAM_PAGE => {
                if let Err(err) = drive_page(&mut view, state, painter) {
                    log::debug!("error while driving page substream: {err}");
                }
            }
            STREAM_COLORS => match load_palette(&mut view) {
                Ok(palette) => state.palette = palette,
                Err(err) => log::debug!("could not read colour palette: {err}"),
            },
            STREAM_PAGES => match read_pages_pointer_table(&mut view) {
                Ok(nested) => dispatch_pointers(root, &nested, decompressor, state, painter)?,
                Err(err) => log::debug!("could not read nested pages pointer table: {err}"),
            },
            _ => unreachable!(),
        }
    }
    Ok(())
}
