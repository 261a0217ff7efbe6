//! Foreign (embedded raster/metafile) objects (C9): §4.6 `0x4e ForeignData`.

use std::io::{Read, Seek, SeekFrom};

use vsd_io_ext::ReaderExt;

use crate::chunk::{read_chunk_header, read_tolerant, seek_to_chunk_end};
use crate::error::Result;
use crate::painter::{GraphicObjectProps, Painter};
use crate::xform::{parse_xform, XForm};

const FOREIGN_TYPE_BITMAP: u16 = 1;
const FOREIGN_TYPE_METAFILE: u16 = 4;

/// Synthesizes the 14-byte BITMAPFILEHEADER the VSD11 container omits for
/// an embedded DIB (§4.6): signature, total file size, two reserved
/// fields, and a fixed 0x36-byte offset to pixel data (the size of a
/// BITMAPFILEHEADER plus a standard 40-byte BITMAPINFOHEADER).
pub fn synthesize_bmp_header(payload_len: usize) -> [u8; 14] {
    let file_size = payload_len as u32 + 14;
    let mut header = [0u8; 14];
    header[0] = b'B';
    header[1] = b'M';
    header[2..6].copy_from_slice(&file_size.to_le_bytes());
    header[10..14].copy_from_slice(&0x36u32.to_le_bytes());
    header
}

/// Maps a raster `foreignFormat` value to a MIME type (§4.6).
pub fn mime_type_for_raster(foreign_format: u32) -> &'static str {
    match foreign_format {
        0 => "image/bmp",
        1 => "image/jpeg",
        2 => "image/gif",
        3 => "image/tiff",
        4 => "image/png",
        _ => "application/octet-stream",
    }
}

/// Distinguishes an EMF payload from a WMF one by its `0x28..0x2c`
/// signature. A payload shorter than that defaults to WMF rather than
/// indexing out of bounds (§4 "Foreign-object MIME/EMF-vs-WMF detection").
pub fn mime_type_for_metafile(payload: &[u8]) -> &'static str {
    if payload.len() >= 0x2c && &payload[0x28..0x2c] == b" EMF" {
        "image/emf"
    } else {
        if payload.len() < 0x2c {
            log::debug!("metafile payload shorter than 0x2c bytes; defaulting to image/wmf");
        }
        "image/wmf"
    }
}

/// Reads a `0x4e ForeignData` record's nested chunks: its `0x9b XForm`,
/// its `0x98 ForeignDataType` descriptor, and for bitmap/metafile objects,
/// the raw payload chunk (`0x0c`) itself.
pub fn read_foreign_record<R: Read + Seek + ?Sized>(
    reader: &mut R,
    page_height: f64,
    scale: f64,
    painter: &mut dyn Painter,
) -> Result<()> {
    let mut xform = XForm::default();
    let mut foreign_type = 0u16;
    let mut foreign_format = 0u32;

    loop {
        let Some(header) = read_chunk_header(reader)? else {
            break;
        };
        if header.level < 2 {
            reader.seek(SeekFrom::Current(-19))?;
            break;
        }
        let chunk_start = reader.stream_position()?;

        match header.chunk_type {
            0x9b => {
                xform = parse_xform(reader, page_height)?;
            }
            0x98 => {
                reader.seek(SeekFrom::Current(0x24))?;
                foreign_type = reader.read_u16_le()?;
                reader.seek(SeekFrom::Current(0xb))?;
                foreign_format = reader.read_u32_le()?;
            }
            0x0c if foreign_type == FOREIGN_TYPE_BITMAP || foreign_type == FOREIGN_TYPE_METAFILE => {
                let payload = read_tolerant(reader, header.data_length as usize)?;
                let mut blob = Vec::with_capacity(payload.len() + 14);

                let mime_type = if foreign_type == FOREIGN_TYPE_BITMAP {
                    if foreign_format == 0 {
                        blob.extend_from_slice(&synthesize_bmp_header(payload.len()));
                    }
                    mime_type_for_raster(foreign_format)
                } else {
                    mime_type_for_metafile(&payload)
                };
                blob.extend_from_slice(&payload);

                painter.draw_graphic_object(
                    GraphicObjectProps {
                        x: scale * (xform.pin_x - xform.pin_loc_x),
                        y: scale * (page_height - xform.pin_y + xform.pin_loc_y - xform.height),
                        width: scale * xform.width,
                        height: scale * xform.height,
                        mime_type,
                    },
                    blob,
                );
            }
            _ => {}
        }

        seek_to_chunk_end(reader, chunk_start, &header)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bmp_header_has_expected_layout() {
        let header = synthesize_bmp_header(1024);
        assert_eq!(&header[0..2], b"BM");
        assert_eq!(u32::from_le_bytes(header[2..6].try_into().unwrap()), 1038);
        assert_eq!(u32::from_le_bytes(header[10..14].try_into().unwrap()), 0x36);
    }

    #[test]
    fn metafile_detection_requires_full_signature_length() {
        assert_eq!(mime_type_for_metafile(&[0u8; 10]), "image/wmf");
        let mut payload = vec![0u8; 0x2c];
        payload[0x28..0x2c].copy_from_slice(b" EMF");
        assert_eq!(mime_type_for_metafile(&payload), "image/emf");
    }

    #[test]
    fn raster_mime_table() {
        assert_eq!(mime_type_for_raster(0), "image/bmp");
        assert_eq!(mime_type_for_raster(4), "image/png");
        assert_eq!(mime_type_for_raster(99), "application/octet-stream");
    }
}
