//! Group / Shape handlers (C5-C8): §4.6, the nested-chunk driver shared by
//! `0x47 Group` and `0x48 Shape` records.

use std::io::{self, Read, Seek, SeekFrom};

use indexmap::IndexMap;
use vsd_io_ext::ReaderExt;
use vsd_primitives::Color;

use crate::chunk::{read_chunk_header, seek_to_chunk_end};
use crate::error::Result;
use crate::flush::flush_path;
use crate::geometry::{arc_to, elliptical_arc_to, line_to, move_to, read_ellipse, GeometryState};
use crate::painter::{EllipseProps, Painter};
use crate::style::{dash_pattern, gradient_angle_degrees, gradient_stops, Fill, GradientStop, StyleState};
use crate::xform::{compose_with_group, parse_xform, XForm};

/// Borrowed, per-parse-call context a group/shape handler needs but doesn't
/// own: the palette, the shape id the page driver just set, and the active
/// page's dimensions (§9 "pass a single mutable context to handler
/// functions").
pub struct ShapeCtx<'a> {
    pub palette: &'a [Color],
    pub current_shape_id: u32,
    pub page_height: f64,
    pub scale: f64,
}

fn lookup_color(palette: &[Color], index: u8) -> Option<Color> {
    let color = palette.get(index as usize).copied();
    if color.is_none() {
        log::debug!("fill/line colour index {index} out of palette bounds ({})", palette.len());
    }
    color
}

/// `0x47 Group` (§4.6): the only handler that writes `group_transforms`.
pub fn read_group<R: Read + Seek + ?Sized>(
    reader: &mut R,
    geometry: &mut GeometryState,
    group_transforms: &mut IndexMap<u32, XForm>,
    ctx: &ShapeCtx<'_>,
    painter: &mut dyn Painter,
) -> Result<()> {
    drive_shape_chunks(reader, geometry, group_transforms, ctx, painter, true)
}

/// `0x48 Shape` (§4.6): reads `group_transforms` but never writes it.
pub fn read_shape<R: Read + Seek + ?Sized>(
    reader: &mut R,
    geometry: &mut GeometryState,
    group_transforms: &mut IndexMap<u32, XForm>,
    ctx: &ShapeCtx<'_>,
    painter: &mut dyn Painter,
) -> Result<()> {
    drive_shape_chunks(reader, geometry, group_transforms, ctx, painter, false)
}

fn drive_shape_chunks<R: Read + Seek + ?Sized>(
    reader: &mut R,
    geometry: &mut GeometryState,
    group_transforms: &mut IndexMap<u32, XForm>,
    ctx: &ShapeCtx<'_>,
    painter: &mut dyn Painter,
    is_group: bool,
) -> Result<()> {
    let mut xform = compose_with_group(
        XForm::default(),
        group_transforms.get(&ctx.current_shape_id),
        ctx.page_height,
    );
    let mut style = StyleState::reset(ctx.scale);
    let mut stops: Vec<GradientStop> = Vec::new();
    let mut running = (0.0_f64, 0.0_f64);
    let mut geom_count: Option<u32> = None;

    loop {
        let header = match read_chunk_header(reader) {
            Ok(Some(header)) => header,
            Ok(None) => break,
            Err(err) => {
                log::debug!("truncated shape substream while reading a chunk header: {err}");
                break;
            }
        };
        if header.level < 2 {
            reader.seek(SeekFrom::Current(-19))?;
            break;
        }
        let chunk_start = reader.stream_position()?;
        let is_geom_list = header.chunk_type == 0x6c;

        let outcome: io::Result<bool> = (|| {
            match header.chunk_type {
                0x9b => {
                    let local = parse_xform(reader, ctx.page_height)?;
                    xform = compose_with_group(local, group_transforms.get(&ctx.current_shape_id), ctx.page_height);
                }
                0x83 if is_group => {
                    let child_id = reader.read_u32_le()?;
                    group_transforms.insert(child_id, xform);
                }
                0x85 => {
                    style.stroke_width = reader.read_prefixed_f64()?;
                    reader.seek(SeekFrom::Current(1))?;
                    style.stroke_color = reader.read_color()?;
                    let line_pattern = reader.read_u8_le()?;
                    style.dash = dash_pattern(line_pattern);
                }
                0x86 => {
                    let fg_index = reader.read_u8_le()?;
                    let background = if is_group {
                        reader.seek(SeekFrom::Current(9))?;
                        None
                    } else {
                        reader.seek(SeekFrom::Current(4))?;
                        let bg_index = reader.read_u8_le()?;
                        reader.seek(SeekFrom::Current(4))?;
                        lookup_color(ctx.palette, bg_index)
                    };
                    let fill_pattern = reader.read_u8_le()?;
                    let foreground = lookup_color(ctx.palette, fg_index);

                    stops.clear();
                    style.fill = if fill_pattern == 1 {
                        foreground.map_or(Fill::None, Fill::Solid)
                    } else if !is_group {
                        match (foreground, background, gradient_angle_degrees(fill_pattern)) {
                            (Some(fg), Some(bg), Some(angle_degrees)) => {
                                stops = gradient_stops(fg, bg, fill_pattern);
                                Fill::LinearGradient { angle_degrees }
                            }
                            _ => Fill::None,
                        }
                    } else {
                        Fill::None
                    };
                }
                0x6c => {
                    maybe_flush_and_emit(geometry, style, &stops, painter);

                    let sub_header_len = reader.read_u32_le()?;
                    let children_list_len = reader.read_u32_le()?;
                    reader.seek(SeekFrom::Current(i64::from(sub_header_len)))?;

                    let count = children_list_len / 4;
                    let mut order = Vec::with_capacity(count as usize);
                    for _ in 0..count {
                        order.push(reader.read_u32_le()?);
                    }
                    geometry.current_geometry_order = order;

                    if is_group {
                        geom_count = Some(header.list);
                    }
                }
                0x8a => {
                    let elem = move_to(reader, &xform, ctx.page_height, ctx.scale, &mut running)?;
                    geometry.current_geometry.insert(header.id, elem);
                }
                0x8b => {
                    let elem = line_to(reader, &xform, ctx.page_height, ctx.scale, &mut running)?;
                    geometry.current_geometry.insert(header.id, elem);
                }
                0x8c => {
                    let elem = arc_to(reader, &xform, ctx.page_height, ctx.scale, &mut running)?;
                    geometry.current_geometry.insert(header.id, elem);
                }
                0x90 => {
                    if let Some(elem) = elliptical_arc_to(reader, &xform, ctx.page_height, ctx.scale, &mut running)? {
                        geometry.current_geometry.insert(header.id, elem);
                    }
                }
                0x8f => {
                    let ellipse = read_ellipse(reader, &xform, ctx.scale)?;
                    painter.draw_ellipse(EllipseProps {
                        cx: ellipse.cx,
                        cy: ellipse.cy,
                        rx: ellipse.rx,
                        ry: ellipse.ry,
                        rotate_degrees: ellipse.rotate_degrees,
                    });
                }
                _ => {}
            }

            seek_to_chunk_end(reader, chunk_start, &header)?;

            let mut done = false;
            if is_group && !is_geom_list {
                if let Some(remaining) = geom_count {
                    let remaining = remaining.saturating_sub(1);
                    geom_count = Some(remaining);
                    if remaining == 0 {
                        done = true;
                    }
                }
            }
            Ok(done)
        })();

        match outcome {
            Ok(true) => break,
            Ok(false) => {}
            Err(err) => {
                log::debug!("truncated shape substream while driving a nested chunk: {err}");
                break;
            }
        }
    }

    maybe_flush_and_emit(geometry, style, &stops, painter);
    Ok(())
}

/// Flushes pending geometry and, only if there was something to draw, emits
/// the style that applies to it (§6 "`setStyle`... called once per shape
/// that draws paths, before `drawPath`").
fn maybe_flush_and_emit(
    geometry: &mut GeometryState,
    style: StyleState,
    stops: &[GradientStop],
    painter: &mut dyn Painter,
) {
    if let Some(path) = flush_path(geometry) {
        painter.set_style(style, stops.to_vec());
        painter.draw_path(path);
    }
}
