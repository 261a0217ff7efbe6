//! Path geometry (C6): §4.8, the `MoveTo`/`LineTo`/`ArcTo`/`Ellipse`/
//! `EllipticalArcTo` primitive readers and the geometry state they
//! accumulate into.

use std::io::{self, Read};

use indexmap::IndexMap;
use vsd_io_ext::ReaderExt;

use crate::xform::{apply_xform, XForm};

/// One element of a flushed path (§4.8/§4.9).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathElement {
    Move {
        x: f64,
        y: f64,
    },
    Line {
        x: f64,
        y: f64,
    },
    Arc {
        x: f64,
        y: f64,
        rx: f64,
        ry: f64,
        rotate_degrees: f64,
        large_arc: bool,
        sweep: bool,
    },
    Close,
}

impl PathElement {
    /// The endpoint coordinate, used by [`crate::flush::flush_path`] to
    /// track the running point. `Close` carries none, so it returns the
    /// path's starting coordinate convention of `0.0`; callers never invoke
    /// this on a `Close` element.
    pub fn x(&self) -> f64 {
        match *self {
            PathElement::Move { x, .. } | PathElement::Line { x, .. } | PathElement::Arc { x, .. } => x,
            PathElement::Close => 0.0,
        }
    }

    pub fn y(&self) -> f64 {
        match *self {
            PathElement::Move { y, .. } | PathElement::Line { y, .. } | PathElement::Arc { y, .. } => y,
            PathElement::Close => 0.0,
        }
    }

    pub fn is_move(&self) -> bool {
        matches!(self, PathElement::Move { .. })
    }
}

/// The in-progress geometry of the shape currently being read (§3/§9).
///
/// `current_geometry`/`current_complex_geometry` are `IndexMap`s rather
/// than hash maps, per the Design Notes' warning against assuming a hash
/// map here: natural iteration order matters when no `GeomList` order was
/// seen.
#[derive(Debug, Default)]
pub struct GeometryState {
    pub current_geometry: IndexMap<u32, PathElement>,
    pub current_complex_geometry: IndexMap<u32, Vec<PathElement>>,
    pub current_geometry_order: Vec<u32>,
}

impl GeometryState {
    pub fn is_empty(&self) -> bool {
        self.current_geometry.is_empty() && self.current_complex_geometry.is_empty()
    }

    pub fn clear(&mut self) {
        self.current_geometry.clear();
        self.current_complex_geometry.clear();
        self.current_geometry_order.clear();
    }
}

/// `0x8a MoveTo` (§4.8).
pub fn move_to<R: Read + ?Sized>(
    reader: &mut R,
    xform: &XForm,
    page_height: f64,
    scale: f64,
    running: &mut (f64, f64),
) -> io::Result<PathElement> {
    let x = reader.read_prefixed_f64()? + xform.x;
    let y = (xform.height - reader.read_prefixed_f64()?) + xform.y;
    let (x, y) = apply_xform(x, y, xform, page_height);
    *running = (x, y);
    Ok(PathElement::Move {
        x: scale * x,
        y: scale * y,
    })
}

/// `0x8b LineTo` (§4.8).
pub fn line_to<R: Read + ?Sized>(
    reader: &mut R,
    xform: &XForm,
    page_height: f64,
    scale: f64,
    running: &mut (f64, f64),
) -> io::Result<PathElement> {
    let x = reader.read_prefixed_f64()? + xform.x;
    let y = (xform.height - reader.read_prefixed_f64()?) + xform.y;
    let (x, y) = apply_xform(x, y, xform, page_height);
    *running = (x, y);
    Ok(PathElement::Line {
        x: scale * x,
        y: scale * y,
    })
}

/// `0x8c ArcTo` (§4.8): a circular arc expressed via its chord and bow
/// height, degenerating to a straight line when `bow == 0`.
pub fn arc_to<R: Read + ?Sized>(
    reader: &mut R,
    xform: &XForm,
    page_height: f64,
    scale: f64,
    running: &mut (f64, f64),
) -> io::Result<PathElement> {
    let x2 = reader.read_prefixed_f64()? + xform.x;
    let y2 = (xform.height - reader.read_prefixed_f64()?) + xform.y;
    reader.read_u8_le()?;
    let bow = reader.read_f64_le()?;

    let (x2, y2) = apply_xform(x2, y2, xform, page_height);
    let (x1, y1) = *running;
    *running = (x2, y2);

    if bow == 0.0 {
        return Ok(PathElement::Line {
            x: scale * x2,
            y: scale * y2,
        });
    }

    let chord = ((y2 - y1).powi(2) + (x2 - x1).powi(2)).sqrt();
    let radius = (4.0 * bow * bow + chord * chord) / (8.0 * bow.abs());

    Ok(PathElement::Arc {
        x: scale * x2,
        y: scale * y2,
        rx: scale * radius,
        ry: scale * radius,
        rotate_degrees: xform.angle.to_degrees(),
        large_arc: bow.abs() > radius,
        sweep: bow < 0.0,
    })
}

/// `0x8f Ellipse` (§4.8), emitted directly as an ellipse draw call rather
/// than a path element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseCall {
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
    pub rotate_degrees: f64,
}

pub fn read_ellipse<R: Read + ?Sized>(reader: &mut R, xform: &XForm, scale: f64) -> io::Result<EllipseCall> {
    let cx = reader.read_prefixed_f64()?;
    let cy = reader.read_prefixed_f64()?;
    let aa = reader.read_prefixed_f64()?;
    let _bb = reader.read_prefixed_f64()?;
    let _cc = reader.read_prefixed_f64()?;
    let dd = reader.read_prefixed_f64()?;

    Ok(EllipseCall {
        cx: scale * (xform.x + cx),
        cy: scale * (xform.y + cy),
        rx: scale * (aa - cx),
        ry: scale * (dd - cy),
        rotate_degrees: xform.angle.to_degrees(),
    })
}

/// `0x90 EllipticalArcTo` (§4.8): fits an ellipse through three points and
/// an eccentricity, then expresses the arc from the running point to the
/// third point as an SVG-style elliptical arc.
///
/// Returns `None` when the three points are collinear (zero determinant),
/// which the caller treats as "skip this element" rather than producing
/// `NaN` radii, matching §7's leniency policy.
pub fn elliptical_arc_to<R: Read + ?Sized>(
    reader: &mut R,
    xform: &XForm,
    page_height: f64,
    scale: f64,
    running: &mut (f64, f64),
) -> io::Result<Option<PathElement>> {
    let x3 = reader.read_prefixed_f64()? + xform.x;
    let y3 = (xform.height - reader.read_prefixed_f64()?) + xform.y;
    let x2 = reader.read_prefixed_f64()? + xform.x;
    let y2 = (xform.height - reader.read_prefixed_f64()?) + xform.y;
    let angle = reader.read_prefixed_f64()?;
    let ecc = reader.read_prefixed_f64()?;

    let (x3, y3) = apply_xform(x3, y3, xform, page_height);
    let (x2, y2) = apply_xform(x2, y2, xform, page_height);
    let (x1, y1) = *running;
    *running = (x3, y3);

    let denom = 2.0 * ((x1 - x2) * (y2 - y3) - (x2 - x3) * (y1 - y2));
    if denom == 0.0 {
        return Ok(None);
    }
    let x0 = ((x1 - x2) * (x1 + x2) * (y2 - y3) - (x2 - x3) * (x2 + x3) * (y1 - y2)
        + ecc * ecc * (y1 - y2) * (y2 - y3) * (y1 - y3))
        / denom;

    let denom2 = 2.0 * ecc * ecc * ((x2 - x3) * (y1 - y2) - (x1 - x2) * (y2 - y3));
    if denom2 == 0.0 {
        return Ok(None);
    }
    let y0 = ((x1 - x2) * (x2 - x3) * (x1 - x3) + ecc * ecc * (x2 - x3) * (y1 - y2) * (y1 + y2)
        - ecc * ecc * (x1 - x2) * (y2 - y3) * (y2 + y3))
        / denom2;

    let rx = ((x1 - x0).powi(2) + ecc * ecc * (y1 - y0).powi(2)).sqrt();
    let ry = rx / ecc;

    let centre_side = (x3 - x1) * (y0 - y1) - (y3 - y1) * (x0 - x1);
    let mid_side = (x3 - x1) * (y2 - y1) - (y3 - y1) * (x2 - x1);
    let large_arc = centre_side != 0.0 && mid_side != 0.0 && centre_side.signum() == mid_side.signum();
    let sweep = !(mid_side > 0.0);

    Ok(Some(PathElement::Arc {
        x: scale * x3,
        y: scale * y3,
        rx: scale * rx,
        ry: scale * ry,
        rotate_degrees: -(angle.to_degrees() + xform.angle.to_degrees()),
        large_arc,
        sweep,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_to_sets_running_point() {
        let xform = XForm {
            height: 10.0,
            ..XForm::default()
        };
        let bytes: Vec<u8> = {
            let mut v = Vec::new();
            v.push(0); // prefix
            v.extend_from_slice(&3.0f64.to_le_bytes());
            v.push(0);
            v.extend_from_slice(&4.0f64.to_le_bytes());
            v
        };
        let mut cursor = io::Cursor::new(bytes);
        let mut running = (0.0, 0.0);
        let elem = move_to(&mut cursor, &xform, 100.0, 1.0, &mut running).unwrap();
        assert_eq!(elem, PathElement::Move { x: 3.0, y: 6.0 });
        assert_eq!(running, (3.0, 6.0));
    }

    #[test]
    fn arc_to_with_zero_bow_is_a_line() {
        let xform = XForm {
            height: 10.0,
            ..XForm::default()
        };
        let bytes: Vec<u8> = {
            let mut v = Vec::new();
            v.push(0);
            v.extend_from_slice(&5.0f64.to_le_bytes());
            v.push(0);
            v.extend_from_slice(&5.0f64.to_le_bytes());
            v.push(0); // skip byte before bow
            v.extend_from_slice(&0.0f64.to_le_bytes());
            v
        };
        let mut cursor = io::Cursor::new(bytes);
        let mut running = (0.0, 0.0);
        let elem = arc_to(&mut cursor, &xform, 100.0, 1.0, &mut running).unwrap();
        assert!(matches!(elem, PathElement::Line { .. }));
    }

    #[test]
    fn arc_to_with_bow_produces_arc_with_expected_sweep() {
        let xform = XForm {
            height: 10.0,
            ..XForm::default()
        };
        let bytes: Vec<u8> = {
            let mut v = Vec::new();
            v.push(0);
            v.extend_from_slice(&10.0f64.to_le_bytes());
            v.push(0);
            v.extend_from_slice(&0.0f64.to_le_bytes());
            v.push(0);
            v.extend_from_slice(&(-2.0f64).to_le_bytes());
            v
        };
        let mut cursor = io::Cursor::new(bytes);
        let mut running = (0.0, 10.0);
        let elem = arc_to(&mut cursor, &xform, 100.0, 1.0, &mut running).unwrap();
        match elem {
            PathElement::Arc { sweep, large_arc, .. } => {
                assert!(sweep);
                assert!(!large_arc);
            }
            _ => panic!("expected an arc"),
        }
    }

    #[test]
    fn elliptical_arc_to_skips_collinear_points() {
        let xform = XForm {
            height: 0.0,
            ..XForm::default()
        };
        // x3,y3,x2,y2,angle,ecc all on a horizontal line -> degenerate.
        let bytes: Vec<u8> = {
            let mut v = Vec::new();
            for value in [5.0_f64, 0.0, 2.5, 0.0, 0.0, 1.0] {
                v.push(0);
                v.extend_from_slice(&value.to_le_bytes());
            }
            v
        };
        let mut cursor = io::Cursor::new(bytes);
        let mut running = (0.0, 0.0);
        let elem = elliptical_arc_to(&mut cursor, &xform, 0.0, 1.0, &mut running).unwrap();
        assert!(elem.is_none());
    }
}
