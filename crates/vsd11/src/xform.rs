//! Shape transforms (C5): §4.6-4.7, the `0x9b XForm` record and the
//! rotate/flip point math every primitive reader applies to its endpoints.

use std::io::{self, Read};

use vsd_io_ext::ReaderExt;

/// A shape's position, size and rotation, plus the page-space origin
/// derived from them (§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct XForm {
    pub pin_x: f64,
    pub pin_y: f64,
    pub width: f64,
    pub height: f64,
    pub pin_loc_x: f64,
    pub pin_loc_y: f64,
    pub angle: f64,
    pub flip_x: bool,
    pub flip_y: bool,
    /// Derived: `pin_x - pin_loc_x`.
    pub x: f64,
    /// Derived: `page_height - pin_y + pin_loc_y - height`.
    pub y: f64,
}

impl XForm {
    fn recompute_origin(&mut self, page_height: f64) {
        self.x = self.pin_x - self.pin_loc_x;
        self.y = page_height - self.pin_y + self.pin_loc_y - self.height;
    }
}

/// Reads an `0x9b XForm` record body: seven one-byte-prefixed doubles
/// followed by two one-byte bools (§4.6).
pub fn parse_xform<R: Read + ?Sized>(reader: &mut R, page_height: f64) -> io::Result<XForm> {
    let pin_x = reader.read_prefixed_f64()?;
    let pin_y = reader.read_prefixed_f64()?;
    let width = reader.read_prefixed_f64()?;
    let height = reader.read_prefixed_f64()?;
    let pin_loc_x = reader.read_prefixed_f64()?;
    let pin_loc_y = reader.read_prefixed_f64()?;
    let angle = reader.read_prefixed_f64()?;
    let flip_x = reader.read_bool()?;
    let flip_y = reader.read_bool()?;

    let mut xform = XForm {
        pin_x,
        pin_y,
        width,
        height,
        pin_loc_x,
        pin_loc_y,
        angle,
        flip_x,
        flip_y,
        x: 0.0,
        y: 0.0,
    };
    xform.recompute_origin(page_height);
    Ok(xform)
}

/// Additively composes a freshly-parsed `XForm` with the group transform
/// recorded for its shape id, if any (§4.6 group/shape nesting), then
/// recomputes the derived origin.
pub fn compose_with_group(mut xform: XForm, group_xform: Option<&XForm>, page_height: f64) -> XForm {
    if let Some(group) = group_xform {
        xform.pin_x += group.pin_x;
        xform.pin_y += group.pin_y;
        xform.pin_loc_x += group.pin_loc_x;
        xform.pin_loc_y += group.pin_loc_y;
    }
    xform.recompute_origin(page_height);
    xform
}

/// Rotates `(x, y)` about the shape's pin, in page space (§4.7).
///
/// A no-op when `angle` is exactly zero, matching the original's explicit
/// fast path rather than relying on `cos(0) == 1`/`sin(0) == 0` to be a
/// no-op under floating point.
pub fn rotate_point(x: f64, y: f64, xform: &XForm, page_height: f64) -> (f64, f64) {
    if xform.angle == 0.0 {
        return (x, y);
    }

    let tmp_x = x - xform.pin_x;
    let tmp_y = (page_height - y) - xform.pin_y;

    let (sin, cos) = xform.angle.sin_cos();
    let rx = tmp_x * cos - tmp_y * sin + xform.pin_x;
    let ry = tmp_x * sin + tmp_y * cos + xform.pin_y;

    (rx, page_height - ry)
}

/// Mirrors `(x, y)` about the shape's bounding box per its flip flags
/// (§4.7). A no-op when neither flag is set.
pub fn flip_point(x: f64, y: f64, xform: &XForm) -> (f64, f64) {
    if !xform.flip_x && !xform.flip_y {
        return (x, y);
    }

    let mut tmp_x = x - xform.x;
    let mut tmp_y = y - xform.y;
    if xform.flip_x {
        tmp_x = xform.width - tmp_x;
    }
    if xform.flip_y {
        tmp_y = xform.height - tmp_y;
    }

    (tmp_x + xform.x, tmp_y + xform.y)
}

/// `flip_point(rotate_point(...))`, the combined transform every path
/// primitive applies to the coordinates it reads (§4.8).
pub fn apply_xform(x: f64, y: f64, xform: &XForm, page_height: f64) -> (f64, f64) {
    let (x, y) = rotate_point(x, y, xform, page_height);
    flip_point(x, y, xform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_xform() -> XForm {
        let mut xform = XForm {
            pin_x: 4.0,
            pin_y: 3.0,
            width: 2.0,
            height: 2.0,
            pin_loc_x: 1.0,
            pin_loc_y: 1.0,
            angle: 0.7,
            flip_x: true,
            flip_y: false,
            x: 0.0,
            y: 0.0,
        };
        xform.recompute_origin(11.0);
        xform
    }

    #[test]
    fn zero_angle_rotation_is_identity() {
        let xform = XForm::default();
        assert_eq!(rotate_point(3.0, 4.0, &xform, 10.0), (3.0, 4.0));
    }

    #[test]
    fn no_flip_is_identity() {
        let xform = XForm::default();
        assert_eq!(flip_point(3.0, 4.0, &xform), (3.0, 4.0));
    }

    #[test]
    fn rotate_point_is_invertible() {
        let xform = sample_xform();
        let mut inverse = xform;
        inverse.angle = -xform.angle;

        let (rx, ry) = rotate_point(5.0, 6.0, &xform, 11.0);
        let (x, y) = rotate_point(rx, ry, &inverse, 11.0);
        assert_relative_eq!(x, 5.0, epsilon = 1e-9);
        assert_relative_eq!(y, 6.0, epsilon = 1e-9);
    }

    #[test]
    fn flip_point_is_involution() {
        let xform = sample_xform();
        let (fx, fy) = flip_point(5.0, 6.0, &xform);
        let (x, y) = flip_point(fx, fy, &xform);
        assert_relative_eq!(x, 5.0, epsilon = 1e-9);
        assert_relative_eq!(y, 6.0, epsilon = 1e-9);
    }

    #[test]
    fn compose_with_group_is_additive_on_pin_fields() {
        let group = XForm {
            pin_x: 10.0,
            pin_y: 20.0,
            pin_loc_x: 1.0,
            pin_loc_y: 2.0,
            ..XForm::default()
        };
        let local = XForm {
            pin_x: 1.0,
            pin_y: 1.0,
            pin_loc_x: 0.0,
            pin_loc_y: 0.0,
            width: 4.0,
            height: 4.0,
            ..XForm::default()
        };
        let composed = compose_with_group(local, Some(&group), 100.0);
        assert_eq!(composed.pin_x, 11.0);
        assert_eq!(composed.pin_y, 21.0);
        assert_eq!(composed.pin_loc_x, 1.0);
        assert_eq!(composed.pin_loc_y, 2.0);
    }

    #[test]
    fn compose_without_group_recomputes_origin_only() {
        let local = XForm {
            pin_x: 5.0,
            pin_loc_x: 2.0,
            width: 4.0,
            height: 4.0,
            ..XForm::default()
        };
        let composed = compose_with_group(local, None, 100.0);
        assert_eq!(composed.x, 3.0);
    }
}
