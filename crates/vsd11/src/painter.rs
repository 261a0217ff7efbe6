//! The output-sink contract (§6): a `Painter` trait plus the typed call
//! payloads passed to it. Reusing `geometry::PathElement` as the path wire
//! type avoids a redundant shadow enum between the geometry reader and the
//! painter.

use crate::geometry::PathElement;
use crate::style::{GradientStop, StyleState};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphicsProps {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseProps {
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
    pub rotate_degrees: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphicObjectProps {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub mime_type: &'static str,
}

/// The abstract drawing sink every parsed page is replayed onto (§6).
///
/// A caller supplies its own implementation to integrate with a particular
/// rendering or vector-graphics backend; this crate's own [`crate::svg::SvgPainter`]
/// is one such implementation, used to back [`crate::generate_svg`].
pub trait Painter {
    fn start_graphics(&mut self, props: GraphicsProps);
    fn end_graphics(&mut self);
    fn set_style(&mut self, style: StyleState, gradient_stops: Vec<GradientStop>);
    fn draw_path(&mut self, path: Vec<PathElement>);
    fn draw_ellipse(&mut self, ellipse: EllipseProps);
    fn draw_graphic_object(&mut self, props: GraphicObjectProps, blob: Vec<u8>);
}
