//! A built-in `Painter` that renders an SVG document string, backing
//! [`crate::generate_svg`] (§6).

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::fmt::Write as _;

use crate::geometry::PathElement;
use crate::painter::{EllipseProps, GraphicObjectProps, GraphicsProps, Painter};
use crate::style::{Fill, GradientStop, StyleState};

/// Renders every painter call it receives directly into an SVG string.
///
/// Grounded on the `libwpg:*`/`svg:*` property names implied by the
/// abstract painter contract; since this crate owns both ends of that
/// contract, the properties are written as SVG attributes directly rather
/// than through a generic property-bag serializer.
#[derive(Debug, Default)]
pub struct SvgPainter {
    body: String,
    defs: String,
    next_gradient_id: u32,
    pending_style: Option<(StyleState, Vec<GradientStop>)>,
}

impl SvgPainter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the painter, returning the finished SVG document.
    pub fn into_svg(self) -> String {
        let mut svg = self.body;
        if !self.defs.is_empty() {
            svg.insert_str(0, &format!("<defs>{}</defs>", self.defs));
        }
        svg
    }

    fn style_attrs(&mut self) -> (f64, String, String) {
        match self.pending_style.take() {
            Some((style, stops)) => {
                let fill = match style.fill {
                    Fill::None => "none".to_string(),
                    Fill::Solid(color) => color.to_hex_string(),
                    Fill::LinearGradient { angle_degrees } => {
                        let id = format!("g{}", self.next_gradient_id);
                        self.next_gradient_id += 1;
                        let mut stop_tags = String::new();
                        for stop in &stops {
                            let _ = write!(
                                stop_tags,
                                "<stop offset=\"{}\" stop-color=\"{}\"/>",
                                stop.offset,
                                stop.color.to_hex_string()
                            );
                        }
                        let _ = write!(
                            self.defs,
                            "<linearGradient id=\"{id}\" gradientTransform=\"rotate({angle_degrees})\">{stop_tags}</linearGradient>"
                        );
                        format!("url(#{id})")
                    }
                };
                (style.stroke_width, style.stroke_color.to_hex_string(), fill)
            }
            None => (0.0, "#000000".to_string(), "none".to_string()),
        }
    }

    fn dash_attr(&self) -> &'static str {
        self.pending_style.as_ref().map_or("solid", |(style, _)| style.dash)
    }
}

fn path_data(path: &[PathElement]) -> String {
    let mut d = String::new();
    for elem in path {
        if !d.is_empty() {
            d.push(' ');
        }
        match *elem {
            PathElement::Move { x, y } => {
                let _ = write!(d, "M {x} {y}");
            }
            PathElement::Line { x, y } => {
                let _ = write!(d, "L {x} {y}");
            }
            PathElement::Arc {
                x,
                y,
                rx,
                ry,
                rotate_degrees,
                large_arc,
                sweep,
            } => {
                let _ = write!(
                    d,
                    "A {rx} {ry} {rotate_degrees} {} {} {x} {y}",
                    u8::from(large_arc),
                    u8::from(sweep)
                );
            }
            PathElement::Close => d.push('Z'),
        }
    }
    d
}

impl Painter for SvgPainter {
    fn start_graphics(&mut self, props: GraphicsProps) {
        let _ = write!(
            self.body,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}in\" height=\"{}in\" viewBox=\"0 0 {} {}\">",
            props.width, props.height, props.width, props.height
        );
    }

    fn end_graphics(&mut self) {
        self.body.push_str("</svg>");
    }

    fn set_style(&mut self, style: StyleState, gradient_stops: Vec<GradientStop>) {
        self.pending_style = Some((style, gradient_stops));
    }

    fn draw_path(&mut self, path: Vec<PathElement>) {
        let dash = self.dash_attr();
        let dash = if dash == "solid" {
            String::new()
        } else {
            format!(" stroke-dasharray=\"{dash}\"")
        };
        let (stroke_width, stroke_color, fill) = self.style_attrs();
        let _ = write!(
            self.body,
            "<path d=\"{}\" fill=\"{fill}\" stroke=\"{stroke_color}\" stroke-width=\"{stroke_width}\"{dash}/>",
            path_data(&path)
        );
    }

    fn draw_ellipse(&mut self, ellipse: EllipseProps) {
        let _ = write!(
            self.body,
            "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" fill=\"none\" stroke=\"#000000\" transform=\"rotate({} {} {})\"/>",
            ellipse.cx, ellipse.cy, ellipse.rx, ellipse.ry, ellipse.rotate_degrees, ellipse.cx, ellipse.cy
        );
    }

    fn draw_graphic_object(&mut self, props: GraphicObjectProps, blob: Vec<u8>) {
        let encoded = BASE64.encode(blob);
        let _ = write!(
            self.body,
            "<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" xlink:href=\"data:{};base64,{}\"/>",
            props.x, props.y, props.width, props.height, props.mime_type, encoded
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vsd_primitives::Color;

    #[test]
    fn empty_document_has_matching_open_close_tags() {
        let mut painter = SvgPainter::new();
        painter.start_graphics(GraphicsProps {
            width: 8.5,
            height: 11.0,
        });
        painter.end_graphics();
        let svg = painter.into_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn solid_fill_renders_hex_colour() {
        let mut painter = SvgPainter::new();
        painter.set_style(
            StyleState {
                stroke_width: 0.01,
                stroke_color: Color::BLACK,
                dash: "solid",
                fill: Fill::Solid(Color::new(255, 0, 0, 255)),
            },
            Vec::new(),
        );
        painter.draw_path(vec![PathElement::Move { x: 0.0, y: 0.0 }, PathElement::Close]);
        let svg = painter.into_svg();
        assert!(svg.contains("fill=\"#ff0000\""));
    }

    #[test]
    fn gradient_fill_registers_a_defs_entry() {
        let mut painter = SvgPainter::new();
        painter.set_style(
            StyleState {
                stroke_width: 0.01,
                stroke_color: Color::BLACK,
                dash: "solid",
                fill: Fill::LinearGradient { angle_degrees: 45.0 },
            },
            vec![
                GradientStop {
                    color: Color::new(255, 0, 0, 255),
                    offset: 0.0,
                },
                GradientStop {
                    color: Color::new(0, 0, 255, 255),
                    offset: 1.0,
                },
            ],
        );
        painter.draw_path(vec![PathElement::Move { x: 0.0, y: 0.0 }]);
        let svg = painter.into_svg();
        assert!(svg.contains("linearGradient"));
        assert!(svg.contains("url(#g0)"));
    }
}
