//! Shape style (C7): §4.8 line/fill records, the dash-pattern and
//! gradient-angle lookup tables, and the fill/stroke state they build.

use vsd_primitives::Color;

/// Multiplied by `scale` to get the default stroke width when no `0x85
/// LineStyle` record overrides it (§4.8).
pub const DEFAULT_STROKE_WIDTH_FACTOR: f64 = 0.0138889;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub color: Color,
    pub offset: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    None,
    Solid(Color),
    LinearGradient { angle_degrees: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleState {
    pub stroke_width: f64,
    pub stroke_color: Color,
    pub dash: &'static str,
    pub fill: Fill,
}

impl StyleState {
    /// The style every group/shape chunk resets to before reading its own
    /// `0x85 LineStyle`/`0x86 FillStyle` records, if any (§4.8).
    pub fn reset(scale: f64) -> Self {
        Self {
            stroke_width: scale * DEFAULT_STROKE_WIDTH_FACTOR,
            stroke_color: Color::BLACK,
            dash: "solid",
            fill: Fill::None,
        }
    }
}

/// `0x85 LineStyle`'s `linePattern` field maps to an SVG `stroke-dasharray`
/// string (§4.8). Values outside the documented table (including `0` and
/// `1`) fall back to `"solid"`.
pub fn dash_pattern(line_pattern: u8) -> &'static str {
    match line_pattern {
        2 => "6, 3",
        3 => "1, 3",
        4 => "6, 3, 1, 3",
        5 => "6, 3, 1, 3, 1, 3",
        6 => "6, 3, 6, 3, 1, 3",
        7 => "14, 2, 6, 2",
        8 => "14, 2, 6, 2, 6, 2",
        9 => "3, 1",
        10 => "1, 1",
        11 => "3, 1, 1, 1",
        12 => "3, 1, 1, 1, 1, 1",
        13 => "3, 1, 3, 1, 1, 1",
        14 => "7, 1, 3, 1",
        15 => "7, 1, 3, 1, 3, 1",
        16 => "11, 5",
        17 => "1, 5",
        18 => "11, 5, 1, 5",
        19 => "11, 5, 1, 5, 1, 5",
        20 => "11, 5, 11, 5, 1, 5",
        21 => "27, 5, 11, 5",
        22 => "27, 5, 11, 5, 11, 5",
        23 => "2, 1",
        _ => "solid",
    }
}

/// `0x86 FillStyle`'s `fillPattern` field maps to a linear gradient angle
/// for the documented patterns (25-34); everything else is a solid fill
/// (§4.8).
pub fn gradient_angle_degrees(fill_pattern: u8) -> Option<f64> {
    match fill_pattern {
        25 | 26 => Some(-90.0),
        27 => Some(90.0),
        28 | 29 => Some(0.0),
        30 => Some(180.0),
        31 => Some(-45.0),
        32 => Some(45.0),
        33 => Some(225.0),
        34 => Some(135.0),
        _ => None,
    }
}

/// Patterns 26 and 29 are a three-stop gradient (background-foreground-
/// background) rather than the usual two-stop foreground-to-background.
pub fn is_mirrored_three_stop(fill_pattern: u8) -> bool {
    matches!(fill_pattern, 26 | 29)
}

/// Builds the gradient stop list for `fill_pattern` given its resolved
/// foreground/background colours (§4.8).
pub fn gradient_stops(foreground: Color, background: Color, fill_pattern: u8) -> Vec<GradientStop> {
    if is_mirrored_three_stop(fill_pattern) {
        vec![
            GradientStop {
                color: background,
                offset: 0.0,
            },
            GradientStop {
                color: foreground,
                offset: 0.5,
            },
            GradientStop {
                color: background,
                offset: 1.0,
            },
        ]
    } else {
        vec![
            GradientStop {
                color: foreground,
                offset: 0.0,
            },
            GradientStop {
                color: background,
                offset: 1.0,
            },
        ]
    }
}
