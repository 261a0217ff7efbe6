//! Parser-wide state threaded through a single `parse` call (§3/§9).

use indexmap::IndexMap;
use vsd_primitives::Color;

use crate::geometry::GeometryState;
use crate::xform::XForm;

/// State that outlives any single chunk or shape: the colour palette, the
/// current page's dimensions, and the group-transform table a page's
/// shapes reference by id.
pub struct ParserState {
    pub palette: Vec<Color>,
    pub page_width: f64,
    pub page_height: f64,
    pub scale: f64,
    pub is_page_started: bool,
    pub group_transforms: IndexMap<u32, XForm>,
    pub current_shape_id: u32,
    pub geometry: GeometryState,
}

impl Default for ParserState {
    fn default() -> Self {
        Self {
            palette: Vec::new(),
            page_width: 0.0,
            page_height: 0.0,
            scale: 1.0,
            is_page_started: false,
            group_transforms: IndexMap::new(),
            current_shape_id: 0,
            geometry: GeometryState::default(),
        }
    }
}
