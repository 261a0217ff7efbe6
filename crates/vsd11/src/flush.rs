//! Path flushing (C8): §4.9, turning accumulated geometry state into the
//! ordered `Vec<PathElement>` handed to the painter.

use crate::geometry::{GeometryState, PathElement};

/// Flattens and clears the shape's geometry state into a single path,
/// appending a closing `Z` when the path wasn't already broken by an
/// embedded `MoveTo` or left open at a point other than where it started.
///
/// Returns `None` when there was nothing to draw.
pub fn flush_path(state: &mut GeometryState) -> Option<Vec<PathElement>> {
    let mut path: Vec<PathElement> = Vec::new();

    if state.current_geometry_order.is_empty() {
        path.extend(state.current_geometry.values().copied());
        for elems in state.current_complex_geometry.values() {
            path.extend(elems.iter().copied());
        }
    } else {
        let mut start = (0.0_f64, 0.0_f64);
        let mut last = (0.0_f64, 0.0_f64);
        let mut first_point = true;
        let mut broken = false;

        for id in &state.current_geometry_order {
            if let Some(elem) = state.current_geometry.get(id) {
                last = (elem.x(), elem.y());
                if first_point {
                    start = last;
                    first_point = false;
                } else if !broken && elem.is_move() {
                    broken = true;
                }
                path.push(*elem);
            } else if let Some(elems) = state.current_complex_geometry.get(id) {
                for elem in elems {
                    path.push(*elem);
                    last = (elem.x(), elem.y());
                }
            }
            // An id present in the order list but absent from both maps is
            // silently skipped (§9 invariant).
        }

        if !broken && start != last {
            broken = true;
        }
        if !broken && !path.is_empty() {
            path.push(PathElement::Close);
        }
    }

    state.clear();

    if path.is_empty() {
        None
    } else {
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn empty_state_flushes_to_none() {
        let mut state = GeometryState::default();
        assert!(flush_path(&mut state).is_none());
    }

    #[test]
    fn closed_path_gets_close_element() {
        let mut state = GeometryState::default();
        state.current_geometry.insert(1, PathElement::Move { x: 0.0, y: 0.0 });
        state.current_geometry.insert(2, PathElement::Line { x: 1.0, y: 0.0 });
        state.current_geometry.insert(3, PathElement::Line { x: 0.0, y: 0.0 });
        state.current_geometry_order = vec![1, 2, 3];

        let path = flush_path(&mut state).unwrap();
        assert!(matches!(path.last(), Some(PathElement::Close)));
        assert!(state.is_empty());
    }

    #[test]
    fn open_path_has_no_close_element() {
        let mut state = GeometryState::default();
        state.current_geometry.insert(1, PathElement::Move { x: 0.0, y: 0.0 });
        state.current_geometry.insert(2, PathElement::Line { x: 1.0, y: 1.0 });
        state.current_geometry_order = vec![1, 2];

        let path = flush_path(&mut state).unwrap();
        assert!(!matches!(path.last(), Some(PathElement::Close)));
    }

    #[test]
    fn embedded_move_breaks_the_path() {
        let mut state = GeometryState::default();
        state.current_geometry.insert(1, PathElement::Move { x: 0.0, y: 0.0 });
        state.current_geometry.insert(2, PathElement::Line { x: 1.0, y: 0.0 });
        state.current_geometry.insert(3, PathElement::Move { x: 0.0, y: 0.0 });
        state.current_geometry_order = vec![1, 2, 3];

        let path = flush_path(&mut state).unwrap();
        assert!(!matches!(path.last(), Some(PathElement::Close)));
    }

    #[test]
    fn order_referencing_missing_id_is_skipped() {
        let mut state = GeometryState::default();
        state.current_geometry.insert(1, PathElement::Move { x: 0.0, y: 0.0 });
        state.current_geometry_order = vec![1, 99];

        let path = flush_path(&mut state).unwrap();
        assert_eq!(path.len(), 2); // Move + synthesized Close (start==last)
    }

    #[test]
    fn no_order_uses_natural_map_iteration_order() {
        let mut state = GeometryState::default();
        let mut complex: IndexMap<u32, Vec<PathElement>> = IndexMap::new();
        complex.insert(5, vec![PathElement::Line { x: 2.0, y: 2.0 }]);
        state.current_complex_geometry = complex;
        state.current_geometry.insert(1, PathElement::Move { x: 0.0, y: 0.0 });

        let path = flush_path(&mut state).unwrap();
        assert_eq!(path.len(), 2);
    }
}
