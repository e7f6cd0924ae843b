/// Alignment pattern detection
/// Alignment patterns appear in QR codes version 2 and above. They are found by
/// their nesting: a dark centre enclosed by one light ring, itself enclosed by a dark ring.
use log::trace;

use crate::detector::connected_components::{Component, ComponentMap};
use crate::error::{PatternKind, Result, ScanError};
use crate::models::{BinaryImage, Point, Rect};

/// Finds the alignment pattern by its component nesting
#[derive(Debug, Clone, Copy, Default)]
pub struct AlignmentPatternLocator;

impl AlignmentPatternLocator {
    /// Centroid of the alignment pattern inside `window`, preferring the match
    /// nearest the window centre
    pub fn locate(&self, image: &BinaryImage, window: Rect) -> Result<Point> {
        let map = ComponentMap::label(image, window);
        let components = map.components();
        let expected = window.center();

        let best = components
            .iter()
            .filter(|component| is_alignment_core(component, components))
            .map(Component::centroid)
            .min_by(|a, b| a.distance(&expected).total_cmp(&b.distance(&expected)));

        trace!(
            "alignment window {window:?}: {} components, best {best:?}",
            components.len()
        );
        best.ok_or(ScanError::PatternNotFound {
            pattern: PatternKind::Alignment,
            found: 0,
        })
    }
}

/// Dark interior component with a single light neighbour, where that neighbour is an
/// interior ring touching exactly two components (the core and the outer ring)
fn is_alignment_core(component: &Component, components: &[Component]) -> bool {
    if !component.dark || component.touches_border || component.neighbors.len() != 1 {
        return false;
    }
    component
        .neighbors
        .first()
        .and_then(|&id| components.get(id))
        .is_some_and(|ring| !ring.touches_border && ring.neighbors.len() == 2)
}
