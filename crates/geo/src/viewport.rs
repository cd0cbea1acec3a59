//! Map camera framing for one or more bounding boxes.

use crate::{BoundingBox, Coordinate};
use serde::{Deserialize, Serialize};

/// Zoom level used for small wards.
pub const DEFAULT_ZOOM: u8 = 12;

/// Largest span (degrees) at which each zoom level still fits, widest last.
const ZOOM_STEPS: [(f64, u8); 5] = [(0.1, 11), (0.25, 10), (0.5, 9), (1.0, 8), (2.0, 7)];

/// Camera centre and zoom that frame a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: Coordinate,
    pub zoom: u8,
}

impl Viewport {
    /// Frame a single box.
    pub fn frame(bbox: &BoundingBox) -> Self {
        Self {
            center: bbox.center(),
            zoom: zoom_for_span(bbox.width().max(bbox.height())),
        }
    }

    /// Frame the union of several boxes, e.g. a ward and its neighbours.
    pub fn frame_all<'a, I>(boxes: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a BoundingBox>,
    {
        boxes
            .into_iter()
            .copied()
            .reduce(|acc, bbox| acc.union(&bbox))
            .map(|union| Self::frame(&union))
    }
}

fn zoom_for_span(span: f64) -> u8 {
    ZOOM_STEPS
        .iter()
        .rev()
        .find(|(threshold, _)| span > *threshold)
        .map_or(DEFAULT_ZOOM, |&(_, zoom)| zoom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> BoundingBox {
        BoundingBox::new(36.8, -1.3, 36.8 + size, -1.3 + size).unwrap()
    }

    #[test]
    fn test_zoom_steps() {
        assert_eq!(Viewport::frame(&square(0.05)).zoom, 12);
        assert_eq!(Viewport::frame(&square(0.2)).zoom, 11);
        assert_eq!(Viewport::frame(&square(0.3)).zoom, 10);
        assert_eq!(Viewport::frame(&square(0.75)).zoom, 9);
        assert_eq!(Viewport::frame(&square(1.5)).zoom, 8);
        assert_eq!(Viewport::frame(&square(5.0)).zoom, 7);
    }

    #[test]
    fn test_frame_uses_larger_side() {
        let wide = BoundingBox::new(0.0, 0.0, 1.5, 0.01).unwrap();
        assert_eq!(Viewport::frame(&wide).zoom, 8);
    }

    #[test]
    fn test_frame_all_centres_on_union() {
        let a = BoundingBox::new(36.0, -1.0, 36.1, -0.9).unwrap();
        let b = BoundingBox::new(36.3, -1.2, 36.4, -1.1).unwrap();

        let viewport = Viewport::frame_all([&a, &b]).unwrap();
        assert!((viewport.center.longitude - 36.2).abs() < 1e-9);
        assert!((viewport.center.latitude + 1.05).abs() < 1e-9);
        assert_eq!(viewport.zoom, 10);

        assert!(Viewport::frame_all(std::iter::empty()).is_none());
    }
}
