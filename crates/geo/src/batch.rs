//! Batch geometry parsing with optional parallelism.
//!
//! Nearest-ward queries return up to a few dozen rows, each carrying its
//! outline as GeoJSON text; this parses and bounds them in one pass.

use crate::{compute_bounding_box, parse_geometry, BoundingBox, Geometry};
use serde::Serialize;

/// A parsed geometry payload with its bounding box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FramedGeometry {
    /// `None` when the payload was absent or malformed
    pub geometry: Option<Geometry>,
    /// `None` when there is no geometry or it has no finite bounds
    pub bbox: Option<BoundingBox>,
}

impl FramedGeometry {
    /// Parse and bound a single payload.
    pub fn from_payload(payload: Option<&str>) -> Self {
        let geometry = parse_geometry(payload);
        let bbox = geometry.as_ref().and_then(compute_bounding_box);
        Self { geometry, bbox }
    }
}

/// Parse and bound many payloads, preserving input order.
///
/// # Example
/// ```
/// use wards_geo::frame_payloads;
///
/// let payloads = vec![
///     Some(r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}"#.to_string()),
///     Some("garbage".to_string()),
///     None,
/// ];
///
/// let framed = frame_payloads(&payloads);
/// assert!(framed[0].bbox.is_some());
/// assert!(framed[1].geometry.is_none());
/// assert!(framed[2].geometry.is_none());
/// ```
pub fn frame_payloads(payloads: &[Option<String>]) -> Vec<FramedGeometry> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        payloads
            .par_iter()
            .map(|payload| FramedGeometry::from_payload(payload.as_deref()))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        payloads
            .iter()
            .map(|payload| FramedGeometry::from_payload(payload.as_deref()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_payload(lng: f64, lat: f64) -> Option<String> {
        Some(format!(
            r#"{{"type":"Polygon","coordinates":[[[{lng},{lat}],[{x},{lat}],[{x},{y}],[{lng},{y}],[{lng},{lat}]]]}}"#,
            x = lng + 0.1,
            y = lat + 0.1,
        ))
    }

    #[test]
    fn test_frame_preserves_order() {
        let payloads = vec![
            square_payload(36.0, -1.0),
            None,
            Some("{\"type\":\"Point\",\"coordinates\":[1,2]}".to_string()),
            square_payload(37.0, -2.0),
        ];

        let framed = frame_payloads(&payloads);
        assert_eq!(framed.len(), 4);
        assert_eq!(framed[0].bbox.unwrap().min_lng, 36.0);
        assert!(framed[1].bbox.is_none());
        assert!(framed[2].geometry.is_none());
        assert_eq!(framed[3].bbox.unwrap().min_lng, 37.0);
    }
}
