//! Geometry utilities for ward boundaries.
//!
//! This crate provides:
//! - A fail-closed GeoJSON Polygon/MultiPolygon codec
//! - Bounding boxes and map viewport framing
//! - `POINT(lng lat)` WKT text for constructed points
//! - Containment, centroid and distance predicates
//! - Batch parsing with optional parallelism
//!
//! # Example
//!
//! ```
//! use wards_geo::{compute_bounding_box, parse_geometry};
//!
//! let payload = r#"{"type":"Polygon","coordinates":[[[36.8,-1.3],[36.9,-1.3],[36.9,-1.2],[36.8,-1.3]]]}"#;
//! let geometry = parse_geometry(Some(payload)).unwrap();
//!
//! let bbox = compute_bounding_box(&geometry).unwrap();
//! assert_eq!(bbox.as_array(), [36.8, -1.3, 36.9, -1.2]);
//!
//! // Malformed payloads are treated as missing geometry.
//! assert!(parse_geometry(Some("{not json")).is_none());
//! ```

mod bbox;
pub mod batch;
mod error;
mod geometry;
mod spatial;
mod viewport;
mod wkt;

pub use bbox::{bounding_box_of, compute_bounding_box, BoundingBox, CoordinateTree};
pub use batch::{frame_payloads, FramedGeometry};
pub use error::{GeoError, GeoErrorCode, Result};
pub use geometry::{is_valid_geometry, parse_geometry, Geometry, Position, Ring, MIN_RING_POSITIONS};
pub use spatial::{
    centroid, contains_point, distance_meters, haversine_distance_meters, EARTH_RADIUS_M,
};
pub use viewport::{Viewport, DEFAULT_ZOOM};
pub use wkt::{format_wkt_point, parse_wkt_point};

/// Spatial reference identifier attached to every constructed point (WGS84).
pub const SRID_WGS84: i32 = 4326;

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    ///
    /// # Arguments
    /// * `latitude` - Latitude in degrees (-90 to 90)
    /// * `longitude` - Longitude in degrees (-180 to 180)
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns true if the coordinate has finite, in-range values.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<Position> for Coordinate {
    fn from(position: Position) -> Self {
        Self::new(position.lat, position.lng)
    }
}

impl From<Coordinate> for Position {
    fn from(coord: Coordinate) -> Self {
        Position::new(coord.longitude, coord.latitude)
    }
}
