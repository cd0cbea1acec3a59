//! GeoJSON Polygon/MultiPolygon codec.
//!
//! Geometry reaches this crate as text produced by the database
//! (`AsGeoJSON(geom)`), so nothing about it is trusted:
//! - the `type` tag must be `Polygon` or `MultiPolygon`
//! - coordinate nesting depth must match the tag (enforced by the typed decode)
//! - every ring must hold at least [`MIN_RING_POSITIONS`] positions and be closed
//!
//! [`Geometry::from_geojson_str`] reports why a payload was rejected;
//! [`parse_geometry`] is the fail-closed entry point used by callers that
//! render geometry, where a bad payload must behave exactly like a missing one.

use crate::{GeoError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Minimum number of positions in a closed ring (a triangle plus closing point).
pub const MIN_RING_POSITIONS: usize = 4;

/// A `[longitude, latitude]` position.
///
/// Extra ordinates (altitude) are accepted on input and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct Position {
    /// Longitude in degrees
    pub lng: f64,
    /// Latitude in degrees
    pub lat: f64,
}

impl Position {
    /// Creates a position from longitude and latitude.
    #[inline]
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

impl TryFrom<Vec<f64>> for Position {
    type Error = String;

    fn try_from(ordinates: Vec<f64>) -> std::result::Result<Self, Self::Error> {
        match ordinates.as_slice() {
            [lng, lat, ..] => Ok(Self::new(*lng, *lat)),
            _ => Err(format!(
                "position needs longitude and latitude, got {} ordinate(s)",
                ordinates.len()
            )),
        }
    }
}

impl From<Position> for [f64; 2] {
    fn from(position: Position) -> Self {
        [position.lng, position.lat]
    }
}

/// An ordered, closed sequence of positions.
pub type Ring = Vec<Position>;

/// A ward geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    /// Outer ring followed by optional holes
    Polygon(Vec<Ring>),
    /// One or more polygons
    MultiPolygon(Vec<Vec<Ring>>),
}

impl Geometry {
    /// Decode and validate a GeoJSON geometry payload.
    ///
    /// # Errors
    /// Returns the first reason the payload is not a usable ward geometry.
    pub fn from_geojson_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Decode and validate an already-parsed JSON value.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value.get("type").and_then(Value::as_str) {
            Some("Polygon" | "MultiPolygon") => {}
            Some(other) => return Err(GeoError::UnsupportedType(other.to_string())),
            None => return Err(GeoError::MissingType),
        }

        let geometry = Geometry::deserialize(value)?;
        geometry.validate()?;
        Ok(geometry)
    }

    /// Serialize back to GeoJSON text.
    pub fn to_geojson_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check the ring and polygon invariants.
    pub fn validate(&self) -> Result<()> {
        match self {
            Geometry::Polygon(rings) => validate_polygon(rings),
            Geometry::MultiPolygon(polygons) => {
                if polygons.is_empty() {
                    return Err(GeoError::Empty("MultiPolygon"));
                }
                polygons.iter().try_for_each(|rings| validate_polygon(rings))
            }
        }
    }

    /// GeoJSON type tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// Iterate the polygons (as ring lists); a Polygon yields itself once.
    pub fn polygons(&self) -> impl Iterator<Item = &[Ring]> + '_ {
        let polygons: Box<dyn Iterator<Item = &[Ring]> + '_> = match self {
            Geometry::Polygon(rings) => Box::new(std::iter::once(rings.as_slice())),
            Geometry::MultiPolygon(polygons) => Box::new(polygons.iter().map(Vec::as_slice)),
        };
        polygons
    }

    /// Total number of positions across all rings.
    pub fn position_count(&self) -> usize {
        self.polygons().flatten().map(Vec::len).sum()
    }
}

fn validate_polygon(rings: &[Ring]) -> Result<()> {
    if rings.is_empty() {
        return Err(GeoError::Empty("Polygon"));
    }
    rings.iter().try_for_each(|ring| validate_ring(ring))
}

fn validate_ring(ring: &[Position]) -> Result<()> {
    if ring.len() < MIN_RING_POSITIONS {
        return Err(GeoError::RingTooShort(ring.len()));
    }
    if ring.first() != ring.last() {
        return Err(GeoError::RingNotClosed);
    }
    Ok(())
}

/// Parse an optional geometry payload, treating malformed input as absent.
///
/// Absent and empty input yield `None` silently. Anything that fails
/// [`Geometry::from_geojson_str`] is logged at warn level and also yields
/// `None`; the error is deliberately not returned so a bad outline never
/// fails the surrounding lookup.
pub fn parse_geometry(text: Option<&str>) -> Option<Geometry> {
    let text = text.map(str::trim).filter(|t| !t.is_empty())?;

    match Geometry::from_geojson_str(text) {
        Ok(geometry) => Some(geometry),
        Err(err) => {
            tracing::warn!(error = %err, code = ?err.code(), "Failed to parse GeoJSON geometry");
            None
        }
    }
}

/// Structural check: Polygon/MultiPolygon with the matching nesting depth and
/// closed rings of at least four positions.
pub fn is_valid_geometry(value: &Value) -> bool {
    Geometry::from_value(value).is_ok()
}
