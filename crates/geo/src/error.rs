//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur while decoding or checking geometry.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Payload is not JSON, or its coordinate nesting does not match its type
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Payload has no `type` member
    #[error("Geometry has no type")]
    MissingType,

    /// Geometry type other than Polygon/MultiPolygon
    #[error("Unsupported geometry type: {0}")]
    UnsupportedType(String),

    /// A polygon with no rings, or a multipolygon with no polygons
    #[error("{0} has no coordinates")]
    Empty(&'static str),

    /// A ring shorter than the closed-ring minimum
    #[error("Ring has {0} positions, at least 4 are required")]
    RingTooShort(usize),

    /// A ring whose first and last positions differ
    #[error("Ring is not closed")]
    RingNotClosed,

    /// Invalid WKT format
    #[error("Invalid WKT format: {0}")]
    InvalidWkt(String),

    /// Invalid coordinate values
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),
}

/// Error code for integration with wards-core error handling.
/// Range: 10xxx for geo errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoErrorCode {
    /// JSON parsing error
    JsonParsing = 10001,
    /// Unsupported or missing geometry type
    UnsupportedType = 10002,
    /// Coordinates violate the ring/polygon invariants
    InvalidShape = 10003,
    /// Invalid WKT format
    InvalidWkt = 10004,
    /// Invalid coordinate values
    InvalidCoordinate = 10005,
}

impl GeoError {
    /// Returns the error code for this error.
    pub fn code(&self) -> GeoErrorCode {
        match self {
            GeoError::JsonError(_) => GeoErrorCode::JsonParsing,
            GeoError::MissingType | GeoError::UnsupportedType(_) => GeoErrorCode::UnsupportedType,
            GeoError::Empty(_) | GeoError::RingTooShort(_) | GeoError::RingNotClosed => {
                GeoErrorCode::InvalidShape
            }
            GeoError::InvalidWkt(_) => GeoErrorCode::InvalidWkt,
            GeoError::InvalidCoordinate(_) => GeoErrorCode::InvalidCoordinate,
        }
    }
}
