//! WKT `POINT(lng lat)` text.
//!
//! Points constructed by `MakePoint` travel as WKT text inside the
//! in-process SQL executor, longitude first.

use crate::{Coordinate, GeoError, Result};

/// Format a coordinate as `POINT(lng lat)`.
pub fn format_wkt_point(coord: &Coordinate) -> String {
    format!("POINT({} {})", coord.longitude, coord.latitude)
}

/// Parse a WKT POINT string.
///
/// Accepts `POINT(lng lat)` and `POINT (lng lat)`, case-insensitively.
pub fn parse_wkt_point(wkt: &str) -> Result<Coordinate> {
    let wkt = wkt.trim();

    let body = wkt
        .get(..5)
        .filter(|prefix| prefix.eq_ignore_ascii_case("POINT"))
        .map(|_| wkt[5..].trim_start())
        .ok_or_else(|| GeoError::InvalidWkt(format!("Expected POINT, got: {}", wkt)))?;

    let inner = body
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| GeoError::InvalidWkt(format!("Unbalanced parentheses: {}", wkt)))?;

    let parts: Vec<&str> = inner.split_whitespace().collect();
    let [lng, lat] = parts.as_slice() else {
        return Err(GeoError::InvalidWkt(format!(
            "Expected 2 coordinates, got {}",
            parts.len()
        )));
    };

    let lng: f64 = lng
        .parse()
        .map_err(|_| GeoError::InvalidWkt(format!("Invalid longitude: {}", lng)))?;
    let lat: f64 = lat
        .parse()
        .map_err(|_| GeoError::InvalidWkt(format!("Invalid latitude: {}", lat)))?;

    let coord = Coordinate::new(lat, lng);
    if !coord.is_valid() {
        return Err(GeoError::InvalidCoordinate(wkt.to_string()));
    }
    Ok(coord)
}
