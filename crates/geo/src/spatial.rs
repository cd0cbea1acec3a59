//! Spatial predicates and distances over ward geometry.
//!
//! Containment, centroid and closest-point work in planar degrees via the
//! `geo` crate; distances are then measured on the sphere with the
//! Haversine formula, which is accurate enough at country scale.

use crate::{Coordinate, Geometry, Ring};
use geo::{Centroid, Closest, ClosestPoint, Contains};

/// Earth's mean radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates in meters.
///
/// # Example
/// ```
/// use wards_geo::{haversine_distance_meters, Coordinate};
///
/// let nairobi = Coordinate::new(-1.2921, 36.8219);
/// let mombasa = Coordinate::new(-4.0435, 39.6682);
///
/// let km = haversine_distance_meters(&nairobi, &mombasa) / 1000.0;
/// assert!((km - 440.0).abs() < 10.0);
/// ```
#[inline]
pub fn haversine_distance_meters(from: &Coordinate, to: &Coordinate) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    EARTH_RADIUS_M * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

fn to_geo_polygon(rings: &[Ring]) -> geo::Polygon<f64> {
    let mut line_strings = rings.iter().map(|ring| {
        ring.iter()
            .map(|p| geo::coord! { x: p.lng, y: p.lat })
            .collect::<geo::LineString<f64>>()
    });
    let exterior = line_strings
        .next()
        .unwrap_or_else(|| geo::LineString::new(Vec::new()));
    geo::Polygon::new(exterior, line_strings.collect())
}

fn to_geo(geometry: &Geometry) -> geo::MultiPolygon<f64> {
    geometry.polygons().map(to_geo_polygon).collect()
}

fn to_geo_point(coord: &Coordinate) -> geo::Point<f64> {
    geo::Point::new(coord.longitude, coord.latitude)
}

/// Whether `coord` lies strictly inside `geometry` (boundary excluded).
pub fn contains_point(geometry: &Geometry, coord: &Coordinate) -> bool {
    to_geo(geometry).contains(&to_geo_point(coord))
}

/// Area-weighted centroid of the geometry.
pub fn centroid(geometry: &Geometry) -> Option<Coordinate> {
    to_geo(geometry)
        .centroid()
        .map(|point| Coordinate::new(point.y(), point.x()))
}

/// Distance in meters from `coord` to the geometry: zero inside, otherwise
/// the great-circle distance to the closest boundary point.
pub fn distance_meters(geometry: &Geometry, coord: &Coordinate) -> f64 {
    let shape = to_geo(geometry);
    let point = to_geo_point(coord);

    if shape.contains(&point) {
        return 0.0;
    }

    match shape.closest_point(&point) {
        Closest::Intersection(closest) | Closest::SinglePoint(closest) => {
            haversine_distance_meters(coord, &Coordinate::new(closest.y(), closest.x()))
        }
        Closest::Indeterminate => f64::INFINITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    fn square(lng: f64, lat: f64, size: f64) -> Ring {
        vec![
            Position::new(lng, lat),
            Position::new(lng + size, lat),
            Position::new(lng + size, lat + size),
            Position::new(lng, lat + size),
            Position::new(lng, lat),
        ]
    }

    #[test]
    fn test_same_point_zero_distance() {
        let nairobi = Coordinate::new(-1.2921, 36.8219);
        assert!(haversine_distance_meters(&nairobi, &nairobi).abs() < 1e-6);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let a = Coordinate::new(0.0, 36.0);
        let b = Coordinate::new(1.0, 36.0);
        let meters = haversine_distance_meters(&a, &b);
        assert!((meters - 111_195.0).abs() < 10.0, "{}", meters);
    }

    #[test]
    fn test_contains_point() {
        let geometry = Geometry::Polygon(vec![square(36.8, -1.3, 0.1)]);
        assert!(contains_point(&geometry, &Coordinate::new(-1.25, 36.85)));
        assert!(!contains_point(&geometry, &Coordinate::new(-1.25, 37.0)));
    }

    #[test]
    fn test_contains_respects_holes() {
        let geometry = Geometry::Polygon(vec![square(0.0, 0.0, 10.0), square(4.0, 4.0, 2.0)]);
        assert!(contains_point(&geometry, &Coordinate::new(1.0, 1.0)));
        assert!(!contains_point(&geometry, &Coordinate::new(5.0, 5.0)));
    }

    #[test]
    fn test_contains_in_any_part_of_multipolygon() {
        let geometry = Geometry::MultiPolygon(vec![
            vec![square(0.0, 0.0, 1.0)],
            vec![square(5.0, 5.0, 1.0)],
        ]);
        assert!(contains_point(&geometry, &Coordinate::new(5.5, 5.5)));
        assert!(!contains_point(&geometry, &Coordinate::new(3.0, 3.0)));
    }

    #[test]
    fn test_centroid_of_square() {
        let geometry = Geometry::Polygon(vec![square(36.0, -2.0, 1.0)]);
        let c = centroid(&geometry).unwrap();
        assert!((c.longitude - 36.5).abs() < 1e-9);
        assert!((c.latitude + 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_distance_inside_is_zero() {
        let geometry = Geometry::Polygon(vec![square(36.8, -1.3, 0.1)]);
        assert_eq!(distance_meters(&geometry, &Coordinate::new(-1.25, 36.85)), 0.0);
    }

    #[test]
    fn test_distance_to_edge() {
        // Point one degree of longitude east of the square's east edge, on the equator
        let geometry = Geometry::Polygon(vec![square(35.0, -0.5, 1.0)]);
        let meters = distance_meters(&geometry, &Coordinate::new(0.0, 37.0));
        assert!((meters - 111_195.0).abs() < 50.0, "{}", meters);
    }
}
