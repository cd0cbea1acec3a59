//! Bounding boxes over typed coordinate trees.
//!
//! Traversal is a recursive descent over [`CoordinateTree`]: a position is a
//! leaf, and any `Vec` of trees is a tree. Rings, polygons and multipolygons
//! are all just deeper `Vec`s, so the fold never looks at the geometry tag.

use crate::{Coordinate, Geometry, Position};
use serde::{Deserialize, Serialize};

/// Anything that can be walked down to its positions.
pub trait CoordinateTree {
    /// Visit every position in order.
    fn for_each_position(&self, visit: &mut dyn FnMut(Position));
}

impl CoordinateTree for Position {
    fn for_each_position(&self, visit: &mut dyn FnMut(Position)) {
        visit(*self);
    }
}

impl<T: CoordinateTree> CoordinateTree for Vec<T> {
    fn for_each_position(&self, visit: &mut dyn FnMut(Position)) {
        for child in self {
            child.for_each_position(visit);
        }
    }
}

impl CoordinateTree for Geometry {
    fn for_each_position(&self, visit: &mut dyn FnMut(Position)) {
        match self {
            Geometry::Polygon(rings) => rings.for_each_position(visit),
            Geometry::MultiPolygon(polygons) => polygons.for_each_position(visit),
        }
    }
}

/// Axis-aligned `(minLng, minLat, maxLng, maxLat)` rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Build a box, rejecting non-finite or inverted bounds.
    pub fn new(min_lng: f64, min_lat: f64, max_lng: f64, max_lat: f64) -> Option<Self> {
        let finite = [min_lng, min_lat, max_lng, max_lat]
            .iter()
            .all(|v| v.is_finite());
        (finite && min_lng <= max_lng && min_lat <= max_lat).then_some(Self {
            min_lng,
            min_lat,
            max_lng,
            max_lat,
        })
    }

    /// Box from a ward's cached `minx`/`miny`/`maxx`/`maxy` columns.
    pub fn from_columns(
        minx: Option<f64>,
        miny: Option<f64>,
        maxx: Option<f64>,
        maxy: Option<f64>,
    ) -> Option<Self> {
        Self::new(minx?, miny?, maxx?, maxy?)
    }

    /// `[minLng, minLat, maxLng, maxLat]`
    pub fn as_array(&self) -> [f64; 4] {
        [self.min_lng, self.min_lat, self.max_lng, self.max_lat]
    }

    /// Inclusive containment test.
    pub fn contains(&self, coord: &Coordinate) -> bool {
        (self.min_lng..=self.max_lng).contains(&coord.longitude)
            && (self.min_lat..=self.max_lat).contains(&coord.latitude)
    }

    /// Midpoint of the box.
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }

    /// Longitude span in degrees.
    pub fn width(&self) -> f64 {
        self.max_lng - self.min_lng
    }

    /// Latitude span in degrees.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Smallest box enclosing both.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min_lng: self.min_lng.min(other.min_lng),
            min_lat: self.min_lat.min(other.min_lat),
            max_lng: self.max_lng.max(other.max_lng),
            max_lat: self.max_lat.max(other.max_lat),
        }
    }
}

/// Bounding box of any coordinate tree.
///
/// Returns `None` when the tree holds no positions or any bound is not finite.
pub fn bounding_box_of<T: CoordinateTree + ?Sized>(tree: &T) -> Option<BoundingBox> {
    let mut bounds = [
        f64::INFINITY,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::NEG_INFINITY,
    ];
    let mut any_nan = false;

    tree.for_each_position(&mut |p| {
        any_nan |= p.lng.is_nan() || p.lat.is_nan();
        bounds[0] = bounds[0].min(p.lng);
        bounds[1] = bounds[1].min(p.lat);
        bounds[2] = bounds[2].max(p.lng);
        bounds[3] = bounds[3].max(p.lat);
    });

    if any_nan {
        return None;
    }
    let [min_lng, min_lat, max_lng, max_lat] = bounds;
    BoundingBox::new(min_lng, min_lat, max_lng, max_lat)
}

/// Bounding box of a ward geometry.
pub fn compute_bounding_box(geometry: &Geometry) -> Option<BoundingBox> {
    bounding_box_of(geometry)
}
