//! Ward records and the schema traits the builder is generic over.

use crate::SqlValue;
use serde::{Deserialize, Serialize};
use wards_geo::BoundingBox;

/// A full column-to-value mapping for one row of a table.
pub trait TableSchema {
    /// Partial mapping used by updates.
    type Patch: PartialSchema;

    /// Every column with its value, in table order.
    fn columns(&self) -> Vec<(&'static str, SqlValue)>;
}

/// A partial mapping where unset columns are skipped.
///
/// Columns set to an explicit null are still emitted, as `NULL`.
pub trait PartialSchema {
    /// Columns that are set, in table order.
    fn assignments(&self) -> Vec<(&'static str, SqlValue)>;
}

/// Columns read back for a ward, geometry excluded.
pub const WARD_COLUMNS: [&str; 12] = [
    "id",
    "ward",
    "ward_code",
    "county",
    "county_code",
    "sub_county",
    "constituency",
    "constituency_code",
    "minx",
    "miny",
    "maxx",
    "maxy",
];

/// A ward row as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ward {
    pub id: i64,
    pub ward: String,
    #[serde(default)]
    pub ward_code: Option<String>,
    pub county: String,
    #[serde(default)]
    pub county_code: Option<i64>,
    #[serde(default)]
    pub sub_county: Option<String>,
    pub constituency: String,
    #[serde(default)]
    pub constituency_code: Option<i64>,
    #[serde(default)]
    pub minx: Option<f64>,
    #[serde(default)]
    pub miny: Option<f64>,
    #[serde(default)]
    pub maxx: Option<f64>,
    #[serde(default)]
    pub maxy: Option<f64>,
}

impl Ward {
    /// Bounding box from the cached columns, if all four are present.
    pub fn cached_bbox(&self) -> Option<BoundingBox> {
        BoundingBox::from_columns(self.minx, self.miny, self.maxx, self.maxy)
    }
}

/// A ward to insert. Geometry travels separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWard {
    pub id: i64,
    pub ward: String,
    #[serde(default)]
    pub ward_code: Option<String>,
    pub county: String,
    #[serde(default)]
    pub county_code: Option<i64>,
    #[serde(default)]
    pub sub_county: Option<String>,
    pub constituency: String,
    #[serde(default)]
    pub constituency_code: Option<i64>,
    #[serde(skip)]
    pub bbox: Option<BoundingBox>,
}

impl TableSchema for NewWard {
    type Patch = WardPatch;

    fn columns(&self) -> Vec<(&'static str, SqlValue)> {
        let [minx, miny, maxx, maxy] = match &self.bbox {
            Some(bbox) => bbox.as_array().map(SqlValue::Real),
            None => [SqlValue::Null, SqlValue::Null, SqlValue::Null, SqlValue::Null],
        };

        vec![
            ("id", self.id.into()),
            ("ward", self.ward.as_str().into()),
            ("ward_code", self.ward_code.as_deref().into()),
            ("county", self.county.as_str().into()),
            ("county_code", self.county_code.into()),
            ("sub_county", self.sub_county.as_deref().into()),
            ("constituency", self.constituency.as_str().into()),
            ("constituency_code", self.constituency_code.into()),
            ("minx", minx),
            ("miny", miny),
            ("maxx", maxx),
            ("maxy", maxy),
        ]
    }
}

/// Changes to an existing ward.
///
/// The outer `Option` is "leave as is"; for nullable columns the inner
/// `Option` distinguishes a new value from an explicit null. Required
/// columns cannot be nulled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WardPatch {
    pub ward: Option<String>,
    pub ward_code: Option<Option<String>>,
    pub county: Option<String>,
    pub county_code: Option<Option<i64>>,
    pub sub_county: Option<Option<String>>,
    pub constituency: Option<String>,
    pub constituency_code: Option<Option<i64>>,
}

impl WardPatch {
    /// Whether the patch sets nothing.
    pub fn is_empty(&self) -> bool {
        self.assignments().is_empty()
    }
}

impl PartialSchema for WardPatch {
    fn assignments(&self) -> Vec<(&'static str, SqlValue)> {
        let mut set = Vec::new();
        if let Some(ward) = &self.ward {
            set.push(("ward", ward.as_str().into()));
        }
        if let Some(code) = &self.ward_code {
            set.push(("ward_code", code.as_deref().into()));
        }
        if let Some(county) = &self.county {
            set.push(("county", county.as_str().into()));
        }
        if let Some(code) = self.county_code {
            set.push(("county_code", code.into()));
        }
        if let Some(sub_county) = &self.sub_county {
            set.push(("sub_county", sub_county.as_deref().into()));
        }
        if let Some(constituency) = &self.constituency {
            set.push(("constituency", constituency.as_str().into()));
        }
        if let Some(code) = self.constituency_code {
            set.push(("constituency_code", code.into()));
        }
        set
    }
}
