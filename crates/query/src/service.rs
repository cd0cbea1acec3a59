//! Request-level ward lookups.
//!
//! Every operation resolves to a [`QueryOutcome`]: exactly one of a
//! result or a human-readable error message. Executor failures are
//! logged and surfaced as messages, never raised.

use crate::{
    QueryExecutor, QueryError, Result, Row, SpatialQueries, Ward, WardPatch,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use wards_core::config::QueryConfig;
use wards_geo::{frame_payloads, BoundingBox, Geometry, Viewport};
use wards_telemetry::QueryTimer;

/// Message when a point falls outside the national boundary.
pub const OUTSIDE_COUNTRY: &str = "Point is outside the country boundary";
/// Message when no ward matches.
pub const WARD_NOT_FOUND: &str = "Ward not found";
/// Message when a nearest-ward lookup returns nothing.
pub const NO_NEARBY_WARDS: &str = "No nearby wards found";
/// Message when an update touched no rows.
pub const NOTHING_UPDATED: &str = "No ward was updated";

/// The result of one lookup: a value or an error message, never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryOutcome<T> {
    result: Option<T>,
    error: Option<String>,
}

impl<T> QueryOutcome<T> {
    pub fn ok(result: T) -> Self {
        Self {
            result: Some(result),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            result: None,
            error: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_some()
    }

    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Convert into a standard `Result`.
    pub fn into_result(self) -> std::result::Result<T, String> {
        match (self.result, self.error) {
            (Some(result), _) => Ok(result),
            (None, error) => Err(error.unwrap_or_default()),
        }
    }
}

impl<T> From<std::result::Result<T, String>> for QueryOutcome<T> {
    fn from(result: std::result::Result<T, String>) -> Self {
        match result {
            Ok(value) => Self::ok(value),
            Err(message) => Self::err(message),
        }
    }
}

/// A ward with its parsed outline, bounds and optional distance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WardFeature {
    #[serde(flatten)]
    pub ward: Ward,
    /// `None` when the stored outline is missing or malformed
    pub geometry: Option<Geometry>,
    /// From the outline, falling back to the cached columns
    pub bbox: Option<BoundingBox>,
    /// Meters, for nearest-ward lookups
    pub distance: Option<f64>,
}

/// Viewport framing every feature that has bounds.
pub fn frame_features<'a, I>(features: I) -> Option<Viewport>
where
    I: IntoIterator<Item = &'a WardFeature>,
{
    Viewport::frame_all(features.into_iter().filter_map(|f| f.bbox.as_ref()))
}

/// Ward lookups over any [`QueryExecutor`].
pub struct WardLocator<E> {
    executor: E,
    queries: SpatialQueries,
}

impl<E: QueryExecutor> WardLocator<E> {
    pub fn new(executor: E, queries: SpatialQueries) -> Self {
        Self { executor, queries }
    }

    /// Build the catalog from configuration.
    pub fn from_config(executor: E, config: QueryConfig) -> Result<Self> {
        Ok(Self::new(executor, SpatialQueries::new(config)?))
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn queries(&self) -> &SpatialQueries {
        &self.queries
    }

    /// `true` when the point is inside the country.
    pub fn is_point_in_country(&self, lat: f64, lng: f64) -> QueryOutcome<bool> {
        let rows = self.run("point_in_country", self.queries.point_in_country(lat, lng));
        rows.and_then(|rows| {
            if rows.is_empty() {
                Err(OUTSIDE_COUNTRY.to_string())
            } else {
                Ok(true)
            }
        })
        .into()
    }

    /// The ward containing the point.
    pub fn ward_at(&self, lat: f64, lng: f64) -> QueryOutcome<WardFeature> {
        self.single("ward_by_point", self.queries.ward_by_point(lat, lng))
    }

    /// Wards near the point, within the configured radius and limit.
    pub fn nearby_wards(&self, lat: f64, lng: f64) -> QueryOutcome<Vec<WardFeature>> {
        self.many("nearest_to_point", self.queries.nearest_to_point(lat, lng))
    }

    /// Wards near the point with an explicit radius and limit.
    pub fn nearby_wards_within(
        &self,
        lat: f64,
        lng: f64,
        radius_m: f64,
        limit: u32,
    ) -> QueryOutcome<Vec<WardFeature>> {
        self.many(
            "nearest_to_point",
            self.queries.nearest_to_point_within(lat, lng, radius_m, limit),
        )
    }

    /// Wards nearest to a reference ward.
    pub fn neighbors_of(&self, ward_id: Option<i64>) -> QueryOutcome<Vec<WardFeature>> {
        self.many("nearest_to_ward", self.queries.nearest_to_ward(ward_id))
    }

    pub fn ward_by_id(&self, id: i64) -> QueryOutcome<WardFeature> {
        self.single("ward_by_id", self.queries.ward_by_id(id))
    }

    /// Name search. An empty match is a successful empty list.
    pub fn search_wards(&self, term: &str) -> QueryOutcome<Vec<Ward>> {
        self.run("search_wards", self.queries.search_wards(term))
            .and_then(|rows| {
                rows.into_iter()
                    .map(decode::<Ward>)
                    .collect::<std::result::Result<Vec<_>, _>>()
            })
            .into()
    }

    /// Apply `patch` to one ward; returns the number of rows changed.
    pub fn update_ward(&self, id: i64, patch: &WardPatch) -> QueryOutcome<usize> {
        let sql = match self.queries.update_ward(id, patch) {
            Ok(sql) => sql,
            Err(err) => return QueryOutcome::err(err.to_string()),
        };

        debug!(query = "update_ward", %sql, "Executing statement");
        let timer = QueryTimer::start("update_ward");
        match self.executor.execute(&sql) {
            Ok(0) => {
                timer.finish(0);
                QueryOutcome::err(NOTHING_UPDATED)
            }
            Ok(changed) => {
                timer.finish(changed);
                QueryOutcome::ok(changed)
            }
            Err(err) => {
                timer.fail();
                warn!(query = "update_ward", error = %err, "Statement failed");
                QueryOutcome::err(err.to_string())
            }
        }
    }

    fn run(
        &self,
        name: &'static str,
        statement: Result<String>,
    ) -> std::result::Result<Vec<Row>, String> {
        let sql = statement.map_err(|err| {
            debug!(query = name, error = %err, "Rejected before execution");
            err.to_string()
        })?;

        debug!(query = name, %sql, "Executing query");
        let timer = QueryTimer::start(name);
        match self.executor.query(&sql) {
            Ok(rows) => {
                timer.finish(rows.len());
                Ok(rows)
            }
            Err(err) => {
                timer.fail();
                warn!(query = name, error = %err, "Query failed");
                Err(err.to_string())
            }
        }
    }

    fn single(&self, name: &'static str, statement: Result<String>) -> QueryOutcome<WardFeature> {
        self.run(name, statement)
            .and_then(decode_features)
            .and_then(|features| {
                features
                    .into_iter()
                    .next()
                    .ok_or_else(|| WARD_NOT_FOUND.to_string())
            })
            .into()
    }

    fn many(
        &self,
        name: &'static str,
        statement: Result<String>,
    ) -> QueryOutcome<Vec<WardFeature>> {
        self.run(name, statement)
            .and_then(decode_features)
            .and_then(|features| {
                if features.is_empty() {
                    Err(NO_NEARBY_WARDS.to_string())
                } else {
                    Ok(features)
                }
            })
            .into()
    }
}

fn decode<T: serde::de::DeserializeOwned>(row: Row) -> std::result::Result<T, String> {
    serde_json::from_value(Value::Object(row)).map_err(|err| QueryError::Decode(err).to_string())
}

/// Decode ward rows and parse their outlines in one batch.
fn decode_features(rows: Vec<Row>) -> std::result::Result<Vec<WardFeature>, String> {
    let payloads: Vec<Option<String>> = rows
        .iter()
        .map(|row| row.get("geometry").and_then(Value::as_str).map(str::to_string))
        .collect();
    let framed = frame_payloads(&payloads);

    rows.into_iter()
        .zip(framed)
        .map(|(row, framed)| {
            let distance = row.get("distance").and_then(Value::as_f64);
            let ward: Ward = decode(row)?;
            let bbox = framed.bbox.or_else(|| ward.cached_bbox());
            Ok(WardFeature {
                ward,
                geometry: framed.geometry,
                bbox,
                distance,
            })
        })
        .collect()
}
