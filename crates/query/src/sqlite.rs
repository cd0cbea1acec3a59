//! In-process SQLite executor with Spatialite-style functions.
//!
//! Outlines are stored as GeoJSON text and constructed points as
//! `POINT(lng lat)` text. The registered functions cover exactly what the
//! query catalog emits:
//!
//! | Function | Result |
//! |----------|--------|
//! | `MakePoint(x, y[, srid])` | WKT point, `NULL` if out of range |
//! | `GeomFromGeoJSON(text)` | normalized GeoJSON; errors on bad input |
//! | `AsGeoJSON(geom)` | GeoJSON text, `NULL` if unreadable |
//! | `ST_Contains(area, point)` | `1`/`0`, `NULL` if unreadable |
//! | `ST_Centroid(geom)` | WKT point |
//! | `ST_Distance(a, b[, ellipsoid])` | meters between points or point and area |
//!
//! Distances are always geodesic, whatever the third argument says.

use crate::features::{parse_boundary, parse_ward_features};
use crate::{NewWard, QueryError, QueryExecutor, Result, Row, SpatialQueries};
use rusqlite::functions::{Context, FunctionFlags};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection};
use serde_json::Value;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};
use wards_geo::{
    centroid, compute_bounding_box, contains_point, distance_meters, format_wkt_point,
    haversine_distance_meters, parse_wkt_point, Coordinate, Geometry, SRID_WGS84,
};

/// Counts from a bulk load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

/// A [`QueryExecutor`] over one SQLite connection.
pub struct SqliteExecutor {
    conn: Mutex<Connection>,
}

fn acquire_lock(mutex: &Mutex<Connection>) -> MutexGuard<'_, Connection> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!("SQLite mutex was poisoned, recovering");
            poisoned.into_inner()
        }
    }
}

impl SqliteExecutor {
    /// Open (or create) a database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Opening database");
        Self::with_connection(Connection::open(path)?)
    }

    /// A transient in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        register_spatial_functions(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create the ward and country tables if they do not exist.
    pub fn create_schema(&self, queries: &SpatialQueries) -> Result<()> {
        let wards = &queries.config().ward_table;
        let country = &queries.config().country_table;

        acquire_lock(&self.conn).execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {wards} (
                id INTEGER PRIMARY KEY,
                ward TEXT NOT NULL,
                ward_code TEXT,
                county TEXT NOT NULL,
                county_code INTEGER,
                sub_county TEXT,
                constituency TEXT NOT NULL,
                constituency_code INTEGER,
                minx REAL,
                miny REAL,
                maxx REAL,
                maxy REAL,
                geom TEXT
            );
            CREATE INDEX IF NOT EXISTS {wards}_bbox ON {wards} (minx, maxx, miny, maxy);
            CREATE TABLE IF NOT EXISTS {country} (
                id INTEGER PRIMARY KEY,
                name TEXT,
                geom TEXT NOT NULL
            );"
        ))?;
        Ok(())
    }

    /// Insert one ward with its outline. The cached bbox columns are
    /// computed from the outline.
    pub fn load_ward(
        &self,
        queries: &SpatialQueries,
        ward: NewWard,
        geometry: &Geometry,
    ) -> Result<()> {
        let ward = NewWard {
            bbox: compute_bounding_box(geometry),
            ..ward
        };
        let insert = queries.insert_ward(&ward)?;
        let geojson = geometry.to_geojson_string()?;

        let mut conn = acquire_lock(&self.conn);
        let tx = conn.transaction()?;
        tx.execute(&insert, [])?;
        tx.execute(
            &format!(
                "UPDATE {} SET geom = GeomFromGeoJSON(?1) WHERE id = ?2",
                queries.config().ward_table
            ),
            params![geojson, ward.id],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Insert the national boundary.
    pub fn load_country(
        &self,
        queries: &SpatialQueries,
        name: &str,
        geometry: &Geometry,
    ) -> Result<()> {
        let geojson = geometry.to_geojson_string()?;
        acquire_lock(&self.conn).execute(
            &format!(
                "INSERT INTO {} (name, geom) VALUES (?1, GeomFromGeoJSON(?2))",
                queries.config().country_table
            ),
            params![name, geojson],
        )?;
        Ok(())
    }

    /// Load every ward of a GeoJSON `FeatureCollection`.
    ///
    /// Undecodable features and rows the database rejects are skipped.
    pub fn load_wards_geojson(&self, queries: &SpatialQueries, text: &str) -> Result<LoadReport> {
        let features = parse_ward_features(text)?;
        let mut report = LoadReport {
            loaded: 0,
            skipped: features.skipped,
        };

        for (ward, geometry) in features.wards {
            let id = ward.id;
            match self.load_ward(queries, ward, &geometry) {
                Ok(()) => report.loaded += 1,
                Err(err) => {
                    warn!(ward_id = id, error = %err, "Skipping ward");
                    report.skipped += 1;
                }
            }
        }

        info!(loaded = report.loaded, skipped = report.skipped, "Wards loaded");
        Ok(report)
    }

    /// Load the national boundary from GeoJSON text.
    pub fn load_country_geojson(&self, queries: &SpatialQueries, text: &str) -> Result<()> {
        let (name, geometry) = parse_boundary(text)?;
        self.load_country(queries, &name, &geometry)?;
        info!(name = %name, "Country boundary loaded");
        Ok(())
    }
}

impl QueryExecutor for SqliteExecutor {
    fn query(&self, sql: &str) -> Result<Vec<Row>> {
        let conn = acquire_lock(&self.conn);
        let mut stmt = conn.prepare(sql)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let rows = stmt
            .query_map([], |row| {
                names
                    .iter()
                    .enumerate()
                    .map(|(i, name)| Ok((name.clone(), to_json(row.get_ref(i)?))))
                    .collect::<rusqlite::Result<Row>>()
            })?
            .collect::<rusqlite::Result<Vec<Row>>>()?;
        Ok(rows)
    }

    fn execute(&self, sql: &str) -> Result<usize> {
        Ok(acquire_lock(&self.conn).execute(sql, [])?)
    }
}

fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        // No blob columns in this schema.
        ValueRef::Blob(_) => Value::Null,
    }
}

/// Register the spatial functions on a connection.
pub fn register_spatial_functions(conn: &Connection) -> rusqlite::Result<()> {
    let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;

    for n_arg in [2, 3] {
        conn.create_scalar_function("MakePoint", n_arg, flags, make_point)?;
        conn.create_scalar_function("ST_Distance", n_arg, flags, st_distance)?;
    }
    conn.create_scalar_function("GeomFromGeoJSON", 1, flags, geom_from_geojson)?;
    conn.create_scalar_function("AsGeoJSON", 1, flags, as_geojson)?;
    conn.create_scalar_function("ST_Contains", 2, flags, st_contains)?;
    conn.create_scalar_function("ST_Centroid", 1, flags, st_centroid)?;
    Ok(())
}

/// A geometry argument: a WKT point or a GeoJSON area.
enum Shape {
    Point(Coordinate),
    Area(Geometry),
}

impl Shape {
    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.starts_with('{') {
            Geometry::from_geojson_str(text).ok().map(Shape::Area)
        } else {
            parse_wkt_point(text).ok().map(Shape::Point)
        }
    }
}

fn shape_arg(ctx: &Context<'_>, idx: usize) -> rusqlite::Result<Option<Shape>> {
    let text: Option<String> = ctx.get(idx)?;
    Ok(text.as_deref().and_then(Shape::parse))
}

fn user_error(err: impl std::error::Error + Send + Sync + 'static) -> rusqlite::Error {
    rusqlite::Error::UserFunctionError(Box::new(err))
}

fn make_point(ctx: &Context<'_>) -> rusqlite::Result<Option<String>> {
    let x: f64 = ctx.get(0)?;
    let y: f64 = ctx.get(1)?;
    if ctx.len() > 2 {
        let srid: i64 = ctx.get(2)?;
        if srid != i64::from(SRID_WGS84) {
            return Err(user_error(QueryError::Execution(format!(
                "MakePoint: unsupported SRID {}",
                srid
            ))));
        }
    }

    let coord = Coordinate::new(y, x);
    Ok(coord.is_valid().then(|| format_wkt_point(&coord)))
}

fn geom_from_geojson(ctx: &Context<'_>) -> rusqlite::Result<Option<String>> {
    let Some(text) = ctx.get::<Option<String>>(0)? else {
        return Ok(None);
    };
    let geometry = Geometry::from_geojson_str(&text).map_err(user_error)?;
    geometry.to_geojson_string().map(Some).map_err(user_error)
}

fn as_geojson(ctx: &Context<'_>) -> rusqlite::Result<Option<String>> {
    Ok(match shape_arg(ctx, 0)? {
        Some(Shape::Area(geometry)) => geometry.to_geojson_string().ok(),
        Some(Shape::Point(coord)) => Some(
            serde_json::json!({
                "type": "Point",
                "coordinates": [coord.longitude, coord.latitude],
            })
            .to_string(),
        ),
        None => None,
    })
}

fn st_contains(ctx: &Context<'_>) -> rusqlite::Result<Option<bool>> {
    Ok(match (shape_arg(ctx, 0)?, shape_arg(ctx, 1)?) {
        (Some(Shape::Area(area)), Some(Shape::Point(point))) => {
            Some(contains_point(&area, &point))
        }
        _ => None,
    })
}

fn st_centroid(ctx: &Context<'_>) -> rusqlite::Result<Option<String>> {
    Ok(match shape_arg(ctx, 0)? {
        Some(Shape::Area(area)) => centroid(&area).map(|c| format_wkt_point(&c)),
        Some(Shape::Point(point)) => Some(format_wkt_point(&point)),
        None => None,
    })
}

fn st_distance(ctx: &Context<'_>) -> rusqlite::Result<Option<f64>> {
    let meters = match (shape_arg(ctx, 0)?, shape_arg(ctx, 1)?) {
        (Some(Shape::Point(a)), Some(Shape::Point(b))) => haversine_distance_meters(&a, &b),
        (Some(Shape::Area(area)), Some(Shape::Point(point)))
        | (Some(Shape::Point(point)), Some(Shape::Area(area))) => distance_meters(&area, &point),
        _ => return Ok(None),
    };
    Ok(meters.is_finite().then_some(meters))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar<T: rusqlite::types::FromSql>(executor: &SqliteExecutor, sql: &str) -> T {
        acquire_lock(&executor.conn)
            .query_row(sql, [], |row| row.get(0))
            .unwrap()
    }

    const SQUARE: &str = r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1],[0,0]]]}"#;

    #[test]
    fn test_make_point() {
        let executor = SqliteExecutor::open_in_memory().unwrap();
        let point: String = scalar(&executor, "SELECT MakePoint(36.817, -1.286, 4326)");
        assert_eq!(point, "POINT(36.817 -1.286)");

        let point: Option<String> = scalar(&executor, "SELECT MakePoint(200, 0)");
        assert!(point.is_none());

        let conn = acquire_lock(&executor.conn);
        assert!(conn
            .query_row("SELECT MakePoint(1, 1, 3857)", [], |row| row.get::<_, String>(0))
            .is_err());
    }

    #[test]
    fn test_contains_and_distance() {
        let executor = SqliteExecutor::open_in_memory().unwrap();

        let inside: bool = scalar(
            &executor,
            &format!("SELECT ST_Contains('{SQUARE}', MakePoint(0.5, 0.5, 4326))"),
        );
        assert!(inside);

        let outside: bool = scalar(
            &executor,
            &format!("SELECT ST_Contains('{SQUARE}', MakePoint(2, 0.5, 4326))"),
        );
        assert!(!outside);

        // One degree of longitude east of the square's edge, near the equator
        let meters: f64 = scalar(
            &executor,
            &format!("SELECT ST_Distance('{SQUARE}', MakePoint(2, 0.5, 4326), 1)"),
        );
        assert!((meters - 111_190.0).abs() < 100.0, "{}", meters);

        let zero: f64 = scalar(
            &executor,
            &format!("SELECT ST_Distance(MakePoint(0.5, 0.5, 4326), '{SQUARE}')"),
        );
        assert_eq!(zero, 0.0);
    }

    #[test]
    fn test_unreadable_geometry_is_null() {
        let executor = SqliteExecutor::open_in_memory().unwrap();
        let contains: Option<bool> =
            scalar(&executor, "SELECT ST_Contains('{bad', MakePoint(0, 0, 4326))");
        assert!(contains.is_none());

        let geojson: Option<String> = scalar(&executor, "SELECT AsGeoJSON(NULL)");
        assert!(geojson.is_none());
    }

    #[test]
    fn test_geom_from_geojson_rejects_bad_input() {
        let executor = SqliteExecutor::open_in_memory().unwrap();
        let conn = acquire_lock(&executor.conn);
        let result = conn.query_row(
            r#"SELECT GeomFromGeoJSON('{"type":"Point","coordinates":[0,0]}')"#,
            [],
            |row| row.get::<_, String>(0),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_centroid_round_trips_through_geojson() {
        let executor = SqliteExecutor::open_in_memory().unwrap();
        let centroid: String = scalar(
            &executor,
            &format!("SELECT ST_Centroid(GeomFromGeoJSON('{SQUARE}'))"),
        );
        assert_eq!(centroid, "POINT(0.5 0.5)");

        let point: String = scalar(&executor, "SELECT AsGeoJSON(MakePoint(1.5, 2.5))");
        let point: Value = serde_json::from_str(&point).unwrap();
        assert_eq!(
            point,
            serde_json::json!({"type": "Point", "coordinates": [1.5, 2.5]})
        );
    }

    #[test]
    fn test_query_maps_column_types() {
        let executor = SqliteExecutor::open_in_memory().unwrap();
        let rows = executor
            .query("SELECT 1 AS i, 2.5 AS r, 'x' AS t, NULL AS n")
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["i"], 1);
        assert_eq!(rows[0]["r"], 2.5);
        assert_eq!(rows[0]["t"], "x");
        assert!(rows[0]["n"].is_null());
    }

    #[test]
    fn test_unknown_table_is_an_execution_failure() {
        let executor = SqliteExecutor::open_in_memory().unwrap();
        let err = executor.query("SELECT * FROM missing").unwrap_err();
        assert!(err.is_execution_failure());
    }
}
