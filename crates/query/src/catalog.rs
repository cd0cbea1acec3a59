//! The fixed set of spatial queries.
//!
//! Each method validates its inputs, then renders one statement through
//! the builder. Coordinates become `MakePoint(lng, lat, 4326)`, longitude
//! first. Distances use the geodesic form of `ST_Distance` and are in
//! meters.

use crate::{
    escape_like, NewWard, Order, QueryBuilder, QueryError, Result, SelectBuilder, SqlValue,
    WardPatch, WARD_COLUMNS,
};
use wards_core::config::QueryConfig;
use wards_core::validation::{validate_coordinate, Validator};
use wards_geo::SRID_WGS84;

/// Statement factory for the ward and country tables.
#[derive(Debug, Clone)]
pub struct SpatialQueries {
    config: QueryConfig,
    wards: QueryBuilder<NewWard>,
}

impl SpatialQueries {
    /// Create the catalog. Table names must be plain SQL identifiers.
    pub fn new(config: QueryConfig) -> Result<Self> {
        Validator::new()
            .sql_identifier("ward_table", &config.ward_table)
            .sql_identifier("country_table", &config.country_table)
            .validate()
            .to_result()?;

        let wards = QueryBuilder::new(config.ward_table.as_str());
        Ok(Self { config, wards })
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// At most one row when the point lies inside the country boundary.
    pub fn point_in_country(&self, lat: f64, lng: f64) -> Result<String> {
        let point = make_point(lat, lng)?;
        Ok(SelectBuilder::new()
            .columns(["1 AS inside"])
            .from(self.config.country_table.as_str())
            .filter(format!("ST_Contains(geom, {})", point))
            .limit(1)
            .build())
    }

    /// The ward containing the point. The cached bbox columns narrow the
    /// candidates before the exact containment test.
    pub fn ward_by_point(&self, lat: f64, lng: f64) -> Result<String> {
        let point = make_point(lat, lng)?;
        let lat = SqlValue::from(lat);
        let lng = SqlValue::from(lng);

        Ok(self
            .wards
            .select()
            .columns(ward_projection(None))
            .filter(format!(
                "minx <= {lng} AND maxx >= {lng} AND miny <= {lat} AND maxy >= {lat} \
                 AND ST_Contains(geom, {point})"
            ))
            .limit(1)
            .build())
    }

    /// Wards within the configured radius of the point, nearest first.
    pub fn nearest_to_point(&self, lat: f64, lng: f64) -> Result<String> {
        self.nearest_to_point_within(
            lat,
            lng,
            self.config.nearby_radius_m,
            self.config.nearby_limit,
        )
    }

    /// Wards within `radius_m` meters of the point, nearest first, at most
    /// `limit` rows.
    pub fn nearest_to_point_within(
        &self,
        lat: f64,
        lng: f64,
        radius_m: f64,
        limit: u32,
    ) -> Result<String> {
        let point = make_point(lat, lng)?;
        Validator::new()
            .positive("radius_m", radius_m)
            .range("limit", limit, 1, u32::MAX)
            .validate()
            .to_result()?;

        let distance = format!("ST_Distance(geom, {}, 1)", point);
        Ok(self
            .wards
            .select()
            .columns(ward_projection(None))
            .columns([format!("{} AS distance", distance)])
            .filter(format!("{} < {}", distance, SqlValue::from(radius_m)))
            .order_by("distance", Order::Asc)
            .limit(limit)
            .build())
    }

    /// Wards nearest to a reference ward by centroid distance, the
    /// reference itself excluded.
    pub fn nearest_to_ward(&self, ward_id: Option<i64>) -> Result<String> {
        let ward_id = ward_id.ok_or(QueryError::MissingReference)?;

        if let Some(max) = self.config.neighbor_max_distance_m {
            Validator::new()
                .positive("neighbor_max_distance_m", max)
                .validate()
                .to_result()?;
        }

        let distance = "ST_Distance(ST_Centroid(w1.geom), ST_Centroid(w2.geom), 1)";
        let mut condition = format!("w1.id = {}", ward_id);
        if let Some(max) = self.config.neighbor_max_distance_m {
            condition.push_str(&format!(" AND {} < {}", distance, SqlValue::from(max)));
        }

        let table = &self.config.ward_table;
        Ok(SelectBuilder::new()
            .columns(ward_projection(Some("w2")))
            .columns([format!("{} AS distance", distance)])
            .from(format!(
                "{table} w1 JOIN {table} w2 ON w2.id != w1.id"
            ))
            .filter(condition)
            .order_by("distance", Order::Asc)
            .limit(self.config.neighbor_limit)
            .build())
    }

    /// One ward with its outline.
    pub fn ward_by_id(&self, id: i64) -> Result<String> {
        Ok(self
            .wards
            .select()
            .columns(ward_projection(None))
            .filter(format!("id = {}", id))
            .limit(1)
            .build())
    }

    /// Wards whose name, county or constituency contains `term`,
    /// case-insensitively, ordered by ward name.
    pub fn search_wards(&self, term: &str) -> Result<String> {
        let term = term.trim().to_lowercase();

        let mut select = self
            .wards
            .select()
            .columns(WARD_COLUMNS)
            .order_by("ward", Order::Asc)
            .limit(self.config.search_limit);

        if !term.is_empty() {
            let pattern = SqlValue::from(format!("%{}%", escape_like(&term)));
            select = select.filter(
                ["ward", "county", "constituency"]
                    .iter()
                    .map(|column| format!("lower({column}) LIKE {pattern} ESCAPE '\\'"))
                    .collect::<Vec<_>>()
                    .join(" OR "),
            );
        }
        Ok(select.build())
    }

    /// Update one ward. Required columns may not be set to blank text.
    pub fn update_ward(&self, id: i64, patch: &WardPatch) -> Result<String> {
        let mut validator = Validator::new();
        for (field, value) in [
            ("ward", &patch.ward),
            ("county", &patch.county),
            ("constituency", &patch.constituency),
        ] {
            if let Some(value) = value {
                validator = validator.required(field, value);
            }
        }
        validator.validate().to_result()?;

        self.wards
            .update(patch)
            .filter(format!("id = {}", id))
            .build()
    }

    /// Insert one ward row; geometry is written separately.
    pub fn insert_ward(&self, ward: &NewWard) -> Result<String> {
        Validator::new()
            .required("ward", &ward.ward)
            .required("county", &ward.county)
            .required("constituency", &ward.constituency)
            .validate()
            .to_result()?;

        Ok(self.wards.insert(ward).build())
    }
}

fn make_point(lat: f64, lng: f64) -> Result<String> {
    validate_coordinate(lat, lng)?;
    Ok(format!(
        "MakePoint({}, {}, {})",
        SqlValue::from(lng),
        SqlValue::from(lat),
        SRID_WGS84
    ))
}

/// Ward columns plus the outline as GeoJSON, optionally table-qualified.
fn ward_projection(alias: Option<&str>) -> Vec<String> {
    let mut columns: Vec<String> = match alias {
        Some(alias) => WARD_COLUMNS
            .iter()
            .map(|column| format!("{alias}.{column} AS {column}"))
            .collect(),
        None => WARD_COLUMNS.iter().map(|column| column.to_string()).collect(),
    };
    columns.push(match alias {
        Some(alias) => format!("AsGeoJSON({alias}.geom) AS geometry"),
        None => "AsGeoJSON(geom) AS geometry".to_string(),
    });
    columns
}
