//! Configuration schema definitions
//!
//! Every section and field has a default so a partial (or missing) file
//! still yields a usable configuration.

use crate::error::Result;
use crate::validation::Validator;
use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub query: QueryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigSchema {
    /// Check the values that end up inside generated SQL or drive limits.
    pub fn validate(&self) -> Result<()> {
        Validator::new()
            .sql_identifier("query.ward_table", &self.query.ward_table)
            .sql_identifier("query.country_table", &self.query.country_table)
            .positive("query.nearby_radius_m", self.query.nearby_radius_m)
            .range("query.nearby_limit", self.query.nearby_limit, 1, 1000)
            .range("query.neighbor_limit", self.query.neighbor_limit, 1, 1000)
            .range("query.search_limit", self.query.search_limit, 1, 10_000)
            .custom("query.neighbor_max_distance_m", || {
                self.query
                    .neighbor_max_distance_m
                    .filter(|d| !d.is_finite() || *d <= 0.0)
                    .map(|d| format!("Must be a positive distance, got {}", d))
            })
            .one_of(
                "logging.level",
                &self.logging.level,
                &["trace", "debug", "info", "warn", "error"],
            )
            .validate()
            .to_result()
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeneralConfig {
    /// Path of the ward database used by `wards query`
    #[serde(default)]
    pub database_path: Option<String>,
}

/// Spatial query catalog settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Table holding ward polygons
    #[serde(default = "default_ward_table")]
    pub ward_table: String,

    /// Table holding the national boundary
    #[serde(default = "default_country_table")]
    pub country_table: String,

    /// Radius (meters) for nearest-ward lookups around a coordinate
    #[serde(default = "default_nearby_radius_m")]
    pub nearby_radius_m: f64,

    /// Row cap for nearest-ward lookups around a coordinate
    #[serde(default = "default_limit")]
    pub nearby_limit: u32,

    /// Row cap for neighbours of a reference ward
    #[serde(default = "default_limit")]
    pub neighbor_limit: u32,

    /// Optional centroid distance cap (meters) for neighbours
    #[serde(default)]
    pub neighbor_max_distance_m: Option<f64>,

    /// Row cap for name searches
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            ward_table: default_ward_table(),
            country_table: default_country_table(),
            nearby_radius_m: default_nearby_radius_m(),
            nearby_limit: default_limit(),
            neighbor_limit: default_limit(),
            neighbor_max_distance_m: None,
            search_limit: default_search_limit(),
        }
    }
}

fn default_ward_table() -> String {
    "kenya_wards".to_string()
}

fn default_country_table() -> String {
    "country".to_string()
}

fn default_nearby_radius_m() -> f64 {
    5000.0
}

fn default_limit() -> u32 {
    10
}

fn default_search_limit() -> u32 {
    50
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of compact text
    #[serde(default)]
    pub json: bool,

    /// Include the event target in each line
    #[serde(default)]
    pub show_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            show_target: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
