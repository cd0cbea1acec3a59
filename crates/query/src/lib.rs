//! Spatial ward queries: statement building, the query catalog and
//! request-level lookups.
//!
//! Statements are rendered as text by [`SpatialQueries`] and run by a
//! [`QueryExecutor`]. With the `sqlite` feature (on by default),
//! [`SqliteExecutor`] runs them in-process against SQLite with the
//! spatial functions the catalog needs.
//!
//! # Example
//!
//! ```
//! use wards_core::config::QueryConfig;
//! use wards_query::SpatialQueries;
//!
//! let queries = SpatialQueries::new(QueryConfig::default()).unwrap();
//! let sql = queries.point_in_country(-1.286, 36.817).unwrap();
//! assert!(sql.contains("MakePoint(36.817, -1.286, 4326)"));
//!
//! // Out-of-range coordinates never become SQL.
//! assert!(queries.ward_by_point(-91.0, 36.817).is_err());
//! ```

mod builder;
mod catalog;
mod error;
mod executor;
pub mod features;
mod schema;
mod service;
#[cfg(feature = "sqlite")]
mod sqlite;
mod value;

pub use builder::{FilteredUpdate, InsertBuilder, Order, QueryBuilder, SelectBuilder, UpdateBuilder};
pub use catalog::SpatialQueries;
pub use error::{QueryError, QueryErrorCode, Result};
pub use executor::{QueryExecutor, Row};
pub use schema::{NewWard, PartialSchema, TableSchema, Ward, WardPatch, WARD_COLUMNS};
pub use service::{
    frame_features, QueryOutcome, WardFeature, WardLocator, NOTHING_UPDATED, NO_NEARBY_WARDS,
    OUTSIDE_COUNTRY, WARD_NOT_FOUND,
};
#[cfg(feature = "sqlite")]
pub use sqlite::{register_spatial_functions, LoadReport, SqliteExecutor};
pub use value::{escape_like, SqlValue};
