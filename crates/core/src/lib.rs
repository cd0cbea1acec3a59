//! Core utilities shared by the ward locator crates
//!
//! - **Error handling**: structured errors with codes, context and recovery suggestions
//! - **Configuration**: TOML-based configuration with defaults and validation
//! - **Validation**: fluent checks for coordinates, limits and SQL identifiers
//!
//! # Example
//!
//! ```rust,no_run
//! use wards_core::config::Config;
//!
//! let config = Config::load(None).expect("valid configuration");
//! println!("ward table: {}", config.schema.query.ward_table);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod validation;

pub use error::{exit_codes, Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema, QueryConfig};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::validation::{validate_coordinate, ValidationResult, Validator};
}
