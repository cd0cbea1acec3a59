//! Input and configuration validation
//!
//! Every number or identifier that is substituted into generated SQL goes
//! through a [`Validator`] first.
//!
//! # Example
//!
//! ```
//! use wards_core::validation::Validator;
//!
//! let result = Validator::new()
//!     .latitude("lat", -1.2921)
//!     .longitude("lng", 36.8219)
//!     .sql_identifier("table", "kenya_wards")
//!     .validate();
//!
//! assert!(result.is_valid());
//! ```

use crate::error::{Error, ErrorCode, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Plain (unquoted) SQL identifier: letters, digits and underscores.
static SQL_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("valid identifier regex"));

/// Validation error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field that failed validation
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
    /// Expected value (if applicable)
    pub expected: Option<String>,
    /// Actual value (if applicable)
    pub actual: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Create a new empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get all errors
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Add an error
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Convert to Result type.
    ///
    /// The error code is the most specific one shared by all failures.
    pub fn to_result(self) -> Result<()> {
        if self.is_valid() {
            return Ok(());
        }

        let code = match self.errors.first().map(|e| e.code.as_str()) {
            Some("LATITUDE" | "LONGITUDE") if self.errors.iter().all(is_coordinate_error) => {
                ErrorCode::InvalidCoordinate
            }
            Some("SQL_IDENTIFIER") if self.errors.len() == 1 => ErrorCode::InvalidIdentifier,
            _ => ErrorCode::ValidationError,
        };

        let messages: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        Err(Error::new(
            code,
            format!("Validation failed: {}", messages.join("; ")),
        ))
    }
}

fn is_coordinate_error(error: &ValidationError) -> bool {
    error.code == "LATITUDE" || error.code == "LONGITUDE"
}

/// Fluent validator builder
pub struct Validator {
    result: ValidationResult,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self {
            result: ValidationResult::new(),
        }
    }

    fn fail(
        mut self,
        field: &str,
        code: &str,
        message: String,
        expected: Option<String>,
        actual: Option<String>,
    ) -> Self {
        self.result.add_error(ValidationError {
            field: field.to_string(),
            message,
            code: code.to_string(),
            expected,
            actual,
        });
        self
    }

    /// Validate that a field is not empty
    pub fn required(self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            return self.fail(
                field,
                "REQUIRED",
                "Field is required".to_string(),
                Some("non-empty value".to_string()),
                Some("empty".to_string()),
            );
        }
        self
    }

    /// Validate that a value is in a list of allowed values
    pub fn one_of(self, field: &str, value: &str, allowed: &[&str]) -> Self {
        if !allowed.contains(&value) {
            return self.fail(
                field,
                "ONE_OF",
                format!("Must be one of: {}", allowed.join(", ")),
                Some(allowed.join(", ")),
                Some(value.to_string()),
            );
        }
        self
    }

    /// Validate a numeric range (inclusive)
    pub fn range<T: PartialOrd + std::fmt::Display>(
        self,
        field: &str,
        value: T,
        min: T,
        max: T,
    ) -> Self {
        // Written so that NaN fails the check.
        if !(value >= min && value <= max) {
            return self.fail(
                field,
                "RANGE",
                format!("Must be between {} and {}", min, max),
                Some(format!("{} - {}", min, max)),
                Some(value.to_string()),
            );
        }
        self
    }

    /// Validate that a float is neither NaN nor infinite
    pub fn finite(self, field: &str, value: f64) -> Self {
        if !value.is_finite() {
            return self.fail(
                field,
                "FINITE",
                "Must be a finite number".to_string(),
                Some("finite number".to_string()),
                Some(value.to_string()),
            );
        }
        self
    }

    /// Validate that a float is finite and strictly positive
    pub fn positive(self, field: &str, value: f64) -> Self {
        if !(value.is_finite() && value > 0.0) {
            return self.fail(
                field,
                "POSITIVE",
                "Must be a positive number".to_string(),
                Some("> 0".to_string()),
                Some(value.to_string()),
            );
        }
        self
    }

    /// Validate a WGS84 latitude in degrees
    pub fn latitude(self, field: &str, value: f64) -> Self {
        if !(value.is_finite() && (-90.0..=90.0).contains(&value)) {
            return self.fail(
                field,
                "LATITUDE",
                "Latitude must be within [-90, 90]".to_string(),
                Some("-90 - 90".to_string()),
                Some(value.to_string()),
            );
        }
        self
    }

    /// Validate a WGS84 longitude in degrees
    pub fn longitude(self, field: &str, value: f64) -> Self {
        if !(value.is_finite() && (-180.0..=180.0).contains(&value)) {
            return self.fail(
                field,
                "LONGITUDE",
                "Longitude must be within [-180, 180]".to_string(),
                Some("-180 - 180".to_string()),
                Some(value.to_string()),
            );
        }
        self
    }

    /// Validate a plain SQL identifier (table or column name)
    pub fn sql_identifier(self, field: &str, value: &str) -> Self {
        if !SQL_IDENTIFIER.is_match(value) {
            return self.fail(
                field,
                "SQL_IDENTIFIER",
                "Must be a plain SQL identifier".to_string(),
                Some("[A-Za-z_][A-Za-z0-9_]*".to_string()),
                Some(value.to_string()),
            );
        }
        self
    }

    /// Add a custom validation
    pub fn custom<F>(self, field: &str, f: F) -> Self
    where
        F: FnOnce() -> Option<String>,
    {
        match f() {
            Some(message) => self.fail(field, "CUSTOM", message, None, None),
            None => self,
        }
    }

    /// Complete validation and return result
    pub fn validate(self) -> ValidationResult {
        self.result
    }
}

/// Validate a WGS84 coordinate pair.
pub fn validate_coordinate(lat: f64, lng: f64) -> Result<()> {
    Validator::new()
        .latitude("lat", lat)
        .longitude("lng", lng)
        .validate()
        .to_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_validation() {
        let result = Validator::new().required("ward", "  ").validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "REQUIRED");
    }

    #[test]
    fn test_one_of_validation() {
        let result = Validator::new()
            .one_of("level", "loud", &["info", "debug"])
            .validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "ONE_OF");
    }

    #[test]
    fn test_range_validation() {
        let result = Validator::new().range("limit", 0u32, 1, 100).validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "RANGE");
    }

    #[test]
    fn test_range_rejects_nan() {
        let result = Validator::new().range("radius", f64::NAN, 0.0, 1.0).validate();
        assert!(!result.is_valid());
    }

    #[test]
    fn test_positive_and_finite() {
        assert!(!Validator::new().positive("r", -5.0).validate().is_valid());
        assert!(!Validator::new().positive("r", f64::INFINITY).validate().is_valid());
        assert!(!Validator::new().finite("x", f64::NAN).validate().is_valid());
        assert!(Validator::new().positive("r", 5000.0).validate().is_valid());
    }

    #[test]
    fn test_coordinate_bounds() {
        assert!(validate_coordinate(-1.2921, 36.8219).is_ok());
        assert!(validate_coordinate(90.0, -180.0).is_ok());

        let err = validate_coordinate(-91.0, 36.8).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCoordinate);

        let err = validate_coordinate(0.0, f64::NAN).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCoordinate);
    }

    #[test]
    fn test_sql_identifier() {
        assert!(Validator::new().sql_identifier("t", "kenya_wards").validate().is_valid());
        assert!(Validator::new().sql_identifier("t", "_w2").validate().is_valid());

        for bad in ["", "1wards", "wards;", "kenya wards", "w\"x", "a.b"] {
            let result = Validator::new().sql_identifier("t", bad).validate();
            assert!(!result.is_valid(), "accepted {bad:?}");
        }

        let err = Validator::new()
            .sql_identifier("t", "x y")
            .validate()
            .to_result()
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidIdentifier);
    }

    #[test]
    fn test_chained_validation() {
        let result = Validator::new()
            .required("ward", "Kilimani")
            .latitude("lat", -1.29)
            .longitude("lng", 36.78)
            .range("limit", 10, 1, 100)
            .validate();
        assert!(result.is_valid());
    }

    #[test]
    fn test_custom_validation() {
        let result = Validator::new()
            .custom("bbox", || Some("inverted".to_string()))
            .validate();
        assert_eq!(result.errors()[0].code, "CUSTOM");
        assert_eq!(result.errors()[0].to_string(), "bbox: inverted");
    }
}
