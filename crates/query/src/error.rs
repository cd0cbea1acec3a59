//! Error types for the query crate.

use thiserror::Error;

/// Result type alias for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;

/// Errors raised while building or executing statements.
#[derive(Debug, Error)]
pub enum QueryError {
    /// An input failed validation before reaching statement text
    #[error("{0}")]
    InvalidInput(#[from] wards_core::Error),

    /// An update whose patch sets no columns
    #[error("Update has no columns to set")]
    EmptyUpdate,

    /// A reference-ward query without a reference ward
    #[error("A reference ward id is required")]
    MissingReference,

    /// Geometry that could not be parsed or written
    #[error("Invalid geometry: {0}")]
    Geometry(#[from] wards_geo::GeoError),

    /// The executor reported a failure
    #[error("Execution failed: {0}")]
    Execution(String),

    /// A returned row did not match the expected shape
    #[error("Failed to decode row: {0}")]
    Decode(#[from] serde_json::Error),

    /// Error from the embedded SQLite executor
    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Error code for integration with wards-core error handling.
/// Range: 11xxx for query errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorCode {
    /// Rejected input
    InvalidInput = 11001,
    /// Statement could not be built
    InvalidStatement = 11002,
    /// Executor failure
    Execution = 11003,
    /// Row shape mismatch
    Decode = 11004,
}

impl QueryError {
    /// Returns the error code for this error.
    pub fn code(&self) -> QueryErrorCode {
        match self {
            QueryError::InvalidInput(_) | QueryError::Geometry(_) => QueryErrorCode::InvalidInput,
            QueryError::EmptyUpdate | QueryError::MissingReference => {
                QueryErrorCode::InvalidStatement
            }
            QueryError::Execution(_) => QueryErrorCode::Execution,
            #[cfg(feature = "sqlite")]
            QueryError::Sqlite(_) => QueryErrorCode::Execution,
            QueryError::Decode(_) => QueryErrorCode::Decode,
        }
    }

    /// Whether the failure came from executing a statement.
    pub fn is_execution_failure(&self) -> bool {
        self.code() == QueryErrorCode::Execution
    }
}
