//! Error types for pgmulti

use thiserror::Error;

/// Result type alias for pgmulti operations
pub type BatchResult<T> = Result<T, BatchError>;

/// Error types for building and executing a multi-row insert
#[derive(Debug, Error)]
pub enum BatchError {
    /// Invalid table name, field list, or returning column
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A row did not carry one value per configured field
    #[error("field count mismatch, got {got}, expected {expected}")]
    FieldCountMismatch { got: usize, expected: usize },

    /// Execution was requested with no rows added
    #[error("no rows to insert")]
    EmptyBatch,

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Unique constraint violation
    #[error("Unique constraint violation: {message}")]
    UniqueViolation {
        message: String,
        #[source]
        source: tokio_postgres::Error,
    },

    /// Foreign key constraint violation
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation {
        message: String,
        #[source]
        source: tokio_postgres::Error,
    },

    /// Check constraint violation
    #[error("Check constraint violation: {message}")]
    CheckViolation {
        message: String,
        #[source]
        source: tokio_postgres::Error,
    },

    /// Execution failure reported by a non-Postgres client
    #[error("Execution error: {0}")]
    Execution(String),

    /// A returned row could not be read as an identifier
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Releasing the result cursor failed
    #[error("Release error: {0}")]
    Release(String),
}

impl BatchError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create an execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    /// Create a release error
    pub fn release(message: impl Into<String>) -> Self {
        Self::Release(message.into())
    }

    /// Check if this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Check if this is a field count mismatch
    pub fn is_field_count_mismatch(&self) -> bool {
        matches!(self, Self::FieldCountMismatch { .. })
    }

    /// Check if this is a unique violation error
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation { .. })
    }

    /// The server-side error behind this error, if the database reported one.
    pub fn db_error(&self) -> Option<&tokio_postgres::error::DbError> {
        match self {
            Self::Query(source)
            | Self::UniqueViolation { source, .. }
            | Self::ForeignKeyViolation { source, .. }
            | Self::CheckViolation { source, .. } => source.as_db_error(),
            _ => None,
        }
    }

    /// Parse a tokio_postgres error into a more specific BatchError.
    ///
    /// The original error stays reachable through [`std::error::Error::source`] and
    /// [`BatchError::db_error`].
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        let Some(db_err) = err.as_db_error() else {
            return Self::Query(err);
        };
        let message = format!(
            "{}: {}",
            db_err.constraint().unwrap_or("unknown"),
            db_err.message()
        );
        let code = db_err.code().clone();

        match code.code() {
            "23505" => Self::UniqueViolation {
                message,
                source: err,
            },
            "23503" => Self::ForeignKeyViolation {
                message,
                source: err,
            },
            "23514" => Self::CheckViolation {
                message,
                source: err,
            },
            _ => Self::Query(err),
        }
    }
}
