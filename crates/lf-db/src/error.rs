//! Error types for lf-db

use thiserror::Error;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    /// D001: Failed to open a connection
    #[error("[D001] Failed to connect to database: {message}")]
    Connection { message: String },

    /// D002: A statement failed to execute
    #[error("[D002] Failed to execute statement: {message}")]
    Execution { message: String },

    /// D003: A query failed or returned an unusable shape
    #[error("[D003] Query failed: {message}")]
    Query { message: String },
}

impl From<duckdb::Error> for DbError {
    fn from(e: duckdb::Error) -> Self {
        DbError::Execution {
            message: e.to_string(),
        }
    }
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;
