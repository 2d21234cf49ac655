//! Database backends for Ledgerflow.
//!
//! Execution targets DuckDB; other dialects compile but have no driver
//! here, so connecting to them is an error.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use crate::duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::Database;

use lf_core::{DialectKind, Environment};

/// Open the backend an environment is bound to.
pub fn connect(env: &Environment) -> DbResult<Box<dyn Database>> {
    match env.dialect {
        DialectKind::Duckdb => {
            let path = env.connection.as_deref().unwrap_or(":memory:");
            log::debug!("Connecting to duckdb at '{}'", path);
            Ok(Box::new(DuckDbBackend::new(path)?))
        }
        DialectKind::Snowflake => Err(DbError::Connection {
            message: format!(
                "environment '{}' targets snowflake, which has no execution driver; \
                 compile for it instead",
                env.name
            ),
        }),
    }
}
