//! Database trait definition

use crate::error::DbResult;
use async_trait::async_trait;
use lf_core::Relation;

/// Database abstraction trait for Ledgerflow
///
/// Implementations must be Send + Sync for async operation. SQL arguments
/// arrive pre-quoted for the target dialect; only `relation_exists` works
/// with raw relation parts.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute SQL that modifies data, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute multiple SQL statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Execute a query returning a single integer value (first column of
    /// the first row)
    async fn query_scalar(&self, sql: &str) -> DbResult<i64>;

    /// Check if a table or view exists
    async fn relation_exists(&self, relation: &Relation) -> DbResult<bool>;

    /// Drop a table or view if it exists; `relation_sql` is dialect-quoted
    async fn drop_if_exists(&self, relation_sql: &str) -> DbResult<()>;

    /// Create a schema if it does not exist; `schema_sql` is dialect-quoted
    async fn create_schema_if_not_exists(&self, schema_sql: &str) -> DbResult<()>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
