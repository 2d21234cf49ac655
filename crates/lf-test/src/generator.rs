//! Constraint test SQL generation.
//!
//! Each declared constraint becomes one query with a fixed two-layer
//! shape: an inner query returning one row per violation, wrapped in a
//! pass/fail shell exposing `failures`, `should_warn`, and `should_error`.
//! Both flags carry the same predicate (`count(*) != 0`); severity policy
//! belongs to the runner.

use lf_core::{SchemaTest, TestKind, TestSeverity};

/// Generate the inner query for a unique constraint.
///
/// Returns one row per duplicated non-null value.
pub fn generate_unique_test(table_sql: &str, column: &str) -> String {
    format!(
        "select {column} as unique_field, count(*) as n_records\n\
         from {table_sql}\n\
         where {column} is not null\n\
         group by {column}\n\
         having count(*) > 1",
        column = column,
        table_sql = table_sql
    )
}

/// Generate the inner query for a not_null constraint.
///
/// Returns one row per null value.
pub fn generate_not_null_test(table_sql: &str, column: &str) -> String {
    format!(
        "select {column} as missing_field\n\
         from {table_sql}\n\
         where {column} is null",
        column = column,
        table_sql = table_sql
    )
}

/// Wrap an inner violation query in the pass/fail shell.
pub fn wrap_test_query(inner: &str) -> String {
    format!(
        "select count(*) as failures,\n\
         \x20      count(*) != 0 as should_warn,\n\
         \x20      count(*) != 0 as should_error\n\
         from (\n{inner}\n) validation_errors",
        inner = inner
    )
}

/// A fully generated test query with metadata
#[derive(Debug, Clone)]
pub struct GeneratedTest {
    /// Human-readable test name, e.g. `unique_stg_fund_structures__fund_id`
    pub name: String,

    /// Model (or source table) being tested
    pub model: String,

    /// Column being tested
    pub column: String,

    /// Constraint kind
    pub kind: TestKind,

    /// Severity when violated
    pub severity: TestSeverity,

    /// Executable pass/fail query
    pub sql: String,
}

impl GeneratedTest {
    /// Build a test query from a declared constraint.
    ///
    /// `table_sql` is the dialect-rendered qualified relation the
    /// constraint's object resolves to in the active environment.
    pub fn from_schema_test(test: &SchemaTest, table_sql: &str) -> Self {
        let inner = match test.kind {
            TestKind::Unique => generate_unique_test(table_sql, &test.column),
            TestKind::NotNull => generate_not_null_test(table_sql, &test.column),
        };

        Self {
            name: format!("{}_{}__{}", test.kind, test.model, test.column),
            model: test.model.clone(),
            column: test.column.clone(),
            kind: test.kind,
            severity: test.severity,
            sql: wrap_test_query(&inner),
        }
    }
}

#[cfg(test)]
#[path = "generator_test.rs"]
mod tests;
