//! Target environment bindings.
//!
//! An environment is a named target (e.g. `dev`, `prod`): the database and
//! schema names references resolve against, the SQL dialect to render for,
//! and the connection the dispatcher uses.

use crate::relation::Relation;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Supported SQL dialects.
///
/// The dialect picks the identifier-quoting strategy and the parser used to
/// validate compiled SQL; see `lf-render`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    /// DuckDB: double-quoted identifiers
    #[default]
    Duckdb,
    /// Snowflake: unquoted, warehouse case-normalized identifiers
    Snowflake,
}

/// A named target environment (database/schema bindings + dialect).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Environment {
    /// Environment name (the key under `environments:`; filled in on load)
    #[serde(skip)]
    pub name: String,

    /// Target database (catalog)
    pub database: String,

    /// Default schema for models
    pub schema: String,

    /// Schema raw source tables live in (defaults to `schema`)
    #[serde(default)]
    pub source_schema: Option<String>,

    /// SQL dialect for this target
    #[serde(default)]
    pub dialect: DialectKind,

    /// Connection string for the dispatcher (e.g. a DuckDB path or `:memory:`)
    #[serde(default)]
    pub connection: Option<String>,

    /// Environment-specific template variables (override project vars)
    #[serde(default)]
    pub vars: HashMap<String, serde_yaml::Value>,
}

impl Environment {
    /// Schema used for raw source tables.
    pub fn source_schema(&self) -> &str {
        self.source_schema.as_deref().unwrap_or(&self.schema)
    }

    /// Relation a model materializes to in this environment.
    ///
    /// `schema_override` comes from the model's YAML config and takes
    /// precedence over the environment default.
    pub fn model_relation(&self, name: &str, schema_override: Option<&str>) -> Relation {
        Relation::new(
            &self.database,
            schema_override.unwrap_or(&self.schema),
            name,
        )
    }

    /// Relation a declared raw source table resolves to.
    ///
    /// `declared_schema` comes from the source file and is used only when
    /// the environment does not bind a `source_schema`.
    pub fn source_relation(&self, table: &str, declared_schema: Option<&str>) -> Relation {
        let schema = self
            .source_schema
            .as_deref()
            .or(declared_schema)
            .unwrap_or(&self.schema);
        Relation::new(&self.database, schema, table)
    }
}
