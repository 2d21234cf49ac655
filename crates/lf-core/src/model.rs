//! Model representation and declared column constraints

use crate::error::CoreError;
use crate::model_name::ModelName;
use crate::reference::{extract_references, Reference};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Represents a SQL model in the project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    /// Model name (derived from filename without extension)
    pub name: ModelName,

    /// Path to the source SQL file
    pub path: PathBuf,

    /// Raw SQL content (before reference resolution)
    pub raw_sql: String,

    /// Schema metadata from the sibling .yml file, if present
    #[serde(default)]
    pub schema: Option<ModelSchema>,
}

impl Model {
    /// References this model's body makes to other models or raw sources.
    ///
    /// Extracted from `{{ ref(...) }}` / `{{ source(...) }}` markers; the
    /// result is sorted for deterministic downstream iteration.
    pub fn references(&self) -> BTreeSet<Reference> {
        extract_references(&self.raw_sql)
    }

    /// Names of the models this model depends on (`ref` markers only).
    pub fn model_dependencies(&self) -> BTreeSet<String> {
        self.references()
            .into_iter()
            .filter_map(|r| match r {
                Reference::Model(name) => Some(name),
                Reference::Source(_) => None,
            })
            .collect()
    }

    /// Target schema override from the model's YAML config, if any.
    pub fn schema_override(&self) -> Option<&str> {
        self.schema
            .as_ref()
            .and_then(|s| s.config.as_ref())
            .and_then(|c| c.schema.as_deref())
    }

    /// Materialization override from the model's YAML config, if any.
    pub fn materialization_override(&self) -> Option<Materialization> {
        self.schema
            .as_ref()
            .and_then(|s| s.config.as_ref())
            .and_then(|c| c.materialized)
    }

    /// Extract declared constraint tests for this model.
    pub fn schema_tests(&self) -> Vec<SchemaTest> {
        self.schema
            .as_ref()
            .map(|s| s.extract_tests(&self.name))
            .unwrap_or_default()
    }
}

/// How a model materializes in the warehouse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Materialization {
    /// `create or replace view`
    #[default]
    View,
    /// `create or replace table`
    Table,
}

impl fmt::Display for Materialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Materialization::View => f.write_str("view"),
            Materialization::Table => f.write_str("table"),
        }
    }
}

/// Schema metadata for a single model (from the 1:1 .yml file)
///
/// Follows the 1:1 naming convention: each model's schema file has the
/// same stem as its SQL file (e.g. stg_trades.sql + stg_trades.yml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSchema {
    /// Schema format version
    #[serde(default = "default_schema_version")]
    pub version: u32,

    /// Model description
    #[serde(default)]
    pub description: Option<String>,

    /// Model-level configuration (overrides project/environment defaults)
    #[serde(default)]
    pub config: Option<SchemaConfig>,

    /// Column definitions
    #[serde(default)]
    pub columns: Vec<ColumnDef>,
}

fn default_schema_version() -> u32 {
    1
}

/// Configuration from schema YAML that can override defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Materialization type (view or table)
    #[serde(default)]
    pub materialized: Option<Materialization>,

    /// Target schema
    #[serde(default)]
    pub schema: Option<String>,
}

/// A column definition with declared constraints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name
    pub name: String,

    /// Column description
    #[serde(default)]
    pub description: Option<String>,

    /// Declared constraint tests for this column
    #[serde(default)]
    pub tests: Vec<TestDefinition>,
}

/// A test declaration as written in YAML
///
/// Either a bare constraint name (`- unique`) or a map carrying config
/// (`- unique: { severity: warn }`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TestDefinition {
    /// Bare constraint name
    Simple(String),
    /// Constraint name mapped to its configuration
    Configured(std::collections::BTreeMap<String, TestConfig>),
}

/// Per-test configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TestConfig {
    /// Severity when the constraint is violated
    #[serde(default)]
    pub severity: TestSeverity,
}

/// Severity of a constraint violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TestSeverity {
    /// Violation fails the run
    #[default]
    Error,
    /// Violation is reported but does not fail the run
    Warn,
}

/// The constraint kinds ledgerflow can generate queries for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    /// No duplicate non-null values in the column
    Unique,
    /// No null values in the column
    NotNull,
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestKind::Unique => f.write_str("unique"),
            TestKind::NotNull => f.write_str("not_null"),
        }
    }
}

impl TestKind {
    /// Parse a constraint name from YAML.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "unique" => Some(TestKind::Unique),
            "not_null" => Some(TestKind::NotNull),
            _ => None,
        }
    }
}

/// One derived test: (model, column, constraint-kind) plus severity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaTest {
    /// Model (or qualified source table) being tested
    pub model: String,

    /// Column being tested
    pub column: String,

    /// Constraint kind
    pub kind: TestKind,

    /// Severity when violated
    #[serde(default)]
    pub severity: TestSeverity,
}

impl ModelSchema {
    /// Load schema metadata from a YAML file.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let schema: ModelSchema = serde_yaml::from_str(&content)?;
        Ok(schema)
    }

    /// Extract tests from this schema's column constraints.
    ///
    /// Unknown constraint names are skipped with a warning rather than
    /// failing the load.
    pub fn extract_tests(&self, model_name: &str) -> Vec<SchemaTest> {
        let mut tests = Vec::new();

        for column in &self.columns {
            for test_def in &column.tests {
                match test_def {
                    TestDefinition::Simple(name) => {
                        if let Some(kind) = TestKind::parse(name) {
                            tests.push(SchemaTest {
                                model: model_name.to_string(),
                                column: column.name.clone(),
                                kind,
                                severity: TestSeverity::default(),
                            });
                        } else {
                            log::warn!(
                                "Unknown test '{}' on {}.{} - skipping",
                                name,
                                model_name,
                                column.name
                            );
                        }
                    }
                    TestDefinition::Configured(map) => {
                        for (name, config) in map {
                            if let Some(kind) = TestKind::parse(name) {
                                tests.push(SchemaTest {
                                    model: model_name.to_string(),
                                    column: column.name.clone(),
                                    kind,
                                    severity: config.severity,
                                });
                            } else {
                                log::warn!(
                                    "Unknown test '{}' on {}.{} - skipping",
                                    name,
                                    model_name,
                                    column.name
                                );
                            }
                        }
                    }
                }
            }
        }

        tests
    }
}
