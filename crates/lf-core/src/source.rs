//! Declared raw source definitions.
//!
//! Sources are the tables a project reads but does not build: loaded
//! extracts, seeds, vendor feeds. They are declared in YAML so references
//! to them can be resolved (and constraint-tested) per environment.

use crate::error::{CoreError, CoreResult};
use crate::model::{ColumnDef, SchemaTest, TestDefinition, TestKind, TestSeverity};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A source definition file: a named group of raw tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// Source group name (e.g. "raw")
    pub name: String,

    /// Declared schema the tables live in.
    ///
    /// Environments may override this with their `source_schema` binding.
    #[serde(default)]
    pub schema: Option<String>,

    /// Tables in this source
    #[serde(default)]
    pub tables: Vec<SourceTable>,
}

/// One declared raw table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceTable {
    /// Table name (what `source('...')` markers resolve)
    pub name: String,

    /// Table description
    #[serde(default)]
    pub description: Option<String>,

    /// Column declarations (for constraint tests)
    #[serde(default)]
    pub columns: Vec<ColumnDef>,
}

impl SourceFile {
    /// Load a source definition from a YAML file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let source: SourceFile = serde_yaml::from_str(&content)?;
        source.validate()?;
        Ok(source)
    }

    /// Reject duplicate table declarations within one source.
    fn validate(&self) -> CoreResult<()> {
        let mut seen = std::collections::BTreeSet::new();
        for table in &self.tables {
            if !seen.insert(table.name.as_str()) {
                return Err(CoreError::DuplicateSourceTable {
                    table: table.name.clone(),
                    source_name: self.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Extract declared constraint tests for this source's tables.
    ///
    /// Tests are keyed by the raw table name; the caller qualifies it per
    /// environment before generating SQL.
    pub fn extract_tests(&self) -> Vec<SchemaTest> {
        let mut tests = Vec::new();
        for table in &self.tables {
            for column in &table.columns {
                for test_def in &column.tests {
                    match test_def {
                        TestDefinition::Simple(name) => {
                            if let Some(kind) = TestKind::parse(name) {
                                tests.push(SchemaTest {
                                    model: table.name.clone(),
                                    column: column.name.clone(),
                                    kind,
                                    severity: TestSeverity::default(),
                                });
                            }
                        }
                        TestDefinition::Configured(map) => {
                            for (name, config) in map {
                                if let Some(kind) = TestKind::parse(name) {
                                    tests.push(SchemaTest {
                                        model: table.name.clone(),
                                        column: column.name.clone(),
                                        kind,
                                        severity: config.severity,
                                    });
                                }
                            }
                        }
                    }
                }
            }
        }
        tests
    }
}
