//! Execution dispatcher: submits compiled artifacts to a warehouse.
//!
//! Models run sequentially in topological order. A model that fails at
//! runtime takes its transitive dependents with it; unrelated branches
//! still run. Test artifacts run after materialization and never stop
//! each other.

use crate::error::{RunError, RunResult};
use crate::state::{ModelState, RunRecord, RunSummary};
use chrono::Utc;
use lf_core::{Materialization, Project};
use lf_db::Database;
use lf_render::{CompileOutput, CompiledModel};
use lf_test::{GeneratedTest, TestResult, TestRunner, TestSummary};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::time::Instant;

/// Render the DDL statement that materializes a compiled model.
pub fn materialization_sql(compiled: &CompiledModel) -> String {
    let kind = match compiled.materialization {
        Materialization::View => "view",
        Materialization::Table => "table",
    };
    format!(
        "create or replace {} {} as (\n{}\n)",
        kind, compiled.relation_sql, compiled.sql
    )
}

/// Submits compiled artifacts to a warehouse connection.
pub struct Dispatcher<'a> {
    db: &'a dyn Database,
}

impl<'a> Dispatcher<'a> {
    /// Create a dispatcher over an open connection.
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    /// Materialize every compiled model in execution order.
    ///
    /// Models that failed to compile (or were skipped at compile time)
    /// carry their terminal state into the summary. `full_refresh` drops
    /// each relation before recreating it, so a model can change
    /// materialization kind between runs.
    pub async fn materialize(
        &self,
        output: &CompileOutput,
        full_refresh: bool,
    ) -> RunResult<RunSummary> {
        let run_id = RunSummary::new_run_id();
        let started_at = Utc::now();
        log::info!(
            "Run {} starting against '{}' ({} models)",
            run_id,
            output.environment,
            output.order.len()
        );

        self.create_schemas(output).await?;

        let mut skipped: BTreeMap<String, String> = output.skipped.clone();
        let mut records = Vec::with_capacity(output.order.len());

        for name in &output.order {
            if let Some(err) = output.failures.get(name) {
                records.push(failed_record(name, err.to_string()));
                continue;
            }
            if let Some(ancestor) = skipped.get(name) {
                records.push(skipped_record(name, ancestor));
                continue;
            }
            let Some(compiled) = output.models.get(name) else {
                continue;
            };

            let start = Instant::now();
            match self.materialize_model(compiled, full_refresh).await {
                Ok(()) => {
                    records.push(RunRecord {
                        model: name.clone(),
                        state: ModelState::Materialized,
                        materialization: Some(compiled.materialization.to_string()),
                        completed_at: Some(Utc::now()),
                        duration_secs: start.elapsed().as_secs_f64(),
                        error: None,
                    });
                }
                Err(e) => {
                    log::error!("Materialization of '{}' failed: {}", name, e);
                    for dependent in output.dag.descendants(name) {
                        skipped.entry(dependent).or_insert_with(|| name.clone());
                    }
                    records.push(RunRecord {
                        model: name.clone(),
                        state: ModelState::Failed,
                        materialization: Some(compiled.materialization.to_string()),
                        completed_at: None,
                        duration_secs: start.elapsed().as_secs_f64(),
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        let summary = RunSummary::from_records(
            run_id,
            output.environment.clone(),
            started_at,
            records,
        );
        log::info!(
            "Run {} finished: {} materialized, {} failed, {} skipped",
            summary.run_id,
            summary.materialized,
            summary.failed,
            summary.skipped
        );
        Ok(summary)
    }

    /// Create every target schema the compiled models land in.
    async fn create_schemas(&self, output: &CompileOutput) -> RunResult<()> {
        let schemas: BTreeSet<&str> = output
            .models
            .values()
            .map(|m| m.schema_sql.as_str())
            .collect();
        for schema in schemas {
            self.db.create_schema_if_not_exists(schema).await?;
        }
        Ok(())
    }

    async fn materialize_model(
        &self,
        compiled: &CompiledModel,
        full_refresh: bool,
    ) -> RunResult<()> {
        if full_refresh {
            self.db.drop_if_exists(&compiled.relation_sql).await?;
        }
        let ddl = materialization_sql(compiled);
        self.db
            .execute(&ddl)
            .await
            .map_err(|e| RunError::Materialization {
                model: compiled.name.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// Run generated constraint tests and summarize.
    ///
    /// A test the warehouse rejects outright carries a typed
    /// [`RunError::TestExecution`] message on its result; it never stops
    /// the remaining tests.
    pub async fn run_tests(
        &self,
        tests: &[GeneratedTest],
    ) -> (Vec<TestResult>, TestSummary) {
        let runner = TestRunner::new(self.db);
        let start = Instant::now();
        let mut results = Vec::with_capacity(tests.len());
        for test in tests {
            let mut result = runner.run_test(test).await;
            if let Some(message) = result.error.take() {
                let err = RunError::TestExecution {
                    test: test.name.clone(),
                    message,
                };
                log::error!("{}", err);
                result.error = Some(err.to_string());
            }
            results.push(result);
        }
        let summary = TestSummary::from_results(&results, start.elapsed());
        (results, summary)
    }
}

/// Generate test queries for every declared constraint in the project.
///
/// Each constraint's object is resolved through the compile output's
/// resolution map; constraints on objects that did not compile (or are
/// not declared) are skipped with a warning.
pub fn generate_tests(project: &Project, output: &CompileOutput) -> Vec<GeneratedTest> {
    let mut tests = Vec::new();
    for schema_test in project.schema_tests() {
        match output.resolutions.get(&schema_test.model) {
            Some(table_sql) => {
                tests.push(GeneratedTest::from_schema_test(&schema_test, table_sql));
            }
            None => {
                log::warn!(
                    "Skipping {} test on '{}.{}': object not present in this environment",
                    schema_test.kind,
                    schema_test.model,
                    schema_test.column
                );
            }
        }
    }
    tests
}

/// Write generated test SQL under `<target>/<environment>/tests/`.
pub fn write_test_artifacts(
    tests: &[GeneratedTest],
    environment: &str,
    target_dir: &Path,
) -> RunResult<Vec<std::path::PathBuf>> {
    let tests_dir = target_dir.join(environment).join("tests");
    std::fs::create_dir_all(&tests_dir).map_err(|e| RunError::ArtifactWrite {
        path: tests_dir.display().to_string(),
        source: e,
    })?;
    let mut paths = Vec::with_capacity(tests.len());
    for test in tests {
        let path = tests_dir.join(format!("{}.sql", test.name));
        std::fs::write(&path, &test.sql).map_err(|e| RunError::ArtifactWrite {
            path: path.display().to_string(),
            source: e,
        })?;
        paths.push(path);
    }
    Ok(paths)
}

/// Write the run summary as JSON under `<target>/<environment>/`.
pub fn write_run_results(summary: &RunSummary, target_dir: &Path) -> RunResult<std::path::PathBuf> {
    let dir = target_dir.join(&summary.environment);
    std::fs::create_dir_all(&dir).map_err(|e| RunError::ArtifactWrite {
        path: dir.display().to_string(),
        source: e,
    })?;
    let path = dir.join("run_results.json");
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(&path, json).map_err(|e| RunError::ArtifactWrite {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(path)
}

fn failed_record(model: &str, error: String) -> RunRecord {
    RunRecord {
        model: model.to_string(),
        state: ModelState::Failed,
        materialization: None,
        completed_at: None,
        duration_secs: 0.0,
        error: Some(error),
    }
}

fn skipped_record(model: &str, ancestor: &str) -> RunRecord {
    RunRecord {
        model: model.to_string(),
        state: ModelState::Skipped,
        materialization: None,
        completed_at: None,
        duration_secs: 0.0,
        error: Some(format!("upstream model '{}' failed", ancestor)),
    }
}

#[cfg(test)]
#[path = "dispatcher_test.rs"]
mod tests;
