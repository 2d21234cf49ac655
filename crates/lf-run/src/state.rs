//! Per-model run states and run summaries.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Lifecycle state of a model within one run.
///
/// The happy path advances `Defined -> Resolved -> Compiled ->
/// Materialized`; `Failed` and `Skipped` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelState {
    /// Discovered in the project
    Defined,
    /// All references resolved against the catalog
    Resolved,
    /// Rendered and parse-validated for the target dialect
    Compiled,
    /// Created in the warehouse
    Materialized,
    /// Compilation or materialization failed
    Failed,
    /// An upstream model failed
    Skipped,
}

impl fmt::Display for ModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ModelState::Defined => "defined",
            ModelState::Resolved => "resolved",
            ModelState::Compiled => "compiled",
            ModelState::Materialized => "materialized",
            ModelState::Failed => "failed",
            ModelState::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

/// Outcome of one model within a run
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    /// Model name
    pub model: String,

    /// Terminal state the model reached
    pub state: ModelState,

    /// Materialization kind, when the model compiled
    pub materialization: Option<String>,

    /// When materialization finished (materialized models only)
    pub completed_at: Option<DateTime<Utc>>,

    /// Wall-clock execution time in seconds
    pub duration_secs: f64,

    /// Failure reason, or the failed ancestor for skipped models
    pub error: Option<String>,
}

/// Summary of a whole run
#[derive(Debug, Serialize)]
pub struct RunSummary {
    /// Short run identifier
    pub run_id: String,

    /// Environment the run targeted
    pub environment: String,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Total elapsed seconds
    pub elapsed_secs: f64,

    /// Models materialized
    pub materialized: usize,

    /// Models failed
    pub failed: usize,

    /// Models skipped because an ancestor failed
    pub skipped: usize,

    /// Per-model outcomes in execution order
    pub records: Vec<RunRecord>,
}

impl RunSummary {
    /// Generate a short run identifier.
    pub fn new_run_id() -> String {
        uuid::Uuid::new_v4().to_string()[..8].to_string()
    }

    /// Build a summary from per-model records.
    pub fn from_records(
        run_id: String,
        environment: String,
        started_at: DateTime<Utc>,
        records: Vec<RunRecord>,
    ) -> Self {
        let materialized = records
            .iter()
            .filter(|r| r.state == ModelState::Materialized)
            .count();
        let failed = records
            .iter()
            .filter(|r| r.state == ModelState::Failed)
            .count();
        let skipped = records
            .iter()
            .filter(|r| r.state == ModelState::Skipped)
            .count();
        let elapsed_secs = (Utc::now() - started_at).num_milliseconds() as f64 / 1000.0;

        Self {
            run_id,
            environment,
            started_at,
            elapsed_secs,
            materialized,
            failed,
            skipped,
            records,
        }
    }

    /// True when every model materialized.
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }

    /// Look up a model's record.
    pub fn record(&self, model: &str) -> Option<&RunRecord> {
        self.records.iter().find(|r| r.model == model)
    }
}
