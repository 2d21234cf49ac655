//! Execution dispatcher for Ledgerflow: materialization, run states,
//! subgraph abort, and run summaries.

pub mod dispatcher;
pub mod error;
pub mod state;

pub use dispatcher::{
    generate_tests, materialization_sql, write_run_results, write_test_artifacts, Dispatcher,
};
pub use error::{RunError, RunResult};
pub use state::{ModelState, RunRecord, RunSummary};
