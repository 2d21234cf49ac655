//! Error types for lf-run

use lf_core::CoreError;
use lf_db::DbError;
use lf_render::RenderError;
use thiserror::Error;

/// Dispatch and execution errors
#[derive(Error, Debug)]
pub enum RunError {
    /// X001: A model artifact failed to materialize
    #[error("[X001] Failed to materialize model '{model}': {message}")]
    Materialization { model: String, message: String },

    /// X002: A test artifact failed to execute
    #[error("[X002] Failed to execute test '{test}': {message}")]
    TestExecution { test: String, message: String },

    /// X003: Failed to write a run artifact
    #[error("[X003] Failed to write '{path}': {source}")]
    ArtifactWrite {
        path: String,
        source: std::io::Error,
    },

    /// Compilation error
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Core error
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Database error
    #[error(transparent)]
    Db(#[from] DbError),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias for RunError
pub type RunResult<T> = Result<T, RunError>;
