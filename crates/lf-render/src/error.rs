//! Error types for lf-render

use lf_core::CoreError;
use thiserror::Error;

/// Rendering and compilation errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// R001: A ref/source marker names an object absent from the catalog
    #[error("[R001] Unresolved reference '{reference}' in model '{model}'")]
    UnresolvedReference { model: String, reference: String },

    /// R002: Template rendering failed
    #[error("[R002] Template error in model '{model}': {source}")]
    Template {
        model: String,
        #[source]
        source: minijinja::Error,
    },

    /// R003: Compiled SQL failed dialect parse validation
    #[error("[R003] SQL parse error in {model} at line {line}, column {column}: {message}")]
    ParseError {
        model: String,
        message: String,
        line: usize,
        column: usize,
    },

    /// R004: Failed to write a compiled artifact
    #[error("[R004] Failed to write artifact '{path}': {source}")]
    ArtifactWrite {
        path: String,
        source: std::io::Error,
    },

    /// Core error (DAG cycle, catalog conflict, load failure)
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for RenderError
pub type RenderResult<T> = Result<T, RenderError>;
