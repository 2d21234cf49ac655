//! Error types for lf-core

use thiserror::Error;

/// Core error type for Ledgerflow
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Project directory not found
    #[error("[E004] Project directory not found: {path}")]
    ProjectNotFound { path: String },

    /// E005: Model not found
    #[error("[E005] Model not found: {name}")]
    ModelNotFound { name: String },

    /// E006: Circular dependency detected
    #[error("[E006] Circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    /// E007: Duplicate model name
    #[error("[E007] Duplicate model name: {name}")]
    DuplicateModel { name: String },

    /// E008: Duplicate source table declaration
    #[error("[E008] Duplicate source table '{table}' in source '{source_name}'")]
    DuplicateSourceTable { table: String, source_name: String },

    /// E009: Unknown target environment
    #[error("[E009] Unknown environment '{name}'. Declare it under `environments:` in ledgerflow.yml")]
    UnknownEnvironment { name: String },

    /// E010: A name that must be non-empty was empty
    #[error("[E010] Empty name: {context}")]
    EmptyName { context: String },

    /// E011: IO error
    #[error("[E011] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E012: IO error with file path context
    #[error("[E012] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E013: Schema/YAML parse error
    #[error("[E013] Schema parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
