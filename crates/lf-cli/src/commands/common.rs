//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use lf_core::{Environment, Project};
use lf_db::Database;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Intentionally empty: ExitCode is a control-flow mechanism, not a
        // user-facing error, and its message must not leak into stderr.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Load the project and resolve the selected environment.
pub(crate) fn load_project(global: &GlobalArgs) -> Result<(Project, Environment)> {
    let project =
        Project::load(Path::new(&global.project_dir)).context("Failed to load project")?;
    let env = project
        .config
        .environment(global.environment.as_deref())
        .context("Failed to resolve environment")?;

    if global.verbose {
        eprintln!(
            "[verbose] Project '{}' with {} models, environment '{}' ({})",
            project.config.name,
            project.models.len(),
            env.name,
            env.database
        );
    }

    Ok((project, env))
}

/// Open the warehouse connection an environment is bound to.
pub(crate) fn connect(env: &Environment) -> Result<Box<dyn Database>> {
    lf_db::connect(env).context("Failed to connect to database")
}

/// Resolve the artifact output directory for a project.
pub(crate) fn target_dir(project: &Project) -> PathBuf {
    project.root.join(&project.config.target_path)
}
