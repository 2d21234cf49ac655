//! Compile command implementation

use anyhow::{Context, Result};
use lf_render::Compiler;
use std::path::PathBuf;

use crate::cli::{CompileArgs, GlobalArgs};
use crate::commands::common::{self, ExitCode};

/// Execute the compile command
pub async fn execute(args: &CompileArgs, global: &GlobalArgs) -> Result<()> {
    let (project, env) = common::load_project(global)?;

    println!(
        "Compiling {} models for environment '{}'...\n",
        project.models.len(),
        env.name
    );

    let compiler = Compiler::new(&project, &env);
    let output = compiler.compile().context("Compilation failed")?;

    let target = args
        .output_dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| common::target_dir(&project));
    let paths = compiler
        .write_artifacts(&output, &target)
        .context("Failed to write compiled artifacts")?;

    for name in &output.order {
        if output.models.contains_key(name) {
            println!("  \u{2713} {}", name);
        } else if let Some(err) = output.failures.get(name) {
            println!("  \u{2717} {} - {}", name, err);
        } else if let Some(ancestor) = output.skipped.get(name) {
            println!("  - {} (skipped: upstream '{}' failed)", name, ancestor);
        }
    }

    println!(
        "\nCompiled {} of {} models ({} artifacts written to {})",
        output.models.len(),
        output.order.len(),
        paths.len(),
        target.display()
    );

    if !output.is_clean() {
        return Err(ExitCode(1).into());
    }
    Ok(())
}
