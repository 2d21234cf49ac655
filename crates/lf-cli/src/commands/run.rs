//! Run command implementation

use anyhow::{Context, Result};
use lf_render::Compiler;
use lf_run::{generate_tests, write_run_results, write_test_artifacts, Dispatcher, ModelState};

use crate::cli::{GlobalArgs, RunArgs};
use crate::commands::common::{self, ExitCode};

/// Execute the run command
pub async fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let (project, env) = common::load_project(global)?;

    let compiler = Compiler::new(&project, &env);
    let output = compiler.compile().context("Compilation failed")?;

    let target = common::target_dir(&project);
    compiler
        .write_artifacts(&output, &target)
        .context("Failed to write compiled artifacts")?;

    let db = common::connect(&env)?;
    let dispatcher = Dispatcher::new(db.as_ref());

    println!(
        "Running {} models against '{}'...\n",
        output.order.len(),
        env.name
    );

    let summary = dispatcher
        .materialize(&output, args.full_refresh)
        .await
        .context("Run failed")?;

    for record in &summary.records {
        match record.state {
            ModelState::Materialized => println!(
                "  \u{2713} {} ({}) [{:.2}s]",
                record.model,
                record.materialization.as_deref().unwrap_or("view"),
                record.duration_secs
            ),
            ModelState::Skipped => println!(
                "  - {} ({})",
                record.model,
                record.error.as_deref().unwrap_or("skipped")
            ),
            _ => println!(
                "  \u{2717} {} - {}",
                record.model,
                record.error.as_deref().unwrap_or("failed")
            ),
        }
    }

    let results_path = write_run_results(&summary, &target)?;
    println!(
        "\nRun {}: {} materialized, {} failed, {} skipped ({})",
        summary.run_id,
        summary.materialized,
        summary.failed,
        summary.skipped,
        results_path.display()
    );

    let mut tests_failed = false;
    if args.with_tests {
        let tests = generate_tests(&project, &output);
        write_test_artifacts(&tests, &env.name, &target)
            .context("Failed to write test artifacts")?;
        let (results, test_summary) = dispatcher.run_tests(&tests).await;
        println!("\nTests: {} total", test_summary.total);
        for result in &results {
            if result.passed {
                println!("  \u{2713} {}", result.name);
            } else {
                println!(
                    "  \u{2717} {} ({} failures, severity {:?})",
                    result.name, result.failures, result.severity
                );
            }
        }
        tests_failed = !test_summary.all_passed();
    }

    if !summary.is_success() || tests_failed {
        return Err(ExitCode(1).into());
    }
    Ok(())
}
