//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};

/// Ledgerflow - templated SQL compilation, materialization, and constraint tests
#[derive(Parser, Debug)]
#[command(name = "lf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Target environment (defaults to the project's default_environment)
    #[arg(short, long, global = true)]
    pub environment: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile model templates to executable SQL artifacts
    Compile(CompileArgs),

    /// Compile and materialize models against the environment's warehouse
    Run(RunArgs),

    /// Run declared constraint tests
    Test(TestArgs),
}

/// Arguments for the compile command
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Override output directory (default: the project's target path)
    #[arg(short, long)]
    pub output_dir: Option<String>,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Drop and recreate all models
    #[arg(long)]
    pub full_refresh: bool,

    /// Run constraint tests after materialization
    #[arg(long)]
    pub with_tests: bool,
}

/// Arguments for the test command
#[derive(Args, Debug)]
pub struct TestArgs {
    /// Model names to test (comma-separated, default: all with tests)
    #[arg(short, long)]
    pub models: Option<String>,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
