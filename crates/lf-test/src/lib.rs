//! Constraint test generation and execution for Ledgerflow.

pub mod generator;
pub mod runner;

pub use generator::{
    generate_not_null_test, generate_unique_test, wrap_test_query, GeneratedTest,
};
pub use runner::{TestResult, TestRunner, TestSummary};
