//! Test execution

use crate::generator::GeneratedTest;
use lf_core::{TestKind, TestSeverity};
use lf_db::Database;
use std::time::{Duration, Instant};

/// Result of a single test execution
#[derive(Debug, Clone)]
pub struct TestResult {
    /// Test name
    pub name: String,

    /// Model tested
    pub model: String,

    /// Column tested
    pub column: String,

    /// Constraint kind
    pub kind: TestKind,

    /// Whether the test passed
    pub passed: bool,

    /// Value of the `failures` column (0 if passed)
    pub failures: i64,

    /// Test severity (error or warn)
    pub severity: TestSeverity,

    /// Execution time
    pub duration: Duration,

    /// Error message if execution itself failed
    pub error: Option<String>,
}

impl TestResult {
    fn from_failures(test: &GeneratedTest, failures: i64, duration: Duration) -> Self {
        Self {
            name: test.name.clone(),
            model: test.model.clone(),
            column: test.column.clone(),
            kind: test.kind,
            passed: failures == 0,
            failures,
            severity: test.severity,
            duration,
            error: None,
        }
    }

    fn from_error(test: &GeneratedTest, error: String, duration: Duration) -> Self {
        Self {
            name: test.name.clone(),
            model: test.model.clone(),
            column: test.column.clone(),
            kind: test.kind,
            passed: false,
            failures: 0,
            severity: test.severity,
            duration,
            error: Some(error),
        }
    }

    /// True when a failed result should fail the run (severity = error).
    pub fn is_fatal(&self) -> bool {
        !self.passed && (self.severity == TestSeverity::Error || self.error.is_some())
    }
}

/// Summary of a test run
#[derive(Debug, Clone)]
pub struct TestSummary {
    /// Total tests run
    pub total: usize,

    /// Tests passed
    pub passed: usize,

    /// Tests failed at error severity
    pub failed: usize,

    /// Tests failed at warn severity
    pub warned: usize,

    /// Tests whose execution errored
    pub errors: usize,

    /// Total execution time
    pub duration: Duration,
}

impl TestSummary {
    /// Create a summary from test results
    pub fn from_results(results: &[TestResult], duration: Duration) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let errors = results.iter().filter(|r| r.error.is_some()).count();
        let failed = results
            .iter()
            .filter(|r| !r.passed && r.error.is_none() && r.severity == TestSeverity::Error)
            .count();
        let warned = results
            .iter()
            .filter(|r| !r.passed && r.error.is_none() && r.severity == TestSeverity::Warn)
            .count();

        Self {
            total,
            passed,
            failed,
            warned,
            errors,
            duration,
        }
    }

    /// True when no test failed fatally (warn-severity failures allowed).
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}

/// Runs generated constraint tests against a warehouse connection
pub struct TestRunner<'a> {
    db: &'a dyn Database,
}

impl<'a> TestRunner<'a> {
    /// Create a new test runner
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    /// Run a single generated test.
    ///
    /// The pass/fail shell returns exactly one row whose first column is
    /// `failures`; zero means the constraint holds.
    pub async fn run_test(&self, test: &GeneratedTest) -> TestResult {
        let start = Instant::now();

        match self.db.query_scalar(&test.sql).await {
            Ok(failures) => {
                let result = TestResult::from_failures(test, failures, start.elapsed());
                if result.passed {
                    log::debug!("Test {} passed", test.name);
                } else {
                    log::warn!(
                        "Test {} failed with {} violating rows (severity: {:?})",
                        test.name,
                        failures,
                        test.severity
                    );
                }
                result
            }
            Err(e) => TestResult::from_error(test, e.to_string(), start.elapsed()),
        }
    }

    /// Run tests in order and summarize.
    pub async fn run_all(&self, tests: &[GeneratedTest]) -> (Vec<TestResult>, TestSummary) {
        let start = Instant::now();
        let mut results = Vec::with_capacity(tests.len());
        for test in tests {
            results.push(self.run_test(test).await);
        }
        let summary = TestSummary::from_results(&results, start.elapsed());
        (results, summary)
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
