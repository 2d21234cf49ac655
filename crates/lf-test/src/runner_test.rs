use super::*;
use lf_core::SchemaTest;
use lf_db::DuckDbBackend;

fn generated(model: &str, column: &str, kind: TestKind, severity: TestSeverity) -> GeneratedTest {
    GeneratedTest::from_schema_test(
        &SchemaTest {
            model: model.to_string(),
            column: column.to_string(),
            kind,
            severity,
        },
        model,
    )
}

#[tokio::test]
async fn test_unique_pass() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE funds (fund_id VARCHAR); INSERT INTO funds VALUES ('F1'), ('F2'), ('F3');")
        .await
        .unwrap();

    let runner = TestRunner::new(&db);
    let result = runner
        .run_test(&generated("funds", "fund_id", TestKind::Unique, TestSeverity::Error))
        .await;

    assert!(result.passed);
    assert_eq!(result.failures, 0);
}

#[tokio::test]
async fn test_unique_fail_counts_duplicated_values() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE funds (fund_id VARCHAR); INSERT INTO funds VALUES ('F1'), ('F1'), ('F2');")
        .await
        .unwrap();

    let runner = TestRunner::new(&db);
    let result = runner
        .run_test(&generated("funds", "fund_id", TestKind::Unique, TestSeverity::Error))
        .await;

    assert!(!result.passed);
    // One duplicated value ('F1'), not two rows
    assert_eq!(result.failures, 1);
    assert!(result.is_fatal());
}

#[tokio::test]
async fn test_unique_ignores_nulls() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE funds (fund_id VARCHAR); INSERT INTO funds VALUES ('F1'), (NULL), (NULL);")
        .await
        .unwrap();

    let runner = TestRunner::new(&db);
    let result = runner
        .run_test(&generated("funds", "fund_id", TestKind::Unique, TestSeverity::Error))
        .await;

    assert!(result.passed);
}

#[tokio::test]
async fn test_not_null_fail() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE flows (amount DECIMAL); INSERT INTO flows VALUES (1.5), (NULL), (NULL);",
    )
    .await
    .unwrap();

    let runner = TestRunner::new(&db);
    let result = runner
        .run_test(&generated("flows", "amount", TestKind::NotNull, TestSeverity::Error))
        .await;

    assert!(!result.passed);
    assert_eq!(result.failures, 2);
}

#[tokio::test]
async fn test_warn_severity_not_fatal() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE funds (fund_id VARCHAR); INSERT INTO funds VALUES ('F1'), ('F1');")
        .await
        .unwrap();

    let runner = TestRunner::new(&db);
    let (results, summary) = runner
        .run_all(&[generated(
            "funds",
            "fund_id",
            TestKind::Unique,
            TestSeverity::Warn,
        )])
        .await;

    assert!(!results[0].passed);
    assert!(!results[0].is_fatal());
    assert_eq!(summary.warned, 1);
    assert_eq!(summary.failed, 0);
    assert!(summary.all_passed());
}

#[tokio::test]
async fn test_execution_error_reported() {
    let db = DuckDbBackend::in_memory().unwrap();

    let runner = TestRunner::new(&db);
    let result = runner
        .run_test(&generated("absent_table", "id", TestKind::Unique, TestSeverity::Error))
        .await;

    assert!(!result.passed);
    assert!(result.error.is_some());
    assert!(result.is_fatal());
}

#[tokio::test]
async fn test_summary_counts() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE t (id INT, name VARCHAR); INSERT INTO t VALUES (1, 'a'), (2, NULL);",
    )
    .await
    .unwrap();

    let tests = vec![
        generated("t", "id", TestKind::Unique, TestSeverity::Error),
        generated("t", "name", TestKind::NotNull, TestSeverity::Error),
    ];

    let runner = TestRunner::new(&db);
    let (_results, summary) = runner.run_all(&tests).await;

    assert_eq!(summary.total, 2);
    assert_eq!(summary.passed, 1);
    assert_eq!(summary.failed, 1);
    assert!(!summary.all_passed());
}
