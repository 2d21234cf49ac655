//! End-to-end tests over the bundled fund analytics fixture project.

use lf_core::Project;
use lf_db::{Database, DuckDbBackend};
use lf_render::Compiler;
use lf_run::{generate_tests, materialization_sql, Dispatcher, ModelState};
use lf_test::TestRunner;
use std::path::PathBuf;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/fund_project")
}

fn load_fixture(env_name: &str) -> (Project, lf_core::Environment) {
    let project = Project::load(&fixture_dir()).unwrap();
    let env = project.config.environment(Some(env_name)).unwrap();
    (project, env)
}

/// Seed the raw schema the fixture's sources point at.
async fn seed_raw(db: &DuckDbBackend, duplicate_fund: bool) {
    db.execute_batch(
        r#"
        CREATE SCHEMA IF NOT EXISTS "memory"."raw";
        CREATE TABLE "memory"."raw"."raw_counterparties" (
            counterparty_id VARCHAR, counterparty_name VARCHAR, counterparty_type VARCHAR
        );
        INSERT INTO "memory"."raw"."raw_counterparties" VALUES
            ('C1', ' acme capital ', 'lp'),
            ('C2', 'beta partners', 'gp');
        CREATE TABLE "memory"."raw"."raw_fund_structures" (
            fund_id VARCHAR, fund_name VARCHAR, vintage_year INT, committed_capital DECIMAL
        );
        INSERT INTO "memory"."raw"."raw_fund_structures" VALUES
            ('F1', 'Fund I', 2020, 100.0),
            ('F2', 'Fund II', 2022, 200.0);
        CREATE TABLE "memory"."raw"."raw_cashflows" (
            cashflow_id INT, fund_id VARCHAR, counterparty_id VARCHAR,
            cashflow_date DATE, cashflow_type VARCHAR, amount DECIMAL
        );
        INSERT INTO "memory"."raw"."raw_cashflows" VALUES
            (1, 'F1', 'C1', DATE '2024-02-15', 'capital_call', 50.0),
            (2, 'F1', 'C1', DATE '2024-08-01', 'distribution', 70.0),
            (3, 'F2', 'C2', DATE '2024-05-10', 'capital_call', 80.0);
        "#,
    )
    .await
    .unwrap();

    if duplicate_fund {
        db.execute(
            r#"INSERT INTO "memory"."raw"."raw_fund_structures" VALUES ('F1', 'Fund I bis', 2021, 50.0)"#,
        )
        .await
        .unwrap();
    }
}

#[test]
fn compile_is_deterministic() {
    let (project, env) = load_fixture("dev");
    let first = Compiler::new(&project, &env).compile().unwrap();
    let second = Compiler::new(&project, &env).compile().unwrap();

    assert!(first.is_clean());
    assert_eq!(first.order, second.order);
    for (name, compiled) in &first.models {
        assert_eq!(compiled.sql, second.models[name].sql, "model {}", name);
    }
}

#[test]
fn environments_quote_differently() {
    let (project, dev) = load_fixture("dev");
    let dev_out = Compiler::new(&project, &dev).compile().unwrap();
    assert_eq!(
        dev_out.resolutions["raw_counterparties"],
        r#""memory"."raw"."raw_counterparties""#
    );

    let prod = project.config.environment(Some("prod")).unwrap();
    let prod_out = Compiler::new(&project, &prod).compile().unwrap();
    assert_eq!(
        prod_out.resolutions["raw_counterparties"],
        "DBT_DEMO.DEV_raw.raw_counterparties"
    );
    assert!(prod_out
        .models["stg_counterparties"]
        .sql
        .contains("from DBT_DEMO.DEV_raw.raw_counterparties"));
}

#[tokio::test]
async fn full_pipeline_materializes_in_order() {
    let (project, env) = load_fixture("dev");
    let output = Compiler::new(&project, &env).compile().unwrap();

    let db = DuckDbBackend::in_memory().unwrap();
    seed_raw(&db, false).await;

    let summary = Dispatcher::new(&db).materialize(&output, false).await.unwrap();
    assert!(summary.is_success());
    assert_eq!(summary.materialized, 6);

    // B materializes before everything that depends on it
    for record in &summary.records {
        assert_eq!(record.state, ModelState::Materialized);
        let completed = record.completed_at.unwrap();
        for dep in output.dag.dependencies(&record.model) {
            let dep_completed = summary.record(&dep).unwrap().completed_at.unwrap();
            assert!(dep_completed <= completed, "{} after {}", dep, record.model);
        }
    }

    // Template var flowed through to the report
    let usd_rows = db
        .query_scalar(
            r#"SELECT COUNT(*) FROM "memory"."analytics"."report_fund_summary" WHERE currency = 'USD'"#,
        )
        .await
        .unwrap();
    assert_eq!(usd_rows, 2);
}

#[tokio::test]
async fn fiscal_quarter_labels_are_offset() {
    let (project, env) = load_fixture("dev");
    let output = Compiler::new(&project, &env).compile().unwrap();

    let db = DuckDbBackend::in_memory().unwrap();
    seed_raw(&db, false).await;
    Dispatcher::new(&db).materialize(&output, false).await.unwrap();

    // The staging template labels February as Q3 and August as Q1
    let feb = db
        .query_scalar(
            r#"SELECT COUNT(*) FROM "memory"."analytics"."int_cashflow_enriched"
               WHERE cashflow_id = 1 AND fiscal_quarter = 'Q3'"#,
        )
        .await
        .unwrap();
    assert_eq!(feb, 1);

    let aug = db
        .query_scalar(
            r#"SELECT COUNT(*) FROM "memory"."analytics"."int_cashflow_enriched"
               WHERE cashflow_id = 2 AND fiscal_quarter = 'Q1'"#,
        )
        .await
        .unwrap();
    assert_eq!(aug, 1);
}

#[tokio::test]
async fn duplicate_fund_id_fails_uniqueness_test() {
    let (project, env) = load_fixture("dev");
    let output = Compiler::new(&project, &env).compile().unwrap();

    let db = DuckDbBackend::in_memory().unwrap();
    seed_raw(&db, true).await;
    Dispatcher::new(&db).materialize(&output, false).await.unwrap();

    let tests = generate_tests(&project, &output);
    let unique_fund = tests
        .iter()
        .find(|t| t.name == "unique_stg_fund_structures__fund_id")
        .unwrap();

    let runner = TestRunner::new(&db);
    let result = runner.run_test(unique_fund).await;
    assert!(!result.passed);
    // One duplicated value ('F1'), not one row per duplicate
    assert_eq!(result.failures, 1);

    let should_error = db
        .query_scalar(&format!(
            "SELECT CAST(should_error AS INT) FROM ({}) flagged",
            unique_fund.sql
        ))
        .await
        .unwrap();
    assert_eq!(should_error, 1);
}

#[tokio::test]
async fn clean_data_passes_all_tests() {
    let (project, env) = load_fixture("dev");
    let output = Compiler::new(&project, &env).compile().unwrap();

    let db = DuckDbBackend::in_memory().unwrap();
    seed_raw(&db, false).await;
    let dispatcher = Dispatcher::new(&db);
    dispatcher.materialize(&output, false).await.unwrap();

    let tests = generate_tests(&project, &output);
    // Model constraints plus the declared source-table constraints
    assert!(tests.len() >= 8);

    let (_results, summary) = dispatcher.run_tests(&tests).await;
    assert!(summary.all_passed());
    assert_eq!(summary.total, tests.len());
}

#[tokio::test]
async fn recompile_matches_materialized_definition() {
    let (project, env) = load_fixture("dev");
    let output = Compiler::new(&project, &env).compile().unwrap();

    let db = DuckDbBackend::in_memory().unwrap();
    seed_raw(&db, false).await;
    Dispatcher::new(&db).materialize(&output, false).await.unwrap();

    // Recompiling yields the same body the view was created from
    let recompiled = Compiler::new(&project, &env).compile().unwrap();
    let first = &output.models["stg_counterparties"];
    let second = &recompiled.models["stg_counterparties"];
    assert_eq!(first.sql, second.sql);
    assert_eq!(materialization_sql(first), materialization_sql(second));

    // And re-running the DDL is idempotent (create or replace)
    db.execute(&materialization_sql(second)).await.unwrap();
    let rows = db
        .query_scalar(r#"SELECT COUNT(*) FROM "memory"."analytics"."stg_counterparties""#)
        .await
        .unwrap();
    assert_eq!(rows, 2);
}

#[test]
fn cycle_produces_no_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("models")).unwrap();
    std::fs::write(
        dir.path().join("ledgerflow.yml"),
        "name: cyclic\nenvironments:\n  dev:\n    database: memory\n    schema: analytics\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("models/model_a.sql"),
        "select * from {{ ref('model_b') }}",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("models/model_b.sql"),
        "select * from {{ ref('model_a') }}",
    )
    .unwrap();

    let project = Project::load(dir.path()).unwrap();
    let env = project.config.environment(Some("dev")).unwrap();
    let err = Compiler::new(&project, &env).compile().unwrap_err();
    assert!(err.to_string().contains("Circular dependency"));
}
