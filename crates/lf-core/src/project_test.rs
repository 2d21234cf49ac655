use super::*;
use std::fs;

fn write_sample_project(root: &Path) {
    fs::create_dir_all(root.join("models/staging")).unwrap();
    fs::create_dir_all(root.join("sources")).unwrap();

    fs::write(
        root.join("ledgerflow.yml"),
        r#"
name: fund_analytics
default_environment: dev
environments:
  dev:
    database: memory
    schema: analytics
    source_schema: raw
    dialect: duckdb
    connection: ":memory:"
"#,
    )
    .unwrap();

    fs::write(
        root.join("models/staging/stg_cashflows.sql"),
        "select * from {{ source('raw_cashflows') }}\n",
    )
    .unwrap();
    fs::write(
        root.join("models/staging/stg_cashflows.yml"),
        "version: 1\ncolumns:\n  - name: cashflow_id\n    tests:\n      - unique\n",
    )
    .unwrap();
    fs::write(
        root.join("models/int_cashflow_enriched.sql"),
        "select * from {{ ref('stg_cashflows') }}\n",
    )
    .unwrap();

    fs::write(
        root.join("sources/raw.yml"),
        "name: raw\ntables:\n  - name: raw_cashflows\n",
    )
    .unwrap();
}

#[test]
fn test_load_project() {
    let dir = tempfile::tempdir().unwrap();
    write_sample_project(dir.path());

    let project = Project::load(dir.path()).unwrap();
    assert_eq!(project.config.name, "fund_analytics");
    assert_eq!(project.models.len(), 2);
    assert!(project.models.contains_key("stg_cashflows"));
    assert!(project.models.contains_key("int_cashflow_enriched"));
    assert_eq!(project.sources.len(), 1);

    let stg = project.get_model("stg_cashflows").unwrap();
    assert!(stg.schema.is_some());
    assert_eq!(project.schema_tests().len(), 1);
}

#[test]
fn test_dependency_map() {
    let dir = tempfile::tempdir().unwrap();
    write_sample_project(dir.path());

    let project = Project::load(dir.path()).unwrap();
    let deps = project.dependency_map();
    assert!(deps["stg_cashflows"].is_empty());
    assert!(deps["int_cashflow_enriched"].contains("stg_cashflows"));
}

#[test]
fn test_duplicate_model_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_sample_project(dir.path());
    // Same stem in a second model directory
    fs::create_dir_all(dir.path().join("models/marts")).unwrap();
    fs::write(
        dir.path().join("models/marts/stg_cashflows.sql"),
        "select 1",
    )
    .unwrap();

    assert!(matches!(
        Project::load(dir.path()),
        Err(CoreError::DuplicateModel { .. })
    ));
}

#[test]
fn test_missing_project_dir() {
    assert!(matches!(
        Project::load(Path::new("/nonexistent/ledgerflow-project")),
        Err(CoreError::ProjectNotFound { .. })
    ));
}

#[test]
fn test_model_not_found() {
    let dir = tempfile::tempdir().unwrap();
    write_sample_project(dir.path());
    let project = Project::load(dir.path()).unwrap();
    assert!(matches!(
        project.get_model("fct_missing"),
        Err(CoreError::ModelNotFound { .. })
    ));
}
