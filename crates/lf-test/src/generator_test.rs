use super::*;

fn unique_test(model: &str, column: &str) -> SchemaTest {
    SchemaTest {
        model: model.to_string(),
        column: column.to_string(),
        kind: TestKind::Unique,
        severity: TestSeverity::Error,
    }
}

#[test]
fn test_unique_inner_shape() {
    let sql = generate_unique_test(
        r#""bain_analytics"."public"."stg_fund_structures""#,
        "fund_id",
    );
    assert_eq!(
        sql,
        "select fund_id as unique_field, count(*) as n_records\n\
         from \"bain_analytics\".\"public\".\"stg_fund_structures\"\n\
         where fund_id is not null\n\
         group by fund_id\n\
         having count(*) > 1"
    );
}

#[test]
fn test_not_null_inner_shape() {
    let sql = generate_not_null_test("DBT_DEMO.DEV.stg_cashflows", "amount");
    assert_eq!(
        sql,
        "select amount as missing_field\n\
         from DBT_DEMO.DEV.stg_cashflows\n\
         where amount is null"
    );
}

#[test]
fn test_wrapper_shape() {
    let sql = wrap_test_query("select 1 as one");
    assert_eq!(
        sql,
        "select count(*) as failures,\n\
         \x20      count(*) != 0 as should_warn,\n\
         \x20      count(*) != 0 as should_error\n\
         from (\nselect 1 as one\n) validation_errors"
    );
}

#[test]
fn test_generated_test_name() {
    let generated = GeneratedTest::from_schema_test(
        &unique_test("stg_fund_structures", "fund_id"),
        r#""memory"."analytics"."stg_fund_structures""#,
    );
    assert_eq!(generated.name, "unique_stg_fund_structures__fund_id");
    assert_eq!(generated.kind, TestKind::Unique);
    assert_eq!(generated.severity, TestSeverity::Error);
}

#[test]
fn test_generated_sql_contains_both_layers() {
    let generated = GeneratedTest::from_schema_test(
        &unique_test("stg_fund_structures", "fund_id"),
        r#""memory"."analytics"."stg_fund_structures""#,
    );
    assert!(generated.sql.starts_with("select count(*) as failures,"));
    assert!(generated.sql.contains("unique_field"));
    assert!(generated.sql.ends_with(") validation_errors"));
}

#[test]
fn test_warn_severity_propagates() {
    let test = SchemaTest {
        model: "stg_counterparties".to_string(),
        column: "counterparty_id".to_string(),
        kind: TestKind::NotNull,
        severity: TestSeverity::Warn,
    };
    let generated = GeneratedTest::from_schema_test(&test, "t");
    assert_eq!(generated.severity, TestSeverity::Warn);
    assert_eq!(generated.name, "not_null_stg_counterparties__counterparty_id");
}
