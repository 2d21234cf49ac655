use super::*;

#[test]
fn test_duckdb_quote_ident() {
    let dialect = DuckDbDialect::new();
    assert_eq!(dialect.quote_ident("stg_trades"), r#""stg_trades""#);
    assert_eq!(dialect.quote_ident(r#"my"table"#), r#""my""table""#);
}

#[test]
fn test_snowflake_ident_unquoted() {
    let dialect = SnowflakeDialect::new();
    assert_eq!(dialect.quote_ident("stg_trades"), "stg_trades");
}

#[test]
fn test_duckdb_relation_sql() {
    let dialect = DuckDbDialect::new();
    let rel = Relation::new("bain_analytics", "public_raw", "raw_counterparties");
    assert_eq!(
        dialect.relation_sql(&rel),
        r#""bain_analytics"."public_raw"."raw_counterparties""#
    );
}

#[test]
fn test_snowflake_relation_sql() {
    let dialect = SnowflakeDialect::new();
    let rel = Relation::new("DBT_DEMO", "DEV_raw", "raw_counterparties");
    assert_eq!(
        dialect.relation_sql(&rel),
        "DBT_DEMO.DEV_raw.raw_counterparties"
    );
}

#[test]
fn test_schema_sql() {
    let duck = DuckDbDialect::new();
    assert_eq!(duck.schema_sql("memory", "analytics"), r#""memory"."analytics""#);
    let snow = SnowflakeDialect::new();
    assert_eq!(snow.schema_sql("DBT_DEMO", "DEV"), "DBT_DEMO.DEV");
}

#[test]
fn test_parse_valid_select() {
    let dialect = DuckDbDialect::new();
    let stmts = dialect
        .parse("select fund_id, cast(amount as decimal(18,2)) as amount from t")
        .unwrap();
    assert_eq!(stmts.len(), 1);
}

#[test]
fn test_parse_error_has_location() {
    let dialect = DuckDbDialect::new();
    let err = dialect.parse("select from where").unwrap_err();
    assert!(!err.message.is_empty());
}

#[test]
fn test_dialect_for() {
    assert_eq!(dialect_for(DialectKind::Duckdb).name(), "duckdb");
    assert_eq!(dialect_for(DialectKind::Snowflake).name(), "snowflake");
}
