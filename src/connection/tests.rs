//! Tests for the DuckDB connection adapter

use super::*;
use crate::config::ConnectionConfig;
use serde_json::json;
use std::ops::ControlFlow;

fn connection() -> DuckDbConnection {
    let conn = DuckDbConnection::open_in_memory().unwrap();
    conn.unprepared(
        "create table users (id integer primary key, name varchar, created_at date);
         insert into users values (1, 'alice', '2024-01-31'), (2, 'bob', null);",
    )
    .unwrap();
    conn
}

// ============================================================================
// Statement Splitting Tests
// ============================================================================

#[test]
fn test_split_single_statement() {
    assert_eq!(split_statements("select 1"), vec!["select 1"]);
    assert_eq!(split_statements("  select 1;  "), vec!["select 1;"]);
}

#[test]
fn test_split_multiple_statements() {
    assert_eq!(
        split_statements("create table a (id int);\n  insert into a values (1); select 2"),
        vec!["create table a (id int)", "insert into a values (1)", "select 2"]
    );
}

#[test]
fn test_split_skips_terminators_inside_quotes() {
    assert_eq!(
        split_statements("insert into t values ('x; drop'); select \"a;b\" from t"),
        vec!["insert into t values ('x; drop')", "select \"a;b\" from t"]
    );
    assert_eq!(
        split_statements("select 'it''s; fine'; select 2"),
        vec!["select 'it''s; fine'", "select 2"]
    );
    assert_eq!(split_statements("select 'open; select 2"), vec!["select 'open; select 2"]);
}

#[test]
fn test_split_ignores_terminator_not_followed_by_word() {
    assert_eq!(
        split_statements("select ';' as semi; select 2"),
        vec!["select ';' as semi", "select 2"]
    );
    assert!(split_statements("   ").is_empty());
}

// ============================================================================
// Select Tests
// ============================================================================

#[test]
fn test_select_rows_keep_column_order() {
    let conn = connection();
    let rows = conn
        .select("select name, id from users order by id", &[])
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[0].keys().collect::<Vec<_>>(),
        vec!["name", "id"]
    );
    assert_eq!(rows[0]["name"], json!("alice"));
    assert_eq!(rows[1]["id"], json!(2));
}

#[test]
fn test_select_with_bindings_and_dates() {
    let conn = connection();
    let row = conn
        .select_one("select * from users where name = ?", &[json!("alice")])
        .unwrap()
        .unwrap();

    assert_eq!(row["created_at"], json!("2024-01-31"));

    let missing = conn
        .select_one("select * from users where id = ?", &[json!(99)])
        .unwrap();
    assert!(missing.is_none());
}

#[test]
fn test_select_infinite_temporals() {
    let conn = connection();
    let row = conn
        .select_one(
            "select 'infinity'::date as d, '-infinity'::timestamp_s as ts, 'infinity'::timestamp as t",
            &[],
        )
        .unwrap()
        .unwrap();

    assert_eq!(row["d"], json!("infinity"));
    assert_eq!(row["ts"], json!("-infinity"));
    assert_eq!(row["t"], json!("infinity"));
}

#[test]
fn test_select_decimals_keep_precision() {
    let conn = connection();
    let row = conn
        .select_one(
            "select 12345678901234567.89::decimal(38,2) as big, 1.50::decimal(4,2) as small",
            &[],
        )
        .unwrap()
        .unwrap();

    assert_eq!(row["big"], json!("12345678901234567.89"));
    assert_eq!(row["small"], json!(1.5));
}

#[test]
fn test_cursor_stops_early() {
    let conn = connection();
    let mut seen = Vec::new();
    conn.cursor("select id from users order by id", &[], |row| {
        seen.push(row["id"].clone());
        ControlFlow::Break(())
    })
    .unwrap();

    assert_eq!(seen, vec![json!(1)]);
}

// ============================================================================
// Write Tests
// ============================================================================

#[test]
fn test_affecting_statement_reports_changed_rows() {
    assert!(!DuckDbConnection::open_in_memory()
        .unwrap()
        .records_have_been_modified());

    let conn = connection();
    let updated = conn
        .update("update users set name = upper(name) where id > ?", &[json!(0)])
        .unwrap();
    assert_eq!(updated, 2);

    let deleted = conn
        .delete("delete from users where id = ?", &[json!(2)])
        .unwrap();
    assert_eq!(deleted, 1);

    let none = conn
        .delete("delete from users where id = ?", &[json!(42)])
        .unwrap();
    assert_eq!(none, 0);
}

#[test]
fn test_statement_batch_distributes_bindings() {
    let conn = connection();
    conn.statement(
        "insert into users (id, name) values (?, ?); insert into users (id, name) values (?, ?)",
        &[json!(3), json!("carol"), json!(4), json!("dave")],
    )
    .unwrap();

    let rows = conn
        .select("select name from users where id >= 3 order by id", &[])
        .unwrap();
    assert_eq!(rows[0]["name"], json!("carol"));
    assert_eq!(rows[1]["name"], json!("dave"));
}

#[test]
fn test_statement_batch_rejects_leftover_bindings() {
    let conn = connection();
    let err = conn
        .statement("select 1; select 2", &[json!(1), json!(2)])
        .unwrap_err();
    assert!(matches!(err, crate::error::Error::InvalidQuery { .. }), "got {err:?}");
}

#[test]
fn test_insert_with_semicolon_in_literal() {
    let conn = connection();
    conn.insert("insert into users (id, name) values (3, 'x; drop')", &[])
        .unwrap();

    let row = conn
        .select_one("select name from users where id = 3", &[])
        .unwrap()
        .unwrap();
    assert_eq!(row["name"], json!("x; drop"));
}

#[test]
fn test_writes_mark_records_modified() {
    let conn = DuckDbConnection::open_in_memory().unwrap();
    conn.statement("create table t (id integer)", &[]).unwrap();
    assert!(conn.records_have_been_modified());

    let conn = DuckDbConnection::open_in_memory().unwrap();
    conn.unprepared("create table t (id integer)").unwrap();
    assert!(conn.records_have_been_modified());

    let conn = DuckDbConnection::open_in_memory().unwrap();
    conn.raw().execute_batch("create table t (id integer)").unwrap();
    assert_eq!(conn.delete("delete from t", &[]).unwrap(), 0);
    assert!(!conn.records_have_been_modified());

    conn.pretend(|c| {
        c.statement("insert into t values (1)", &[])?;
        c.unprepared("insert into t values (2)")?;
        Ok(())
    })
    .unwrap();
    assert!(!conn.records_have_been_modified());

    conn.raw().execute_batch("insert into t values (1)").unwrap();
    assert_eq!(conn.delete("delete from t", &[]).unwrap(), 1);
    assert!(conn.records_have_been_modified());
}

#[test]
fn test_insert_constraint_error_propagates_as_engine_error() {
    let conn = connection();
    let err = conn
        .insert("insert into users (id, name) values (?, ?)", &[json!(1), json!("dup")])
        .unwrap_err();
    assert!(matches!(err, crate::error::Error::Engine(_)));
}

// ============================================================================
// Pretend / Log Tests
// ============================================================================

#[test]
fn test_pretend_logs_without_executing() {
    let conn = connection();
    let logged = conn
        .pretend(|c| {
            assert!(c.select("select * from users", &[]).unwrap().is_empty());
            assert_eq!(c.delete("delete from users", &[]).unwrap(), 0);
            assert!(c.unprepared("drop table users").unwrap());
            assert!(c.statement("drop table users", &[]).unwrap());
            assert!(c.insert("insert into users (id) values (?)", &[json!(9)]).unwrap());
            Ok(())
        })
        .unwrap();

    assert_eq!(logged.len(), 5);
    assert_eq!(logged[1].query, "delete from users");
    assert!(!conn.pretending());

    let count = conn.select("select count(*) as n from users", &[]).unwrap();
    assert_eq!(count[0]["n"], json!(2));
}

#[test]
fn test_query_log() {
    let conn = connection();
    assert!(conn.query_log().is_empty());

    conn.enable_query_log();
    conn.select("select * from users where id = ?", &[json!(1)])
        .unwrap();
    let log = conn.query_log();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].bindings, vec![json!(1)]);
    assert!(log[0].time_ms >= 0.0);

    conn.flush_query_log();
    conn.disable_query_log();
    conn.select("select 1", &[]).unwrap();
    assert!(conn.query_log().is_empty());
}

// ============================================================================
// Accessor Tests
// ============================================================================

#[test]
fn test_accessors() {
    let config = ConnectionConfig::in_memory()
        .with_name("analytics")
        .with_prefix("a_")
        .with_option("threads", 1);
    let conn = DuckDbConnection::connect(config).unwrap();

    assert_eq!(conn.name(), Some("analytics"));
    assert_eq!(conn.database_name(), ":memory:");
    assert_eq!(conn.table_prefix(), "a_");
    assert_eq!(conn.driver_name(), "duckdb");
    assert_eq!(conn.config_value("threads"), Some(&json!(1)));
    assert!(conn.server_version().unwrap().starts_with('v'));
}
