//! Integration tests against an in-memory DuckDB
//!
//! Tests the full end-to-end flow: Query → grammar → connection → DuckDB → rows

use duckdb_adapter::query::raw;
use duckdb_adapter::{
    ConnectionConfig, DatabaseConnection, DuckDbConnection, Error, Query, TableInfo, Values,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn connection() -> DuckDbConnection {
    let conn = DuckDbConnection::open_in_memory().unwrap();
    conn.schema_builder()
        .create("users", |table| {
            table.id();
            table.string("email", 255).unique();
            table.string("name", 100).nullable();
            table.timestamp("deleted_at").nullable();
            table.date("born_on").nullable();
        })
        .unwrap();
    conn
}

fn user(email: &str, name: &str) -> Values {
    Values::new().set("email", email).set("name", name)
}

// ============================================================================
// Query Builder Round Trips
// ============================================================================

#[test]
fn test_insert_and_get() {
    let conn = connection();
    let users = Query::table("users");

    users
        .insert(&conn, &[user("a@x.io", "Alice"), user("b@x.io", "Bob")])
        .unwrap();

    let rows = users.clone().order_by("id").get(&conn).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["email"], json!("a@x.io"));
    assert_eq!(rows[0]["id"], json!(1));
    assert_eq!(rows[1]["id"], json!(2));
    assert_eq!(users.count(&conn).unwrap(), 2);
}

#[test]
fn test_insert_get_id_uses_sequence() {
    let conn = connection();
    let users = Query::table("users");

    let first = users
        .insert_get_id(&conn, &user("a@x.io", "Alice"), "id")
        .unwrap();
    let second = users
        .insert_get_id(&conn, &user("b@x.io", "Bob"), "id")
        .unwrap();

    assert_eq!(first, Some(json!(1)));
    assert_eq!(second, Some(json!(2)));
}

#[test]
fn test_insert_or_ignore_skips_duplicates() {
    let conn = connection();
    let users = Query::table("users");
    users.insert(&conn, &[user("a@x.io", "Alice")]).unwrap();

    let inserted = users
        .insert_or_ignore(
            &conn,
            &[
                Values::new().set("id", 1).set("email", "dup@x.io").set("name", "Dup"),
                Values::new().set("id", 5).set("email", "c@x.io").set("name", "Carol"),
            ],
        )
        .unwrap();

    assert_eq!(inserted, 1);
    assert_eq!(users.count(&conn).unwrap(), 2);
}

#[test]
fn test_null_predicates() {
    let conn = connection();
    let users = Query::table("users");
    users
        .insert(&conn, &[user("a@x.io", "Alice"), user("b@x.io", "Bob")])
        .unwrap();
    users
        .clone()
        .where_eq("email", "b@x.io")
        .update(&conn, &Values::new().set("deleted_at", raw("timestamp '2024-01-01 00:00:00'")))
        .unwrap();

    let active = users.clone().where_null("deleted_at").pluck(&conn, "email").unwrap();
    assert_eq!(active, vec![json!("a@x.io")]);

    let deleted = users.clone().where_not_null("deleted_at").pluck(&conn, "email").unwrap();
    assert_eq!(deleted, vec![json!("b@x.io")]);
}

#[test]
fn test_date_part_predicates() {
    let conn = connection();
    let users = Query::table("users");
    users
        .insert(
            &conn,
            &[
                user("a@x.io", "Alice").set("born_on", "1990-05-17"),
                user("b@x.io", "Bob").set("born_on", "2001-12-03"),
            ],
        )
        .unwrap();

    let by_year = users.clone().where_year("born_on", ">", 2000).pluck(&conn, "name").unwrap();
    assert_eq!(by_year, vec![json!("Bob")]);

    let by_month = users.clone().where_month("born_on", "=", 5).pluck(&conn, "name").unwrap();
    assert_eq!(by_month, vec![json!("Alice")]);

    let by_day = users.clone().where_day("born_on", "=", 3).pluck(&conn, "name").unwrap();
    assert_eq!(by_day, vec![json!("Bob")]);
}

#[test]
fn test_update_delete_counts_and_exists() {
    let conn = connection();
    let users = Query::table("users");
    users
        .insert(
            &conn,
            &[user("a@x.io", "Alice"), user("b@x.io", "Bob"), user("c@x.io", "Carol")],
        )
        .unwrap();

    let updated = users
        .clone()
        .where_in("email", ["a@x.io", "b@x.io"])
        .update(&conn, &Values::new().set("name", "Renamed"))
        .unwrap();
    assert_eq!(updated, 2);

    let deleted = users.clone().where_eq("name", "Renamed").delete(&conn).unwrap();
    assert_eq!(deleted, 2);

    assert!(users.clone().where_eq("email", "c@x.io").exists(&conn).unwrap());
    assert!(!users.clone().where_eq("email", "a@x.io").exists(&conn).unwrap());

    let first = users.first(&conn).unwrap().unwrap();
    assert_eq!(first["name"], json!("Carol"));
}

// ============================================================================
// Schema Introspection
// ============================================================================

#[test]
fn test_get_tables_reports_duckdb_engine() {
    let conn = DuckDbConnection::open_in_memory().unwrap();
    conn.statement("create table users (id integer); create table posts (id integer)", &[])
        .unwrap();

    let tables = conn.schema_builder().get_tables().unwrap();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0], TableInfo::duckdb("posts"));
    assert_eq!(tables[1], TableInfo::duckdb("users"));
    assert_eq!(
        serde_json::to_value(&tables[0]).unwrap(),
        json!({
            "name": "posts",
            "schema": null,
            "size": null,
            "comment": null,
            "collation": null,
            "engine": "duckdb"
        })
    );
}

// ============================================================================
// Connection Errors
// ============================================================================

#[test]
fn test_invalid_config_raises_connection_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = ConnectionConfig::file(dir.path().join("no").join("such").join("db.duckdb"));

    let err = DuckDbConnection::connect(config).unwrap_err();
    assert!(matches!(err, Error::Connection { .. }), "got {err:?}");
}

#[test]
fn test_invalid_engine_option_raises_connection_error() {
    let config = ConnectionConfig::in_memory().with_option("threads", "not-a-number");

    let err = DuckDbConnection::connect(config).unwrap_err();
    assert!(err.is_connection_error(), "got {err:?}");
}

#[test]
fn test_query_errors_are_not_connection_errors() {
    let conn = DuckDbConnection::open_in_memory().unwrap();
    let err = conn.select("select * from missing_table", &[]).unwrap_err();
    assert!(matches!(err, Error::Engine(_)), "got {err:?}");
}
