//! Schema builder: introspection and DDL over a connection

use super::blueprint::Blueprint;
use crate::connection::DatabaseConnection;
use crate::error::Result;
use crate::types::{JsonValue, TableInfo};

/// Runs schema queries through a connection
pub struct SchemaBuilder<'c, C: DatabaseConnection + ?Sized> {
    conn: &'c C,
}

impl<'c, C: DatabaseConnection + ?Sized> SchemaBuilder<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    /// Determine if the given table exists
    pub fn has_table(&self, table: &str) -> Result<bool> {
        let table = format!("{}{table}", self.conn.table_prefix());
        let sql = self.conn.schema_grammar().compile_table_exists();
        Ok(!self.conn.select(&sql, &[JsonValue::String(table)])?.is_empty())
    }

    /// Determine if the table has a column (case-insensitive)
    pub fn has_column(&self, table: &str, column: &str) -> Result<bool> {
        self.has_columns(table, &[column])
    }

    /// Determine if the table has every one of `columns` (case-insensitive)
    pub fn has_columns(&self, table: &str, columns: &[&str]) -> Result<bool> {
        let existing: Vec<String> = self
            .get_column_listing(table)?
            .into_iter()
            .map(|c| c.to_lowercase())
            .collect();
        Ok(columns
            .iter()
            .all(|c| existing.contains(&c.to_lowercase())))
    }

    /// Column names of a table, in definition order
    pub fn get_column_listing(&self, table: &str) -> Result<Vec<String>> {
        let sql = self.conn.schema_grammar().compile_column_listing(table);
        let results = self.conn.select(&sql, &[])?;
        Ok(self.conn.post_processor().process_column_listing(&results))
    }

    /// Names of the tables in the current schema, ordered by name
    pub fn get_table_listing(&self) -> Result<Vec<String>> {
        let sql = self.conn.schema_grammar().compile_tables();
        let results = self.conn.select(&sql, &[])?;
        Ok(self.conn.post_processor().process_listing(&results))
    }

    /// Tables in the current schema, ordered by name
    pub fn get_tables(&self) -> Result<Vec<TableInfo>> {
        Ok(self
            .get_table_listing()?
            .into_iter()
            .map(TableInfo::duckdb)
            .collect())
    }

    /// Create a table from a blueprint built by `define`
    pub fn create<F>(&self, table: &str, define: F) -> Result<()>
    where
        F: FnOnce(&mut Blueprint),
    {
        let mut blueprint = Blueprint::new(table);
        define(&mut blueprint);
        self.build(&blueprint)
    }

    /// Run the statements that create `blueprint`'s table
    pub fn build(&self, blueprint: &Blueprint) -> Result<()> {
        for sql in self.conn.schema_grammar().compile_blueprint_create(blueprint) {
            self.conn.statement(&sql, &[])?;
        }
        Ok(())
    }

    pub fn drop(&self, table: &str) -> Result<()> {
        let sql = self.conn.schema_grammar().compile_drop(table);
        self.conn.statement(&sql, &[])?;
        Ok(())
    }

    pub fn drop_if_exists(&self, table: &str) -> Result<()> {
        let sql = self.conn.schema_grammar().compile_drop_if_exists(table);
        self.conn.statement(&sql, &[])?;
        Ok(())
    }

    pub fn rename(&self, from: &str, to: &str) -> Result<()> {
        let sql = self.conn.schema_grammar().compile_rename(from, to);
        self.conn.statement(&sql, &[])?;
        Ok(())
    }
}
