//! Connection module
//!
//! Bridges a native DuckDB handle to the statement-level contract
//! (`select`, `insert`, `update`, `delete`, `statement`, `unprepared`)
//! and shapes results into `Row`s.

mod adapter;
mod log;
mod values;

pub use adapter::{split_statements, DuckDbConnection};
pub use log::QueryLogEntry;
pub use values::{duckdb_to_json, json_to_duckdb};

use crate::error::Result;
use crate::query::{Processor, QueryGrammar};
use crate::schema::SchemaGrammar;
use crate::types::{JsonValue, Row};

/// Statement-level contract a database connection fulfils
pub trait DatabaseConnection {
    /// Run a select and return every row
    fn select(&self, query: &str, bindings: &[JsonValue]) -> Result<Vec<Row>>;

    /// Run a select and return the first row
    fn select_one(&self, query: &str, bindings: &[JsonValue]) -> Result<Option<Row>> {
        Ok(self.select(query, bindings)?.into_iter().next())
    }

    /// Run an insert
    fn insert(&self, query: &str, bindings: &[JsonValue]) -> Result<bool> {
        self.statement(query, bindings)
    }

    /// Run an update, returning the number of changed rows
    fn update(&self, query: &str, bindings: &[JsonValue]) -> Result<usize> {
        self.affecting_statement(query, bindings)
    }

    /// Run a delete, returning the number of removed rows
    fn delete(&self, query: &str, bindings: &[JsonValue]) -> Result<usize> {
        self.affecting_statement(query, bindings)
    }

    /// Execute one or more `;`-separated statements
    fn statement(&self, query: &str, bindings: &[JsonValue]) -> Result<bool>;

    /// Execute a statement and return the number of affected rows
    fn affecting_statement(&self, query: &str, bindings: &[JsonValue]) -> Result<usize>;

    /// Execute raw SQL without preparing it
    fn unprepared(&self, query: &str) -> Result<bool>;

    fn table_prefix(&self) -> &str;

    fn query_grammar(&self) -> &QueryGrammar;

    fn schema_grammar(&self) -> &SchemaGrammar;

    fn post_processor(&self) -> &dyn Processor;
}

#[cfg(test)]
mod tests;
