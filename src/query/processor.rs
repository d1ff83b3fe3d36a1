//! Result post-processing
//!
//! Reshapes raw result rows into what callers expect, mostly flattening
//! listing queries into plain name lists.

use crate::types::{JsonValue, Row};

/// Post-processes rows returned by the engine
pub trait Processor {
    /// Rows of a select, as returned to the caller
    fn process_select(&self, results: Vec<Row>) -> Vec<Row> {
        results
    }

    /// Generated key from an insert's `returning` row
    fn process_insert_get_id(&self, results: Vec<Row>, key: &str) -> Option<JsonValue> {
        results.into_iter().next().and_then(|mut row| row.remove(key))
    }

    /// Column names from a column listing query
    fn process_column_listing(&self, results: &[Row]) -> Vec<String>;

    /// Names from a table (or other object) listing query
    fn process_listing(&self, results: &[Row]) -> Vec<String>;
}

/// Processor for DuckDB listing queries, which expose a `name` column
#[derive(Debug, Clone, Copy, Default)]
pub struct DuckDbProcessor;

impl DuckDbProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Processor for DuckDbProcessor {
    fn process_column_listing(&self, results: &[Row]) -> Vec<String> {
        names(results)
    }

    fn process_listing(&self, results: &[Row]) -> Vec<String> {
        names(results)
    }
}

/// The `name` field of each row; rows without a string name are skipped
fn names(results: &[Row]) -> Vec<String> {
    results
        .iter()
        .filter_map(|row| row.get("name").and_then(JsonValue::as_str))
        .map(str::to_string)
        .collect()
}
