//! Common types used throughout the adapter
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// One result row: column name to value, in select-list order
pub type Row = JsonObject;

/// Positional statement bindings
pub type Bindings = Vec<JsonValue>;

/// Driver name reported by connections and table listings
pub const DRIVER_NAME: &str = "duckdb";

/// Marker for an in-memory database
pub const IN_MEMORY: &str = ":memory:";

// ============================================================================
// Raw Expressions
// ============================================================================

/// Raw SQL fragment that is inserted into compiled statements verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expression(String);

impl Expression {
    /// Create a new raw expression
    pub fn new(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }

    /// The SQL text of the expression
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Query Values
// ============================================================================

/// A value placed into a statement: either a bound parameter or raw SQL
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    /// Bound as `?`
    Bind(JsonValue),
    /// Inlined verbatim
    Raw(Expression),
}

impl QueryValue {
    /// Whether this value is inlined rather than bound
    pub fn is_expression(&self) -> bool {
        matches!(self, QueryValue::Raw(_))
    }

    /// The bound value, if any
    pub fn binding(&self) -> Option<&JsonValue> {
        match self {
            QueryValue::Bind(value) => Some(value),
            QueryValue::Raw(_) => None,
        }
    }
}

impl From<Expression> for QueryValue {
    fn from(expr: Expression) -> Self {
        QueryValue::Raw(expr)
    }
}

impl From<JsonValue> for QueryValue {
    fn from(value: JsonValue) -> Self {
        QueryValue::Bind(value)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Bind(JsonValue::String(value.to_string()))
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Bind(JsonValue::String(value))
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Bind(value.into())
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        QueryValue::Bind(value.into())
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Bind(value.into())
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bind(value.into())
    }
}

// ============================================================================
// Table Metadata
// ============================================================================

/// Description of a table as reported by schema introspection
///
/// DuckDB does not model schema, size, comment or collation the way other
/// drivers do, so those fields are always `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    pub name: String,
    pub schema: Option<String>,
    pub size: Option<u64>,
    pub comment: Option<String>,
    pub collation: Option<String>,
    pub engine: String,
}

impl TableInfo {
    /// Describe a DuckDB table by name
    pub fn duckdb(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            size: None,
            comment: None,
            collation: None,
            engine: DRIVER_NAME.to_string(),
        }
    }
}
