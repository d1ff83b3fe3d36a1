//! Identifier wrapping shared by the query and schema grammars
//!
//! DuckDB quotes identifiers with double quotes. Embedded quotes are doubled,
//! `*` is left alone, dotted names are wrapped segment by segment and
//! `x as y` aliases are wrapped on both sides. Table names receive the
//! connection's table prefix.

use crate::types::{JsonValue, QueryValue};

/// Character used to wrap identifiers
pub const WRAP_CHAR: char = '"';

/// Identifier and value rendering common to every DuckDB grammar
pub trait Grammar {
    /// Prefix prepended to table names
    fn table_prefix(&self) -> &str;

    /// Wrap a column or dotted `table.column` reference
    fn wrap(&self, value: &str) -> String {
        if let Some((left, right)) = split_alias(value) {
            return format!("{} as {}", self.wrap(left), wrap_value(right));
        }
        self.wrap_segments(value)
    }

    /// Wrap a table name, applying the table prefix
    fn wrap_table(&self, table: &str) -> String {
        if let Some((left, right)) = split_alias(table) {
            return format!(
                "{} as {}",
                self.wrap_table(left),
                wrap_value(&format!("{}{}", self.table_prefix(), right))
            );
        }

        match table.rsplit_once('.') {
            Some((schema, name)) => format!(
                "{}.{}",
                wrap_value(schema),
                wrap_value(&format!("{}{}", self.table_prefix(), name))
            ),
            None => wrap_value(&format!("{}{}", self.table_prefix(), table)),
        }
    }

    /// Wrap each segment of a dotted reference; the first of several is a table
    fn wrap_segments(&self, value: &str) -> String {
        let segments: Vec<&str> = value.split('.').collect();
        let count = segments.len();
        segments
            .iter()
            .enumerate()
            .map(|(i, segment)| {
                if i == 0 && count > 1 {
                    self.wrap_table(segment)
                } else {
                    wrap_value(segment)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Wrap a list of columns and join them with commas
    fn columnize<S: AsRef<str>>(&self, columns: &[S]) -> String
    where
        Self: Sized,
    {
        columns
            .iter()
            .map(|c| self.wrap(c.as_ref()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Placeholder for a value: `?` when bound, the raw SQL for expressions
    fn parameter(&self, value: &QueryValue) -> String {
        match value {
            QueryValue::Bind(_) => "?".to_string(),
            QueryValue::Raw(expr) => expr.as_str().to_string(),
        }
    }

    /// Comma separated placeholders for a list of values
    fn parameterize(&self, values: &[QueryValue]) -> String {
        values
            .iter()
            .map(|v| self.parameter(v))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Wrap a single identifier segment
pub fn wrap_value(value: &str) -> String {
    if value == "*" {
        return value.to_string();
    }
    let escaped = value.replace(WRAP_CHAR, "\"\"");
    format!("{WRAP_CHAR}{escaped}{WRAP_CHAR}")
}

/// Quote a string literal for inlining into SQL
pub fn quote_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Render a JSON value as an inline SQL literal
pub fn literal(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "null".to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => quote_string(s),
        other => quote_string(&other.to_string()),
    }
}

/// Split `left as right` (case-insensitive), if present
fn split_alias(value: &str) -> Option<(&str, &str)> {
    let lower = value.to_ascii_lowercase();
    let pos = lower.find(" as ")?;
    Some((value[..pos].trim(), value[pos + 4..].trim()))
}
