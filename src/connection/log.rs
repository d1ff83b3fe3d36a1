//! Executed-statement log

use crate::types::Bindings;
use serde::{Deserialize, Serialize};

/// One executed (or pretended) statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryLogEntry {
    /// SQL text
    pub query: String,
    /// Bound values
    pub bindings: Bindings,
    /// Wall time in milliseconds
    pub time_ms: f64,
}

impl QueryLogEntry {
    pub fn new(query: impl Into<String>, bindings: Bindings, time_ms: f64) -> Self {
        Self {
            query: query.into(),
            bindings,
            time_ms,
        }
    }
}
