//! Query module
//!
//! Builds generic queries and compiles them into DuckDB SQL.
//!
//! # Overview
//!
//! - `Query` - fluent, pure description of a select/insert/update/delete
//! - `QueryGrammar` - compiles a `Query` into DuckDB SQL
//! - `Processor` / `DuckDbProcessor` - reshape result rows

mod builder;
mod grammar;
mod processor;

pub use builder::{
    insert_bindings, raw, Boolean, DatePart, Direction, Order, Query, Values, WhereClause,
};
pub use grammar::QueryGrammar;
pub use processor::{DuckDbProcessor, Processor};
