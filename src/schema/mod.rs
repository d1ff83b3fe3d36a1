//! Schema module
//!
//! Table creation and introspection for DuckDB.
//!
//! # Overview
//!
//! - `Blueprint` - columns of a table to create
//! - `SchemaGrammar` - compiles blueprints and listing queries
//! - `SchemaBuilder` - runs them through a connection

mod blueprint;
mod builder;
mod grammar;

pub use blueprint::{Blueprint, ColumnDefinition, ColumnType};
pub use builder::SchemaBuilder;
pub use grammar::SchemaGrammar;
