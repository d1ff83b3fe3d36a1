// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]

//! # DuckDB Adapter
//!
//! DuckDB driver for a generic SQL database abstraction layer.
//! Compiles generic queries into DuckDB's dialect and bridges the native
//! `duckdb::Connection` to a statement-level connection contract.
//!
//! ## Features
//!
//! - **Query Grammar**: double-quoted identifiers, insert-or-ignore, null and date-part predicates
//! - **Connection Bridge**: select / insert / update / delete / statement / unprepared, rows as JSON objects
//! - **Schema Builder**: create/drop tables, table and column listings
//! - **Named Connections**: YAML/JSON config, connect on first use
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use duckdb_adapter::{ConnectionConfig, DatabaseConnection, DuckDbConnection, Query, Values};
//!
//! let conn = DuckDbConnection::connect(ConnectionConfig::in_memory())?;
//!
//! conn.schema_builder().create("users", |table| {
//!     table.id();
//!     table.string("email", 255).unique();
//!     table.timestamp("deleted_at").nullable();
//! })?;
//!
//! Query::table("users").insert(&conn, &[Values::new().set("email", "a@example.com")])?;
//!
//! let active = Query::table("users").where_null("deleted_at").get(&conn)?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  DatabaseManager: named configs → connections (open once)   │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │ Connector::connect
//! ┌──────────────────────────────┴───────────────────────────────┐
//! │  DuckDbConnection (DatabaseConnection)                       │
//! │  select · statement · affecting_statement · unprepared       │
//! ├───────────────┬───────────────┬───────────────┬──────────────┤
//! │ QueryGrammar  │ SchemaGrammar │ Processor     │ duckdb handle│
//! └───────────────┴───────────────┴───────────────┴──────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Connection configuration
pub mod config;

/// Connector trait and DuckDB connector
pub mod connector;

/// Identifier wrapping shared by the grammars
pub mod grammar;

/// Query builder, grammar and result processor
pub mod query;

/// Schema grammar and builder
pub mod schema;

/// Connection adapter
pub mod connection;

/// Named connection management
pub mod manager;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::{ConnectionConfig, DatabaseConfig};
pub use connection::{DatabaseConnection, DuckDbConnection, QueryLogEntry};
pub use connector::{Connector, DuckDbConnector};
pub use manager::DatabaseManager;
pub use query::{DuckDbProcessor, Processor, Query, QueryGrammar, Values};
pub use schema::{Blueprint, SchemaBuilder, SchemaGrammar};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
