//! Error types for the DuckDB adapter
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for the DuckDB adapter
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Connection Errors
    // ============================================================================
    /// The engine refused to open a database handle.
    ///
    /// This is the only engine error the adapter re-signals; everything raised
    /// after connect surfaces as [`Error::Engine`].
    #[error("Connection failed: {message}")]
    Connection {
        message: String,
        code: Option<i32>,
        #[source]
        source: duckdb::Error,
    },

    #[error("Database connection [{name}] not configured")]
    ConnectionNotConfigured { name: String },

    #[error("Unsupported driver [{driver}]")]
    UnsupportedDriver { driver: String },

    // ============================================================================
    // Engine Errors
    // ============================================================================
    #[error(transparent)]
    Engine(#[from] duckdb::Error),

    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },
}

impl Error {
    /// Wrap an engine error raised while opening a handle
    pub fn connection(source: duckdb::Error) -> Self {
        let code = match &source {
            duckdb::Error::DuckDBFailure(ffi_err, _) => {
                i32::try_from(ffi_err.extended_code).ok()
            }
            _ => None,
        };
        Self::Connection {
            message: source.to_string(),
            code,
            source,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid query error
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    /// Check if this error was raised while connecting
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Error::Connection { .. })
    }
}

/// Result type alias for the DuckDB adapter
pub type Result<T> = std::result::Result<T, Error>;
