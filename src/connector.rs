//! Connector trait and the DuckDB connector
//!
//! A connector turns a `ConnectionConfig` into a live engine handle.
//! Failures raised by the engine while opening are re-signalled as
//! `Error::Connection` so callers can recognise them uniformly.

use crate::config::ConnectionConfig;
use crate::error::{Error, Result};
use duckdb::{Config, Connection};

/// Opens native engine handles from configuration
pub trait Connector {
    /// Establish a database connection
    fn connect(&self, config: &ConnectionConfig) -> Result<Connection>;
}

/// Connector for DuckDB databases (file-backed or in-memory)
#[derive(Debug, Clone, Copy, Default)]
pub struct DuckDbConnector;

impl DuckDbConnector {
    /// Create a new connector
    pub fn new() -> Self {
        Self
    }

    /// Build the engine config from the option bag
    fn engine_config(options: &[(String, String)]) -> Result<Config> {
        options
            .iter()
            .try_fold(Config::default(), |config, (key, value)| {
                config.with(key, value)
            })
            .map_err(Error::connection)
    }
}

impl Connector for DuckDbConnector {
    fn connect(&self, config: &ConnectionConfig) -> Result<Connection> {
        let options = config.engine_options()?;

        let conn = if options.is_empty() {
            if config.is_in_memory() {
                Connection::open_in_memory()
            } else {
                Connection::open(&config.database)
            }
        } else {
            let engine_config = Self::engine_config(&options)?;
            if config.is_in_memory() {
                Connection::open_in_memory_with_flags(engine_config)
            } else {
                Connection::open_with_flags(&config.database, engine_config)
            }
        }
        .map_err(Error::connection)?;

        tracing::info!(
            connection = config.name.as_deref().unwrap_or_default(),
            database = %config.database,
            options = options.len(),
            "Opened DuckDB connection"
        );

        Ok(conn)
    }
}
