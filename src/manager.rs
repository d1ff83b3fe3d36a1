//! Named connection management
//!
//! Resolves connection names against a `DatabaseConfig`, opens each one
//! through a `Connector` on first use and keeps it until disconnected.

use crate::config::DatabaseConfig;
use crate::connection::DuckDbConnection;
use crate::connector::{Connector, DuckDbConnector};
use crate::error::Result;
use std::collections::HashMap;

/// Opens and caches DuckDB connections by name
pub struct DatabaseManager<K: Connector = DuckDbConnector> {
    config: DatabaseConfig,
    connector: K,
    connections: HashMap<String, DuckDbConnection>,
}

impl DatabaseManager<DuckDbConnector> {
    /// Manager using the DuckDB connector
    pub fn new(config: DatabaseConfig) -> Self {
        Self::with_connector(config, DuckDbConnector::new())
    }
}

impl<K: Connector> DatabaseManager<K> {
    /// Manager using a custom connector
    pub fn with_connector(config: DatabaseConfig, connector: K) -> Self {
        Self {
            config,
            connector,
            connections: HashMap::new(),
        }
    }

    /// Name of the default connection
    pub fn default_connection(&self) -> &str {
        &self.config.default
    }

    /// Configured connection names
    pub fn connection_names(&self) -> Vec<&str> {
        self.config.connections.keys().map(String::as_str).collect()
    }

    /// Whether a connection is currently open
    pub fn is_connected(&self, name: &str) -> bool {
        self.connections.contains_key(name)
    }

    /// Get a connection by name (the default when `None`), opening it if needed
    pub fn connection(&mut self, name: Option<&str>) -> Result<&DuckDbConnection> {
        let name = name.unwrap_or(&self.config.default).to_string();
        if !self.connections.contains_key(&name) {
            let conn = self.make_connection(&name)?;
            self.connections.insert(name.clone(), conn);
        }
        Ok(&self.connections[&name])
    }

    /// Drop an open connection, closing its handle
    pub fn disconnect(&mut self, name: &str) -> bool {
        let removed = self.connections.remove(name).is_some();
        if removed {
            tracing::info!(connection = name, "Closed DuckDB connection");
        }
        removed
    }

    /// Close and reopen a connection
    pub fn reconnect(&mut self, name: &str) -> Result<&DuckDbConnection> {
        self.disconnect(name);
        self.connection(Some(name))
    }

    fn make_connection(&self, name: &str) -> Result<DuckDbConnection> {
        let config = self.config.connection(name)?.clone().parse(name);
        config.validate()?;

        let handle = self.connector.connect(&config)?;
        Ok(DuckDbConnection::new(handle, config))
    }
}
