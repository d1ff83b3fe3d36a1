//! Configuration types for DuckDB connections
//!
//! A `DatabaseConfig` holds any number of named connections and is usually
//! loaded from a YAML or JSON file. Each `ConnectionConfig` is consumed once
//! at connect time and never mutated afterwards.

use crate::error::{Error, Result};
use crate::types::{JsonValue, DRIVER_NAME, IN_MEMORY};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// ============================================================================
// Connection Config
// ============================================================================

/// Configuration for a single DuckDB connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Driver name (must be "duckdb")
    #[serde(default = "default_driver")]
    pub driver: String,

    /// Database file path, or ":memory:"
    #[serde(default = "default_database")]
    pub database: String,

    /// Prefix prepended to every table name
    #[serde(default)]
    pub prefix: String,

    /// Connection identifier
    #[serde(default)]
    pub name: Option<String>,

    /// Engine options passed straight to DuckDB (e.g. `threads`, `access_mode`)
    #[serde(default)]
    pub config: BTreeMap<String, JsonValue>,
}

fn default_driver() -> String {
    DRIVER_NAME.to_string()
}

fn default_database() -> String {
    IN_MEMORY.to_string()
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            driver: default_driver(),
            database: default_database(),
            prefix: String::new(),
            name: None,
            config: BTreeMap::new(),
        }
    }
}

impl ConnectionConfig {
    /// In-memory connection config
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// File-backed connection config
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            database: path.as_ref().to_string_lossy().into_owned(),
            ..Self::default()
        }
    }

    /// Set the table prefix
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the connection name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add an engine option
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Prepare a config for connecting under `name`.
    ///
    /// Keeps an explicit `name` if one is set.
    pub fn parse(mut self, name: &str) -> Self {
        if self.name.is_none() {
            self.name = Some(name.to_string());
        }
        self
    }

    /// Whether this config targets an in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.database.is_empty() || self.database == IN_MEMORY
    }

    /// Engine options rendered as DuckDB setting strings
    pub fn engine_options(&self) -> Result<Vec<(String, String)>> {
        self.config
            .iter()
            .map(|(key, value)| {
                let rendered = match value {
                    JsonValue::String(s) => s.clone(),
                    JsonValue::Bool(b) => b.to_string(),
                    JsonValue::Number(n) => n.to_string(),
                    JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => {
                        return Err(Error::InvalidConfigValue {
                            field: format!("config.{key}"),
                            message: "engine options must be scalar".to_string(),
                        });
                    }
                };
                Ok((key.clone(), rendered))
            })
            .collect()
    }

    /// Validate the parts of the config the adapter itself owns
    pub fn validate(&self) -> Result<()> {
        if self.driver != DRIVER_NAME {
            return Err(Error::UnsupportedDriver {
                driver: self.driver.clone(),
            });
        }
        self.engine_options()?;
        Ok(())
    }
}

// ============================================================================
// Database Config (all connections)
// ============================================================================

/// Named connection configurations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Name of the connection used when none is requested
    #[serde(default = "default_connection_name")]
    pub default: String,

    /// Connection configs keyed by name
    #[serde(default)]
    pub connections: BTreeMap<String, ConnectionConfig>,
}

fn default_connection_name() -> String {
    DRIVER_NAME.to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            default: default_connection_name(),
            connections: BTreeMap::new(),
        }
    }
}

impl DatabaseConfig {
    /// Config holding a single connection that is also the default
    pub fn single(name: impl Into<String>, connection: ConnectionConfig) -> Self {
        let name = name.into();
        let mut connections = BTreeMap::new();
        connections.insert(name.clone(), connection);
        Self {
            default: name,
            connections,
        }
    }

    /// Parse from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a file, choosing the format by extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("yaml" | "yml") | None => Self::from_yaml_str(&content),
            Some(other) => Err(Error::config(format!(
                "Unsupported config file extension: {other}"
            ))),
        }
    }

    /// Look up a connection config by name
    pub fn connection(&self, name: &str) -> Result<&ConnectionConfig> {
        self.connections
            .get(name)
            .ok_or_else(|| Error::ConnectionNotConfigured {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = ConnectionConfig::default();
        assert_eq!(config.driver, "duckdb");
        assert_eq!(config.database, ":memory:");
        assert_eq!(config.prefix, "");
        assert!(config.name.is_none());
        assert!(config.is_in_memory());
    }

    #[test]
    fn test_parse_sets_name_once() {
        let config = ConnectionConfig::in_memory().parse("analytics");
        assert_eq!(config.name.as_deref(), Some("analytics"));

        let config = ConnectionConfig::in_memory()
            .with_name("explicit")
            .parse("analytics");
        assert_eq!(config.name.as_deref(), Some("explicit"));
    }

    #[test]
    fn test_engine_options_rendering() {
        let config = ConnectionConfig::in_memory()
            .with_option("threads", 4)
            .with_option("access_mode", "READ_WRITE")
            .with_option("enable_progress_bar", false);

        let options = config.engine_options().unwrap();
        assert_eq!(
            options,
            vec![
                ("access_mode".to_string(), "READ_WRITE".to_string()),
                ("enable_progress_bar".to_string(), "false".to_string()),
                ("threads".to_string(), "4".to_string()),
            ]
        );
    }

    #[test]
    fn test_engine_options_reject_nested_values() {
        let config = ConnectionConfig::in_memory().with_option("threads", json!([1, 2]));
        assert!(config.engine_options().is_err());
    }

    #[test]
    fn test_validate_rejects_other_drivers() {
        let config = ConnectionConfig {
            driver: "sqlite".to_string(),
            ..ConnectionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::UnsupportedDriver { .. })
        ));
    }

    #[test]
    fn test_database_config_default_matches_serde_default() {
        let built = DatabaseConfig::default();
        let parsed = DatabaseConfig::from_yaml_str("connections: {}").unwrap();
        assert_eq!(built.default, "duckdb");
        assert_eq!(built, parsed);
    }

    #[test]
    fn test_empty_database_is_in_memory() {
        let config = ConnectionConfig::file("");
        assert!(config.is_in_memory());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_database_config_from_yaml() {
        let yaml = r#"
default: analytics
connections:
  analytics:
    database: /tmp/analytics.duckdb
    prefix: app_
    config:
      threads: 2
  scratch: {}
"#;
        let config = DatabaseConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.default, "analytics");

        let analytics = config.connection("analytics").unwrap();
        assert_eq!(analytics.database, "/tmp/analytics.duckdb");
        assert_eq!(analytics.prefix, "app_");
        assert_eq!(analytics.config.get("threads"), Some(&json!(2)));

        let scratch = config.connection("scratch").unwrap();
        assert!(scratch.is_in_memory());

        assert!(matches!(
            config.connection("missing"),
            Err(Error::ConnectionNotConfigured { .. })
        ));
    }

    #[test]
    fn test_database_config_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        std::fs::write(
            &path,
            r#"{"connections": {"duckdb": {"database": ":memory:", "prefix": "t_"}}}"#,
        )
        .unwrap();

        let config = DatabaseConfig::from_file(&path).unwrap();
        assert_eq!(config.default, "duckdb");
        assert_eq!(config.connection("duckdb").unwrap().prefix, "t_");
    }

    #[test]
    fn test_database_config_missing_file() {
        let result = DatabaseConfig::from_file("/definitely/not/here.yaml");
        assert!(matches!(result, Err(Error::FileNotFound { .. })));
    }
}
