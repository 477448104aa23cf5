use serde::Deserialize;

use crate::infrastructure::storage::{PostgresConfig, StorageConfig, StorageType, UnknownBackend};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageSettings,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

/// Document storage backend selection
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// `memory` or `postgres`
    pub backend: String,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

/// Settings for the HTTP-backed store used by the client commands
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            database_url: None,
            max_connections: 10,
            connect_timeout_secs: 10,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".to_string(),
            timeout_secs: 10,
        }
    }
}

impl StorageSettings {
    /// Resolve the settings into a concrete backend configuration
    pub fn storage_config(&self) -> Result<StorageConfig, config::ConfigError> {
        let storage_type: StorageType = self
            .backend
            .parse()
            .map_err(|e: UnknownBackend| config::ConfigError::Message(e.to_string()))?;

        match storage_type {
            StorageType::InMemory => Ok(StorageConfig::in_memory()),
            StorageType::Postgres => {
                let url = self.database_url.clone().ok_or_else(|| {
                    config::ConfigError::Message(
                        "storage.database_url (or DATABASE_URL) is required for postgres"
                            .to_string(),
                    )
                })?;

                Ok(StorageConfig::postgres(
                    PostgresConfig::new(url)
                        .with_max_connections(self.max_connections)
                        .with_connect_timeout(self.connect_timeout_secs),
                ))
            }
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;

        if app_config.storage.database_url.is_none() {
            app_config.storage.database_url = std::env::var("DATABASE_URL").ok();
        }

        Ok(app_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.storage.backend, "memory");
        assert_eq!(config.client.base_url, "http://localhost:4000");
        assert_eq!(config.client.timeout_secs, 10);
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config: AppConfig = config::Config::builder()
            .set_override("server.port", 5000)
            .unwrap()
            .set_override("logging.format", "json")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.storage.max_connections, 10);
    }

    #[test]
    fn test_memory_storage_config() {
        let storage = StorageSettings::default().storage_config().unwrap();
        assert_eq!(storage.storage_type(), StorageType::InMemory);
    }

    #[test]
    fn test_postgres_storage_config() {
        let settings = StorageSettings {
            backend: "postgres".to_string(),
            database_url: Some("postgres://localhost/registry".to_string()),
            max_connections: 4,
            connect_timeout_secs: 2,
        };

        match settings.storage_config().unwrap() {
            StorageConfig::Postgres(pg) => {
                assert_eq!(pg.url, "postgres://localhost/registry");
                assert_eq!(pg.max_connections, 4);
                assert_eq!(pg.connect_timeout_secs, 2);
            }
            other => panic!("Expected Postgres config, got {:?}", other),
        }
    }

    #[test]
    fn test_postgres_requires_url() {
        let settings = StorageSettings {
            backend: "postgres".to_string(),
            ..Default::default()
        };

        assert!(settings.storage_config().is_err());
    }

    #[test]
    fn test_unknown_backend() {
        let settings = StorageSettings {
            backend: "mongo".to_string(),
            ..Default::default()
        };

        let err = settings.storage_config().unwrap_err();
        assert!(err.to_string().contains("mongo"));
    }
}
