/// Console configuration
use crate::error::{ConsoleError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "roster.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_api")]
    pub api: ApiSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Keep all state in memory for this run
    #[serde(default)]
    pub ephemeral: bool,
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ConsoleConfig {
    /// Load configuration from file and environment.
    ///
    /// An explicit `path` must exist; without one, `roster.toml` in the
    /// working directory is used if present. `ROSTER_*` variables override
    /// file values, with `__` between nested keys
    /// (`ROSTER_API__BASE_URL`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConsoleError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (prefixed with ROSTER_)
        settings = settings.add_source(
            config::Environment::with_prefix("ROSTER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ConsoleError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ConsoleError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConsoleError::Config(
                "API base URL is required (set ROSTER_API__BASE_URL)".to_string(),
            ));
        }

        if self.api.timeout_secs == 0 {
            return Err(ConsoleError::Config(
                "API timeout must be at least one second".to_string(),
            ));
        }

        if !self.storage.ephemeral && self.storage.database_url.trim().is_empty() {
            return Err(ConsoleError::Config(
                "Database URL is required unless storage is ephemeral".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_api() -> ApiSettings {
    ApiSettings {
        base_url: default_base_url(),
        api_key: None,
        timeout_secs: default_timeout_secs(),
    }
}

fn default_base_url() -> String {
    "https://reqres.in/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
        ephemeral: false,
    }
}

fn default_database_url() -> String {
    "sqlite://./data/roster.db".to_string()
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api: default_api(),
            storage: default_storage(),
        }
    }
}
