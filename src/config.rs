use std::path::Path;
use std::time::Duration;
use std::{env, fmt, fs};

use serde::Deserialize;

/// Connection settings for the build server under test.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server root, with or without a trailing slash.
    pub base_url: String,
    /// Elevated token used by superuser Specifications.
    pub superuser_token: String,
    /// Transport timeout in seconds. No retry policy exists on top of it.
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8111".to_string(),
            superuser_token: String::new(),
            timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Read settings from `FORGECHECK_*` environment variables, falling back
    /// to defaults per field.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("FORGECHECK_BASE_URL").unwrap_or(defaults.base_url),
            superuser_token: env::var("FORGECHECK_SUPERUSER_TOKEN")
                .unwrap_or(defaults.superuser_token),
            timeout_secs: env::var("FORGECHECK_TIMEOUT_SECS")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }

    /// Read settings from a YAML file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|e| ConfigError {
            message: format!("failed to read {}: {e}", path.display()),
        })?;
        serde_yaml::from_str(&raw).map_err(|e| ConfigError {
            message: format!("failed to parse {}: {e}", path.display()),
        })
    }

    /// Resolve the active configuration: the file named by
    /// `FORGECHECK_CONFIG` when set, environment variables otherwise.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a configured file cannot be loaded.
    pub fn load() -> Result<Self, ConfigError> {
        match env::var("FORGECHECK_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path)),
            Err(_) => Ok(Self::from_env()),
        }
    }
}

/// Error loading the server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ConfigError {}
