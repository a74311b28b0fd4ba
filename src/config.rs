//! Registration Desk Configuration
//!
//! Defines:
//! - The sheet endpoint rows are posted to
//! - The login credential pair
//! - How long a success message stays visible

use crate::auth::Credentials;
use crate::controller::DEFAULT_RESET_DELAY;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Shipped value: deliberately unusable until replaced
pub const PLACEHOLDER_ENDPOINT: &str = "https://sheetdb.io/api/v1/PASTE_YOUR_API_ID";

pub const CONFIG_FILE_NAME: &str = "regdesk.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Sheet API URL (SheetDB, Sheet.best, ...)
    pub endpoint: Option<String>,
    /// Seconds before a success message reverts to idle
    pub reset_delay_secs: u64,
    pub credentials: Credentials,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: Some(PLACEHOLDER_ENDPOINT.to_string()),
            reset_delay_secs: DEFAULT_RESET_DELAY.as_secs(),
            credentials: Credentials::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        Self::from_toml(path, &content)
    }

    /// Load `path` if given, else `./regdesk.toml` if present, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let local = Path::new(CONFIG_FILE_NAME);
                if local.exists() {
                    Self::load(local)
                } else {
                    debug!("No config file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_secs(self.reset_delay_secs)
    }
}
