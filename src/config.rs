use anyhow::{Context, Result};
use boardapi::{Credentials, DEFAULT_API_BASE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::paths;

// ============================================================================
// Settings
// ============================================================================

/// Contents of `config.toml`
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub credentials: CredentialSettings,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

#[derive(Default, Serialize, Deserialize)]
pub struct CredentialSettings {
    pub key: Option<String>,
    pub token: Option<String>,
}

impl fmt::Debug for CredentialSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSettings")
            .field("key", &self.key)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Settings {
    /// Load `config.toml` from the config directory
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_file()?)
    }

    /// Load settings from `path`, or defaults if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read config file: {}", path.display()))?;
        let settings: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid TOML in config file: {}", path.display()))?;

        log::debug!("Loaded config from {}", path.display());
        Ok(settings)
    }

    /// Resolve API credentials; flags (or their env vars) win over the file
    pub fn credentials(&self, key: Option<&str>, token: Option<&str>) -> Result<Credentials> {
        let key = key
            .map(str::to_string)
            .or_else(|| self.credentials.key.clone())
            .filter(|k| !k.trim().is_empty());
        let token = token
            .map(str::to_string)
            .or_else(|| self.credentials.token.clone())
            .filter(|t| !t.trim().is_empty());

        match (key, token) {
            (Some(key), Some(token)) => Ok(Credentials::new(key, token)),
            (key, _) => {
                let missing = if key.is_none() { "API key" } else { "API token" };
                anyhow::bail!(
                    "No Trello {missing} configured. Pass --key/--token, set \
                     TRELLO_API_KEY/TRELLO_TOKEN, or add a [credentials] section to config.toml"
                )
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
