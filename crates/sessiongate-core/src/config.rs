//! Configuration management.
//!
//! Two layers:
//! - `GatewayConfig`: login redirect URL and development token, supplied by
//!   the environment (`SESSIONGATE_LOGIN_REDIRECT`,
//!   `SESSIONGATE_DEV_ACCESS_TOKEN`)
//! - `AppConfig`: which storage backend to use and which origin to scope it
//!   to, stored at `~/.config/sessiongate/config.json`

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, Result};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "sessiongate";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const ENV_LOGIN_REDIRECT: &str = "SESSIONGATE_LOGIN_REDIRECT";
pub const ENV_DEV_ACCESS_TOKEN: &str = "SESSIONGATE_DEV_ACCESS_TOKEN";
pub const ENV_STORE: &str = "SESSIONGATE_STORE";
pub const ENV_ORIGIN: &str = "SESSIONGATE_ORIGIN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct GatewayConfig {
    /// Where to send the client when no token is stored
    pub login_url: String,
    /// Token written by the development seeding helper
    pub dev_token: Option<String>,
}

impl GatewayConfig {
    pub fn new(login_url: impl Into<String>) -> Self {
        Self {
            login_url: login_url.into(),
            dev_token: None,
        }
    }

    pub fn with_dev_token(mut self, dev_token: impl Into<String>) -> Self {
        self.dev_token = Some(dev_token.into());
        self
    }

    /// Read from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read through an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let login_url = non_empty(ENV_LOGIN_REDIRECT).ok_or(GatewayError::MissingLoginUrl)?;
        Ok(Self {
            login_url,
            dev_token: non_empty(ENV_DEV_ACCESS_TOKEN),
        })
    }
}

/// Persistent backends selectable from configuration.
///
/// `MemoryStorage` is not listed: it does not outlive the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    File,
    Keyring,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "file" => Ok(Self::File),
            "keyring" | "keychain" => Ok(Self::Keyring),
            other => Err(format!("unknown store '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreKind,
    pub origin: Option<String>,
}

impl AppConfig {
    /// Load from the user config directory, falling back to defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply `SESSIONGATE_STORE` / `SESSIONGATE_ORIGIN` overrides
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(store) = lookup(ENV_STORE).and_then(|s| s.parse::<StoreKind>().ok()) {
            self.store = store;
        }
        if let Some(origin) = lookup(ENV_ORIGIN).filter(|o| !o.is_empty()) {
            self.origin = Some(origin);
        }
        self
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            GatewayError::Storage("Could not find config directory".to_string())
        })?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Cache directory for this origin's file storage
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| GatewayError::Storage("Could not find cache directory".to_string()))?;
        Ok(self.cache_dir_under(&cache_dir))
    }

    pub fn cache_dir_under(&self, base: &Path) -> PathBuf {
        let mut path = base.join(APP_NAME);
        if let Some(ref origin) = self.origin {
            path = path.join(origin);
        }
        path
    }
}
