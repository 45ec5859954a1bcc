// Console settings: settings file in the config dir, overridden by environment

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::auth::keychain::{CredentialStorage, FileStorage, KeychainStorage, MemoryStorage};
use crate::error::{ConfigError, StorageError};

pub const ENV_API_URL: &str = "LICENSE_CONSOLE_API_URL";
pub const ENV_API_PREFIX: &str = "LICENSE_CONSOLE_API_PREFIX";
pub const ENV_TIMEOUT_SECS: &str = "LICENSE_CONSOLE_TIMEOUT_SECS";
pub const ENV_TOKEN_STORAGE: &str = "LICENSE_CONSOLE_TOKEN_STORAGE";

/// Backend the console proxies to when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8999";
pub const DEFAULT_API_PREFIX: &str = "/api/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the session credential is persisted between runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStorageKind {
    Keychain,
    File,
    Memory,
    /// In-process only
    #[serde(rename = "none")]
    Disabled,
}

impl TokenStorageKind {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "keychain" => Some(Self::Keychain),
            "file" => Some(Self::File),
            "memory" => Some(Self::Memory),
            "none" => Some(Self::Disabled),
            _ => None,
        }
    }

    /// Open the durable medium for this kind, `None` for in-process only.
    pub fn open(self) -> Result<Option<Arc<dyn CredentialStorage>>, StorageError> {
        let storage: Arc<dyn CredentialStorage> = match self {
            Self::Keychain => Arc::new(KeychainStorage::new()),
            Self::File => Arc::new(FileStorage::in_config_dir()?),
            Self::Memory => Arc::new(MemoryStorage::new()),
            Self::Disabled => return Ok(None),
        };
        Ok(Some(storage))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub api_url: String,
    pub api_prefix: String,
    pub request_timeout_secs: u64,
    pub token_storage: TokenStorageKind,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            token_storage: TokenStorageKind::Keychain,
        }
    }
}

/// `~/.license_console`
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".license_console"))
}

/// Get the path to the settings file
pub fn settings_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("settings.json"))
}

impl ConsoleConfig {
    /// Settings file (if any) with environment overrides applied.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match settings_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read a settings file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Apply overrides from a variable lookup (normally `std::env::var`).
    /// Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(prefix) = get(ENV_API_PREFIX) {
            self.api_prefix = prefix;
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                key: ENV_TIMEOUT_SECS,
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = get(ENV_TOKEN_STORAGE) {
            self.token_storage = TokenStorageKind::parse(&raw).ok_or(ConfigError::InvalidEnv {
                key: ENV_TOKEN_STORAGE,
                value: raw.clone(),
            })?;
        }
        Ok(())
    }

    /// Save settings to `~/.license_console/settings.json`
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = settings_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
