// Durable storage media for the session credential

use keyring::Entry;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::StorageError;

const KEYCHAIN_SERVICE: &str = "license-console";

/// The single key the session credential lives under, in every medium.
pub const TOKEN_KEY: &str = "auth_token";

/// A place the session credential survives restarts in.
///
/// Absence of a stored value means anonymous.
pub trait CredentialStorage: Send + Sync {
    fn load(&self) -> Result<Option<String>, StorageError>;
    fn store(&self, token: &str) -> Result<(), StorageError>;
    fn remove(&self) -> Result<(), StorageError>;
}

// ============================================================================
// System keychain
// ============================================================================

/// Credential kept in the OS keychain under service `license-console`
pub struct KeychainStorage {
    service: String,
}

impl KeychainStorage {
    pub fn new() -> Self {
        Self::with_service(KEYCHAIN_SERVICE)
    }

    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self) -> Result<Entry, StorageError> {
        Ok(Entry::new(&self.service, TOKEN_KEY)?)
    }
}

impl Default for KeychainStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStorage for KeychainStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, token: &str) -> Result<(), StorageError> {
        self.entry()?.set_password(token)?;
        Ok(())
    }

    fn remove(&self) -> Result<(), StorageError> {
        // Ignore error if entry doesn't exist
        match self.entry()?.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// JSON file in the config directory
// ============================================================================

/// Credential kept as `{"token": "..."}` in a JSON file
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.license_console/auth_token.json`
    pub fn in_config_dir() -> Result<Self, StorageError> {
        let dir = crate::config::config_dir().ok_or(StorageError::NoConfigDir)?;
        Ok(Self::new(dir.join(format!("{TOKEN_KEY}.json"))))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl CredentialStorage for FileStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let data: serde_json::Value = serde_json::from_str(&content)?;
        Ok(data
            .get("token")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string()))
    }

    fn store(&self, token: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = serde_json::json!({ "token": token });
        fs::write(&self.path, serde_json::to_string_pretty(&data)?)?;
        Ok(())
    }

    fn remove(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// In-memory (tests, ephemeral hosts)
// ============================================================================

#[derive(Default)]
pub struct MemoryStorage {
    token: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        // A poisoned slot still holds a valid Option
        self.token.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CredentialStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.slot().clone())
    }

    fn store(&self, token: &str) -> Result<(), StorageError> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), StorageError> {
        *self.slot() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested").join("auth_token.json"));

        assert_eq!(storage.load().unwrap(), None);
        storage.store("tok-123").unwrap();
        assert_eq!(storage.load().unwrap().as_deref(), Some("tok-123"));

        storage.remove().unwrap();
        assert_eq!(storage.load().unwrap(), None);
        // Removing twice is fine
        storage.remove().unwrap();
    }

    #[test]
    fn test_file_storage_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth_token.json");
        fs::write(&path, "not json").unwrap();

        let storage = FileStorage::new(&path);
        assert!(matches!(storage.load(), Err(StorageError::Json(_))));
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::with_token("abc");
        assert_eq!(storage.load().unwrap().as_deref(), Some("abc"));
        storage.remove().unwrap();
        assert_eq!(storage.load().unwrap(), None);
    }
}
