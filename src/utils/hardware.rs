// Machine fingerprint for license validation

use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::warn;
use uuid::Uuid;

use crate::config::config_dir;

const FINGERPRINT_SALT: &[u8] = b"license-console";

/// Get a stable machine ID for this host
/// Uses machine-uid hashed with an app salt, with fallback to a stored UUID
pub fn machine_fingerprint() -> String {
    match machine_uid::get() {
        Ok(id) => hash_machine_id(&id),
        Err(e) => {
            warn!(error = %e, "machine uid unavailable, using stored device id");
            match config_dir() {
                Some(dir) => get_or_create_device_uuid(&dir.join("device_uuid.json")),
                None => Uuid::new_v4().to_string(),
            }
        }
    }
}

/// `hw-` + first 16 bytes of SHA-256(machine id + salt), hex encoded
pub fn hash_machine_id(id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(id.as_bytes());
    hasher.update(FINGERPRINT_SALT);
    let hash = hasher.finalize();
    format!("hw-{}", hex::encode(&hash[..16]))
}

/// Read the persisted device UUID, creating it on first use
pub fn get_or_create_device_uuid(path: &Path) -> String {
    if let Ok(content) = fs::read_to_string(path) {
        if let Ok(data) = serde_json::from_str::<serde_json::Value>(&content) {
            if let Some(uuid) = data.get("uuid").and_then(|v| v.as_str()) {
                return uuid.to_string();
            }
        }
    }

    let new_uuid = Uuid::new_v4().to_string();
    let data = serde_json::json!({
        "uuid": new_uuid,
        "created_at": chrono::Utc::now().to_rfc3339()
    });

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok();
    }
    if let Err(e) = serde_json::to_string_pretty(&data)
        .map_err(std::io::Error::from)
        .and_then(|json| fs::write(path, json))
    {
        warn!(error = %e, path = %path.display(), "failed to persist device id");
    }

    new_uuid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_machine_id_is_stable() {
        let a = hash_machine_id("machine-1");
        assert_eq!(a, hash_machine_id("machine-1"));
        assert_ne!(a, hash_machine_id("machine-2"));
        assert!(a.starts_with("hw-"));
        assert_eq!(a.len(), 3 + 32);
    }

    #[test]
    fn test_device_uuid_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("device_uuid.json");

        let first = get_or_create_device_uuid(&path);
        let second = get_or_create_device_uuid(&path);
        assert_eq!(first, second);
        assert!(Uuid::parse_str(&first).is_ok());
    }
}
