// Utility functions module

pub mod hardware;
pub mod license_key;

// Re-export commonly used functions for convenience
pub use hardware::{get_or_create_device_uuid, hash_machine_id, machine_fingerprint};
pub use license_key::{is_valid_license_key, normalize_license_key};
