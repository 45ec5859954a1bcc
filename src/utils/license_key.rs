// License key formatting helpers

const GROUP_LEN: usize = 5;
const KEY_LEN: usize = 25;

/// Trim, uppercase, and regroup a key as `XXXXX-XXXXX-XXXXX-XXXXX-XXXXX`.
/// Keys that don't have 25 alphanumeric characters are returned trimmed and uppercased only.
pub fn normalize_license_key(key: &str) -> String {
    let clean: String = key
        .trim()
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if clean.len() != KEY_LEN || !clean.chars().all(|c| c.is_ascii_alphanumeric()) {
        return key.trim().to_ascii_uppercase();
    }

    clean
        .as_bytes()
        .chunks(GROUP_LEN)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join("-")
}

/// Check if a key has 25 alphanumeric characters once dashes are removed
pub fn is_valid_license_key(key: &str) -> bool {
    let clean: String = key.chars().filter(|c| *c != '-').collect();
    clean.len() == KEY_LEN && clean.chars().all(|c| c.is_ascii_alphanumeric())
}
