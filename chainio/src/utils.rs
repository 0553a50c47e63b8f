// SPDX-License-Identifier: MIT

use crate::KEY_SEPARATOR;
use crate::errors::*;

/// Validates a record key.
///
/// A key is a non-empty sequence of `/`-separated segments; segments may not
/// be empty, `.` or `..`, and may not contain a backslash. This keeps every key
/// inside the store root for path-backed implementations.
pub fn validate_key(key: &str) -> BlobIOResult {
    if key.is_empty() || key.starts_with(KEY_SEPARATOR) {
        return Err(BlobIOError::InvalidKey);
    }
    for segment in key.split(KEY_SEPARATOR) {
        if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\') {
            return Err(BlobIOError::InvalidKey);
        }
    }
    Ok(())
}

/// Builds `namespace/name`.
#[inline]
pub fn join_key(namespace: &str, name: &str) -> String {
    let namespace = namespace.trim_end_matches(KEY_SEPARATOR);
    format!("{namespace}{KEY_SEPARATOR}{name}")
}

/// Returns `true` if `key` lives directly in `namespace` (no deeper nesting).
pub fn in_namespace(key: &str, namespace: &str) -> bool {
    let namespace = namespace.trim_end_matches(KEY_SEPARATOR);
    key.strip_prefix(namespace)
        .and_then(|rest| rest.strip_prefix(KEY_SEPARATOR))
        .is_some_and(|name| !name.is_empty() && !name.contains(KEY_SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("Data/abc.json").is_ok());
        assert!(validate_key("FAT/FAT.json").is_ok());

        for bad in ["", "/abs", "Data//x", "../escape", "Data/./x", "Data\\x", "Data/"] {
            assert_eq!(validate_key(bad), Err(BlobIOError::InvalidKey), "{bad}");
        }
    }

    #[test]
    fn test_namespace_helpers() {
        assert_eq!(join_key("Data", "a.json"), "Data/a.json");
        assert_eq!(join_key("Data/", "a.json"), "Data/a.json");

        assert!(in_namespace("Data/a.json", "Data"));
        assert!(in_namespace("Data/a.json", "Data/"));
        assert!(!in_namespace("Data/sub/a.json", "Data"));
        assert!(!in_namespace("DataX/a.json", "Data"));
        assert!(!in_namespace("Data/", "Data"));
    }
}
