// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use crate::utils::{in_namespace, validate_key};
use crate::{BlobIO, BlobIOError, BlobIOResult};

/// In-memory implementation of `BlobIO`.
///
/// Useful for tests and throwaway stores. Writes can be made to fail on demand
/// to exercise partial-failure paths of higher layers.
#[derive(Debug, Default, Clone)]
pub struct MemBlobIO {
    records: BTreeMap<String, Vec<u8>>,
    fail_puts_after: Option<usize>,
    fail_deletes: bool,
}

impl MemBlobIO {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lets the next `n` puts succeed, then rejects every following put.
    #[inline]
    pub fn fail_puts_after(&mut self, n: usize) {
        self.fail_puts_after = Some(n);
    }

    /// Rejects every delete while `fail` is set.
    #[inline]
    pub fn fail_deletes(&mut self, fail: bool) {
        self.fail_deletes = fail;
    }

    /// Clears any injected failure.
    #[inline]
    pub fn heal(&mut self) {
        self.fail_puts_after = None;
        self.fail_deletes = false;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl BlobIO for MemBlobIO {
    fn put(&mut self, key: &str, data: &[u8]) -> BlobIOResult {
        validate_key(key)?;
        if let Some(left) = self.fail_puts_after.as_mut() {
            if *left == 0 {
                return Err(BlobIOError::Io(std::io::ErrorKind::StorageFull));
            }
            *left -= 1;
        }
        self.records.insert(key.to_owned(), data.to_vec());
        Ok(())
    }

    fn get(&mut self, key: &str) -> BlobIOResult<Vec<u8>> {
        validate_key(key)?;
        self.records.get(key).cloned().ok_or(BlobIOError::NotFound)
    }

    fn delete(&mut self, key: &str) -> BlobIOResult {
        validate_key(key)?;
        if self.fail_deletes {
            return Err(BlobIOError::Io(std::io::ErrorKind::PermissionDenied));
        }
        self.records
            .remove(key)
            .map(|_| ())
            .ok_or(BlobIOError::NotFound)
    }

    fn exists(&mut self, key: &str) -> BlobIOResult<bool> {
        validate_key(key)?;
        Ok(self.records.contains_key(key))
    }

    fn list(&mut self, namespace: &str) -> BlobIOResult<Vec<String>> {
        Ok(self
            .records
            .keys()
            .filter(|k| in_namespace(k, namespace))
            .cloned()
            .collect())
    }
}
