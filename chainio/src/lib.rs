// SPDX-License-Identifier: MIT

// Core modules
pub mod errors;
pub mod stats;
pub mod utils;

// Backend modules
#[cfg(feature = "mem")]
mod mem;

#[cfg(feature = "std")]
mod std;

// Prelude re-exports (central entrypoint)
pub mod prelude {
    pub use super::BlobIO;
    pub use super::BlobIOExt;
    pub use super::errors::*;
    pub use super::stats::*;

    #[cfg(feature = "mem")]
    pub use super::mem::MemBlobIO;

    #[cfg(feature = "std")]
    pub use super::std::StdBlobIO;
}

// Internal use
use errors::*;

// Constants

/// Separator between a namespace and a record name inside a key.
pub const KEY_SEPARATOR: char = '/';

// Traits

/// Record store abstraction trait.
///
/// Stores opaque byte records addressed by a string key of the form
/// `namespace/name`. Implementations may target a directory tree, RAM, etc.
pub trait BlobIO {
    /// Creates or overwrites the record stored under `key`.
    fn put(&mut self, key: &str, data: &[u8]) -> BlobIOResult;

    /// Reads the whole record stored under `key`.
    ///
    /// Fails with [`BlobIOError::NotFound`] when no such record exists.
    fn get(&mut self, key: &str) -> BlobIOResult<Vec<u8>>;

    /// Removes the record stored under `key`.
    ///
    /// Fails with [`BlobIOError::NotFound`] when no such record exists.
    fn delete(&mut self, key: &str) -> BlobIOResult;

    /// Returns whether a record is stored under `key`.
    fn exists(&mut self, key: &str) -> BlobIOResult<bool>;

    /// Lists the full keys of the records stored directly in `namespace`.
    fn list(&mut self, namespace: &str) -> BlobIOResult<Vec<String>>;

    /// Flushes any buffered data (may be a no-op).
    fn flush(&mut self) -> BlobIOResult {
        Ok(())
    }
}

/// Extension helpers for BlobIO.
///
/// Collapses the `NotFound` case into `Option`/`bool` for callers that treat a
/// missing record as a normal outcome.
pub trait BlobIOExt: BlobIO {
    /// Reads a record, returning `None` when it does not exist.
    #[inline]
    fn get_opt(&mut self, key: &str) -> BlobIOResult<Option<Vec<u8>>> {
        match self.get(key) {
            Ok(data) => Ok(Some(data)),
            Err(BlobIOError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Removes a record if present. Returns `true` when something was removed.
    #[inline]
    fn remove(&mut self, key: &str) -> BlobIOResult<bool> {
        match self.delete(key) {
            Ok(()) => Ok(true),
            Err(BlobIOError::NotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

impl<T: BlobIO + ?Sized> BlobIOExt for T {}

impl<T: BlobIO + ?Sized> BlobIO for &mut T {
    #[inline]
    fn put(&mut self, key: &str, data: &[u8]) -> BlobIOResult {
        (**self).put(key, data)
    }

    #[inline]
    fn get(&mut self, key: &str) -> BlobIOResult<Vec<u8>> {
        (**self).get(key)
    }

    #[inline]
    fn delete(&mut self, key: &str) -> BlobIOResult {
        (**self).delete(key)
    }

    #[inline]
    fn exists(&mut self, key: &str) -> BlobIOResult<bool> {
        (**self).exists(key)
    }

    #[inline]
    fn list(&mut self, namespace: &str) -> BlobIOResult<Vec<String>> {
        (**self).list(namespace)
    }

    #[inline]
    fn flush(&mut self) -> BlobIOResult {
        (**self).flush()
    }
}
