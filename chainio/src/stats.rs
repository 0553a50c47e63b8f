// SPDX-License-Identifier: MIT

use crate::{BlobIO, BlobIOResult};

/// Simple counters.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct IoStats {
    pub gets: u64,
    pub get_bytes: u64,
    pub puts: u64,
    pub put_bytes: u64,
    pub deletes: u64,
    pub lists: u64,
    pub flushes: u64,

    // Failed calls of any kind
    pub errors: u64,

    // Useful sizes to diagnose record granularity
    pub max_get: u64,
    pub max_put: u64,
}

impl IoStats {
    #[inline]
    pub fn reset(&mut self) {
        *self = IoStats::default();
    }
}

impl core::fmt::Display for IoStats {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "gets={} ({} B), puts={} ({} B), deletes={}, lists={}, errors={}",
            self.gets,
            self.get_bytes,
            self.puts,
            self.put_bytes,
            self.deletes,
            self.lists,
            self.errors
        )
    }
}

/// Transparent instrumentation wrapper.
#[derive(Debug)]
pub struct IOCounter<IO: BlobIO> {
    inner: IO,
    pub stats: IoStats,
}

impl<IO: BlobIO> IOCounter<IO> {
    #[inline]
    pub fn new(inner: IO) -> Self {
        Self {
            inner,
            stats: IoStats::default(),
        }
    }

    #[inline]
    pub fn snapshot(&self) -> IoStats {
        self.stats
    }

    #[inline]
    pub fn inner(&self) -> &IO {
        &self.inner
    }

    #[inline]
    pub fn inner_mut(&mut self) -> &mut IO {
        &mut self.inner
    }

    #[inline]
    pub fn into_inner(self) -> IO {
        self.inner
    }

    #[inline]
    fn track<T>(&mut self, res: BlobIOResult<T>) -> BlobIOResult<T> {
        if res.is_err() {
            self.stats.errors += 1;
        }
        res
    }
}

impl<IO: BlobIO> BlobIO for IOCounter<IO> {
    #[inline]
    fn put(&mut self, key: &str, data: &[u8]) -> BlobIOResult {
        self.stats.puts += 1;
        self.stats.put_bytes += data.len() as u64;
        self.stats.max_put = self.stats.max_put.max(data.len() as u64);

        let res = self.inner.put(key, data);
        self.track(res)
    }

    #[inline]
    fn get(&mut self, key: &str) -> BlobIOResult<Vec<u8>> {
        self.stats.gets += 1;
        let res = self.inner.get(key);
        if let Ok(data) = &res {
            self.stats.get_bytes += data.len() as u64;
            self.stats.max_get = self.stats.max_get.max(data.len() as u64);
        }
        self.track(res)
    }

    #[inline]
    fn delete(&mut self, key: &str) -> BlobIOResult {
        self.stats.deletes += 1;
        let res = self.inner.delete(key);
        self.track(res)
    }

    #[inline]
    fn exists(&mut self, key: &str) -> BlobIOResult<bool> {
        let res = self.inner.exists(key);
        self.track(res)
    }

    #[inline]
    fn list(&mut self, namespace: &str) -> BlobIOResult<Vec<String>> {
        self.stats.lists += 1;
        let res = self.inner.list(namespace);
        self.track(res)
    }

    #[inline]
    fn flush(&mut self) -> BlobIOResult {
        self.stats.flushes += 1;
        let res = self.inner.flush();
        self.track(res)
    }
}

#[cfg(all(test, feature = "mem"))]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn test_counts() {
        let mut io = IOCounter::new(MemBlobIO::new());
        io.put("Data/a.json", b"abcd").unwrap();
        io.get("Data/a.json").unwrap();
        assert!(io.get("Data/missing.json").is_err());
        io.delete("Data/a.json").unwrap();

        let s = io.snapshot();
        assert_eq!(s.puts, 1);
        assert_eq!(s.put_bytes, 4);
        assert_eq!(s.gets, 2);
        assert_eq!(s.get_bytes, 4);
        assert_eq!(s.deletes, 1);
        assert_eq!(s.errors, 1);

        io.stats.reset();
        assert_eq!(io.snapshot(), IoStats::default());
    }
}
