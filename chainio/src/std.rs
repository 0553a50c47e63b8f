// SPDX-License-Identifier: MIT

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::utils::{in_namespace, join_key, validate_key};
use crate::{BlobIO, BlobIOResult};

/// Directory-backed implementation of `BlobIO`.
///
/// Each record is one small file; the key is the path relative to `root`.
#[derive(Debug, Clone)]
pub struct StdBlobIO {
    root: PathBuf,
}

impl StdBlobIO {
    /// Opens (and creates if needed) a store rooted at `root`.
    pub fn new<P: AsRef<Path>>(root: P) -> BlobIOResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    fn path_for(&self, key: &str) -> BlobIOResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

impl BlobIO for StdBlobIO {
    fn put(&mut self, key: &str, data: &[u8]) -> BlobIOResult {
        let path = self.path_for(key)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut f = fs::File::create(path)?;
        f.write_all(data)?;
        f.flush()?;
        Ok(())
    }

    fn get(&mut self, key: &str) -> BlobIOResult<Vec<u8>> {
        let path = self.path_for(key)?;
        Ok(fs::read(path)?)
    }

    fn delete(&mut self, key: &str) -> BlobIOResult {
        let path = self.path_for(key)?;
        fs::remove_file(path)?;
        Ok(())
    }

    fn exists(&mut self, key: &str) -> BlobIOResult<bool> {
        let path = self.path_for(key)?;
        Ok(path.is_file())
    }

    fn list(&mut self, namespace: &str) -> BlobIOResult<Vec<String>> {
        let dir = self.path_for(namespace.trim_end_matches(crate::KEY_SEPARATOR))?;
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            let key = join_key(namespace, &name);
            if in_namespace(&key, namespace) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}
