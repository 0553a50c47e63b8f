// SPDX-License-Identifier: MIT

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use chainfs::prelude::*;
use serde::Deserialize;

/// Name of the config file looked up at the store root.
pub const CONFIG_FILE: &str = "chainfat.toml";

/// `chainfat.toml` layout.
///
/// ```toml
/// [store]
/// block_size = 20
/// allow_duplicate_names = true
/// max_chain_len = 1000000
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    #[serde(default)]
    pub store: FsConfig,
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl StoreConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config: StoreConfig = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Loads `explicit` if given, else `<root>/chainfat.toml` when it exists,
    /// else the defaults.
    pub fn discover(root: &Path, explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                bail!("config file not found: {}", path.display());
            }
            return Self::from_file(path);
        }

        let candidate = root.join(CONFIG_FILE);
        if candidate.is_file() {
            Self::from_file(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Applies command line overrides and resolves the store layout.
    pub fn resolve(mut self, block_size: Option<usize>) -> anyhow::Result<ChainMeta> {
        if let Some(size) = block_size {
            self.store = self.store.with_block_size(size);
        }
        Ok(ChainMeta::from_config(&self.store)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempdir().unwrap();
        let config = StoreConfig::discover(dir.path(), None).unwrap();
        assert!(config.source.is_none());

        let meta = config.resolve(None).unwrap();
        assert_eq!(meta, ChainMeta::default());
    }

    #[test]
    fn test_file_at_root_is_picked_up() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "[store]\nblock_size = 8\nallow_duplicate_names = false\n",
        )
        .unwrap();

        let config = StoreConfig::discover(dir.path(), None).unwrap();
        assert!(config.source.is_some());

        let meta = config.resolve(None).unwrap();
        assert_eq!(meta.block_size, 8);
        assert!(!meta.allow_duplicate_names);
    }

    #[test]
    fn test_override_wins() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[store]\nblock_size = 8\n").unwrap();

        let meta = StoreConfig::discover(dir.path(), None)
            .unwrap()
            .resolve(Some(32))
            .unwrap();
        assert_eq!(meta.block_size, 32);
    }

    #[test]
    fn test_rejects_bad_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[store]\nblock_size = 0\n").unwrap();

        let err = StoreConfig::discover(dir.path(), Some(&path))
            .unwrap()
            .resolve(None)
            .unwrap_err();
        assert!(err.to_string().contains("block_size"));

        fs::write(&path, "[store]\nblok_size = 4\n").unwrap();
        assert!(StoreConfig::from_file(&path).is_err());

        let missing = dir.path().join("missing.toml");
        assert!(StoreConfig::discover(dir.path(), Some(&missing)).is_err());
    }
}
