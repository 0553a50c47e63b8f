// SPDX-License-Identifier: MIT

use serde::Deserialize;

use crate::core::errors::{FsError, FsResult};

pub const DEFAULT_BLOCK_SIZE: usize = 20;
pub const DEFAULT_MAX_CHAIN_LEN: usize = 1_000_000;

/// User-tunable settings of a store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FsConfig {
    /// Maximum number of characters per block.
    pub block_size: usize,
    /// Whether `create` accepts a name already used by an active file.
    pub allow_duplicate_names: bool,
    /// Upper bound on the number of blocks followed in one chain.
    pub max_chain_len: usize,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            allow_duplicate_names: true,
            max_chain_len: DEFAULT_MAX_CHAIN_LEN,
        }
    }
}

impl FsConfig {
    pub fn validate(&self) -> FsResult {
        ensure!(self.block_size > 0, FsError::Config("block_size must be > 0"));
        ensure!(
            self.max_chain_len > 0,
            FsError::Config("max_chain_len must be > 0")
        );
        Ok(())
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = FsConfig::default();
        assert_eq!(cfg.block_size, 20);
        assert!(cfg.allow_duplicate_names);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_block_size() {
        let cfg = FsConfig::default().with_block_size(0);
        assert_eq!(cfg.validate(), Err(FsError::Config("block_size must be > 0")));
    }

    #[test]
    fn test_partial_deserialize() {
        let cfg: FsConfig = serde_json::from_str(r#"{ "block_size": 8 }"#).unwrap();
        assert_eq!(cfg.block_size, 8);
        assert_eq!(cfg.max_chain_len, DEFAULT_MAX_CHAIN_LEN);
        assert!(serde_json::from_str::<FsConfig>(r#"{ "blocksize": 8 }"#).is_err());
    }
}
