// SPDX-License-Identifier: MIT

use chainio::utils::join_key;

use crate::core::block::BlockId;
use crate::core::config::{DEFAULT_BLOCK_SIZE, DEFAULT_MAX_CHAIN_LEN, FsConfig};
use crate::core::errors::FsResult;

/// Namespace holding the directory snapshot.
pub const DIRECTORY_NAMESPACE: &str = "FAT";
/// Record name of the directory snapshot.
pub const DIRECTORY_RECORD: &str = "FAT.json";
/// Namespace holding one record per block.
pub const DATA_NAMESPACE: &str = "Data";
/// Extension of every record.
pub const RECORD_EXT: &str = ".json";

/// Resolved layout constants of a store.
///
/// Built from an [`FsConfig`]; everything the chain manager, the directory
/// table and the checker need to address records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainMeta {
    pub block_size: usize,
    pub max_chain_len: usize,
    pub allow_duplicate_names: bool,
}

impl Default for ChainMeta {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            max_chain_len: DEFAULT_MAX_CHAIN_LEN,
            allow_duplicate_names: true,
        }
    }
}

impl ChainMeta {
    /// Validates `config` and resolves it.
    pub fn from_config(config: &FsConfig) -> FsResult<Self> {
        config.validate()?;
        Ok(Self {
            block_size: config.block_size,
            max_chain_len: config.max_chain_len,
            allow_duplicate_names: config.allow_duplicate_names,
        })
    }

    /// Shorthand for a default config with the given block size.
    pub fn with_block_size(block_size: usize) -> FsResult<Self> {
        Self::from_config(&FsConfig::default().with_block_size(block_size))
    }

    /// Key of the directory snapshot record.
    #[inline]
    pub fn directory_key(&self) -> String {
        join_key(DIRECTORY_NAMESPACE, DIRECTORY_RECORD)
    }

    /// Key of the record holding block `id`.
    #[inline]
    pub fn block_key(&self, id: BlockId) -> String {
        join_key(DATA_NAMESPACE, &format!("{id}{RECORD_EXT}"))
    }

    /// Inverse of [`ChainMeta::block_key`]; `None` for foreign records.
    pub fn block_id_from_key(&self, key: &str) -> Option<BlockId> {
        key.strip_prefix(DATA_NAMESPACE)?
            .strip_prefix(chainio::KEY_SEPARATOR)?
            .strip_suffix(RECORD_EXT)?
            .parse()
            .ok()
    }

    /// Number of blocks a content of `len` characters occupies.
    ///
    /// Empty content still takes one (empty) block.
    #[inline]
    pub fn blocks_needed(&self, len: usize) -> usize {
        len.div_ceil(self.block_size).max(1)
    }
}
