// SPDX-License-Identifier: MIT

// Core Modules
pub mod core;

// Reusable types and traits
pub use crate::core::traits::*;

// Utilities
pub use crate::core::utils::time_utils::*;

/// Everything needed to mount and drive a store.
pub mod prelude {
    pub use super::core::block::{Block, BlockId};
    pub use super::core::checker::{Finding, FindingCode, Severity, VerifyReport};
    pub use super::core::config::FsConfig;
    pub use super::core::directory::{Directory, FileEntry, FileSlot, FileState, Listing, View};
    pub use super::core::errors::*;
    pub use super::core::filesystem::{FatSystem, OpenedFile};
    pub use super::core::meta::ChainMeta;
    pub use super::core::traits::*;
}
