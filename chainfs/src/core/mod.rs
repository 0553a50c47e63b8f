// SPDX-License-Identifier: MIT

// === Macros ===
#[macro_use]
pub mod macros;

// === Sub-modules ===
pub mod block;
pub mod chain;
pub mod checker;
pub mod config;
pub mod cursor;
pub mod directory;
pub mod errors;
pub mod filesystem;
pub mod meta;
pub mod utils;

// === Core Traits ===
pub mod traits {
    pub use super::checker::FsChecker;
}

// === Error types ===
pub use errors::*;

// === Utilities ===
pub use utils::time_utils::*;
