// SPDX-License-Identifier: MIT

use std::fmt;

pub use chainio::errors::*;

use crate::core::block::BlockId;
use crate::core::directory::FileSlot;

/// Failure classes reported to callers of the lifecycle operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsErrorKind {
    /// Index out of range or entry in the wrong lifecycle state for the view.
    InvalidSelection,
    /// A block chain could not be followed.
    CorruptChain,
    /// The directory snapshot could not be read or decoded.
    DirectoryCorrupt,
    /// The record store rejected a write or delete.
    StorageWriteFailed,
    /// Rejected configuration value.
    InvalidConfig,
}

impl fmt::Display for FsErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FsErrorKind::InvalidSelection => "InvalidSelection",
            FsErrorKind::CorruptChain => "CorruptChain",
            FsErrorKind::DirectoryCorrupt => "DirectoryCorrupt",
            FsErrorKind::StorageWriteFailed => "StorageWriteFailed",
            FsErrorKind::InvalidConfig => "InvalidConfig",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsChainError {
    /// A block could not be written or deleted.
    IO(BlobIOError),
    /// A linked block is absent from the store.
    MissingBlock(BlockId),
    /// A linked block exists but could not be fetched.
    Unreadable(BlockId, BlobIOError),
    /// A block record could not be decoded.
    Malformed(BlockId),
    /// The terminal flag of a block disagrees with its successor link.
    Inconsistent(BlockId),
    /// A block links back into its own chain.
    LoopDetected(BlockId),
    /// The chain exceeds the configured maximum length.
    TooLong(usize),
    /// Content would need more blocks than a chain may hold.
    Oversized { blocks: usize, max: usize },
    /// A block could not be serialized.
    Encode,
    Other(&'static str),
}

impl FsChainError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsChainError::IO(_) => "Block write failed",
            FsChainError::MissingBlock(_) => "Linked block is missing",
            FsChainError::Unreadable(..) => "Linked block is unreadable",
            FsChainError::Malformed(_) => "Malformed block record",
            FsChainError::Inconsistent(_) => "Block terminal flag disagrees with its link",
            FsChainError::LoopDetected(_) => "Loop detected in block chain",
            FsChainError::TooLong(_) => "Block chain exceeds maximum length",
            FsChainError::Oversized { .. } => "Content exceeds the maximum chain length",
            FsChainError::Encode => "Block could not be encoded",
            FsChainError::Other(msg) => msg,
        }
    }

    pub fn source(&self) -> Option<FsError> {
        match self {
            FsChainError::IO(e) | FsChainError::Unreadable(_, e) => Some(FsError::IO(*e)),
            _ => None,
        }
    }

    pub fn kind(&self) -> FsErrorKind {
        match self {
            FsChainError::IO(_) | FsChainError::Oversized { .. } | FsChainError::Encode => {
                FsErrorKind::StorageWriteFailed
            }
            _ => FsErrorKind::CorruptChain,
        }
    }

    fn detail(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsChainError::MissingBlock(id)
            | FsChainError::Unreadable(id, _)
            | FsChainError::Malformed(id)
            | FsChainError::Inconsistent(id)
            | FsChainError::LoopDetected(id) => write!(f, " (block: {id})"),
            FsChainError::TooLong(max) => write!(f, " (max: {max})"),
            FsChainError::Oversized { blocks, max } => {
                write!(f, " (blocks: {blocks}, max: {max})")
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsDirectoryError {
    /// The snapshot could not be written.
    IO(BlobIOError),
    /// The snapshot exists but could not be read.
    Unreadable(BlobIOError),
    /// The snapshot could not be decoded.
    Malformed,
    /// The table could not be encoded.
    Encode,
    Other(&'static str),
}

impl FsDirectoryError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsDirectoryError::IO(_) => "Directory snapshot write failed",
            FsDirectoryError::Unreadable(_) => "Directory snapshot is unreadable",
            FsDirectoryError::Malformed => "Directory snapshot is malformed",
            FsDirectoryError::Encode => "Directory table could not be encoded",
            FsDirectoryError::Other(msg) => msg,
        }
    }

    pub fn source(&self) -> Option<FsError> {
        match self {
            FsDirectoryError::IO(e) | FsDirectoryError::Unreadable(e) => Some(FsError::IO(*e)),
            _ => None,
        }
    }

    pub fn kind(&self) -> FsErrorKind {
        match self {
            FsDirectoryError::IO(_) | FsDirectoryError::Encode => FsErrorKind::StorageWriteFailed,
            _ => FsErrorKind::DirectoryCorrupt,
        }
    }

    fn detail(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsSelectionError {
    /// The listing index is past the end of the view.
    OutOfRange { index: usize, len: usize },
    /// The slot does not exist in the table.
    UnknownSlot(FileSlot),
    /// The entry is in the recycle bin.
    NotActive(FileSlot),
    /// The entry is not in the recycle bin.
    NotRecycled(FileSlot),
    /// An active entry already uses this name.
    DuplicateName,
    Other(&'static str),
}

impl FsSelectionError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsSelectionError::OutOfRange { .. } => "Selection out of range",
            FsSelectionError::UnknownSlot(_) => "Unknown file slot",
            FsSelectionError::NotActive(_) => "File is in the recycle bin",
            FsSelectionError::NotRecycled(_) => "File is not in the recycle bin",
            FsSelectionError::DuplicateName => "An active file already uses this name",
            FsSelectionError::Other(msg) => msg,
        }
    }

    pub fn source(&self) -> Option<FsError> {
        None
    }

    fn detail(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsSelectionError::OutOfRange { index, len } => {
                write!(f, " (index: {index}, entries: {len})")
            }
            FsSelectionError::UnknownSlot(slot)
            | FsSelectionError::NotActive(slot)
            | FsSelectionError::NotRecycled(slot) => write!(f, " (slot: {slot})"),
            _ => Ok(()),
        }
    }
}

/// Top-level error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    IO(BlobIOError),
    Chain(FsChainError),
    Directory(FsDirectoryError),
    Selection(FsSelectionError),
    /// The new content is saved, but the old chain could not be removed.
    StaleChain { old_head: BlockId, cause: FsChainError },
    /// The table save failed and the unreachable new chain was only partly removed.
    PartialRollback { cause: FsDirectoryError, stale: usize },
    Config(&'static str),
    Other(&'static str),
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsError::IO(e) => write!(f, "{e}"),
            FsError::Chain(e) => write!(f, "{e}"),
            FsError::Directory(e) => write!(f, "{e}"),
            FsError::Selection(e) => write!(f, "{e}"),
            FsError::StaleChain { old_head, cause } => {
                write!(f, "{} (old head: {old_head})\n  caused by: {cause}", self.msg())
            }
            FsError::PartialRollback { cause, stale } => {
                write!(f, "{} (stale blocks: {stale})\n  caused by: {cause}", self.msg())
            }
            FsError::Config(msg) => write!(f, "Invalid config: {msg}"),
            FsError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for FsError {}

impl FsError {
    pub fn msg(&self) -> &'static str {
        match self {
            FsError::IO(e) => e.msg(),
            FsError::Chain(e) => e.msg(),
            FsError::Directory(e) => e.msg(),
            FsError::Selection(e) => e.msg(),
            FsError::StaleChain { .. } => "Content replaced, old blocks left in the store",
            FsError::PartialRollback { .. } => "Save failed, new blocks left in the store",
            FsError::Config(msg) => msg,
            FsError::Other(msg) => msg,
        }
    }

    pub fn source(&self) -> Option<FsError> {
        match self {
            FsError::Chain(e) => e.source(),
            FsError::Directory(e) => e.source(),
            FsError::StaleChain { cause, .. } => Some(FsError::Chain(*cause)),
            FsError::PartialRollback { cause, .. } => Some(FsError::Directory(*cause)),
            FsError::IO(_) | FsError::Selection(_) | FsError::Config(_) | FsError::Other(_) => None,
        }
    }

    pub fn kind(&self) -> FsErrorKind {
        match self {
            FsError::IO(_) => FsErrorKind::StorageWriteFailed,
            FsError::Chain(e) => e.kind(),
            FsError::Directory(e) => e.kind(),
            FsError::Selection(_) => FsErrorKind::InvalidSelection,
            FsError::StaleChain { .. } => FsErrorKind::StorageWriteFailed,
            FsError::PartialRollback { cause, .. } => cause.kind(),
            FsError::Config(_) => FsErrorKind::InvalidConfig,
            FsError::Other(_) => FsErrorKind::StorageWriteFailed,
        }
    }
}

// === type Fs*Result ===

pub type FsResult<T = ()> = Result<T, FsError>;
pub type FsChainResult<T = ()> = Result<T, FsChainError>;
pub type FsDirectoryResult<T = ()> = Result<T, FsDirectoryError>;
pub type FsSelectionResult<T = ()> = Result<T, FsSelectionError>;

crate::fs_error_wiring! {
    top => FsError {
        BlobIOError      : IO,
        FsChainError     : Chain,
        FsDirectoryError : Directory,
        FsSelectionError : Selection,
    },
    layers => [
        FsChainError,
        FsDirectoryError,
        FsSelectionError,
    ],
    lift => {
        BlobIOError => [ FsChainError::IO, FsDirectoryError::IO ],
    },
}
