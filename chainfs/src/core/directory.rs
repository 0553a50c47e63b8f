// SPDX-License-Identifier: MIT

//! Directory table: the ordered list of file entries and its snapshot record.

use std::fmt;

use chainio::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::core::block::BlockId;
use crate::core::errors::{
    FsDirectoryError, FsDirectoryResult, FsSelectionError, FsSelectionResult,
};
use crate::core::meta::ChainMeta;

/// Lifecycle state of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    Active,
    Recycled,
}

/// Visibility filter used for listings and index resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Active,
    Recycled,
}

impl View {
    #[inline]
    pub fn matches(self, entry: &FileEntry) -> bool {
        match self {
            View::Active => !entry.in_recycle_bin,
            View::Recycled => entry.in_recycle_bin,
        }
    }
}

/// Stable position of an entry in the table.
///
/// Entries are never removed, so a slot keeps designating the same entry for
/// the life of the table, unlike a listing index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileSlot(pub(crate) usize);

impl FileSlot {
    #[inline]
    pub fn position(self) -> usize {
        self.0
    }
}

impl fmt::Display for FileSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One directory record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub name: String,
    pub first_block_id: Option<BlockId>,
    #[serde(default)]
    pub in_recycle_bin: bool,
    pub total_length: usize,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub modified_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub deleted_at: Option<OffsetDateTime>,
}

impl FileEntry {
    /// A fresh active entry with no content chain yet.
    pub fn new(name: impl Into<String>, created_at: OffsetDateTime) -> Self {
        Self {
            name: name.into(),
            first_block_id: None,
            in_recycle_bin: false,
            total_length: 0,
            created_at,
            modified_at: None,
            deleted_at: None,
        }
    }

    #[inline]
    pub fn state(&self) -> FileState {
        if self.in_recycle_bin {
            FileState::Recycled
        } else {
            FileState::Active
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state() == FileState::Active
    }
}

/// One row of a listing: its transient index, its stable slot and the entry.
#[derive(Debug, Clone, Copy)]
pub struct Listing<'a> {
    pub index: usize,
    pub slot: FileSlot,
    pub entry: &'a FileEntry,
}

/// In-memory directory table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Directory {
    files: Vec<FileEntry>,
}

impl Directory {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    #[inline]
    pub fn entries(&self) -> &[FileEntry] {
        &self.files
    }

    #[inline]
    pub fn get(&self, slot: FileSlot) -> FsSelectionResult<&FileEntry> {
        self.files
            .get(slot.0)
            .ok_or(FsSelectionError::UnknownSlot(slot))
    }

    #[inline]
    pub fn get_mut(&mut self, slot: FileSlot) -> FsSelectionResult<&mut FileEntry> {
        self.files
            .get_mut(slot.0)
            .ok_or(FsSelectionError::UnknownSlot(slot))
    }

    /// Appends an entry and returns its slot.
    pub fn push(&mut self, entry: FileEntry) -> FileSlot {
        self.files.push(entry);
        FileSlot(self.files.len() - 1)
    }

    /// Drops the most recently appended entry. Used to roll back a failed create.
    pub(crate) fn pop(&mut self) -> Option<FileEntry> {
        self.files.pop()
    }

    /// Entries matching `view`, in table order, with their listing index.
    pub fn list(&self, view: View) -> Vec<Listing<'_>> {
        self.files
            .iter()
            .enumerate()
            .filter(|(_, e)| view.matches(e))
            .enumerate()
            .map(|(index, (pos, entry))| Listing {
                index,
                slot: FileSlot(pos),
                entry,
            })
            .collect()
    }

    /// Resolves a 0-based listing index of `view` to its slot.
    pub fn find_by_index(&self, view: View, index: usize) -> FsSelectionResult<FileSlot> {
        let mut matching = self
            .files
            .iter()
            .enumerate()
            .filter(|(_, e)| view.matches(e));
        match matching.nth(index) {
            Some((pos, _)) => Ok(FileSlot(pos)),
            None => Err(FsSelectionError::OutOfRange {
                index,
                len: self.files.iter().filter(|e| view.matches(e)).count(),
            }),
        }
    }

    /// Whether an active entry is named `name`.
    pub fn has_active_name(&self, name: &str) -> bool {
        self.files.iter().any(|e| e.is_active() && e.name == name)
    }
}

/// Loads the table snapshot; a missing snapshot is an empty table.
pub fn load<IO: BlobIO + ?Sized>(io: &mut IO, meta: &ChainMeta) -> FsDirectoryResult<Directory> {
    let bytes = match io.get_opt(&meta.directory_key()) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return Ok(Directory::new()),
        Err(e) => return Err(FsDirectoryError::Unreadable(e)),
    };
    serde_json::from_slice(&bytes).map_err(|_| FsDirectoryError::Malformed)
}

/// Overwrites the table snapshot with `table`.
pub fn save<IO: BlobIO + ?Sized>(
    io: &mut IO,
    meta: &ChainMeta,
    table: &Directory,
) -> FsDirectoryResult {
    let bytes = serde_json::to_vec_pretty(table).map_err(|_| FsDirectoryError::Encode)?;
    io.put(&meta.directory_key(), &bytes)?;
    io.flush()?;
    Ok(())
}
