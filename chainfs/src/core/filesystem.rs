// SPDX-License-Identifier: MIT

//! File lifecycle controller.
//!
//! `Active --delete--> Recycled --restore--> Active`. Creation yields an
//! active entry; there is no hard delete. Every mutating operation takes
//! `&mut self`, which makes the owner of a `FatSystem` its single writer.

use chainio::prelude::*;
use time::OffsetDateTime;

use crate::core::block::BlockId;
use crate::core::checker::{ChainChecker, FsChecker, VerifyReport};
use crate::core::directory::{self, Directory, FileEntry, FileSlot, Listing, View};
use crate::core::errors::{FsDirectoryError, FsError, FsResult, FsSelectionError};
use crate::core::meta::ChainMeta;
use crate::core::utils::time_utils::now_utc;
use crate::core::chain;

/// Metadata and content of an opened file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedFile {
    pub slot: FileSlot,
    pub entry: FileEntry,
    pub content: String,
}

/// A store of chained files on top of a record store.
#[derive(Debug)]
pub struct FatSystem<IO: BlobIO> {
    io: IO,
    meta: ChainMeta,
    table: Directory,
}

impl<IO: BlobIO> FatSystem<IO> {
    /// Loads the directory snapshot from `io` (empty when none exists).
    pub fn mount(mut io: IO, meta: ChainMeta) -> FsResult<Self> {
        let table = directory::load(&mut io, &meta)?;
        Ok(Self { io, meta, table })
    }

    #[inline]
    pub fn meta(&self) -> &ChainMeta {
        &self.meta
    }

    #[inline]
    pub fn directory(&self) -> &Directory {
        &self.table
    }

    #[inline]
    pub fn io(&self) -> &IO {
        &self.io
    }

    #[inline]
    pub fn io_mut(&mut self) -> &mut IO {
        &mut self.io
    }

    #[inline]
    pub fn into_inner(self) -> IO {
        self.io
    }

    /// Creates an active file holding `content`.
    pub fn create(&mut self, name: &str, content: &str) -> FsResult<FileSlot> {
        if !self.meta.allow_duplicate_names {
            ensure!(
                !self.table.has_active_name(name),
                FsSelectionError::DuplicateName
            );
        }

        let chars = content.chars().count();
        let mut entry = FileEntry::new(name, now_utc());
        let head = chain::write_chain(&mut self.io, &self.meta, content)?;
        entry.first_block_id = Some(head);
        entry.total_length = chars;

        let slot = self.table.push(entry);
        if let Err(e) = directory::save(&mut self.io, &self.meta, &self.table) {
            self.table.pop();
            return Err(self.discard_chain(head, chars, e));
        }
        Ok(slot)
    }

    /// Entries visible in `view`, with their listing index and stable slot.
    pub fn list(&self, view: View) -> Vec<Listing<'_>> {
        self.table.list(view)
    }

    /// Reads the active file at listing index `index`.
    pub fn open(&mut self, index: usize) -> FsResult<OpenedFile> {
        let slot = self.table.find_by_index(View::Active, index)?;
        self.open_slot(slot)
    }

    pub fn open_slot(&mut self, slot: FileSlot) -> FsResult<OpenedFile> {
        let entry = self.active_entry(slot)?.clone();
        let content = match entry.first_block_id {
            Some(head) => chain::read_chain(&mut self.io, &self.meta, head)?,
            None => String::new(),
        };
        Ok(OpenedFile {
            slot,
            entry,
            content,
        })
    }

    /// Replaces the content of the active file at listing index `index`.
    pub fn modify(&mut self, index: usize, content: &str) -> FsResult {
        let slot = self.table.find_by_index(View::Active, index)?;
        self.modify_slot(slot, content)
    }

    /// Replaces the content of the file in `slot`.
    ///
    /// The new chain is written before the old one is touched, so a failed
    /// write leaves the file unchanged. Once the table points at the new chain,
    /// the old blocks are deleted; if that fails the content is already
    /// replaced and `FsError::StaleChain` is returned, whatever stopped the
    /// delete.
    pub fn modify_slot(&mut self, slot: FileSlot, content: &str) -> FsResult {
        self.active_entry(slot)?;

        let chars = content.chars().count();
        let head = chain::write_chain(&mut self.io, &self.meta, content)?;
        let entry = self.table.get_mut(slot)?;
        let previous = entry.clone();
        entry.first_block_id = Some(head);
        entry.total_length = chars;
        entry.modified_at = Some(now_utc());

        if let Err(e) = directory::save(&mut self.io, &self.meta, &self.table) {
            *self.table.get_mut(slot)? = previous;
            return Err(self.discard_chain(head, chars, e));
        }

        if let Some(old_head) = previous.first_block_id {
            if let Err(cause) = chain::delete_chain(&mut self.io, &self.meta, Some(old_head)) {
                return Err(FsError::StaleChain { old_head, cause });
            }
        }
        Ok(())
    }

    /// Moves the active file at listing index `index` to the recycle bin.
    pub fn delete(&mut self, index: usize) -> FsResult {
        let slot = self.table.find_by_index(View::Active, index)?;
        self.delete_slot(slot)
    }

    pub fn delete_slot(&mut self, slot: FileSlot) -> FsResult {
        self.active_entry(slot)?;
        self.update_state(slot, true, Some(now_utc()))
    }

    /// Brings the recycled file at listing index `index` back.
    pub fn restore(&mut self, index: usize) -> FsResult {
        let slot = self.table.find_by_index(View::Recycled, index)?;
        self.restore_slot(slot)
    }

    pub fn restore_slot(&mut self, slot: FileSlot) -> FsResult {
        let entry = self.table.get(slot)?;
        ensure!(!entry.is_active(), FsSelectionError::NotRecycled(slot));
        self.update_state(slot, false, None)
    }

    /// Runs the consistency checker over the whole store.
    pub fn check(&mut self) -> FsResult<VerifyReport> {
        ChainChecker::new(&mut self.io, &self.meta, &self.table).check_all()
    }

    /// Removes the chain at `head` after the table save failed, so it never
    /// became reachable. Returns the error to report: the save error itself,
    /// or `PartialRollback` with the number of blocks left behind (all of them
    /// when the walk itself failed).
    fn discard_chain(&mut self, head: BlockId, chars: usize, cause: FsDirectoryError) -> FsError {
        let written = self.meta.blocks_needed(chars);
        let removed = chain::delete_chain(&mut self.io, &self.meta, Some(head)).unwrap_or(0);
        match written.saturating_sub(removed) {
            0 => cause.into(),
            stale => FsError::PartialRollback { cause, stale },
        }
    }

    fn active_entry(&self, slot: FileSlot) -> FsResult<&FileEntry> {
        let entry = self.table.get(slot)?;
        ensure!(entry.is_active(), FsSelectionError::NotActive(slot));
        Ok(entry)
    }

    /// Flips the recycle flag of `slot` and persists; reverts on save failure.
    fn update_state(
        &mut self,
        slot: FileSlot,
        recycled: bool,
        deleted_at: Option<OffsetDateTime>,
    ) -> FsResult {
        let entry = self.table.get_mut(slot)?;
        let previous = (entry.in_recycle_bin, entry.deleted_at);
        entry.in_recycle_bin = recycled;
        entry.deleted_at = deleted_at;

        if let Err(e) = directory::save(&mut self.io, &self.meta, &self.table) {
            let entry = self.table.get_mut(slot)?;
            (entry.in_recycle_bin, entry.deleted_at) = previous;
            return Err(FsError::from(e));
        }
        Ok(())
    }
}
