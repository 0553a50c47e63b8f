// SPDX-License-Identifier: MIT

//! Consistency checker for a store.
//!
//! Walks every entry's chain and cross-checks it against the table and the
//! records present in the data namespace.

pub mod types;

use std::collections::HashMap;

use chainio::prelude::*;

pub use types::*;

use crate::core::block::BlockId;
use crate::core::cursor::ChainCursor;
use crate::core::directory::{Directory, FileSlot};
use crate::core::errors::FsResult;
use crate::core::meta::{ChainMeta, DATA_NAMESPACE};

/// Trait for verifying the integrity of a store.
pub trait FsChecker {
    /// Runs all available checks.
    ///
    /// Store failures while listing records abort the run; everything else is
    /// reported as a finding.
    fn check_all(&mut self) -> FsResult<VerifyReport>;
}

pub struct ChainChecker<'a, IO: BlobIO + ?Sized> {
    io: &'a mut IO,
    meta: &'a ChainMeta,
    table: &'a Directory,
}

impl<'a, IO: BlobIO + ?Sized> ChainChecker<'a, IO> {
    pub fn new(io: &'a mut IO, meta: &'a ChainMeta, table: &'a Directory) -> Self {
        Self { io, meta, table }
    }

    /// Walks the chain of every entry, recording which slot owns which block.
    fn check_chains(&mut self, rep: &mut VerifyReport) -> HashMap<BlockId, FileSlot> {
        let mut owners: HashMap<BlockId, FileSlot> = HashMap::new();

        for (pos, entry) in self.table.entries().iter().enumerate() {
            let slot = FileSlot(pos);
            let name = &entry.name;

            let Some(head) = entry.first_block_id else {
                rep.push(Finding::new(
                    FindingCode::MissingHead,
                    format!("{slot} '{name}' has no first block"),
                ));
                continue;
            };

            let mut length = 0usize;
            let mut cursor = ChainCursor::new(self.meta, Some(head));
            while let Some(res) = cursor.next_with(self.io) {
                let (id, block) = match res {
                    Ok(step) => step,
                    Err(e) => {
                        rep.push(Finding::new(
                            FindingCode::BrokenChain,
                            format!("{slot} '{name}': {e}"),
                        ));
                        break;
                    }
                };

                if let Some(other) = owners.insert(id, slot) {
                    rep.push(Finding::new(
                        FindingCode::SharedBlock,
                        format!("block {id} is linked from {other} and {slot} '{name}'"),
                    ));
                }

                let len = block.len();
                if len > self.meta.block_size {
                    rep.push(Finding::new(
                        FindingCode::OversizedBlock,
                        format!("{slot} '{name}': block {id} holds {len} characters"),
                    ));
                } else if !block.is_last() && len < self.meta.block_size {
                    rep.push(Finding::new(
                        FindingCode::ShortBlock,
                        format!("{slot} '{name}': inner block {id} holds {len} characters"),
                    ));
                }
                length += len;

                if block.is_last() && length != entry.total_length {
                    rep.push(Finding::new(
                        FindingCode::LengthMismatch,
                        format!(
                            "{slot} '{name}': table says {} characters, chain holds {length}",
                            entry.total_length
                        ),
                    ));
                }
            }
        }

        owners
    }

    /// Reports records of the data namespace that no chain reaches.
    fn check_orphans(
        &mut self,
        owners: &HashMap<BlockId, FileSlot>,
        rep: &mut VerifyReport,
    ) -> FsResult<usize> {
        let keys = self.io.list(DATA_NAMESPACE)?;
        for key in &keys {
            let code = match self.meta.block_id_from_key(key) {
                Some(id) if owners.contains_key(&id) => continue,
                Some(_) => FindingCode::OrphanBlock,
                None => FindingCode::ForeignRecord,
            };
            rep.push(Finding::new(code, key.clone()));
        }
        Ok(keys.len())
    }
}

impl<IO: BlobIO + ?Sized> FsChecker for ChainChecker<'_, IO> {
    fn check_all(&mut self) -> FsResult<VerifyReport> {
        let mut rep = VerifyReport::default();
        let owners = self.check_chains(&mut rep);
        let records = self.check_orphans(&owners, &mut rep)?;

        rep.push(Finding::new(
            FindingCode::Summary,
            format!(
                "{} entries, {} linked blocks, {} block records",
                self.table.len(),
                owners.len(),
                records
            ),
        ));
        Ok(rep)
    }
}
