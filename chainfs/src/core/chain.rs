// SPDX-License-Identifier: MIT

//! Block chain manager.
//!
//! Content is cut into `block_size`-character payloads, each persisted as its
//! own record and linked head-to-tail through `next`. Identifiers are drawn
//! before anything is written and the records are stored tail first, so every
//! stored block is already fully linked and its successor already exists.

use chainio::prelude::*;

use crate::core::block::{Block, BlockId};
use crate::core::cursor::ChainCursor;
use crate::core::errors::{FsChainError, FsChainResult};
use crate::core::meta::ChainMeta;

/// Splits `content` into consecutive payloads of at most `block_size` characters.
///
/// Empty content yields a single empty payload.
pub fn split_payloads(content: &str, block_size: usize) -> Vec<&str> {
    debug_assert!(block_size > 0);
    if content.is_empty() {
        return vec![""];
    }

    let mut out = Vec::with_capacity(content.len().div_ceil(block_size));
    let mut start = 0;
    let mut chars = 0;
    for (pos, _) in content.char_indices() {
        if chars == block_size {
            out.push(&content[start..pos]);
            start = pos;
            chars = 0;
        }
        chars += 1;
    }
    out.push(&content[start..]);
    out
}

/// Builds the linked blocks for `payloads`: each block points to the next,
/// the last one has no successor.
pub fn build_blocks(payloads: &[&str]) -> Vec<(BlockId, Block)> {
    let ids: Vec<BlockId> = payloads.iter().map(|_| BlockId::generate()).collect();
    payloads
        .iter()
        .enumerate()
        .map(|(i, payload)| (ids[i], Block::new(*payload, ids.get(i + 1).copied())))
        .collect()
}

/// Persists `content` as a new chain and returns its head.
///
/// Content that would need more than `max_chain_len` blocks is rejected
/// before anything is written. On a failed write, the records already stored by this call are removed
/// (best effort) and the store error is returned.
pub fn write_chain<IO: BlobIO + ?Sized>(
    io: &mut IO,
    meta: &ChainMeta,
    content: &str,
) -> FsChainResult<BlockId> {
    let needed = meta.blocks_needed(content.chars().count());
    ensure!(
        needed <= meta.max_chain_len,
        FsChainError::Oversized {
            blocks: needed,
            max: meta.max_chain_len,
        }
    );

    let blocks = build_blocks(&split_payloads(content, meta.block_size));
    let head = blocks[0].0;

    for (written, (id, block)) in blocks.iter().rev().enumerate() {
        let res = block.encode().and_then(|bytes| {
            io.put(&meta.block_key(*id), &bytes)
                .map_err(FsChainError::IO)
        });
        if let Err(e) = res {
            for (id, _) in blocks.iter().rev().take(written) {
                let _ = io.remove(&meta.block_key(*id));
            }
            return Err(e);
        }
    }

    Ok(head)
}

/// Reassembles the content of the chain starting at `head`.
pub fn read_chain<IO: BlobIO + ?Sized>(
    io: &mut IO,
    meta: &ChainMeta,
    head: BlockId,
) -> FsChainResult<String> {
    let mut content = String::new();
    ChainCursor::new(meta, Some(head)).for_each_block(io, |_, _, block| {
        content.push_str(&block.payload);
        Ok(())
    })?;
    Ok(content)
}

/// Identifiers of the chain starting at `head`, in link order.
pub fn chain_ids<IO: BlobIO + ?Sized>(
    io: &mut IO,
    meta: &ChainMeta,
    head: BlockId,
) -> FsChainResult<Vec<BlockId>> {
    let mut ids = Vec::new();
    ChainCursor::new(meta, Some(head)).for_each_block(io, |_, id, _| {
        ids.push(id);
        Ok(())
    })?;
    Ok(ids)
}

/// Deletes every block of the chain starting at `head` and returns how many
/// records were removed.
///
/// A `None` head is a no-op, and the walk stops silently at the first missing
/// block, so deleting an already deleted chain succeeds.
pub fn delete_chain<IO: BlobIO + ?Sized>(
    io: &mut IO,
    meta: &ChainMeta,
    head: Option<BlockId>,
) -> FsChainResult<usize> {
    let mut cursor = ChainCursor::new(meta, head);
    let mut removed = 0;

    while let Some(res) = cursor.next_with(io) {
        let id = match res {
            Ok((id, _)) => id,
            Err(FsChainError::MissingBlock(_)) => break,
            Err(e) => return Err(e),
        };
        if io.remove(&meta.block_key(id))? {
            removed += 1;
        }
    }

    Ok(removed)
}
