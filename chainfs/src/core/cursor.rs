// SPDX-License-Identifier: MIT

use std::collections::HashSet;

use chainio::prelude::*;

use crate::core::block::{Block, BlockId};
use crate::core::errors::{FsChainError, FsChainResult};
use crate::core::meta::ChainMeta;

/// Cursor walking a block chain from its head.
///
/// Each step fetches one record from the store and yields it with its id.
/// The walk stops after the terminal block, on the first error, or when a
/// block id repeats (loop) or the chain grows past `max_chain_len`.
#[derive(Debug)]
pub struct ChainCursor<'a> {
    meta: &'a ChainMeta,
    current: Option<BlockId>,
    seen: HashSet<BlockId>,
}

impl<'a> ChainCursor<'a> {
    /// Creates a cursor; a `None` head is an empty chain.
    pub fn new(meta: &'a ChainMeta, head: Option<BlockId>) -> Self {
        Self {
            meta,
            current: head,
            seen: HashSet::new(),
        }
    }

    /// Number of blocks visited so far.
    #[inline]
    pub fn visited(&self) -> usize {
        self.seen.len()
    }

    /// One iteration step.
    pub fn next_with<IO>(&mut self, io: &mut IO) -> Option<FsChainResult<(BlockId, Block)>>
    where
        IO: BlobIO + ?Sized,
    {
        let id = self.current.take()?;

        if !self.seen.insert(id) {
            return Some(Err(FsChainError::LoopDetected(id)));
        }
        if self.seen.len() > self.meta.max_chain_len {
            return Some(Err(FsChainError::TooLong(self.meta.max_chain_len)));
        }

        let bytes = match io.get(&self.meta.block_key(id)) {
            Ok(bytes) => bytes,
            Err(BlobIOError::NotFound) => return Some(Err(FsChainError::MissingBlock(id))),
            Err(e) => return Some(Err(FsChainError::Unreadable(id, e))),
        };

        match Block::decode(id, &bytes) {
            Ok(block) => {
                self.current = block.next;
                Some(Ok((id, block)))
            }
            Err(e) => Some(Err(e)),
        }
    }

    /// Iterate block by block via callback
    pub fn for_each_block<IO, F>(&mut self, io: &mut IO, mut f: F) -> FsChainResult<()>
    where
        IO: BlobIO + ?Sized,
        F: FnMut(&mut IO, BlockId, Block) -> FsChainResult<()>,
    {
        while let Some(res) = self.next_with(io) {
            let (id, block) = res?;
            f(io, id, block)?;
        }
        Ok(())
    }

    /// Creates a block-by-block iterator
    pub fn iter<'b, IO>(&'b mut self, io: &'b mut IO) -> BlockIter<'a, 'b, IO>
    where
        IO: BlobIO + ?Sized,
    {
        BlockIter { cursor: self, io }
    }
}

/// Block-by-block iterator
pub struct BlockIter<'a, 'b, IO: ?Sized> {
    cursor: &'b mut ChainCursor<'a>,
    io: &'b mut IO,
}

impl<'a, 'b, IO> Iterator for BlockIter<'a, 'b, IO>
where
    IO: BlobIO + ?Sized,
{
    type Item = FsChainResult<(BlockId, Block)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.next_with(self.io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put(io: &mut MemBlobIO, meta: &ChainMeta, id: BlockId, block: &Block) {
        io.put(&meta.block_key(id), &block.encode().unwrap()).unwrap();
    }

    #[test]
    fn test_walks_in_order() {
        let meta = ChainMeta::default();
        let mut io = MemBlobIO::new();
        let (a, b) = (BlockId::generate(), BlockId::generate());
        put(&mut io, &meta, a, &Block::new("first", Some(b)));
        put(&mut io, &meta, b, &Block::new("second", None));

        let mut cursor = ChainCursor::new(&meta, Some(a));
        let got: Vec<_> = cursor
            .iter(&mut io)
            .map(|r| r.unwrap())
            .map(|(id, block)| (id, block.payload))
            .collect();
        assert_eq!(got, vec![(a, "first".to_string()), (b, "second".to_string())]);
        assert_eq!(cursor.visited(), 2);
    }

    #[test]
    fn test_empty_head() {
        let meta = ChainMeta::default();
        let mut io = MemBlobIO::new();
        let mut cursor = ChainCursor::new(&meta, None);
        assert!(cursor.next_with(&mut io).is_none());
    }

    #[test]
    fn test_detects_loop() {
        let meta = ChainMeta::default();
        let mut io = MemBlobIO::new();
        let (a, b) = (BlockId::generate(), BlockId::generate());
        put(&mut io, &meta, a, &Block::new("a", Some(b)));
        put(&mut io, &meta, b, &Block::new("b", Some(a)));

        let mut cursor = ChainCursor::new(&meta, Some(a));
        let res = cursor.for_each_block(&mut io, |_, _, _| Ok(()));
        assert_eq!(res, Err(FsChainError::LoopDetected(a)));
    }

    #[test]
    fn test_enforces_max_len() {
        let meta = ChainMeta {
            max_chain_len: 2,
            ..ChainMeta::default()
        };
        let mut io = MemBlobIO::new();
        let ids: Vec<BlockId> = (0..3).map(|_| BlockId::generate()).collect();
        for (i, id) in ids.iter().enumerate() {
            put(&mut io, &meta, *id, &Block::new("x", ids.get(i + 1).copied()));
        }

        let mut cursor = ChainCursor::new(&meta, Some(ids[0]));
        let res = cursor.for_each_block(&mut io, |_, _, _| Ok(()));
        assert_eq!(res, Err(FsChainError::TooLong(2)));
    }

    #[test]
    fn test_reports_missing_successor() {
        let meta = ChainMeta::default();
        let mut io = MemBlobIO::new();
        let (a, b) = (BlockId::generate(), BlockId::generate());
        put(&mut io, &meta, a, &Block::new("a", Some(b)));

        let mut cursor = ChainCursor::new(&meta, Some(a));
        assert!(cursor.next_with(&mut io).unwrap().is_ok());
        assert_eq!(
            cursor.next_with(&mut io).unwrap(),
            Err(FsChainError::MissingBlock(b))
        );
        assert!(cursor.next_with(&mut io).is_none());
    }
}
