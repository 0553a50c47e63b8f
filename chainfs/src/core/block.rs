// SPDX-License-Identifier: MIT

//! Block records: one bounded slice of file content plus the link to its successor.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::errors::{FsChainError, FsChainResult};

/// Globally unique identifier of a block record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(Uuid);

impl BlockId {
    /// Draws a fresh random identifier.
    #[inline]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for BlockId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// One node of a content chain.
///
/// `next == None` marks the terminal block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    pub payload: String,
    pub next: Option<BlockId>,
}

/// On-store layout of a block. `isLast` is derived from `nextBlockId`.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockRecord<'a> {
    #[serde(borrow)]
    payload: std::borrow::Cow<'a, str>,
    next_block_id: Option<BlockId>,
    is_last: bool,
}

impl Block {
    #[inline]
    pub fn new(payload: impl Into<String>, next: Option<BlockId>) -> Self {
        Self {
            payload: payload.into(),
            next,
        }
    }

    #[inline]
    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }

    /// Payload length in characters.
    #[inline]
    pub fn len(&self) -> usize {
        self.payload.chars().count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Serializes the block as a pretty JSON record.
    pub fn encode(&self) -> FsChainResult<Vec<u8>> {
        let record = BlockRecord {
            payload: std::borrow::Cow::Borrowed(&self.payload),
            next_block_id: self.next,
            is_last: self.is_last(),
        };
        serde_json::to_vec_pretty(&record).map_err(|_| FsChainError::Encode)
    }

    /// Parses the record stored for block `id`.
    ///
    /// A record whose `isLast` flag disagrees with its link is rejected.
    pub fn decode(id: BlockId, bytes: &[u8]) -> FsChainResult<Self> {
        let record: BlockRecord<'_> =
            serde_json::from_slice(bytes).map_err(|_| FsChainError::Malformed(id))?;
        if record.is_last != record.next_block_id.is_none() {
            return Err(FsChainError::Inconsistent(id));
        }
        Ok(Self {
            payload: record.payload.into_owned(),
            next: record.next_block_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_id_text_form() {
        let id = BlockId::generate();
        let text = id.to_string();
        assert_eq!(text.len(), 36);
        assert_eq!(text.parse::<BlockId>().unwrap(), id);
        assert!("not-a-uuid".parse::<BlockId>().is_err());
    }

    #[test]
    fn test_record_layout() {
        let next = BlockId::generate();
        let block = Block::new("hello", Some(next));
        let json: serde_json::Value = serde_json::from_slice(&block.encode().unwrap()).unwrap();

        assert_eq!(json["payload"], "hello");
        assert_eq!(json["nextBlockId"], next.to_string());
        assert_eq!(json["isLast"], false);

        let tail = Block::new("bye", None);
        let json: serde_json::Value = serde_json::from_slice(&tail.encode().unwrap()).unwrap();
        assert!(json["nextBlockId"].is_null());
        assert_eq!(json["isLast"], true);
    }

    #[test]
    fn test_decode_escaped_payload() {
        let id = BlockId::generate();
        let block = Block::new("quote \" and\nnewline ✓", None);
        let decoded = Block::decode(id, &block.encode().unwrap()).unwrap();
        assert_eq!(decoded, block);
        assert_eq!(decoded.len(), 21);
    }

    #[test]
    fn test_decode_rejects_flag_mismatch() {
        let id = BlockId::generate();
        let raw = format!(
            r#"{{"payload":"x","nextBlockId":"{}","isLast":true}}"#,
            BlockId::generate()
        );
        assert_eq!(
            Block::decode(id, raw.as_bytes()),
            Err(FsChainError::Inconsistent(id))
        );

        let raw = r#"{"payload":"x","nextBlockId":null,"isLast":false}"#;
        assert_eq!(
            Block::decode(id, raw.as_bytes()),
            Err(FsChainError::Inconsistent(id))
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let id = BlockId::generate();
        assert_eq!(Block::decode(id, b"{not json"), Err(FsChainError::Malformed(id)));
        assert_eq!(
            Block::decode(id, br#"{"payload":"x"}"#),
            Err(FsChainError::Malformed(id))
        );
    }
}
