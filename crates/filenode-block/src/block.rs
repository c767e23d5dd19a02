//! Block types

use bytes::Bytes;
use cid::Cid;
use serde::{Deserialize, Serialize};

/// An immutable (CID, bytes) pair.
#[derive(Clone, Debug)]
pub struct Block {
    /// The content identifier
    pub cid: Cid,
    /// The raw data
    pub data: Bytes,
}

impl Block {
    /// Create a block from an already-known CID and its bytes.
    pub fn new(cid: Cid, data: impl Into<Bytes>) -> Self {
        Self {
            cid,
            data: data.into(),
        }
    }

    /// Create a block from raw bytes, computing its CID.
    pub fn from_data(data: impl Into<Bytes>) -> Self {
        let data = data.into();
        let cid = crate::cid_utils::create_cid(&data);
        Self { cid, data }
    }

    /// The block's size in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Whether the bytes actually hash to the claimed CID.
    pub fn hash_matches(&self) -> bool {
        crate::cid_utils::verify_cid(&self.data, &self.cid)
    }
}

/// A lightweight reference to a block: its CID plus an optional size hint,
/// used where the bytes themselves aren't needed (e.g. `BlocksBind`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockRef {
    #[serde(with = "cid_serde")]
    pub cid: Cid,
    pub size: Option<u64>,
}

impl BlockRef {
    pub fn new(cid: Cid) -> Self {
        Self { cid, size: None }
    }

    pub fn with_size(cid: Cid, size: u64) -> Self {
        Self {
            cid,
            size: Some(size),
        }
    }
}

impl From<Cid> for BlockRef {
    fn from(cid: Cid) -> Self {
        Self::new(cid)
    }
}

impl From<&Block> for BlockRef {
    fn from(block: &Block) -> Self {
        Self::with_size(block.cid, block.size())
    }
}

/// Serde helper: CIDs serialize as their string form.
mod cid_serde {
    use cid::Cid;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(cid: &Cid, s: S) -> Result<S::Ok, S::Error> {
        cid.to_string().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Cid, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_data_computes_cid() {
        let block = Block::from_data(&b"hello"[..]);
        assert_eq!(block.size(), 5);
        assert!(block.hash_matches());
    }

    #[test]
    fn tampered_block_fails_hash_check() {
        let mut block = Block::from_data(&b"hello"[..]);
        block.data = Bytes::from_static(b"world");
        assert!(!block.hash_matches());
    }

    #[test]
    fn block_ref_serde_roundtrip() {
        let block = Block::from_data(&b"ref me"[..]);
        let block_ref = BlockRef::from(&block);
        let json = serde_json::to_string(&block_ref).unwrap();
        let back: BlockRef = serde_json::from_str(&json).unwrap();
        assert_eq!(block_ref, back);
    }
}
