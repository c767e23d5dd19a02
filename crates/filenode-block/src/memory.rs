//! In-memory blob store, used for development, tests, and as the fallback
//! when no remote backend is configured.

use crate::{Block, BlobStore, BlobStoreError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use cid::Cid;
use dashmap::DashMap;
use std::sync::Arc;

/// An in-memory, process-local blob store.
#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    blocks: Arc<DashMap<Cid, Bytes>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self {
            blocks: Arc::new(DashMap::new()),
        }
    }

    /// Number of blocks currently stored.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, cid: &Cid) -> Result<Bytes> {
        self.blocks
            .get(cid)
            .map(|entry| entry.value().clone())
            .ok_or(BlobStoreError::NotFound(*cid))
    }

    async fn add(&self, blocks: &[Block]) -> Result<()> {
        for block in blocks {
            self.blocks.insert(block.cid, block.data.clone());
        }
        Ok(())
    }

    async fn delete(&self, cids: &[Cid]) -> Result<()> {
        for cid in cids {
            self.blocks.remove(cid);
        }
        Ok(())
    }

    async fn exists(&self, cid: &Cid) -> Result<bool> {
        Ok(self.blocks.contains_key(cid))
    }
}
