//! # filenode-block
//!
//! Content-addressed block types and blob storage backends for the filenode
//! binding-and-storage coordinator.
//!
//! This crate provides:
//! - **Block types**: `Block` (CID + bytes) and `BlockRef` (CID + size hint)
//! - **CID utilities**: create and verify BLAKE3-derived CIDv1 identifiers
//! - **BlobStore**: the opaque CID → bytes map the coordinator treats as a
//!   capability, with an in-memory implementation and a remote HTTP one
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              FileNode                    │
//! ├─────────────────────────────────────────┤
//! │             BlobStore trait              │
//! ├─────────────────┬─────────────────────────┤
//! │ MemoryBlobStore  │   HttpBlobStore         │
//! └─────────────────┴─────────────────────────┘
//! ```

pub mod block;
pub mod cid_utils;
pub mod error;
pub mod http;
pub mod memory;

pub use block::{Block, BlockRef};
pub use error::{BlobStoreError, Result};
pub use http::{HttpBlobStore, HttpBlobStoreConfig};
pub use memory::MemoryBlobStore;

use async_trait::async_trait;
use bytes::Bytes;
use cid::Cid;

/// Opaque, persistent CID → bytes store.
///
/// Implementations are consumed as capabilities by `FileNode` — it never
/// names a concrete type, only `Arc<dyn BlobStore>`.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Fetch a block's bytes by CID. `NotFound` if the CID is unknown to
    /// this store.
    async fn get(&self, cid: &Cid) -> Result<Bytes>;

    /// Store a batch of blocks. Atomic per block; on failure the caller
    /// cannot assume which prefix of `blocks` was written.
    async fn add(&self, blocks: &[Block]) -> Result<()>;

    /// Remove blocks by CID. Idempotent — deleting an absent CID is not an
    /// error.
    async fn delete(&self, cids: &[Cid]) -> Result<()>;

    /// Whether a CID's bytes are present in this store.
    async fn exists(&self, cid: &Cid) -> Result<bool>;
}

#[async_trait]
impl<T: BlobStore + ?Sized> BlobStore for std::sync::Arc<T> {
    async fn get(&self, cid: &Cid) -> Result<Bytes> {
        (**self).get(cid).await
    }

    async fn add(&self, blocks: &[Block]) -> Result<()> {
        (**self).add(blocks).await
    }

    async fn delete(&self, cids: &[Cid]) -> Result<()> {
        (**self).delete(cids).await
    }

    async fn exists(&self, cid: &Cid) -> Result<bool> {
        (**self).exists(cid).await
    }
}
