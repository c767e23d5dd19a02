//! The binding index: CID existence, file/space bindings, usage accounting,
//! and the per-CID lock table that makes concurrent binds safe.
//!
//! ```text
//!                 ┌───────────────────────────┐
//!   FileNode ───▶ │  Index (this crate)       │
//!                 │   lock()   — per-CID mutex│
//!                 │   bind()   — space/file   │
//!                 │   *_info() — accounting   │
//!                 └───────────────────────────┘
//! ```
//!
//! `Index` is a trait so a clustered deployment can swap in a backend with
//! its own transactions without touching `filenode-core`. This crate ships
//! one implementation, [`InProcessIndex`], suitable for a single coordinator
//! instance.

pub mod error;
pub mod in_process;
pub mod lock;
pub mod types;

pub use error::{IndexError, Result};
pub use in_process::InProcessIndex;
pub use lock::{LockGuard, LockTable};
pub use types::{Availability, FileInfo, SpaceInfo};

use async_trait::async_trait;
use cid::Cid;
use filenode_block::Block;
use std::collections::HashSet;

/// Bindings between content-addressed blocks, the files they make up, and
/// the spaces those files live in.
///
/// Implementations are not required to serialize calls that touch disjoint
/// CIDs, spaces, or files; callers that need cross-CID atomicity acquire
/// [`Index::lock`] first and hold the guard for the duration of the
/// operation.
#[async_trait]
pub trait Index: Send + Sync {
    /// Acquire exclusive locks on the given CIDs, in canonical order, for
    /// the lifetime of the returned guard.
    async fn lock(&self, cids: &[Cid]) -> LockGuard;

    /// Whether the CID is known anywhere (any space, or none).
    async fn exists(&self, cid: &Cid) -> Result<bool>;

    /// Subset of `cids` that are bound to at least one file in `space`.
    async fn exists_in_space(&self, space: &str, cids: &[Cid]) -> Result<HashSet<Cid>>;

    /// Subset of `blocks` whose CIDs are not known anywhere, preserving
    /// input order.
    async fn get_non_existent_blocks(&self, blocks: &[Block]) -> Result<Vec<Block>>;

    /// Bind `blocks` to `file` within `space`, recording each CID's size on
    /// first sighting. Idempotent: binding an already-bound CID to the same
    /// file is a no-op for that CID.
    async fn bind(&self, space: &str, file: &str, blocks: &[Block]) -> Result<()>;

    /// Like [`Index::bind`], but for CIDs whose size is already known
    /// globally. Fails with [`IndexError::CidNotFound`] if any CID isn't.
    async fn bind_cids(&self, space: &str, file: &str, cids: &[Cid]) -> Result<()>;

    /// Record blocks as globally known without binding them to any space or
    /// file. Used by migration to seed the index ahead of a later bind.
    async fn add_blocks(&self, blocks: &[Block]) -> Result<()>;

    /// Remove all of `file`'s bindings within `space`. Idempotent: unbinding
    /// an unknown space or file is a no-op.
    async fn unbind(&self, space: &str, file: &str) -> Result<()>;

    /// Total bytes used by `space`, counting each distinct CID once
    /// regardless of how many files reference it. Zero for an unknown
    /// space.
    async fn space_size(&self, space: &str) -> Result<u64>;

    /// Distinct CID and file counts for `space`. Defaults for an unknown
    /// space.
    async fn space_info(&self, space: &str) -> Result<SpaceInfo>;

    /// Usage for a single file. Fails with [`IndexError::FileNotFound`] if
    /// the space or file is unknown.
    async fn file_info(&self, space: &str, file: &str) -> Result<FileInfo>;
}
