//! # filenode-core
//!
//! The binding-and-storage coordinator for a content-addressed file storage
//! node. [`FileNode`] mediates between a blob store, a reference index, and
//! a quota authority, none of which it names a concrete type for — it
//! consumes them as `Arc<dyn Trait>` capabilities supplied by whatever
//! transport adapter wires it up.

pub mod coordinator;
pub mod error;

pub use coordinator::{FileNode, FileNodeBuilder, MIGRATION_FILE_ID};
pub use error::{FileNodeError, Result};

pub use filenode_block::{BlobStore, Block, BlockRef};
pub use filenode_index::{Availability, FileInfo, Index, SpaceInfo};
pub use filenode_quota::QuotaClient;
