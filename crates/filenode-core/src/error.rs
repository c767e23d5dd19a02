//! Unified error taxonomy for the coordinator.
//!
//! Every lower-layer error (`BlobStoreError`, `IndexError`, `QuotaError`)
//! funnels into one of these variants so `filenode-server` has a single
//! table to map to wire responses.

use cid::Cid;
use filenode_block::BlobStoreError;
use filenode_index::IndexError;
use filenode_quota::QuotaError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FileNodeError>;

#[derive(Error, Debug)]
pub enum FileNodeError {
    /// The identity has no standing in this space at all.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A space's usage has reached (or would exceed) its quota.
    #[error("space {space} limit exceeded: {used}/{limit} bytes used")]
    SpaceLimitExceeded {
        space: String,
        limit: u64,
        used: u64,
    },

    /// A block's bytes don't hash to the CID it was submitted under.
    #[error("block content does not match CID {0}")]
    WrongHash(Cid),

    /// No block is known anywhere for this CID.
    #[error("CID not found: {0}")]
    CidNotFound(Cid),

    /// No file is known at this (space, file) pair.
    #[error("file not found: {space}/{file}")]
    FileNotFound { space: String, file: String },

    /// A dependency is reachable in principle but timed out or refused the
    /// connection; safe to retry.
    #[error("dependency unavailable: {0}")]
    Unavailable(String),

    /// Anything else: a bug, or a dependency response we can't make sense
    /// of.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<BlobStoreError> for FileNodeError {
    fn from(err: BlobStoreError) -> Self {
        match err {
            BlobStoreError::NotFound(cid) => FileNodeError::CidNotFound(cid),
            BlobStoreError::Transient(msg) => FileNodeError::Unavailable(msg),
            BlobStoreError::InvalidCid(msg) => FileNodeError::Internal(msg),
            BlobStoreError::Backend(msg) => FileNodeError::Internal(msg),
        }
    }
}

impl From<IndexError> for FileNodeError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::CidNotFound(cid) => FileNodeError::CidNotFound(cid),
            IndexError::FileNotFound { space, file } => FileNodeError::FileNotFound { space, file },
            IndexError::MissingSize(cid) => {
                FileNodeError::Internal(format!("missing size for CID {cid}"))
            }
            IndexError::LockCancelled => {
                FileNodeError::Unavailable("lock acquisition cancelled".to_string())
            }
        }
    }
}

impl From<QuotaError> for FileNodeError {
    fn from(err: QuotaError) -> Self {
        match err {
            QuotaError::Unauthorized { space_id } => {
                FileNodeError::Forbidden(format!("identity not authorized for space {space_id}"))
            }
            QuotaError::Backend(msg) => FileNodeError::Internal(msg),
            QuotaError::Transient(msg) => FileNodeError::Unavailable(msg),
        }
    }
}
