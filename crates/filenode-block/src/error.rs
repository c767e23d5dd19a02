//! Error types for the filenode-block crate

use cid::Cid;
use thiserror::Error;

/// Result type alias using `BlobStoreError`
pub type Result<T> = std::result::Result<T, BlobStoreError>;

/// Errors that can occur during blob storage operations
#[derive(Error, Debug)]
pub enum BlobStoreError {
    /// Block not found
    #[error("block not found: {0}")]
    NotFound(Cid),

    /// Invalid CID
    #[error("invalid CID: {0}")]
    InvalidCid(String),

    /// Remote backend reachable but returned an error response
    #[error("backend error: {0}")]
    Backend(String),

    /// Remote backend unreachable, timed out, or otherwise transiently failed
    #[error("transient failure: {0}")]
    Transient(String),
}

impl From<reqwest::Error> for BlobStoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            BlobStoreError::Transient(err.to_string())
        } else {
            BlobStoreError::Backend(err.to_string())
        }
    }
}
