//! Error types for the filenode-index crate

use thiserror::Error;

/// Result type alias using `IndexError`
pub type Result<T> = std::result::Result<T, IndexError>;

/// Errors that can occur in Index operations
#[derive(Error, Debug)]
pub enum IndexError {
    /// A CID referenced by a binding call has no globally recorded size and
    /// none was supplied (`bind_cids` requires the CID to already be known).
    #[error("CID not found: {0}")]
    CidNotFound(cid::Cid),

    /// Query for an unknown file within a known space.
    #[error("file not found: {space}/{file}")]
    FileNotFound { space: String, file: String },

    /// Invariant violation: caller tried to bind a block with no known and
    /// no supplied size.
    #[error("missing size for CID: {0}")]
    MissingSize(cid::Cid),

    /// The lock wait was cancelled before it could be acquired.
    #[error("lock acquisition cancelled")]
    LockCancelled,
}
