//! Error types for the filenode-quota crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuotaError>;

/// Errors raised while consulting the quota authority.
#[derive(Error, Debug)]
pub enum QuotaError {
    /// The authority rejected the identity for this space outright.
    #[error("identity not authorized for space {space_id}")]
    Unauthorized { space_id: String },

    /// The authority is reachable but returned a malformed or unexpected
    /// response.
    #[error("quota backend error: {0}")]
    Backend(String),

    /// The authority is unreachable or timed out; callers may retry.
    #[error("quota backend unavailable: {0}")]
    Transient(String),
}

impl From<reqwest::Error> for QuotaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            QuotaError::Transient(err.to_string())
        } else {
            QuotaError::Backend(err.to_string())
        }
    }
}
