//! Client for the external quota authority, and a cache in front of it.
//!
//! The coordinator never decides how much space an identity is entitled to
//! in a space — it asks. [`QuotaClient`] is the seam; [`HttpQuotaClient`]
//! talks to a real authority over HTTP, [`StaticQuotaClient`] is a fixed-
//! answer double for tests, and [`LimitCache`] wraps either one so repeated
//! checks for the same (identity, space) don't round-trip every time.

pub mod cache;
pub mod error;
pub mod http;
pub mod static_client;

pub use cache::LimitCache;
pub use error::{QuotaError, Result};
pub use http::{HttpQuotaClient, HttpQuotaClientConfig};
pub use static_client::StaticQuotaClient;

use async_trait::async_trait;

/// Authority for how many bytes an identity may occupy in a space.
#[async_trait]
pub trait QuotaClient: Send + Sync {
    /// The byte limit granted to `identity` in `space_id`.
    ///
    /// Fails with [`QuotaError::Unauthorized`] if the identity has no
    /// standing in the space at all (distinct from having a zero limit).
    async fn check_limit(&self, space_id: &str, identity: &[u8]) -> Result<u64>;
}

#[async_trait]
impl<T: QuotaClient + ?Sized> QuotaClient for std::sync::Arc<T> {
    async fn check_limit(&self, space_id: &str, identity: &[u8]) -> Result<u64> {
        (**self).check_limit(space_id, identity).await
    }
}
