//! Fixed-answer `QuotaClient`, for tests and for operators who want a flat
//! per-space limit without standing up a separate authority service.

use crate::error::{QuotaError, Result};
use crate::QuotaClient;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

/// Returns a configured limit for known spaces, or a default for everything
/// else. Every identity is treated identically — this client does not
/// distinguish between identities within a space.
pub struct StaticQuotaClient {
    default_limit: u64,
    overrides: RwLock<HashMap<String, u64>>,
    denied: RwLock<HashSet<String>>,
}

impl StaticQuotaClient {
    pub fn new(default_limit: u64) -> Self {
        Self {
            default_limit,
            overrides: RwLock::new(HashMap::new()),
            denied: RwLock::new(HashSet::new()),
        }
    }

    /// Set a space-specific limit, overriding the default.
    pub fn set_limit(&self, space_id: impl Into<String>, limit: u64) {
        self.overrides.write().insert(space_id.into(), limit);
    }

    /// Deny a space outright, regardless of the default.
    pub fn deny(&self, space_id: impl Into<String>) {
        let space_id = space_id.into();
        self.denied.write().insert(space_id);
    }
}

#[async_trait]
impl QuotaClient for StaticQuotaClient {
    async fn check_limit(&self, space_id: &str, _identity: &[u8]) -> Result<u64> {
        if self.denied.read().contains(space_id) {
            return Err(QuotaError::Unauthorized {
                space_id: space_id.to_string(),
            });
        }
        Ok(self
            .overrides
            .read()
            .get(space_id)
            .copied()
            .unwrap_or(self.default_limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_limit_applies_to_unknown_spaces() {
        let client = StaticQuotaClient::new(1024);
        assert_eq!(client.check_limit("anything", b"id").await.unwrap(), 1024);
    }

    #[tokio::test]
    async fn override_wins_over_default() {
        let client = StaticQuotaClient::new(1024);
        client.set_limit("s1", 4096);
        assert_eq!(client.check_limit("s1", b"id").await.unwrap(), 4096);
        assert_eq!(client.check_limit("s2", b"id").await.unwrap(), 1024);
    }

    #[tokio::test]
    async fn denied_space_is_unauthorized() {
        let client = StaticQuotaClient::new(1024);
        client.deny("blocked");
        let err = client.check_limit("blocked", b"id").await.unwrap_err();
        assert!(matches!(err, QuotaError::Unauthorized { .. }));
    }
}
