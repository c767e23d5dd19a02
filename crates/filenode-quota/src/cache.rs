//! TTL + LRU cache in front of a [`QuotaClient`].
//!
//! Grounded in the cached-wrapper pattern the teacher crate uses to avoid
//! round-tripping to a remote store for every request: an `lru::LruCache`
//! bounded by entry count, with entries additionally expiring after a fixed
//! TTL so a later quota change on the authority side is picked up eventually
//! without needing invalidation.

use crate::error::Result;
use crate::QuotaClient;
use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const DEFAULT_CAPACITY: usize = 10_000;
const DEFAULT_TTL: Duration = Duration::from_secs(300);

#[derive(Clone, Copy)]
struct Entry {
    limit: u64,
    fetched_at: Instant,
}

type Key = (Vec<u8>, String);

/// Wraps a [`QuotaClient`], caching successful answers for a TTL.
///
/// Errors are never cached: a transient backend failure should not pin an
/// identity to a stale-bad state, and an `Unauthorized` answer might change
/// the moment an operator grants access.
pub struct LimitCache<C> {
    inner: C,
    ttl: Duration,
    cache: Mutex<LruCache<Key, Entry>>,
}

impl<C: QuotaClient> LimitCache<C> {
    pub fn new(inner: C) -> Self {
        Self::with_capacity_and_ttl(inner, DEFAULT_CAPACITY, DEFAULT_TTL)
    }

    pub fn with_capacity_and_ttl(inner: C, capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap());
        Self {
            inner,
            ttl,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    async fn cached(&self, key: &Key) -> Option<u64> {
        let mut cache = self.cache.lock().await;
        match cache.get(key) {
            Some(entry) if entry.fetched_at.elapsed() < self.ttl => Some(entry.limit),
            Some(_) => {
                cache.pop(key);
                None
            }
            None => None,
        }
    }
}

#[async_trait]
impl<C: QuotaClient + Send + Sync> QuotaClient for LimitCache<C> {
    async fn check_limit(&self, space_id: &str, identity: &[u8]) -> Result<u64> {
        let key: Key = (identity.to_vec(), space_id.to_string());

        if let Some(limit) = self.cached(&key).await {
            return Ok(limit);
        }

        let limit = self.inner.check_limit(space_id, identity).await?;

        let mut cache = self.cache.lock().await;
        cache.put(
            key,
            Entry {
                limit,
                fetched_at: Instant::now(),
            },
        );
        Ok(limit)
    }
}
