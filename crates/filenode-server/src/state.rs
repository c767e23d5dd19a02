//! Shared application state: configuration plus the wired-up coordinator.

use crate::config::NodeConfig;
use filenode_block::{BlobStore, HttpBlobStore, HttpBlobStoreConfig, MemoryBlobStore};
use filenode_core::FileNode;
use filenode_index::InProcessIndex;
use filenode_quota::{HttpQuotaClient, HttpQuotaClientConfig, LimitCache, QuotaClient, StaticQuotaClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub struct AppState {
    pub config: NodeConfig,
    pub node: Arc<FileNode>,
}

impl AppState {
    pub fn new(config: NodeConfig) -> anyhow::Result<Self> {
        let store = Self::build_store(&config)?;
        let quota = Self::build_quota(&config)?;

        let node = FileNode::builder()
            .store(store)
            .index(Arc::new(InProcessIndex::new()))
            .quota(quota)
            .migration_file_id(config.migration_file_id.clone())
            .build()?;

        Ok(Self {
            config,
            node: Arc::new(node),
        })
    }

    fn build_store(config: &NodeConfig) -> anyhow::Result<Arc<dyn BlobStore>> {
        match &config.blockstore_url {
            Some(url) => {
                info!(%url, "using remote blob store");
                let http_config = HttpBlobStoreConfig::new(url.clone());
                Ok(Arc::new(HttpBlobStore::new(http_config)?))
            }
            None => {
                warn!("no blockstore_url configured; using in-memory store (data will not persist)");
                Ok(Arc::new(MemoryBlobStore::new()))
            }
        }
    }

    fn build_quota(config: &NodeConfig) -> anyhow::Result<Arc<dyn QuotaClient>> {
        let ttl = Duration::from_secs(config.quota_cache_ttl_secs);
        match &config.quota_authority_url {
            Some(url) => {
                info!(%url, "using remote quota authority");
                let http_config = HttpQuotaClientConfig::new(url.clone());
                let client = HttpQuotaClient::new(http_config)?;
                Ok(Arc::new(LimitCache::with_capacity_and_ttl(client, 10_000, ttl)))
            }
            None => {
                warn!(
                    default_quota_bytes = config.default_quota_bytes,
                    "no quota_authority_url configured; using a flat default quota"
                );
                Ok(Arc::new(StaticQuotaClient::new(config.default_quota_bytes)))
            }
        }
    }
}
