//! HTTP-backed blob store client.
//!
//! Talks to a remote content-addressed storage service over a small REST
//! surface (`GET /blocks/:cid`, `PUT /blocks`, `DELETE /blocks/:cid`,
//! `HEAD /blocks/:cid`). Stands in for whatever object-store-fronting
//! service a real deployment would run behind the coordinator.

use crate::{Block, BlobStore, BlobStoreError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use cid::Cid;
use reqwest::Client;
use std::time::Duration;
use tracing::instrument;

/// Configuration for the remote blob store connection.
#[derive(Clone, Debug)]
pub struct HttpBlobStoreConfig {
    /// Base URL of the remote store, e.g. `http://localhost:5055`.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpBlobStoreConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Remote blob store backed by a plain HTTP content-addressed service.
#[derive(Clone)]
pub struct HttpBlobStore {
    client: Client,
    config: HttpBlobStoreConfig,
}

impl HttpBlobStore {
    pub fn new(config: HttpBlobStoreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BlobStoreError::Transient(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn block_url(&self, cid: &Cid) -> String {
        format!("{}/blocks/{}", self.config.base_url, cid)
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    #[instrument(skip(self))]
    async fn get(&self, cid: &Cid) -> Result<Bytes> {
        let response = self.client.get(self.block_url(cid)).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(BlobStoreError::NotFound(*cid));
        }
        if !response.status().is_success() {
            return Err(BlobStoreError::Backend(format!(
                "GET /blocks/{cid} returned {}",
                response.status()
            )));
        }

        Ok(response.bytes().await?)
    }

    #[instrument(skip(self, blocks), fields(count = blocks.len()))]
    async fn add(&self, blocks: &[Block]) -> Result<()> {
        for block in blocks {
            let response = self
                .client
                .put(self.block_url(&block.cid))
                .body(block.data.clone())
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(BlobStoreError::Backend(format!(
                    "PUT /blocks/{} returned {}",
                    block.cid,
                    response.status()
                )));
            }
        }
        Ok(())
    }

    async fn delete(&self, cids: &[Cid]) -> Result<()> {
        for cid in cids {
            let response = self.client.delete(self.block_url(cid)).send().await?;
            if !response.status().is_success()
                && response.status() != reqwest::StatusCode::NOT_FOUND
            {
                return Err(BlobStoreError::Backend(format!(
                    "DELETE /blocks/{cid} returned {}",
                    response.status()
                )));
            }
        }
        Ok(())
    }

    async fn exists(&self, cid: &Cid) -> Result<bool> {
        let response = self.client.head(self.block_url(cid)).send().await?;
        Ok(response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn get_maps_404_to_not_found() {
        let server = MockServer::start().await;
        let block = Block::from_data(&b"remote"[..]);
        Mock::given(method("GET"))
            .and(path(format!("/blocks/{}", block.cid)))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let store = HttpBlobStore::new(HttpBlobStoreConfig::new(server.uri())).unwrap();
        let err = store.get(&block.cid).await.unwrap_err();
        assert!(matches!(err, BlobStoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn get_returns_bytes_on_success() {
        let server = MockServer::start().await;
        let block = Block::from_data(&b"remote bytes"[..]);
        Mock::given(method("GET"))
            .and(path(format!("/blocks/{}", block.cid)))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(block.data.to_vec()))
            .mount(&server)
            .await;

        let store = HttpBlobStore::new(HttpBlobStoreConfig::new(server.uri())).unwrap();
        let fetched = store.get(&block.cid).await.unwrap();
        assert_eq!(fetched, block.data);
    }

    #[tokio::test]
    async fn add_propagates_backend_error() {
        let server = MockServer::start().await;
        let block = Block::from_data(&b"will fail"[..]);
        Mock::given(method("PUT"))
            .and(path(format!("/blocks/{}", block.cid)))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let store = HttpBlobStore::new(HttpBlobStoreConfig::new(server.uri())).unwrap();
        let err = store.add(&[block]).await.unwrap_err();
        assert!(matches!(err, BlobStoreError::Backend(_)));
    }
}
