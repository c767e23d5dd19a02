//! HTTP-backed `QuotaClient`.
//!
//! Talks to an external quota authority over a small JSON API. The wire
//! shape is ours to define (the authority is out of scope), modeled on the
//! same `reqwest`-based request/response pattern the blockstore's HTTP
//! backend uses.

use crate::error::{QuotaError, Result};
use crate::QuotaClient;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct HttpQuotaClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl HttpQuotaClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(5),
        }
    }
}

pub struct HttpQuotaClient {
    client: reqwest::Client,
    config: HttpQuotaClientConfig,
}

impl HttpQuotaClient {
    pub fn new(config: HttpQuotaClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(QuotaError::from)?;
        Ok(Self { client, config })
    }
}

#[derive(Deserialize)]
struct LimitResponse {
    limit_bytes: u64,
}

#[async_trait]
impl QuotaClient for HttpQuotaClient {
    async fn check_limit(&self, space_id: &str, identity: &[u8]) -> Result<u64> {
        let url = format!("{}/spaces/{}/limit", self.config.base_url, space_id);
        let identity_header = hex::encode(identity);

        let response = self
            .client
            .get(&url)
            .header("X-Identity", identity_header)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let body: LimitResponse = response
                    .json()
                    .await
                    .map_err(|e| QuotaError::Backend(e.to_string()))?;
                Ok(body.limit_bytes)
            }
            reqwest::StatusCode::FORBIDDEN | reqwest::StatusCode::NOT_FOUND => {
                Err(QuotaError::Unauthorized {
                    space_id: space_id.to_string(),
                })
            }
            status => Err(QuotaError::Backend(format!(
                "unexpected status {status} from quota authority"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn returns_limit_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/spaces/s1/limit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "limit_bytes": 123456
            })))
            .mount(&server)
            .await;

        let client = HttpQuotaClient::new(HttpQuotaClientConfig::new(server.uri())).unwrap();
        assert_eq!(client.check_limit("s1", b"identity").await.unwrap(), 123456);
    }

    #[tokio::test]
    async fn forbidden_maps_to_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/spaces/s1/limit"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = HttpQuotaClient::new(HttpQuotaClientConfig::new(server.uri())).unwrap();
        let err = client.check_limit("s1", b"identity").await.unwrap_err();
        assert!(matches!(err, QuotaError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn server_error_maps_to_backend() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/spaces/s1/limit"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = HttpQuotaClient::new(HttpQuotaClientConfig::new(server.uri())).unwrap();
        let err = client.check_limit("s1", b"identity").await.unwrap_err();
        assert!(matches!(err, QuotaError::Backend(_)));
    }
}
