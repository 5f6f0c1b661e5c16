use crate::error::ClientError;
use crate::models::book::FilterResponse;
use crate::models::filter::FilterRequest;
use crate::models::health::HealthStatus;
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// Raw upstream answer relayed by the proxy route.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn filter_books(&self, request: &FilterRequest) -> Result<FilterResponse, ClientError>;
    async fn health(&self) -> Result<HealthStatus, ClientError>;
    /// Passes a filter body through untouched, whatever the upstream status.
    async fn forward_filter(&self, body: Vec<u8>) -> Result<RawResponse, ClientError>;
}

pub struct HttpCatalogApi {
    client: Client,
    base_url: String,
}

impl HttpCatalogApi {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn filter_url(&self) -> String {
        format!("{}/catalog/filter_book", self.base_url)
    }

    pub fn health_url(&self) -> String {
        format!("{}/health", self.base_url)
    }

    async fn read_json<T: DeserializeOwned>(
        url: &str,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        if !response.status().is_success() {
            return Err(ClientError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn filter_books(&self, request: &FilterRequest) -> Result<FilterResponse, ClientError> {
        let url = self.filter_url();
        debug!("POST {} {:?}", url, request);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;

        Self::read_json(&url, response).await
    }

    async fn health(&self) -> Result<HealthStatus, ClientError> {
        let url = self.health_url();

        let response = self
            .client
            .get(&url)
            .header(header::CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;

        let status: HealthStatus = Self::read_json(&url, response).await?;
        info!("Catalog API health: {} (v{})", status.status, status.version);
        Ok(status)
    }

    async fn forward_filter(&self, body: Vec<u8>) -> Result<RawResponse, ClientError> {
        let url = self.filter_url();

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|source| ClientError::Transport { url, source })?
            .to_vec();

        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}
