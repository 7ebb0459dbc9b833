//! FACT REST API client.
//!
//! Resources used:
//! - `GET /rest/file_object?query=<json>`: files matching a query
//! - `GET /rest/firmware?query=<json>&recursive=true`: firmware containing
//!   matching files
//! - `GET /rest/binary/<uid>`: one file, base64 encoded in a JSON envelope

use async_trait::async_trait;
use std::time::Duration;

use crate::config::Config;
use crate::models::{Artifact, BinaryResponse, Query, SearchMode, SearchOutcome, SearchResult};
use crate::service::{FactService, ServiceError};
use crate::utils::HttpClient;

/// Client for one FACT host
#[derive(Debug, Clone)]
pub struct RestService {
    host: String,
    client: HttpClient,
}

impl RestService {
    /// Create a client for `host` with default HTTP settings
    pub fn new(host: impl Into<String>) -> Result<Self, ServiceError> {
        Ok(Self::with_client(host, HttpClient::new()?))
    }

    /// Create a client from validated configuration
    pub fn from_config(config: &Config) -> Result<Self, ServiceError> {
        let client = HttpClient::with_settings(
            &config.user_agent,
            config.timeout_secs.map(Duration::from_secs),
        )?;
        Ok(Self::with_client(config.host.clone(), client))
    }

    /// Create a client that reuses an existing HTTP client
    pub fn with_client(host: impl Into<String>, client: HttpClient) -> Self {
        let host = host.into().trim_end_matches('/').to_string();
        Self { host, client }
    }

    /// URL of the search resource for `mode`
    pub fn search_url(&self, query: &Query, mode: SearchMode) -> String {
        format!(
            "{}/{}?query={}{}",
            self.host,
            mode.resource(),
            urlencoding::encode(&query.to_json()),
            mode.extra_params()
        )
    }

    /// URL of the binary download resource for `uid`
    pub fn binary_url(&self, uid: &str) -> String {
        format!("{}/rest/binary/{}", self.host, urlencoding::encode(uid))
    }
}

#[async_trait]
impl FactService for RestService {
    fn host(&self) -> &str {
        &self.host
    }

    async fn search(&self, query: &Query, mode: SearchMode) -> Result<Vec<String>, ServiceError> {
        let url = self.search_url(query, mode);
        tracing::debug!("search request: {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let result: SearchResult = serde_json::from_str(&body)?;

        match result.into_uids() {
            SearchOutcome::Accepted(uids) => {
                tracing::debug!("search returned {} uids", uids.len());
                Ok(uids)
            }
            SearchOutcome::Rejected(message) => Err(ServiceError::Rejected(message)),
            SearchOutcome::Malformed => Err(ServiceError::InvalidResponse(
                "response has no uids".to_string(),
            )),
        }
    }

    async fn fetch_binary(&self, uid: &str) -> Result<Artifact, ServiceError> {
        let url = self.binary_url(uid);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let payload: BinaryResponse = serde_json::from_str(&body)?;
        Ok(Artifact::decode(uid, payload)?)
    }
}
