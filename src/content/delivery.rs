//! HTTP client for the CMS delivery / preview REST API.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::links::{self, Includes};
use super::query::EntryQuery;
use super::store::ContentStore;
use crate::config::StoreConfig;
use crate::error::{ContentError, Result};

#[derive(Debug, Deserialize)]
struct EntriesResponse {
    #[serde(default)]
    items: Vec<Value>,
    #[serde(default)]
    includes: Includes,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: Option<String>,
}

/// One authenticated endpoint: published content or drafts, depending on
/// the host and token it was built with.
#[derive(Debug, Clone)]
pub struct DeliveryClient {
    name: String,
    http: reqwest::Client,
    entries_url: String,
    access_token: String,
}

impl DeliveryClient {
    pub fn new(name: &str, config: &StoreConfig) -> Self {
        Self::with_http(name, config, reqwest::Client::new())
    }

    pub fn with_http(name: &str, config: &StoreConfig, http: reqwest::Client) -> Self {
        let entries_url = format!(
            "{}/spaces/{}/environments/{}/entries",
            config.base_url.trim_end_matches('/'),
            config.space_id,
            config.environment
        );
        Self {
            name: name.to_string(),
            http,
            entries_url,
            access_token: config.access_token.clone(),
        }
    }

    async fn fetch(&self, params: &[(String, String)]) -> Result<EntriesResponse> {
        let response = self
            .http
            .get(&self.entries_url)
            .bearer_auth(&self.access_token)
            .header("Accept", "application/json")
            .query(params)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(store = %self.name, error = %e, "content store request failed");
                ContentError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ApiError>()
                .await
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| status.to_string());
            tracing::warn!(store = %self.name, status = %status, detail = %detail, "content store returned error");
            return Err(ContentError::RemoteQuery {
                message: detail,
                status: Some(status.as_u16()),
            });
        }

        response.json::<EntriesResponse>().await.map_err(|e| {
            tracing::error!(store = %self.name, error = %e, "failed to parse content store response");
            ContentError::RemoteQuery {
                message: format!("malformed response: {}", e),
                status: Some(status.as_u16()),
            }
        })
    }
}

#[async_trait]
impl ContentStore for DeliveryClient {
    async fn get_entries(&self, query: &EntryQuery) -> Result<Vec<Value>> {
        tracing::debug!(
            store = %self.name,
            content_type = %query.content_type,
            "querying content store"
        );
        let body = self.fetch(&query.to_params()).await?;
        Ok(links::resolve_items(body.items, &body.includes, query.include))
    }

    async fn ping(&self) -> Result<()> {
        self.fetch(&[("limit".to_string(), "0".to_string())]).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
