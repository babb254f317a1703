use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{AtriumError, Result};
use crate::types::{Artwork, Exhibition, Page};

/// Query parameters understood by the collection endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchParams {
    pub limit: String,
    pub page: Option<u32>,
}

impl FetchParams {
    pub fn new(limit: impl Into<String>) -> Self {
        Self {
            limit: limit.into(),
            page: None,
        }
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("limit", self.limit.clone())];
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        query
    }
}

/// Source of museum collection pages
#[async_trait]
pub trait Collection: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    async fn exhibitions(&self, params: &FetchParams) -> Result<Page<Exhibition>>;
    async fn artworks(&self, params: &FetchParams) -> Result<Page<Artwork>>;
}

pub struct ArtClient {
    client: Client,
    base_url: String,
    exhibitions_path: String,
    artworks_path: String,
}

impl std::fmt::Debug for ArtClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ArtClient {
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("atrium/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AtriumError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            exhibitions_path: api.exhibitions_path.clone(),
            artworks_path: api.artworks_path.clone(),
        })
    }

    fn api_url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource.trim_start_matches('/'))
    }

    /// Fetch one page of `resource`
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &FetchParams,
    ) -> Result<Page<T>> {
        let url = self.api_url(resource);
        debug!(%url, page = ?params.page, limit = %params.limit, "GET");

        let response = self.client.get(&url).query(&params.to_query()).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(AtriumError::Network(format!("{} {}: {}", url, status, text)));
        }

        let body = response.text().await?;
        decode_page(&body)
    }
}

/// Parse a page body. Pages lacking `pagination.current_page` are rejected.
pub fn decode_page<T: DeserializeOwned>(body: &str) -> Result<Page<T>> {
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl Collection for ArtClient {
    fn name(&self) -> &str {
        "Art Institute of Chicago"
    }

    async fn exhibitions(&self, params: &FetchParams) -> Result<Page<Exhibition>> {
        self.fetch(&self.exhibitions_path, params).await
    }

    async fn artworks(&self, params: &FetchParams) -> Result<Page<Artwork>> {
        self.fetch(&self.artworks_path, params).await
    }
}
