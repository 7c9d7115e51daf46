use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::types::{Category, Resource};

pub const DEFAULT_BASE_URL: &str = "https://api.spaceflightnewsapi.net/v3";
pub const DEFAULT_LIST_LIMIT: u32 = 50;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: Url,
    pub list_limit: u32,
    pub timeout: Duration,
}

impl UpstreamConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            list_limit: DEFAULT_LIST_LIMIT,
            timeout: REQUEST_TIMEOUT,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with unexpected status code {status}")]
    HttpStatus { url: String, status: u16 },
    #[error("payload from {url} could not be decoded: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl UpstreamError {
    /// The URL that was attempted, if a request was issued at all.
    pub fn url(&self) -> Option<&str> {
        match self {
            UpstreamError::Client(_) => None,
            UpstreamError::Transport { url, .. }
            | UpstreamError::HttpStatus { url, .. }
            | UpstreamError::Decode { url, .. } => Some(url),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, UpstreamError::Transport { source, .. } if source.is_timeout())
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamGateway {
    client: reqwest::Client,
    base_url: Url,
    list_limit: u32,
}

impl UpstreamGateway {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(UpstreamError::Client)?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            list_limit: config.list_limit,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/{category}?limit={list_limit}`
    pub fn collection_url(&self, category: Category) -> Url {
        let mut url = self.endpoint(&[category.slug()]);
        url.query_pairs_mut()
            .append_pair("limit", &self.list_limit.to_string());
        url
    }

    /// `{base}/{category}/{id}`, with `id` encoded as a single path segment.
    pub fn resource_url(&self, category: Category, id: &str) -> Url {
        self.endpoint(&[category.slug(), id])
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub async fn fetch_resource(&self, url: Url) -> Result<Resource, UpstreamError> {
        self.fetch_json(url).await
    }

    pub async fn fetch_resources(&self, url: Url) -> Result<Vec<Resource>, UpstreamError> {
        self.fetch_json(url).await
    }

    pub async fn fetch_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, UpstreamError> {
        let target = url.to_string();
        tracing::debug!(url = %target, "Fetching upstream payload");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| UpstreamError::Transport {
                url: target.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::HttpStatus {
                url: target,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| UpstreamError::Transport {
                url: target.clone(),
                source,
            })?;
        serde_json::from_slice(&body).map_err(|source| UpstreamError::Decode {
            url: target,
            source,
        })
    }
}
