use std::time::Duration;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response};
use tracing::{debug, info, warn};

use crate::config::HubConfig;
use super::types::{HubError, ModelInfo, RemoteFile, SearchHit};

/// URL prefixes users tend to paste instead of a bare `owner/name`.
const URL_PREFIXES: [&str; 2] = ["https://huggingface.co/", "http://huggingface.co/"];

/// Turns a model identifier or a full registry URL into `owner/name`.
pub fn normalize_repo_id(input: &str) -> Result<String, HubError> {
    let mut id = input.trim();
    for prefix in URL_PREFIXES {
        if let Some(rest) = id.strip_prefix(prefix) {
            id = rest;
            break;
        }
    }
    let id = id.trim_matches('/');
    if id.is_empty() {
        return Err(HubError::InvalidRepoId(input.to_string()));
    }
    Ok(id.to_string())
}

/// Thin client over the registry's public model API.
#[derive(Debug, Clone)]
pub struct HubClient {
    client: Client,
    endpoint: String,
}

impl HubClient {
    pub fn new(config: &HubConfig) -> Result<Self, HubError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, value);
            } else {
                warn!("Ignoring hub token that is not a valid header value");
            }
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("ggufscout/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Browse URL for a repository, as shown in menus.
    pub fn model_url(&self, repo_id: &str) -> String {
        format!("{}/{}", self.endpoint, repo_id)
    }

    /// Lists every file of a repository together with its size.
    pub async fn model_files(&self, repo_id: &str) -> Result<Vec<RemoteFile>, HubError> {
        let url = format!("{}/api/models/{}", self.endpoint, repo_id);
        info!("Fetching file listing for {}", repo_id);

        let response = self.client
            .get(&url)
            .query(&[("blobs", "true")])
            .send()
            .await?;
        let text = Self::checked_text(response).await?;
        let info: ModelInfo = serde_json::from_str(&text)?;

        let files = info.into_files();
        debug!("{} lists {} files", repo_id, files.len());
        Ok(files)
    }

    /// Searches GGUF repositories sorted by trending score, highest first.
    pub async fn search_models(&self, query: &str, limit: usize) -> Result<Vec<String>, HubError> {
        let url = format!("{}/api/models", self.endpoint);
        info!("Searching models for {:?} (limit {})", query, limit);

        let limit = limit.to_string();
        let response = self.client
            .get(&url)
            .query(&[
                ("filter", "gguf"),
                ("search", query),
                ("sort", "trendingScore"),
                ("direction", "-1"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;
        let text = Self::checked_text(response).await?;
        let hits: Vec<SearchHit> = serde_json::from_str(&text)?;

        debug!("Search for {:?} returned {} hits", query, hits.len());
        Ok(hits.into_iter().map(SearchHit::into_repo_id).collect())
    }

    async fn checked_text(response: Response) -> Result<String, HubError> {
        let status = response.status();
        if !status.is_success() {
            let url = response.url().to_string();
            let body = response.text().await.unwrap_or_default();
            warn!("Registry request to {} failed with {}", url, status);
            return Err(HubError::Status { status, body: body.trim().to_string() });
        }
        Ok(response.text().await?)
    }
}
