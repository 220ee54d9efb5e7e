//! HTTP client for the YouTube Data API.

use crate::api::VideoSearchApi;
use crate::error::{Result, SearchClientError};
use crate::types::{ApiErrorResponse, SearchClientConfig, SearchResponse, MUSIC_CATEGORY_ID};
use async_trait::async_trait;
use beats_core::{Track, TrackId};
use reqwest::{Client, Response};
use tracing::{debug, info};
use url::Url;

/// Client for the video search, suggestion, and related-items endpoints.
///
/// # Example
///
/// ```ignore
/// use beats_search_client::{SearchClientConfig, VideoSearchApi, YouTubeClient};
///
/// let client = YouTubeClient::new(SearchClientConfig::new("api-key"))?;
/// let tracks = client.search("kind of blue").await?;
/// println!("Found {} tracks", tracks.len());
/// ```
pub struct YouTubeClient {
    http: Client,
    config: SearchClientConfig,
}

impl YouTubeClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SearchClientConfig) -> Result<Self> {
        let base_url = normalize_url(&config.base_url)?;
        let suggest_url = normalize_url(&config.suggest_url)?;

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("Beats/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SearchClientError::Request)?;

        Ok(Self {
            http,
            config: SearchClientConfig {
                base_url,
                suggest_url,
                ..config
            },
        })
    }

    /// Active configuration (URLs normalized).
    pub fn config(&self) -> &SearchClientConfig {
        &self.config
    }

    fn api_key(&self) -> Result<&str> {
        if self.config.api_key.trim().is_empty() {
            return Err(SearchClientError::MissingApiKey);
        }
        Ok(&self.config.api_key)
    }

    async fn fetch_videos(&self, params: &[(&str, &str)]) -> Result<Vec<Track>> {
        let url = format!("{}/search", self.config.base_url);
        let key = self.api_key()?;

        let response = self
            .http
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("key", key),
            ])
            .query(params)
            .send()
            .await?;

        let response = check_status(response).await?;
        let body: SearchResponse = response.json().await.map_err(|e| {
            SearchClientError::ParseError(format!("Failed to parse search response: {}", e))
        })?;

        Ok(body.into_tracks())
    }
}

#[async_trait]
impl VideoSearchApi for YouTubeClient {
    async fn search(&self, query: &str) -> Result<Vec<Track>> {
        debug!(query = %query, "Searching");

        let max_results = self.config.max_results.to_string();
        let tracks = self
            .fetch_videos(&[
                ("q", query),
                ("maxResults", max_results.as_str()),
                ("videoCategoryId", MUSIC_CATEGORY_ID),
            ])
            .await?;

        info!(query = %query, results = tracks.len(), "Search completed");
        Ok(tracks)
    }

    async fn suggest(&self, partial: &str) -> Result<Vec<String>> {
        debug!(partial = %partial, "Fetching suggestions");

        let response = self
            .http
            .get(&self.config.suggest_url)
            .query(&[("client", "firefox"), ("ds", "yt"), ("q", partial)])
            .send()
            .await?;

        let response = check_status(response).await?;
        let body: serde_json::Value = response.json().await.map_err(|e| {
            SearchClientError::ParseError(format!("Failed to parse suggestions: {}", e))
        })?;

        parse_suggestions(&body)
    }

    async fn related(&self, seed: &TrackId, max_results: u32) -> Result<Vec<Track>> {
        debug!(track_id = %seed, "Fetching related items");

        let max_results = max_results.to_string();
        let tracks = self
            .fetch_videos(&[
                ("relatedToVideoId", seed.as_str()),
                ("maxResults", max_results.as_str()),
            ])
            .await?;

        debug!(track_id = %seed, results = tracks.len(), "Fetched related items");
        Ok(tracks)
    }
}

/// Validate an endpoint URL and strip the trailing slash.
fn normalize_url(raw: &str) -> Result<String> {
    if raw.is_empty() {
        return Err(SearchClientError::InvalidUrl("URL cannot be empty".into()));
    }

    let parsed = Url::parse(raw).map_err(|e| SearchClientError::InvalidUrl(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(SearchClientError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }

    Ok(raw.trim_end_matches('/').to_string())
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorResponse>(&error_text)
        .map(|e| e.error.message)
        .unwrap_or(error_text);

    Err(SearchClientError::ServerError {
        status: status.as_u16(),
        message,
    })
}

/// Suggestion responses are `[query, [completion, ...], ...]`.
fn parse_suggestions(body: &serde_json::Value) -> Result<Vec<String>> {
    let completions = body
        .get(1)
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| SearchClientError::ParseError("Unexpected suggestion format".into()))?;

    Ok(completions
        .iter()
        .filter_map(serde_json::Value::as_str)
        .map(str::to_string)
        .collect())
}
