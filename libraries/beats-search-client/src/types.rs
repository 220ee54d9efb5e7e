//! Types for search API requests and responses.

use beats_core::Track;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Default search API base URL
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Default suggestion endpoint
pub const DEFAULT_SUGGEST_URL: &str = "https://suggestqueries.google.com/complete/search";

/// Video category restricting searches to music
pub const MUSIC_CATEGORY_ID: &str = "10";

/// Configuration for the search API client.
#[derive(Debug, Clone)]
pub struct SearchClientConfig {
    /// Base URL of the search API (e.g., "https://www.googleapis.com/youtube/v3")
    pub base_url: String,
    /// Suggestion endpoint URL
    pub suggest_url: String,
    /// API key sent with search and related-items requests
    pub api_key: String,
    /// Result cap for searches
    pub max_results: u32,
    /// Result cap for related-items requests
    pub related_max_results: u32,
    /// Request timeout
    pub timeout: Duration,
}

impl SearchClientConfig {
    /// Create a config with the default endpoints and the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Point both endpoints at `base_url` (used against mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.suggest_url = format!("{}/complete/search", base_url.trim_end_matches('/'));
        self.base_url = base_url;
        self
    }
}

impl Default for SearchClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            suggest_url: DEFAULT_SUGGEST_URL.to_string(),
            api_key: String::new(),
            max_results: 15,
            related_max_results: 10,
            timeout: Duration::from_secs(10),
        }
    }
}

// =============================================================================
// Search Response Types
// =============================================================================

/// Response of the search endpoint (search and related items).
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

impl SearchResponse {
    /// Convert the items into tracks, skipping entries that are not videos.
    pub fn into_tracks(self) -> Vec<Track> {
        self.items
            .into_iter()
            .filter_map(SearchItem::into_track)
            .collect()
    }
}

/// One search hit.
#[derive(Debug, Deserialize)]
pub struct SearchItem {
    #[serde(default)]
    pub id: ItemId,
    pub snippet: Option<Snippet>,
}

impl SearchItem {
    fn into_track(self) -> Option<Track> {
        let snippet = self.snippet.unwrap_or_default();
        let artwork = snippet.thumbnails.and_then(Thumbnails::best);

        match Track::from_api(
            self.id.video_id.as_deref(),
            snippet.title.as_deref(),
            artwork.as_deref(),
        ) {
            Ok(track) => Some(track),
            Err(e) => {
                debug!(error = %e, "Skipping search item");
                None
            }
        }
    }
}

/// Identifier block of a search hit.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemId {
    /// Present for video hits only
    pub video_id: Option<String>,
}

/// Descriptive part of a search hit.
#[derive(Debug, Default, Deserialize)]
pub struct Snippet {
    pub title: Option<String>,
    pub thumbnails: Option<Thumbnails>,
}

/// Thumbnail variants of a search hit.
#[derive(Debug, Default, Deserialize)]
pub struct Thumbnails {
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
    pub default: Option<Thumbnail>,
}

impl Thumbnails {
    /// Medium artwork, falling back to the other sizes
    fn best(self) -> Option<String> {
        self.medium
            .or(self.high)
            .or(self.default)
            .map(|t| t.url)
    }
}

/// A single thumbnail.
#[derive(Debug, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

/// Error body returned by the search API.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_video_items() {
        let json = r#"{
            "items": [
                {
                    "id": { "kind": "youtube#video", "videoId": "abc123" },
                    "snippet": {
                        "title": "Blue in Green",
                        "thumbnails": {
                            "default": { "url": "https://i.ytimg.com/vi/abc123/default.jpg" },
                            "medium": { "url": "https://i.ytimg.com/vi/abc123/mqdefault.jpg" }
                        }
                    }
                }
            ]
        }"#;

        let tracks = serde_json::from_str::<SearchResponse>(json)
            .unwrap()
            .into_tracks();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id().as_str(), "abc123");
        assert_eq!(tracks[0].title(), "Blue in Green");
        assert_eq!(
            tracks[0].artwork_url(),
            "https://i.ytimg.com/vi/abc123/mqdefault.jpg"
        );
    }

    #[test]
    fn skips_non_video_items() {
        let json = r#"{
            "items": [
                { "id": { "kind": "youtube#channel", "channelId": "UC1" }, "snippet": { "title": "Channel" } },
                { "id": { "videoId": "v2" } }
            ]
        }"#;

        let tracks = serde_json::from_str::<SearchResponse>(json)
            .unwrap()
            .into_tracks();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title(), beats_core::types::UNTITLED);
        assert_eq!(tracks[0].artwork_url(), "");
    }

    #[test]
    fn missing_items_is_empty() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.into_tracks().is_empty());
    }

    #[test]
    fn base_url_override_moves_suggestions() {
        let config = SearchClientConfig::new("key").with_base_url("http://127.0.0.1:9000/");
        assert_eq!(config.suggest_url, "http://127.0.0.1:9000/complete/search");
        assert_eq!(config.max_results, 15);
    }
}
