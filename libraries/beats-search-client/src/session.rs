//! Search session - holds the current result set

use crate::api::VideoSearchApi;
use crate::error::{Result, SearchClientError};
use beats_core::Track;
use std::sync::Arc;
use tracing::{debug, warn};

/// Minimum input length before suggestions are requested
pub const DEFAULT_MIN_SUGGEST_CHARS: usize = 2;

/// Issues searches and keeps the latest successful result set
///
/// A failed search leaves the previous results in place.
pub struct SearchSession<A: VideoSearchApi> {
    api: Arc<A>,
    results: Vec<Track>,
    last_query: Option<String>,
    min_suggest_chars: usize,
}

impl<A: VideoSearchApi> SearchSession<A> {
    /// Create a session with an empty result set
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            results: Vec::new(),
            last_query: None,
            min_suggest_chars: DEFAULT_MIN_SUGGEST_CHARS,
        }
    }

    /// Override the minimum suggestion input length
    pub fn with_min_suggest_chars(mut self, min_chars: usize) -> Self {
        self.min_suggest_chars = min_chars;
        self
    }

    /// Run a search and replace the result set on success
    ///
    /// # Errors
    /// `EmptyQuery` for blank input, `SearchFailed` for any transport, API, or
    /// parse failure.
    pub async fn search(&mut self, query: &str) -> Result<&[Track]> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchClientError::EmptyQuery);
        }

        match self.api.search(query).await {
            Ok(tracks) => {
                debug!(query = %query, results = tracks.len(), "Search results replaced");
                self.results = tracks;
                self.last_query = Some(query.to_string());
                Ok(&self.results)
            }
            Err(e) => {
                warn!(query = %query, error = %e, "Search failed, keeping previous results");
                Err(SearchClientError::SearchFailed(e.to_string()))
            }
        }
    }

    /// Best-effort suggestions for `partial`
    ///
    /// Short input and failures both yield an empty list. Ordering of
    /// concurrent calls is the caller's concern, see
    /// [`SuggestionTracker`](crate::SuggestionTracker).
    pub async fn suggest(&self, partial: &str) -> Vec<String> {
        fetch_suggestions(self.api.as_ref(), partial, self.min_suggest_chars).await
    }

    /// Current result set
    pub fn results(&self) -> &[Track] {
        &self.results
    }

    /// Query that produced the current result set
    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    /// Shared handle to the API client
    pub fn api(&self) -> &Arc<A> {
        &self.api
    }
}

pub(crate) async fn fetch_suggestions<A: VideoSearchApi + ?Sized>(
    api: &A,
    partial: &str,
    min_chars: usize,
) -> Vec<String> {
    if partial.trim().chars().count() < min_chars {
        return Vec::new();
    }

    match api.suggest(partial).await {
        Ok(suggestions) => suggestions,
        Err(e) => {
            debug!(partial = %partial, error = %e, "Suggestions unavailable");
            Vec::new()
        }
    }
}
