//! Search API abstraction

use crate::error::Result;
use async_trait::async_trait;
use beats_core::{Track, TrackId};

/// Remote video search operations
///
/// Implemented by [`YouTubeClient`](crate::YouTubeClient); sessions and
/// fetchers are generic over it so they can run against in-memory fakes.
#[async_trait]
pub trait VideoSearchApi: Send + Sync {
    /// Search for music videos matching `query`
    async fn search(&self, query: &str) -> Result<Vec<Track>>;

    /// Fetch query completions for `partial`
    async fn suggest(&self, partial: &str) -> Result<Vec<String>>;

    /// Fetch tracks related to `seed`, at most `max_results`
    async fn related(&self, seed: &TrackId, max_results: u32) -> Result<Vec<Track>>;
}
