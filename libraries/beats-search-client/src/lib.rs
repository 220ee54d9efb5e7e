//! Beats Search Client
//!
//! HTTP client and session logic for the external video search API.
//!
//! # Features
//!
//! - **Search**: music-category video search holding the latest result set
//! - **Suggestions**: debounced, last-request-wins query completion
//! - **Related items**: background continuation fetches, one in flight
//!
//! # Example
//!
//! ```ignore
//! use beats_search_client::{SearchClientConfig, SearchSession, YouTubeClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = YouTubeClient::new(SearchClientConfig::new("api-key"))?;
//!     let mut session = SearchSession::new(Arc::new(client));
//!
//!     for track in session.search("miles davis").await? {
//!         println!("{} - {}", track.id(), track.title());
//!     }
//!
//!     Ok(())
//! }
//! ```

mod api;
mod client;
mod error;
mod related;
mod session;
mod suggest;
mod types;

pub use api::VideoSearchApi;
pub use client::YouTubeClient;
pub use error::{Result, SearchClientError};
pub use related::{RelatedItemsFetcher, RelatedResponse};
pub use session::{SearchSession, DEFAULT_MIN_SUGGEST_CHARS};
pub use suggest::{
    SuggestRequest, SuggestionDebouncer, SuggestionFeed, SuggestionTracker, DEFAULT_DEBOUNCE,
};
pub use types::{SearchClientConfig, DEFAULT_BASE_URL, DEFAULT_SUGGEST_URL, MUSIC_CATEGORY_ID};
