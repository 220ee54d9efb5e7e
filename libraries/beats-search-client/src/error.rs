//! Error types for the search client.

use thiserror::Error;

/// Errors that can occur when talking to the search API.
#[derive(Error, Debug)]
pub enum SearchClientError {
    /// Search text was blank
    #[error("Search query is empty")]
    EmptyQuery,

    /// Search failed; the previous result set is kept
    #[error("Search failed: {0}")]
    SearchFailed(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Failed to parse the API response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid endpoint URL
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// No API key configured
    #[error("No API key configured")]
    MissingApiKey,
}

/// Result type for search client operations.
pub type Result<T> = std::result::Result<T, SearchClientError>;
