//! Presentation helpers

use url::form_urlencoded;

/// Base URL of the external web search used for lyrics
pub const LYRICS_SEARCH_BASE: &str = "https://www.google.com/search";

/// Format seconds as `m:ss`
///
/// Negative or non-finite input renders as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Deep link to a web search for `"<title> lyrics"`
pub fn lyrics_search_url(title: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("q", &format!("{} lyrics", title.trim()))
        .finish();
    format!("{LYRICS_SEARCH_BASE}?{query}")
}
