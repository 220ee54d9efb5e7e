//! Suggestion sequencing and debouncing
//!
//! Each input change is tagged with a monotonically increasing sequence
//! number. Responses are applied only if they carry the latest sequence, so
//! the visible list follows input order rather than network arrival order.
//! The debouncer keeps at most one pending timer; new input aborts the old
//! one.

use crate::api::VideoSearchApi;
use crate::session::{fetch_suggestions, DEFAULT_MIN_SUGGEST_CHARS};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

/// Quiet period before a suggestion request is sent
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// A suggestion request tagged with its sequence number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestRequest {
    seq: u64,
    text: String,
}

impl SuggestRequest {
    /// Sequence number
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Input text the request is for
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Last-request-wins bookkeeping for suggestions
#[derive(Debug, Clone)]
pub struct SuggestionTracker {
    latest_seq: u64,
    min_chars: usize,
    suggestions: Vec<String>,
}

impl Default for SuggestionTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SUGGEST_CHARS)
    }
}

impl SuggestionTracker {
    /// Create a tracker that ignores input shorter than `min_chars`
    pub fn new(min_chars: usize) -> Self {
        Self {
            latest_seq: 0,
            min_chars,
            suggestions: Vec::new(),
        }
    }

    /// Record new input
    ///
    /// Always supersedes earlier requests. Returns `None` (and clears the
    /// list) when the input is too short to request suggestions for.
    pub fn issue(&mut self, text: &str) -> Option<SuggestRequest> {
        self.latest_seq += 1;

        if text.trim().chars().count() < self.min_chars {
            self.suggestions.clear();
            return None;
        }

        Some(SuggestRequest {
            seq: self.latest_seq,
            text: text.to_string(),
        })
    }

    /// Apply a response; returns `false` if `request` has been superseded
    pub fn accept(&mut self, request: &SuggestRequest, suggestions: Vec<String>) -> bool {
        if request.seq != self.latest_seq {
            debug!(seq = request.seq, latest = self.latest_seq, "Discarding stale suggestions");
            return false;
        }
        self.suggestions = suggestions;
        true
    }

    /// Visible suggestions
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Sequence number of the latest input
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// Minimum input length
    pub fn min_chars(&self) -> usize {
        self.min_chars
    }
}

/// Runs a task after a quiet period, cancelling the previously scheduled one
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct SuggestionDebouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Default for SuggestionDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl SuggestionDebouncer {
    /// Create a debouncer with the given quiet period
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedule `task` to run after the quiet period
    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    /// Abort the pending task, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Check whether a task is scheduled or running
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Wait for the scheduled task to finish
    pub async fn settle(&mut self) {
        if let Some(handle) = self.pending.take() {
            // An aborted task has nothing left to deliver
            let _ = handle.await;
        }
    }

    /// Quiet period
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Drop for SuggestionDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Debounced, sequenced suggestion feed for a text input
///
/// Call [`input`](Self::input) on every keystroke and read
/// [`suggestions`](Self::suggestions) when redrawing.
pub struct SuggestionFeed<A: VideoSearchApi + 'static> {
    api: Arc<A>,
    tracker: Arc<Mutex<SuggestionTracker>>,
    debouncer: SuggestionDebouncer,
}

impl<A: VideoSearchApi + 'static> SuggestionFeed<A> {
    /// Create a feed with the default debounce and minimum length
    pub fn new(api: Arc<A>) -> Self {
        Self::with_settings(api, DEFAULT_DEBOUNCE, DEFAULT_MIN_SUGGEST_CHARS)
    }

    /// Create a feed with explicit settings
    pub fn with_settings(api: Arc<A>, debounce: Duration, min_chars: usize) -> Self {
        Self {
            api,
            tracker: Arc::new(Mutex::new(SuggestionTracker::new(min_chars))),
            debouncer: SuggestionDebouncer::new(debounce),
        }
    }

    /// The input text changed
    pub async fn input(&mut self, text: &str) {
        let request = self.tracker.lock().await.issue(text);
        let Some(request) = request else {
            self.debouncer.cancel();
            return;
        };

        let api = Arc::clone(&self.api);
        let tracker = Arc::clone(&self.tracker);
        self.debouncer.schedule(async move {
            let min_chars = tracker.lock().await.min_chars();
            let suggestions = fetch_suggestions(api.as_ref(), request.text(), min_chars).await;
            tracker.lock().await.accept(&request, suggestions);
        });
    }

    /// Wait until the latest input has been answered (or dropped)
    pub async fn settle(&mut self) {
        self.debouncer.settle().await;
    }

    /// Visible suggestions
    pub async fn suggestions(&self) -> Vec<String> {
        self.tracker.lock().await.suggestions().to_vec()
    }

    /// Check whether a request is waiting or in flight
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn latest_response_wins_regardless_of_arrival() {
        let mut tracker = SuggestionTracker::new(1);
        let a = tracker.issue("a").unwrap();
        let ab = tracker.issue("ab").unwrap();
        let abc = tracker.issue("abc").unwrap();

        assert!(tracker.accept(&abc, strings(&["abc song"])));
        assert!(!tracker.accept(&ab, strings(&["ab song"])));
        assert!(!tracker.accept(&a, strings(&["a song"])));

        assert_eq!(tracker.suggestions(), ["abc song"]);
    }

    #[test]
    fn short_input_clears_and_supersedes() {
        let mut tracker = SuggestionTracker::default();
        let request = tracker.issue("jaz").unwrap();
        tracker.accept(&request, strings(&["jazz"]));

        let late = tracker.issue("jazz").unwrap();
        assert!(tracker.issue("j").is_none());
        assert!(tracker.suggestions().is_empty());

        assert!(!tracker.accept(&late, strings(&["jazz piano"])));
        assert!(tracker.suggestions().is_empty());
    }

    #[test]
    fn sequence_is_monotonic() {
        let mut tracker = SuggestionTracker::default();
        let first = tracker.issue("ab").unwrap();
        tracker.issue("");
        let second = tracker.issue("abc").unwrap();
        assert!(second.seq() > first.seq());
        assert_eq!(tracker.latest_seq(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn debouncer_runs_only_last_task() {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut debouncer = SuggestionDebouncer::new(Duration::from_millis(300));

        for _ in 0..5 {
            let runs = Arc::clone(&runs);
            debouncer.schedule(async move {
                runs.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_task() {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut debouncer = SuggestionDebouncer::default();

        let counter = Arc::clone(&runs);
        debouncer.schedule(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        debouncer.cancel();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
