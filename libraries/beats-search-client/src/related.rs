//! Background related-items fetching
//!
//! Fetches run as tokio tasks; starting a new fetch aborts the one in flight.
//! Completed fetches are delivered over a channel so the owner of the
//! [`RelatedItems`](beats_playback::RelatedItems) cache can apply them against
//! the track that is current at that moment.

use crate::api::VideoSearchApi;
use crate::error::Result;
use beats_core::Track;
use beats_playback::RelatedRequest;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// A finished related-items fetch
#[derive(Debug)]
pub struct RelatedResponse {
    /// The request this answers
    pub request: RelatedRequest,
    /// Fetched tracks or the failure
    pub result: Result<Vec<Track>>,
}

/// Spawns related-items fetches, keeping at most one in flight
pub struct RelatedItemsFetcher<A: VideoSearchApi + 'static> {
    api: Arc<A>,
    max_results: u32,
    tx: mpsc::UnboundedSender<RelatedResponse>,
    in_flight: Option<JoinHandle<()>>,
}

impl<A: VideoSearchApi + 'static> RelatedItemsFetcher<A> {
    /// Create a fetcher and the receiver its responses arrive on
    pub fn new(api: Arc<A>, max_results: u32) -> (Self, mpsc::UnboundedReceiver<RelatedResponse>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let fetcher = Self {
            api,
            max_results,
            tx,
            in_flight: None,
        };
        (fetcher, rx)
    }

    /// Start fetching for `request`, superseding any fetch in flight
    ///
    /// Must be called from within a tokio runtime.
    pub fn refresh_for(&mut self, request: RelatedRequest) {
        self.cancel();

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let max_results = self.max_results;
        debug!(seq = request.seq(), track_id = %request.track_id(), "Starting related-items fetch");

        self.in_flight = Some(tokio::spawn(async move {
            let result = api.related(request.track_id(), max_results).await;
            // Receiver gone means the application is shutting down
            let _ = tx.send(RelatedResponse { request, result });
        }));
    }

    /// Abort the fetch in flight, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }

    /// Check whether a fetch is in flight
    pub fn is_fetching(&self) -> bool {
        self.in_flight.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<A: VideoSearchApi + 'static> Drop for RelatedItemsFetcher<A> {
    fn drop(&mut self) {
        self.cancel();
    }
}
