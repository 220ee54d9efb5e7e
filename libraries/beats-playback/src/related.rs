//! Related-items continuation cache
//!
//! Holds the fallback list used when the active list is exhausted. Each
//! refresh is tagged with a monotonically increasing sequence number; only the
//! latest request may replace the cache, and only while its seed track is
//! still the current track.

use beats_core::{Track, TrackId};
use std::fmt::Display;
use tracing::debug;

/// Handle for one in-flight related-items fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedRequest {
    seq: u64,
    track_id: TrackId,
}

impl RelatedRequest {
    /// Sequence number of this request
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Seed track id
    pub fn track_id(&self) -> &TrackId {
        &self.track_id
    }
}

/// Outcome of completing a related-items request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelatedOutcome {
    /// The cache was replaced
    Applied,
    /// A newer request has been issued since
    Superseded,
    /// The seed track is no longer current
    Stale,
    /// The fetch failed; the previous cache is kept
    Failed,
}

/// Related-items cache keyed by seed track
#[derive(Debug, Default, Clone)]
pub struct RelatedItems {
    keyed_by: Option<TrackId>,
    tracks: Vec<Track>,
    latest_seq: u64,
}

impl RelatedItems {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a refresh for `track_id`, superseding any earlier request
    pub fn begin(&mut self, track_id: TrackId) -> RelatedRequest {
        self.latest_seq += 1;
        debug!(seq = self.latest_seq, track_id = %track_id, "Related items requested");
        RelatedRequest {
            seq: self.latest_seq,
            track_id,
        }
    }

    /// Apply the result of `request`
    ///
    /// `current` is the controller's current track id at completion time.
    pub fn complete<E: Display>(
        &mut self,
        request: &RelatedRequest,
        result: std::result::Result<Vec<Track>, E>,
        current: Option<&TrackId>,
    ) -> RelatedOutcome {
        if request.seq != self.latest_seq {
            debug!(
                seq = request.seq,
                latest = self.latest_seq,
                "Discarding superseded related items"
            );
            return RelatedOutcome::Superseded;
        }
        if current != Some(&request.track_id) {
            debug!(
                track_id = %request.track_id,
                "Discarding related items for a track no longer playing"
            );
            return RelatedOutcome::Stale;
        }

        match result {
            Ok(tracks) => {
                let tracks: Vec<Track> = tracks
                    .into_iter()
                    .filter(|t| t.id() != &request.track_id)
                    .collect();
                debug!(track_id = %request.track_id, count = tracks.len(), "Related items updated");
                self.tracks = tracks;
                self.keyed_by = Some(request.track_id.clone());
                RelatedOutcome::Applied
            }
            Err(e) => {
                debug!(
                    track_id = %request.track_id,
                    error = %e,
                    "Related items fetch failed, keeping previous"
                );
                RelatedOutcome::Failed
            }
        }
    }

    /// Cached tracks
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Seed track the cache was computed for
    pub fn keyed_by(&self) -> Option<&TrackId> {
        self.keyed_by.as_ref()
    }

    /// Check if the cache holds no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Sequence number of the most recently issued request
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }
}
