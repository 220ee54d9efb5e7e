//! Playback Events
//!
//! Event-based communication for UI synchronization. Events are queued by the
//! controller and drained by the presentation layer:
//! - State changes (loading/playing/paused/idle)
//! - Track changes (the signal to refresh related items)
//! - Progress updates reported by the widget
//! - Pause-recovery scheduling and outcome

use crate::types::{ActiveListKind, PlaybackState};
use beats_core::TrackId;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Playback state or play/pause intent changed
    StateChanged {
        /// The new state machine position
        state: PlaybackState,
        /// The play/pause intent
        is_playing: bool,
    },

    /// Current track changed
    TrackChanged {
        /// ID of the new (current) track
        track_id: TrackId,
        /// ID of the previous track (if any)
        previous_track_id: Option<TrackId>,
    },

    /// The list used for navigation changed
    ActiveListChanged {
        /// The new active list
        list: ActiveListKind,
    },

    /// Progress reported by the widget
    Progress {
        /// Played fraction in [0, 1]
        played_fraction: f64,
        /// Duration in seconds
        duration_seconds: f64,
    },

    /// A forced pause was detected; one attempt is scheduled
    RecoveryScheduled {
        /// Delay before the attempt in milliseconds
        delay_ms: u64,
    },

    /// Play was re-asserted after a forced pause
    RecoveryAttempted,

    /// Playback paused again after the attempt; left to the user
    RecoveryAbandoned,

    /// Error reported by the widget or a host integration
    Error {
        /// Error message
        message: String,
    },
}
