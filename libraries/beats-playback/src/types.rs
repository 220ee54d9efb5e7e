//! Core types for playback control

use beats_core::{Track, TrackId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Longest allowed delay before re-asserting play after a forced pause
pub const MAX_RECOVERY_DELAY: Duration = Duration::from_secs(1);

/// Artist shown by the host media session
pub const DEFAULT_APP_NAME: &str = "Beats AI";

/// Playback state machine position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No current track
    Idle,

    /// Track selected, widget has not confirmed it is ready
    Loading,

    /// Widget ready and playing
    Playing,

    /// Widget ready and paused
    Paused,
}

/// Which list next/previous navigate
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActiveListKind {
    /// The current search result set
    SearchResults,

    /// A named collection
    Collection(String),

    /// The related-items continuation feed
    RelatedItems,
}

impl fmt::Display for ActiveListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveListKind::SearchResults => f.write_str("search results"),
            ActiveListKind::Collection(name) => write!(f, "collection '{name}'"),
            ActiveListKind::RelatedItems => f.write_str("related items"),
        }
    }
}

/// Observable playback record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackStatus {
    /// Track being played, if any
    pub current_track: Option<Track>,

    /// Play/pause intent
    pub is_playing: bool,

    /// Played fraction in [0, 1]
    pub played_fraction: f64,

    /// Track duration in seconds (0 until the widget reports it)
    pub duration_seconds: f64,

    /// List used for navigation
    pub active_list: ActiveListKind,

    /// State machine position
    pub state: PlaybackState,
}

/// Parameters passed to the playback widget when loading a track
///
/// `muted = false` and `inline = true` are required by mobile autoplay
/// policies for audio to start at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetOptions {
    /// Start playing as soon as loaded
    pub playing: bool,

    /// Start muted
    pub muted: bool,

    /// Ask for inline (non-fullscreen) playback
    pub inline: bool,
}

impl WidgetOptions {
    /// Options for a user-initiated play
    pub fn autoplay() -> Self {
        Self {
            playing: true,
            muted: false,
            inline: true,
        }
    }
}

/// Host media-key / lock-screen actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaAction {
    /// Resume
    Play,
    /// Pause
    Pause,
    /// Skip forward
    NextTrack,
    /// Skip back
    PreviousTrack,
}

impl MediaAction {
    /// Every action the controller handles
    pub const ALL: [MediaAction; 4] = [
        MediaAction::Play,
        MediaAction::Pause,
        MediaAction::NextTrack,
        MediaAction::PreviousTrack,
    ];
}

/// Artwork entry for the host media session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    /// Image URL
    pub src: String,
    /// Size hint, e.g. "512x512"
    pub sizes: String,
    /// MIME type hint
    pub mime_type: String,
}

/// Now-playing metadata for the host media session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaMetadata {
    /// Track id the metadata describes
    pub track_id: TrackId,
    /// Track title
    pub title: String,
    /// Artist line (the application name)
    pub artist: String,
    /// Artwork, empty when the track has none
    pub artwork: Vec<Artwork>,
}

impl MediaMetadata {
    /// Build metadata for `track`
    pub fn for_track(track: &Track, app_name: &str) -> Self {
        let artwork = if track.artwork_url().is_empty() {
            Vec::new()
        } else {
            vec![Artwork {
                src: track.artwork_url().to_string(),
                sizes: "512x512".to_string(),
                mime_type: "image/png".to_string(),
            }]
        };

        Self {
            track_id: track.id().clone(),
            title: track.title().to_string(),
            artist: app_name.to_string(),
            artwork,
        }
    }
}

/// Configuration for the playback controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Artist line shown by the host media session (default: "Beats AI")
    pub app_name: String,

    /// Delay before re-asserting play after a forced pause (default: 800ms, max 1s)
    pub recovery_delay: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            recovery_delay: Duration::from_millis(800),
        }
    }
}
