//! Beats - Playback and Queue Control
//!
//! Platform-agnostic playback control for Beats.
//!
//! This crate provides:
//! - The playback state machine (idle, loading, playing, paused)
//! - Queue resolution over search results, collections, and related items
//! - Continuation into related items when the active list runs out
//! - Bounded recovery from platform-forced pauses, with a tokio timer for the delay
//! - Media-session metadata and media-key routing
//! - Time and lyrics-link helpers for the presentation layer
//!
//! # Architecture
//!
//! The external playback widget and the host media session are reached
//! through the [`PlaybackWidget`] and [`MediaSession`] traits. Lists are read
//! through [`TrackLists`] on every navigation, never cached.
//!
//! # Example
//!
//! ```rust
//! use beats_core::{Track, TrackId};
//! use beats_playback::{
//!     ActiveListKind, ControllerConfig, MediaAction, MediaMetadata, MediaSession,
//!     Navigation, PlaybackController, PlaybackWidget, Result, TrackLists, WidgetOptions,
//! };
//!
//! struct Widget;
//! impl PlaybackWidget for Widget {
//!     fn load(&mut self, _target: &TrackId, _options: WidgetOptions) -> Result<()> { Ok(()) }
//!     fn set_playing(&mut self, _playing: bool) -> Result<()> { Ok(()) }
//!     fn stop(&mut self) -> Result<()> { Ok(()) }
//! }
//!
//! struct Session;
//! impl MediaSession for Session {
//!     fn set_metadata(&mut self, _metadata: &MediaMetadata) -> Result<()> { Ok(()) }
//!     fn set_actions(&mut self, _actions: &[MediaAction]) -> Result<()> { Ok(()) }
//!     fn set_playback(&mut self, _playing: bool) -> Result<()> { Ok(()) }
//!     fn clear(&mut self) -> Result<()> { Ok(()) }
//! }
//!
//! struct Lists(Vec<Track>);
//! impl TrackLists for Lists {
//!     fn search_results(&self) -> &[Track] { &self.0 }
//!     fn collection(&self, _name: &str) -> Option<&[Track]> { None }
//!     fn related_items(&self) -> &[Track] { &[] }
//! }
//!
//! let lists = Lists(vec![
//!     Track::new("a", "First", "").unwrap(),
//!     Track::new("b", "Second", "").unwrap(),
//! ]);
//!
//! let mut controller = PlaybackController::new(Widget, Session, ControllerConfig::default());
//! controller.play_from(ActiveListKind::SearchResults, lists.0[0].clone());
//! controller.on_widget_ready();
//!
//! assert!(matches!(controller.next(&lists), Navigation::Moved(_)));
//! assert_eq!(controller.current_track().unwrap().id().as_str(), "b");
//! ```

#![forbid(unsafe_code)]

mod controller;
mod display;
mod error;
mod events;
mod host;
mod recovery;
mod related;
mod resolver;
mod timer;
pub mod types;

pub use controller::{Navigation, PlaybackController};
pub use display::{format_time, lyrics_search_url, LYRICS_SEARCH_BASE};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use host::{MediaSession, PlaybackWidget};
pub use recovery::{PauseOutcome, PauseRecovery, RecoveryTicket};
pub use related::{RelatedItems, RelatedOutcome, RelatedRequest};
pub use resolver::{position_of, resolve_active_list, TrackLists};
pub use timer::RecoveryTimer;
pub use types::{
    ActiveListKind, Artwork, ControllerConfig, MediaAction, MediaMetadata, PlaybackState,
    PlaybackStatus, WidgetOptions, DEFAULT_APP_NAME, MAX_RECOVERY_DELAY,
};
