//! Host integration traits
//!
//! The playback widget (an embedded video player used as the audio engine)
//! and the host media session (lock screen, media keys) are external
//! collaborators. Platforms implement these traits as thin adapters; widget
//! and media-key events are fed back into the controller's `on_*` and
//! [`handle_media_action`] methods.
//!
//! [`handle_media_action`]: crate::PlaybackController::handle_media_action

use crate::error::Result;
use crate::types::{MediaAction, MediaMetadata, WidgetOptions};
use beats_core::TrackId;

/// External playback widget
///
/// Calls are made synchronously from the controller transition that caused
/// them. For `load` this matters: autoplay policies only allow audio to start
/// from the call stack of a user gesture.
pub trait PlaybackWidget {
    /// Load `target` and apply `options`
    fn load(&mut self, target: &TrackId, options: WidgetOptions) -> Result<()>;

    /// Apply the play/pause intent to the loaded target
    fn set_playing(&mut self, playing: bool) -> Result<()>;

    /// Unload the current target
    fn stop(&mut self) -> Result<()>;
}

/// Host media-session integration
pub trait MediaSession {
    /// Publish now-playing metadata
    fn set_metadata(&mut self, metadata: &MediaMetadata) -> Result<()>;

    /// Register the actions the host should route back to the controller
    fn set_actions(&mut self, actions: &[MediaAction]) -> Result<()>;

    /// Publish the play/pause status
    fn set_playback(&mut self, playing: bool) -> Result<()>;

    /// Remove now-playing information
    fn clear(&mut self) -> Result<()>;
}

impl<T: PlaybackWidget + ?Sized> PlaybackWidget for Box<T> {
    fn load(&mut self, target: &TrackId, options: WidgetOptions) -> Result<()> {
        (**self).load(target, options)
    }

    fn set_playing(&mut self, playing: bool) -> Result<()> {
        (**self).set_playing(playing)
    }

    fn stop(&mut self) -> Result<()> {
        (**self).stop()
    }
}

impl<T: MediaSession + ?Sized> MediaSession for Box<T> {
    fn set_metadata(&mut self, metadata: &MediaMetadata) -> Result<()> {
        (**self).set_metadata(metadata)
    }

    fn set_actions(&mut self, actions: &[MediaAction]) -> Result<()> {
        (**self).set_actions(actions)
    }

    fn set_playback(&mut self, playing: bool) -> Result<()> {
        (**self).set_playback(playing)
    }

    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }
}
