/// Terminal host adapters
///
/// The terminal has no embedded player or lock screen. These adapters record
/// what a real host would receive and report it through tracing, which keeps
/// the controller's host traffic visible with `RUST_LOG=beats_cli=debug`.
use beats_core::TrackId;
use beats_playback::{
    MediaAction, MediaMetadata, MediaSession, PlaybackWidget, Result, WidgetOptions,
};
use tracing::{debug, info};

/// Widget adapter that tracks the loaded target
#[derive(Debug, Default)]
pub struct TerminalWidget {
    loaded: Option<TrackId>,
    playing: bool,
}

impl TerminalWidget {
    pub fn loaded(&self) -> Option<&TrackId> {
        self.loaded.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl PlaybackWidget for TerminalWidget {
    fn load(&mut self, target: &TrackId, options: WidgetOptions) -> Result<()> {
        info!(
            track_id = %target,
            playing = options.playing,
            muted = options.muted,
            inline = options.inline,
            "Widget load"
        );
        self.loaded = Some(target.clone());
        self.playing = options.playing;
        Ok(())
    }

    fn set_playing(&mut self, playing: bool) -> Result<()> {
        debug!(playing, "Widget play state");
        self.playing = playing;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        debug!("Widget stopped");
        self.loaded = None;
        self.playing = false;
        Ok(())
    }
}

/// Media-session adapter that keeps the last published metadata
#[derive(Debug, Default)]
pub struct TerminalMediaSession {
    metadata: Option<MediaMetadata>,
    actions: Vec<MediaAction>,
}

impl TerminalMediaSession {
    pub fn metadata(&self) -> Option<&MediaMetadata> {
        self.metadata.as_ref()
    }

    pub fn actions(&self) -> &[MediaAction] {
        &self.actions
    }
}

impl MediaSession for TerminalMediaSession {
    fn set_metadata(&mut self, metadata: &MediaMetadata) -> Result<()> {
        debug!(
            title = %metadata.title,
            artist = %metadata.artist,
            artwork = metadata.artwork.len(),
            "Now playing"
        );
        self.metadata = Some(metadata.clone());
        Ok(())
    }

    fn set_actions(&mut self, actions: &[MediaAction]) -> Result<()> {
        debug!(?actions, "Media actions registered");
        self.actions = actions.to_vec();
        Ok(())
    }

    fn set_playback(&mut self, playing: bool) -> Result<()> {
        debug!(playing, "Media session playback");
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        debug!("Media session cleared");
        self.metadata = None;
        self.actions.clear();
        Ok(())
    }
}
