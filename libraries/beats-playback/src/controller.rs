//! Playback controller - core state machine
//!
//! Owns the current track, the play/pause intent, and progress. Drives the
//! external playback widget and keeps the host media session in sync.
//!
//! ```text
//!          play()                 ready
//! Idle ────────────▶ Loading ───────────────▶ Playing ◀──▶ Paused
//!   ▲                  ▲                         │            │
//!   │                  └──── play/next/prev ─────┴────────────┘
//!   └──────────────────────── stop() ────────────────────────┘
//! ```
//!
//! All transitions take `&mut self`: a navigation call fully updates the
//! current track and its side effects before the next one can run.

use crate::{
    error::PlaybackError,
    events::PlaybackEvent,
    host::{MediaSession, PlaybackWidget},
    recovery::{PauseOutcome, PauseRecovery, RecoveryTicket},
    resolver::{position_of, resolve_active_list, TrackLists},
    types::{
        ActiveListKind, ControllerConfig, MediaAction, MediaMetadata, PlaybackState,
        PlaybackStatus, WidgetOptions, MAX_RECOVERY_DELAY,
    },
};
use beats_core::Track;
use tracing::{debug, error, info, warn};

/// Result of a next/previous request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Moved within the active list
    Moved(Track),
    /// Active list exhausted; continued into related items
    Continued(Track),
    /// Nothing to move to
    Stayed,
}

/// Central playback control
///
/// Generic over the host adapters so that platforms (and tests) supply their
/// own widget and media-session implementations.
pub struct PlaybackController<W: PlaybackWidget, M: MediaSession> {
    widget: W,
    media: M,
    config: ControllerConfig,

    current: Option<Track>,
    state: PlaybackState,
    is_playing: bool,
    played_fraction: f64,
    duration_seconds: f64,
    active_list: ActiveListKind,

    /// Set when the widget failed; the next play intent reloads the target
    widget_failed: bool,
    recovery: PauseRecovery,

    pending_events: Vec<PlaybackEvent>,
}

impl<W: PlaybackWidget, M: MediaSession> PlaybackController<W, M> {
    /// Create an idle controller
    ///
    /// A recovery delay above one second is clamped.
    pub fn new(widget: W, media: M, mut config: ControllerConfig) -> Self {
        if config.recovery_delay > MAX_RECOVERY_DELAY {
            warn!(
                requested_ms = config.recovery_delay.as_millis() as u64,
                "Recovery delay clamped to 1s"
            );
            config.recovery_delay = MAX_RECOVERY_DELAY;
        }

        Self {
            widget,
            media,
            recovery: PauseRecovery::new(config.recovery_delay),
            config,
            current: None,
            state: PlaybackState::Idle,
            is_playing: false,
            played_fraction: 0.0,
            duration_seconds: 0.0,
            active_list: ActiveListKind::SearchResults,
            widget_failed: false,
            pending_events: Vec::new(),
        }
    }

    // ===== Transitions =====

    /// Play `track` from any state
    ///
    /// Loads the widget synchronously so the call stays within the user
    /// gesture that triggered it.
    pub fn play(&mut self, track: Track) {
        self.recovery.reset();

        let previous_track_id = self.current.as_ref().map(|t| t.id().clone());
        let track_id = track.id().clone();
        info!(track_id = %track_id, title = %track.title(), "Playing track");

        self.current = Some(track);
        self.played_fraction = 0.0;
        self.duration_seconds = 0.0;
        self.is_playing = true;
        self.state = PlaybackState::Loading;
        self.widget_failed = false;

        if let Err(e) = self.widget.load(&track_id, WidgetOptions::autoplay()) {
            self.fail_widget(&e);
        }
        self.publish_now_playing();

        self.pending_events.push(PlaybackEvent::TrackChanged {
            track_id,
            previous_track_id,
        });
        self.emit_state_changed();
    }

    /// Select the navigation list, then play `track`
    pub fn play_from(&mut self, list: ActiveListKind, track: Track) {
        self.set_active_list(list);
        self.play(track);
    }

    /// Select the list used by next/previous
    pub fn set_active_list(&mut self, list: ActiveListKind) {
        if self.active_list != list {
            debug!(list = %list, "Active list changed");
            self.active_list = list.clone();
            self.pending_events
                .push(PlaybackEvent::ActiveListChanged { list });
        }
    }

    /// Flip the play/pause intent (no-op without a current track)
    pub fn toggle_pause(&mut self) {
        if self.current.is_none() {
            return;
        }
        self.apply_intent(!self.is_playing);
    }

    /// Set the play/pause intent explicitly (no-op without a current track)
    pub fn set_playing(&mut self, playing: bool) {
        if self.current.is_none() || self.is_playing == playing {
            return;
        }
        self.apply_intent(playing);
    }

    fn apply_intent(&mut self, playing: bool) {
        self.recovery.reset();
        self.is_playing = playing;

        let result = match (&self.current, playing && self.widget_failed) {
            (Some(track), true) => {
                debug!(track_id = %track.id(), "Reloading after widget failure");
                self.state = PlaybackState::Loading;
                self.widget_failed = false;
                self.widget.load(track.id(), WidgetOptions::autoplay())
            }
            _ => self.widget.set_playing(playing),
        };
        if let Err(e) = result {
            self.fail_widget(&e);
        }

        if self.state != PlaybackState::Loading {
            self.state = self.ready_state();
        }
        self.publish_playback();
        self.emit_state_changed();
    }

    /// Stop playback and return to `Idle`
    pub fn stop(&mut self) {
        if self.current.is_none() {
            return;
        }
        self.recovery.reset();
        info!("Playback stopped");

        self.current = None;
        self.is_playing = false;
        self.played_fraction = 0.0;
        self.duration_seconds = 0.0;
        self.state = PlaybackState::Idle;
        self.widget_failed = false;

        if let Err(e) = self.widget.stop() {
            warn!(error = %e, "Widget failed to stop");
        }
        if let Err(e) = self.media.clear() {
            warn!(error = %e, "Failed to clear media session");
        }
        self.emit_state_changed();
    }

    /// Advance to the next track
    ///
    /// Moves within the active list; when the list is exhausted (or no longer
    /// contains the current track) continues with the first related item.
    pub fn next<L: TrackLists + ?Sized>(&mut self, lists: &L) -> Navigation {
        let Some(current) = self.current.as_ref() else {
            return Navigation::Stayed;
        };

        let list = resolve_active_list(&self.active_list, lists);
        if let Some(idx) = position_of(list, current.id()) {
            if let Some(next) = list.get(idx + 1) {
                let next = next.clone();
                self.play(next.clone());
                return Navigation::Moved(next);
            }
        }

        match lists.related_items().first().cloned() {
            Some(next) => {
                debug!(
                    track_id = %next.id(),
                    "Active list exhausted, continuing with related items"
                );
                self.set_active_list(ActiveListKind::RelatedItems);
                self.play(next.clone());
                Navigation::Continued(next)
            }
            None => {
                debug!("No next track");
                Navigation::Stayed
            }
        }
    }

    /// Go back to the previous track in the active list
    ///
    /// There is no continuation fallback at the start of the list.
    pub fn prev<L: TrackLists + ?Sized>(&mut self, lists: &L) -> Navigation {
        let Some(current) = self.current.as_ref() else {
            return Navigation::Stayed;
        };

        let list = resolve_active_list(&self.active_list, lists);
        match position_of(list, current.id()) {
            Some(idx) if idx > 0 => {
                let prev = list[idx - 1].clone();
                self.play(prev.clone());
                Navigation::Moved(prev)
            }
            _ => Navigation::Stayed,
        }
    }

    /// Route a host media-key action to the matching transition
    pub fn handle_media_action<L: TrackLists + ?Sized>(
        &mut self,
        action: MediaAction,
        lists: &L,
    ) -> Option<Navigation> {
        debug!(?action, "Media action");
        match action {
            MediaAction::Play => {
                self.set_playing(true);
                None
            }
            MediaAction::Pause => {
                self.set_playing(false);
                None
            }
            MediaAction::NextTrack => Some(self.next(lists)),
            MediaAction::PreviousTrack => Some(self.prev(lists)),
        }
    }

    // ===== Widget events =====

    /// The widget finished loading the current target
    pub fn on_widget_ready(&mut self) {
        if self.state != PlaybackState::Loading {
            return;
        }
        self.widget_failed = false;
        self.state = self.ready_state();
        debug!(state = ?self.state, "Widget ready");
        self.emit_state_changed();
    }

    /// Progress report from the widget
    ///
    /// Out-of-range values are clamped; reports while idle are ignored.
    pub fn on_widget_progress(&mut self, fraction: f64, duration_seconds: f64) {
        if self.current.is_none() {
            return;
        }
        self.played_fraction = clamp_fraction(fraction);
        self.duration_seconds = clamp_seconds(duration_seconds);

        if self.is_playing {
            self.recovery.on_resumed();
        }
        self.pending_events.push(PlaybackEvent::Progress {
            played_fraction: self.played_fraction,
            duration_seconds: self.duration_seconds,
        });
    }

    /// Duration report from the widget
    pub fn on_widget_duration(&mut self, duration_seconds: f64) {
        if self.current.is_none() {
            return;
        }
        self.duration_seconds = clamp_seconds(duration_seconds);
    }

    /// The widget reached the end of the current track
    pub fn on_track_ended<L: TrackLists + ?Sized>(&mut self, lists: &L) -> Navigation {
        debug!("Track ended");
        self.next(lists)
    }

    /// The widget reports it is paused
    ///
    /// When the intent is to play, this is a platform-forced pause: one
    /// recovery attempt is scheduled and its ticket returned. The host waits
    /// [`RecoveryTicket::delay`] (see [`RecoveryTimer`](crate::RecoveryTimer))
    /// and calls [`on_recovery_due`]. A second
    /// forced pause after the attempt leaves playback paused for the user.
    ///
    /// [`on_recovery_due`]: Self::on_recovery_due
    pub fn on_external_pause_signal(&mut self) -> Option<RecoveryTicket> {
        if self.current.is_none() || !self.is_playing {
            return None;
        }

        match self.recovery.on_forced_pause() {
            PauseOutcome::Schedule(ticket) => {
                info!(
                    delay_ms = ticket.delay().as_millis() as u64,
                    "Forced pause detected, scheduling recovery"
                );
                self.pending_events.push(PlaybackEvent::RecoveryScheduled {
                    delay_ms: ticket.delay().as_millis() as u64,
                });
                Some(ticket)
            }
            PauseOutcome::AlreadyScheduled => None,
            PauseOutcome::GiveUp => {
                warn!("Playback paused again after recovery, leaving it paused");
                self.is_playing = false;
                if self.state != PlaybackState::Loading {
                    self.state = PlaybackState::Paused;
                }
                self.publish_playback();
                self.pending_events.push(PlaybackEvent::RecoveryAbandoned);
                self.emit_state_changed();
                None
            }
        }
    }

    /// The delay of a recovery ticket elapsed
    ///
    /// Returns `true` if play was re-asserted.
    pub fn on_recovery_due(&mut self, ticket: RecoveryTicket) -> bool {
        if !self.recovery.take_due(ticket) || !self.is_playing || self.current.is_none() {
            return false;
        }

        info!("Re-asserting play after forced pause");
        if let Err(e) = self.widget.set_playing(true) {
            self.fail_widget(&e);
            return false;
        }
        self.pending_events.push(PlaybackEvent::RecoveryAttempted);
        true
    }

    /// The widget reported an error
    ///
    /// The current track stays set so the user can retry or navigate away.
    pub fn on_widget_error(&mut self, message: &str) {
        self.fail_widget(&PlaybackError::Widget(message.to_string()));
        self.publish_playback();
        self.emit_state_changed();
    }

    fn fail_widget(&mut self, err: &PlaybackError) {
        error!(
            track_id = ?self.current.as_ref().map(|t| t.id().as_str()),
            error = %err,
            "Playback widget error"
        );
        self.widget_failed = true;
        self.recovery.reset();
        if self.current.is_some() {
            self.is_playing = false;
            self.state = PlaybackState::Paused;
        }
        self.pending_events.push(PlaybackEvent::Error {
            message: err.to_string(),
        });
    }

    // ===== Host sync =====

    fn publish_now_playing(&mut self) {
        let Some(track) = self.current.as_ref() else {
            return;
        };
        let metadata = MediaMetadata::for_track(track, &self.config.app_name);

        let result = self
            .media
            .set_metadata(&metadata)
            .and_then(|()| self.media.set_actions(&MediaAction::ALL))
            .and_then(|()| self.media.set_playback(self.is_playing));
        if let Err(e) = result {
            warn!(error = %e, "Failed to update media session");
        }
    }

    fn publish_playback(&mut self) {
        if let Err(e) = self.media.set_playback(self.is_playing) {
            warn!(error = %e, "Failed to update media session playback");
        }
    }

    fn ready_state(&self) -> PlaybackState {
        if self.is_playing {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        }
    }

    fn emit_state_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::StateChanged {
            state: self.state,
            is_playing: self.is_playing,
        });
    }

    // ===== State queries =====

    /// Current state machine position
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Current track, if any
    pub fn current_track(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    /// Play/pause intent
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Played fraction in [0, 1]
    pub fn played_fraction(&self) -> f64 {
        self.played_fraction
    }

    /// Duration in seconds (0 until reported)
    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    /// List used for navigation
    pub fn active_list(&self) -> &ActiveListKind {
        &self.active_list
    }

    /// Snapshot of the observable playback record
    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            current_track: self.current.clone(),
            is_playing: self.is_playing,
            played_fraction: self.played_fraction,
            duration_seconds: self.duration_seconds,
            active_list: self.active_list.clone(),
            state: self.state,
        }
    }

    /// Check whether a recovery attempt is pending
    pub fn recovery_pending(&self) -> bool {
        self.recovery.is_scheduled()
    }

    /// Controller configuration
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Borrow the widget adapter
    pub fn widget(&self) -> &W {
        &self.widget
    }

    /// Borrow the media-session adapter
    pub fn media_session(&self) -> &M {
        &self.media
    }

    // ===== Events =====

    /// Drain all pending events
    ///
    /// Returns all events that have been emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }
}

fn clamp_fraction(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn clamp_seconds(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use beats_core::TrackId;

    #[derive(Default)]
    struct NullWidget;

    impl PlaybackWidget for NullWidget {
        fn load(&mut self, _target: &TrackId, _options: WidgetOptions) -> Result<()> {
            Ok(())
        }
        fn set_playing(&mut self, _playing: bool) -> Result<()> {
            Ok(())
        }
        fn stop(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct NullSession;

    impl MediaSession for NullSession {
        fn set_metadata(&mut self, _metadata: &MediaMetadata) -> Result<()> {
            Ok(())
        }
        fn set_actions(&mut self, _actions: &[MediaAction]) -> Result<()> {
            Ok(())
        }
        fn set_playback(&mut self, _playing: bool) -> Result<()> {
            Ok(())
        }
        fn clear(&mut self) -> Result<()> {
            Ok(())
        }
    }

    fn controller() -> PlaybackController<NullWidget, NullSession> {
        PlaybackController::new(NullWidget, NullSession, ControllerConfig::default())
    }

    fn track(id: &str) -> Track {
        Track::new(id, id, "").unwrap()
    }

    #[test]
    fn starts_idle() {
        let controller = controller();
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert!(controller.current_track().is_none());
        assert!(!controller.is_playing());
    }

    #[test]
    fn toggle_without_track_is_noop() {
        let mut controller = controller();
        controller.toggle_pause();
        assert!(!controller.is_playing());
        assert!(!controller.has_pending_events());
    }

    #[test]
    fn progress_is_clamped() {
        let mut controller = controller();
        controller.play(track("a"));

        controller.on_widget_progress(1.7, -4.0);
        assert_eq!(controller.played_fraction(), 1.0);
        assert_eq!(controller.duration_seconds(), 0.0);

        controller.on_widget_progress(f64::NAN, f64::INFINITY);
        assert_eq!(controller.played_fraction(), 0.0);
        assert_eq!(controller.duration_seconds(), 0.0);
    }

    #[test]
    fn progress_while_idle_is_ignored() {
        let mut controller = controller();
        controller.on_widget_progress(0.5, 200.0);
        assert_eq!(controller.played_fraction(), 0.0);
    }

    #[test]
    fn recovery_delay_is_clamped() {
        let config = ControllerConfig {
            recovery_delay: std::time::Duration::from_secs(5),
            ..ControllerConfig::default()
        };
        let controller = PlaybackController::new(NullWidget, NullSession, config);
        assert_eq!(controller.config().recovery_delay, MAX_RECOVERY_DELAY);
    }

    #[test]
    fn play_resets_progress() {
        let mut controller = controller();
        controller.play(track("a"));
        controller.on_widget_progress(0.8, 240.0);

        controller.play(track("b"));
        assert_eq!(controller.played_fraction(), 0.0);
        assert_eq!(controller.duration_seconds(), 0.0);
        assert_eq!(controller.state(), PlaybackState::Loading);
    }
}
