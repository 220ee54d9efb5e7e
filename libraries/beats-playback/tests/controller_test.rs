//! Integration tests for the playback controller
//!
//! Drives the controller through recording widget and media-session fakes and
//! checks navigation, host synchronization, and forced-pause recovery.

use beats_core::{Track, TrackId};
use beats_playback::{
    ActiveListKind, ControllerConfig, MediaAction, MediaMetadata, MediaSession, Navigation,
    PlaybackController, PlaybackError, PlaybackEvent, PlaybackState, PlaybackWidget, Result,
    TrackLists, WidgetOptions,
};
use std::collections::HashMap;
use std::time::Duration;

// ===== Fakes =====

#[derive(Debug, Clone, PartialEq)]
enum WidgetCall {
    Load(String, WidgetOptions),
    SetPlaying(bool),
    Stop,
}

#[derive(Default)]
struct RecordingWidget {
    calls: Vec<WidgetCall>,
    fail_loads: bool,
}

impl PlaybackWidget for RecordingWidget {
    fn load(&mut self, target: &TrackId, options: WidgetOptions) -> Result<()> {
        self.calls
            .push(WidgetCall::Load(target.as_str().to_string(), options));
        if self.fail_loads {
            return Err(PlaybackError::Widget("embed blocked".to_string()));
        }
        Ok(())
    }

    fn set_playing(&mut self, playing: bool) -> Result<()> {
        self.calls.push(WidgetCall::SetPlaying(playing));
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.calls.push(WidgetCall::Stop);
        Ok(())
    }
}

#[derive(Default)]
struct RecordingSession {
    metadata: Option<MediaMetadata>,
    actions: Vec<MediaAction>,
    playing: Option<bool>,
    cleared: usize,
}

impl MediaSession for RecordingSession {
    fn set_metadata(&mut self, metadata: &MediaMetadata) -> Result<()> {
        self.metadata = Some(metadata.clone());
        Ok(())
    }

    fn set_actions(&mut self, actions: &[MediaAction]) -> Result<()> {
        self.actions = actions.to_vec();
        Ok(())
    }

    fn set_playback(&mut self, playing: bool) -> Result<()> {
        self.playing = Some(playing);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.metadata = None;
        self.cleared += 1;
        Ok(())
    }
}

#[derive(Default)]
struct Lists {
    search: Vec<Track>,
    collections: HashMap<String, Vec<Track>>,
    related: Vec<Track>,
}

impl TrackLists for Lists {
    fn search_results(&self) -> &[Track] {
        &self.search
    }

    fn collection(&self, name: &str) -> Option<&[Track]> {
        self.collections.get(name).map(Vec::as_slice)
    }

    fn related_items(&self) -> &[Track] {
        &self.related
    }
}

// ===== Helpers =====

type Controller = PlaybackController<RecordingWidget, RecordingSession>;

fn controller() -> Controller {
    PlaybackController::new(
        RecordingWidget::default(),
        RecordingSession::default(),
        ControllerConfig::default(),
    )
}

fn track(id: &str) -> Track {
    Track::new(id, format!("Title {id}"), format!("https://img/{id}.jpg")).unwrap()
}

fn tracks(prefix: &str, n: usize) -> Vec<Track> {
    (0..n).map(|i| track(&format!("{prefix}{i}"))).collect()
}

fn current_id(controller: &Controller) -> &str {
    controller.current_track().unwrap().id().as_str()
}

// ===== Navigation =====

#[test]
fn jazz_search_navigation() {
    let lists = Lists {
        search: tracks("jazz", 15),
        ..Lists::default()
    };
    let mut controller = controller();

    controller.play_from(ActiveListKind::SearchResults, lists.search[3].clone());
    for _ in 0..3 {
        assert!(matches!(controller.next(&lists), Navigation::Moved(_)));
    }
    assert_eq!(current_id(&controller), "jazz6");

    controller.prev(&lists);
    assert_eq!(current_id(&controller), "jazz5");
}

#[test]
fn next_then_prev_returns_to_start() {
    let lists = Lists {
        search: tracks("s", 5),
        ..Lists::default()
    };
    let mut controller = controller();

    controller.play_from(ActiveListKind::SearchResults, lists.search[1].clone());
    controller.next(&lists);
    controller.prev(&lists);

    assert_eq!(current_id(&controller), "s1");
}

#[test]
fn prev_at_first_index_stays() {
    let lists = Lists {
        search: tracks("s", 3),
        related: tracks("r", 2),
        ..Lists::default()
    };
    let mut controller = controller();
    controller.play_from(ActiveListKind::SearchResults, lists.search[0].clone());

    assert_eq!(controller.prev(&lists), Navigation::Stayed);
    assert_eq!(current_id(&controller), "s0");
}

#[test]
fn next_at_last_index_without_related_stays() {
    let lists = Lists {
        search: tracks("s", 3),
        ..Lists::default()
    };
    let mut controller = controller();
    controller.play_from(ActiveListKind::SearchResults, lists.search[2].clone());
    controller.drain_events();

    assert_eq!(controller.next(&lists), Navigation::Stayed);
    assert_eq!(current_id(&controller), "s2");
    assert!(!controller.has_pending_events());
}

#[test]
fn next_at_last_index_continues_into_related() {
    let lists = Lists {
        search: tracks("s", 3),
        related: tracks("r", 4),
        ..Lists::default()
    };
    let mut controller = controller();
    controller.play_from(ActiveListKind::SearchResults, lists.search[2].clone());

    let nav = controller.next(&lists);
    assert_eq!(nav, Navigation::Continued(track("r0")));
    assert_eq!(controller.active_list(), &ActiveListKind::RelatedItems);

    // Continuation keeps walking the related feed
    controller.next(&lists);
    assert_eq!(current_id(&controller), "r1");
}

#[test]
fn continuation_plays_first_related_item() {
    // Cache still keyed to an earlier track, starting with the current one
    let lists = Lists {
        search: vec![track("a"), track("b")],
        related: vec![track("b"), track("x")],
        ..Lists::default()
    };
    let mut controller = controller();
    controller.play_from(ActiveListKind::SearchResults, track("b"));

    let nav = controller.next(&lists);
    assert_eq!(nav, Navigation::Continued(track("b")));
    assert_eq!(current_id(&controller), "b");
    assert_eq!(controller.active_list(), &ActiveListKind::RelatedItems);
}

#[test]
fn collection_edits_are_seen_by_navigation() {
    let mut lists = Lists::default();
    lists
        .collections
        .insert("Road Trip".to_string(), tracks("c", 3));
    let mut controller = controller();

    let list = ActiveListKind::Collection("Road Trip".to_string());
    controller.play_from(list, track("c1"));

    // The playing track is removed from the collection
    lists
        .collections
        .get_mut("Road Trip")
        .unwrap()
        .retain(|t| t.id().as_str() != "c1");

    assert_eq!(controller.next(&lists), Navigation::Stayed);
    assert_eq!(controller.prev(&lists), Navigation::Stayed);
    assert_eq!(current_id(&controller), "c1");

    lists.related = tracks("r", 1);
    assert_eq!(controller.next(&lists), Navigation::Continued(track("r0")));
}

#[test]
fn unknown_collection_resolves_empty() {
    let lists = Lists {
        related: tracks("r", 2),
        ..Lists::default()
    };
    let mut controller = controller();
    controller.play_from(ActiveListKind::Collection("Deleted".to_string()), track("x"));

    assert_eq!(controller.prev(&lists), Navigation::Stayed);
    assert_eq!(controller.next(&lists), Navigation::Continued(track("r0")));
}

#[test]
fn track_end_advances() {
    let lists = Lists {
        search: tracks("s", 2),
        ..Lists::default()
    };
    let mut controller = controller();
    controller.play_from(ActiveListKind::SearchResults, lists.search[0].clone());

    controller.on_track_ended(&lists);
    assert_eq!(current_id(&controller), "s1");
}

#[test]
fn navigation_without_track_stays() {
    let lists = Lists {
        search: tracks("s", 2),
        ..Lists::default()
    };
    let mut controller = controller();

    assert_eq!(controller.next(&lists), Navigation::Stayed);
    assert_eq!(controller.prev(&lists), Navigation::Stayed);
    assert_eq!(controller.state(), PlaybackState::Idle);
}

// ===== State machine and widget =====

#[test]
fn play_loads_widget_with_autoplay_options() {
    let mut controller = controller();
    controller.play(track("a"));

    assert_eq!(
        controller.widget().calls,
        vec![WidgetCall::Load("a".to_string(), WidgetOptions::autoplay())]
    );
    assert_eq!(controller.state(), PlaybackState::Loading);
    assert!(controller.is_playing());
}

#[test]
fn ready_follows_intent() {
    let mut controller = controller();
    controller.play(track("a"));
    controller.on_widget_ready();
    assert_eq!(controller.state(), PlaybackState::Playing);

    controller.toggle_pause();
    assert_eq!(controller.state(), PlaybackState::Paused);
    assert!(!controller.is_playing());

    controller.play(track("b"));
    controller.toggle_pause();
    controller.on_widget_ready();
    assert_eq!(controller.state(), PlaybackState::Paused);
}

#[test]
fn toggle_pushes_intent_to_widget() {
    let mut controller = controller();
    controller.play(track("a"));
    controller.on_widget_ready();

    controller.toggle_pause();
    controller.toggle_pause();

    let calls = &controller.widget().calls;
    assert_eq!(calls[1..], [WidgetCall::SetPlaying(false), WidgetCall::SetPlaying(true)]);
}

#[test]
fn stop_returns_to_idle() {
    let mut controller = controller();
    controller.play(track("a"));
    controller.on_widget_progress(0.4, 180.0);
    controller.stop();

    let status = controller.status();
    assert_eq!(status.state, PlaybackState::Idle);
    assert!(status.current_track.is_none());
    assert!(!status.is_playing);
    assert_eq!(status.played_fraction, 0.0);
    assert_eq!(controller.widget().calls.last(), Some(&WidgetCall::Stop));
    assert_eq!(controller.media_session().cleared, 1);
}

#[test]
fn track_change_emits_event_with_previous() {
    let mut controller = controller();
    controller.play(track("a"));
    controller.play(track("b"));

    let changes: Vec<_> = controller
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            PlaybackEvent::TrackChanged {
                track_id,
                previous_track_id,
            } => Some((track_id, previous_track_id)),
            _ => None,
        })
        .collect();

    assert_eq!(
        changes,
        vec![
            (TrackId::new("a"), None),
            (TrackId::new("b"), Some(TrackId::new("a"))),
        ]
    );
    assert!(!controller.has_pending_events());
}

#[test]
fn widget_error_keeps_track_and_clears_intent() {
    let mut controller = controller();
    controller.play(track("a"));
    controller.on_widget_ready();
    controller.drain_events();

    controller.on_widget_error("video unavailable");

    assert_eq!(current_id(&controller), "a");
    assert!(!controller.is_playing());
    let events = controller.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        PlaybackEvent::Error { message } if message.contains("video unavailable")
    )));

    // Resuming reloads the target instead of nudging a failed widget
    controller.toggle_pause();
    assert!(controller.is_playing());
    assert_eq!(
        controller.widget().calls.last(),
        Some(&WidgetCall::Load("a".to_string(), WidgetOptions::autoplay()))
    );
    assert_eq!(controller.state(), PlaybackState::Loading);
}

#[test]
fn failed_load_is_reported() {
    let widget = RecordingWidget {
        fail_loads: true,
        ..RecordingWidget::default()
    };
    let mut controller =
        PlaybackController::new(widget, RecordingSession::default(), ControllerConfig::default());

    controller.play(track("a"));

    assert_eq!(current_id(&controller), "a");
    assert!(!controller.is_playing());
    assert!(controller
        .drain_events()
        .iter()
        .any(|e| matches!(e, PlaybackEvent::Error { .. })));
}

// ===== Media session =====

#[test]
fn media_session_follows_current_track() {
    let lists = Lists {
        search: tracks("s", 2),
        ..Lists::default()
    };
    let mut controller = controller();
    controller.play_from(ActiveListKind::SearchResults, lists.search[0].clone());

    let session = controller.media_session();
    let metadata = session.metadata.as_ref().unwrap();
    assert_eq!(metadata.title, "Title s0");
    assert_eq!(metadata.artist, "Beats AI");
    assert_eq!(metadata.artwork[0].src, "https://img/s0.jpg");
    assert_eq!(session.actions, MediaAction::ALL.to_vec());
    assert_eq!(session.playing, Some(true));

    controller.next(&lists);
    assert_eq!(
        controller.media_session().metadata.as_ref().unwrap().title,
        "Title s1"
    );

    controller.toggle_pause();
    assert_eq!(controller.media_session().playing, Some(false));
}

#[test]
fn media_actions_route_to_transitions() {
    let lists = Lists {
        search: tracks("s", 3),
        ..Lists::default()
    };
    let mut controller = controller();
    controller.play_from(ActiveListKind::SearchResults, lists.search[1].clone());

    controller.handle_media_action(MediaAction::Pause, &lists);
    assert!(!controller.is_playing());
    controller.handle_media_action(MediaAction::Play, &lists);
    assert!(controller.is_playing());

    let nav = controller.handle_media_action(MediaAction::NextTrack, &lists);
    assert_eq!(nav, Some(Navigation::Moved(track("s2"))));
    controller.handle_media_action(MediaAction::PreviousTrack, &lists);
    controller.handle_media_action(MediaAction::PreviousTrack, &lists);
    assert_eq!(current_id(&controller), "s0");
}

// ===== Forced-pause recovery =====

#[test]
fn forced_pause_is_recovered_once() {
    let mut controller = controller();
    controller.play(track("a"));
    controller.on_widget_ready();

    let ticket = controller.on_external_pause_signal().unwrap();
    assert_eq!(ticket.delay(), Duration::from_millis(800));
    assert!(controller.recovery_pending());

    // Duplicate signal for the same pause event
    assert!(controller.on_external_pause_signal().is_none());

    assert!(controller.on_recovery_due(ticket));
    assert!(!controller.on_recovery_due(ticket));
    assert_eq!(
        controller.widget().calls.last(),
        Some(&WidgetCall::SetPlaying(true))
    );
    assert!(controller
        .drain_events()
        .contains(&PlaybackEvent::RecoveryAttempted));
}

#[test]
fn repeated_forced_pause_is_left_to_user() {
    let mut controller = controller();
    controller.play(track("a"));
    controller.on_widget_ready();

    let ticket = controller.on_external_pause_signal().unwrap();
    controller.on_recovery_due(ticket);

    assert!(controller.on_external_pause_signal().is_none());
    assert!(!controller.is_playing());
    assert_eq!(controller.state(), PlaybackState::Paused);
    assert!(controller
        .drain_events()
        .contains(&PlaybackEvent::RecoveryAbandoned));

    // Paused intent: further signals schedule nothing
    assert!(controller.on_external_pause_signal().is_none());
}

#[test]
fn progress_after_recovery_rearms() {
    let mut controller = controller();
    controller.play(track("a"));
    controller.on_widget_ready();

    let first = controller.on_external_pause_signal().unwrap();
    controller.on_recovery_due(first);
    controller.on_widget_progress(0.3, 200.0);

    assert!(controller.on_external_pause_signal().is_some());
}

#[test]
fn user_transition_invalidates_ticket() {
    let lists = Lists {
        search: tracks("s", 2),
        ..Lists::default()
    };
    let mut controller = controller();
    controller.play_from(ActiveListKind::SearchResults, lists.search[0].clone());

    let ticket = controller.on_external_pause_signal().unwrap();
    controller.next(&lists);

    assert!(!controller.on_recovery_due(ticket));
    assert!(!controller.recovery_pending());
}

#[test]
fn no_recovery_when_paused_by_user() {
    let mut controller = controller();
    controller.play(track("a"));
    controller.toggle_pause();

    assert!(controller.on_external_pause_signal().is_none());
}
