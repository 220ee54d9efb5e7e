/// Application state shared by the shell commands
use crate::config::SuggestSettings;
use crate::error::{CliError, Result};
use crate::host::{TerminalMediaSession, TerminalWidget};
use beats_core::{KeyValueStore, Track};
use beats_playback::{
    lyrics_search_url, resolve_active_list, ActiveListKind, ControllerConfig, Navigation,
    PlaybackController, PlaybackEvent, PlaybackStatus, RecoveryTicket, RecoveryTimer,
    RelatedItems, RelatedOutcome, TrackLists,
};
use beats_search_client::{
    RelatedItemsFetcher, RelatedResponse, SearchSession, SuggestionFeed, VideoSearchApi,
};
use beats_storage::CollectionStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

pub type Controller = PlaybackController<TerminalWidget, TerminalMediaSession>;

/// Read-only view over every list the controller can navigate
pub struct Lists<'a, S: KeyValueStore> {
    search: &'a [Track],
    store: &'a CollectionStore<S>,
    related: &'a [Track],
}

impl<S: KeyValueStore> TrackLists for Lists<'_, S> {
    fn search_results(&self) -> &[Track] {
        self.search
    }

    fn collection(&self, name: &str) -> Option<&[Track]> {
        self.store.tracks(name)
    }

    fn related_items(&self) -> &[Track] {
        self.related
    }
}

fn lists<'a, A: VideoSearchApi, S: KeyValueStore>(
    session: &'a SearchSession<A>,
    store: &'a CollectionStore<S>,
    related: &'a RelatedItems,
) -> Lists<'a, S> {
    Lists {
        search: session.results(),
        store,
        related: related.tracks(),
    }
}

/// Channels the shell loop listens on besides user input
pub struct Feeds {
    /// Finished related-items fetches
    pub related: mpsc::UnboundedReceiver<RelatedResponse>,
    /// Recovery tickets whose delay elapsed
    pub recovery: mpsc::UnboundedReceiver<RecoveryTicket>,
}

/// Search session, collections, related feed, and playback in one place
///
/// Track positions given to commands are 1-based indexes into the list being
/// browsed, which is also the list playback navigates after `play`.
pub struct AppState<A: VideoSearchApi + 'static, S: KeyValueStore> {
    session: SearchSession<A>,
    suggestions: SuggestionFeed<A>,
    store: CollectionStore<S>,
    related: RelatedItems,
    fetcher: RelatedItemsFetcher<A>,
    recovery: RecoveryTimer,
    controller: Controller,
    browsing: ActiveListKind,
}

impl<A: VideoSearchApi + 'static, S: KeyValueStore> AppState<A, S> {
    /// Create the state and the channels it feeds
    pub fn new(
        api: Arc<A>,
        store: CollectionStore<S>,
        controller_config: ControllerConfig,
        related_max_results: u32,
        suggest: &SuggestSettings,
    ) -> (Self, Feeds) {
        let (fetcher, related) = RelatedItemsFetcher::new(Arc::clone(&api), related_max_results);
        let (recovery, recovery_rx) = RecoveryTimer::new();
        let controller = PlaybackController::new(
            TerminalWidget::default(),
            TerminalMediaSession::default(),
            controller_config,
        );

        let suggestions = SuggestionFeed::with_settings(
            Arc::clone(&api),
            Duration::from_millis(suggest.debounce_ms),
            suggest.min_chars,
        );

        let state = Self {
            session: SearchSession::new(api).with_min_suggest_chars(suggest.min_chars),
            suggestions,
            store,
            related: RelatedItems::new(),
            fetcher,
            recovery,
            controller,
            browsing: ActiveListKind::SearchResults,
        };
        let feeds = Feeds {
            related,
            recovery: recovery_rx,
        };
        (state, feeds)
    }

    // ===== Search =====

    /// Search and browse the results
    pub async fn search(&mut self, query: &str) -> Result<&[Track]> {
        self.session.search(query).await?;
        self.browsing = ActiveListKind::SearchResults;
        Ok(self.session.results())
    }

    /// Suggestions for partial input, after the debounce window
    pub async fn suggest(&mut self, partial: &str) -> Vec<String> {
        self.suggestions.input(partial).await;
        self.suggestions.settle().await;
        self.suggestions.suggestions().await
    }

    // ===== Browsing =====

    /// Switch the browsed list
    pub fn browse(&mut self, list: ActiveListKind) -> Result<()> {
        if let ActiveListKind::Collection(name) = &list {
            if self.store.collection(name).is_none() {
                return Err(CliError::InvalidCommand(format!(
                    "Unknown collection '{name}'"
                )));
            }
        }
        self.browsing = list;
        Ok(())
    }

    /// List being browsed
    pub fn browsing(&self) -> &ActiveListKind {
        &self.browsing
    }

    /// Tracks of the browsed list
    pub fn browsing_tracks(&self) -> &[Track] {
        resolve_active_list(&self.browsing, self)
    }

    fn track_at(&self, position: usize) -> Result<Track> {
        position
            .checked_sub(1)
            .and_then(|idx| self.browsing_tracks().get(idx))
            .cloned()
            .ok_or(CliError::NoSuchTrack(position))
    }

    // ===== Playback =====

    /// Play the track at `position` of the browsed list
    pub fn play(&mut self, position: usize) -> Result<Track> {
        let track = self.track_at(position)?;
        self.controller.play_from(self.browsing.clone(), track.clone());
        // The terminal widget is ready as soon as it is loaded
        self.controller.on_widget_ready();
        self.sync();
        Ok(track)
    }

    pub fn toggle_pause(&mut self) -> Result<bool> {
        if self.controller.current_track().is_none() {
            return Err(CliError::NothingPlaying);
        }
        self.controller.toggle_pause();
        self.sync();
        Ok(self.controller.is_playing())
    }

    pub fn next(&mut self) -> Navigation {
        let lists = lists(&self.session, &self.store, &self.related);
        let navigation = self.controller.next(&lists);
        self.controller.on_widget_ready();
        self.sync();
        navigation
    }

    pub fn prev(&mut self) -> Navigation {
        let lists = lists(&self.session, &self.store, &self.related);
        let navigation = self.controller.prev(&lists);
        self.controller.on_widget_ready();
        self.sync();
        navigation
    }

    pub fn stop(&mut self) {
        self.controller.stop();
        self.recovery.cancel();
        self.sync();
    }

    /// The widget paused without the user asking
    ///
    /// Returns whether a recovery attempt was scheduled.
    pub fn widget_paused(&mut self) -> bool {
        let ticket = self.controller.on_external_pause_signal();
        if let Some(ticket) = ticket {
            self.recovery.schedule(ticket);
        }
        self.sync();
        ticket.is_some()
    }

    /// A recovery ticket's delay elapsed; returns whether play was re-asserted
    pub fn recovery_due(&mut self, ticket: RecoveryTicket) -> bool {
        let resumed = self.controller.on_recovery_due(ticket);
        self.sync();
        resumed
    }

    /// Snapshot of playback
    pub fn status(&self) -> PlaybackStatus {
        self.controller.status()
    }

    /// Lyrics search link for the current track
    pub fn lyrics_url(&self) -> Result<String> {
        self.controller
            .current_track()
            .map(|t| lyrics_search_url(t.title()))
            .ok_or(CliError::NothingPlaying)
    }

    // ===== Collections =====

    /// Toggle favorite membership of the track at `position`
    pub fn like(&mut self, position: usize) -> Result<bool> {
        let track = self.track_at(position)?;
        Ok(self.store.toggle_favorite(&track)?)
    }

    /// Toggle favorite membership of the current track
    pub fn like_current(&mut self) -> Result<bool> {
        let track = self
            .controller
            .current_track()
            .cloned()
            .ok_or(CliError::NothingPlaying)?;
        Ok(self.store.toggle_favorite(&track)?)
    }

    pub fn add(&mut self, position: usize, collection: &str) -> Result<bool> {
        let track = self.track_at(position)?;
        Ok(self.store.add_track(collection, track)?)
    }

    pub fn remove(&mut self, position: usize, collection: &str) -> Result<bool> {
        let track = self.track_at(position)?;
        Ok(self.store.remove_track(collection, track.id())?)
    }

    pub fn create(&mut self, name: &str) -> Result<()> {
        Ok(self.store.create_collection(name)?)
    }

    pub fn collection_names(&self) -> Vec<&str> {
        self.store.list_collection_names()
    }

    // ===== Related items =====

    /// Apply a finished related-items fetch
    pub fn apply_related(&mut self, response: RelatedResponse) -> RelatedOutcome {
        let current = self.controller.current_track().map(Track::id);
        self.related
            .complete(&response.request, response.result, current)
    }

    /// Drain controller events, refreshing related items on track change
    ///
    /// Must run within a tokio runtime.
    pub fn sync(&mut self) -> Vec<PlaybackEvent> {
        let events = self.controller.drain_events();
        for event in &events {
            if let PlaybackEvent::TrackChanged { track_id, .. } = event {
                debug!(track_id = %track_id, "Refreshing related items");
                let request = self.related.begin(track_id.clone());
                self.fetcher.refresh_for(request);
            }
        }
        events
    }

    // ===== Accessors =====

    pub fn session(&self) -> &SearchSession<A> {
        &self.session
    }

    pub fn store(&self) -> &CollectionStore<S> {
        &self.store
    }

    pub fn related(&self) -> &RelatedItems {
        &self.related
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }
}

impl<A: VideoSearchApi + 'static, S: KeyValueStore> TrackLists for AppState<A, S> {
    fn search_results(&self) -> &[Track] {
        self.session.results()
    }

    fn collection(&self, name: &str) -> Option<&[Track]> {
        self.store.tracks(name)
    }

    fn related_items(&self) -> &[Track] {
        self.related.tracks()
    }
}
