/// Collection (named playlist) domain type
use crate::types::{Track, TrackId};

/// A named, ordered list of tracks without duplicate ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    /// Collection name (unique key within a store)
    pub name: String,

    tracks: Vec<Track>,
}

impl Collection {
    /// Create an empty collection
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tracks: Vec::new(),
        }
    }

    /// Create a collection from tracks, dropping later duplicates
    pub fn with_tracks(name: impl Into<String>, tracks: impl IntoIterator<Item = Track>) -> Self {
        let mut collection = Self::new(name);
        for track in tracks {
            collection.push(track);
        }
        collection
    }

    /// Tracks in insertion order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Check whether a track id is present
    pub fn contains(&self, id: &TrackId) -> bool {
        self.tracks.iter().any(|t| t.id() == id)
    }

    /// Position of a track id
    pub fn position(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id() == id)
    }

    /// Append a track unless its id is already present
    ///
    /// Returns `true` if the track was appended
    pub fn push(&mut self, track: Track) -> bool {
        if self.contains(track.id()) {
            return false;
        }
        self.tracks.push(track);
        true
    }

    /// Remove a track by id
    ///
    /// Returns the removed track, if it was present
    pub fn remove(&mut self, id: &TrackId) -> Option<Track> {
        self.position(id).map(|pos| self.tracks.remove(pos))
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if collection has no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str) -> Track {
        Track::new(id, format!("Track {id}"), "").unwrap()
    }

    #[test]
    fn push_deduplicates_by_id() {
        let mut collection = Collection::new("Road Trip");
        assert!(collection.push(track("a")));
        assert!(!collection.push(Track::new("a", "Other title", "").unwrap()));
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.tracks()[0].title(), "Track a");
    }

    #[test]
    fn remove_preserves_order() {
        let mut collection = Collection::with_tracks("c", [track("a"), track("b"), track("c")]);
        assert!(collection.remove(&TrackId::new("b")).is_some());
        assert!(collection.remove(&TrackId::new("b")).is_none());

        let ids: Vec<&str> = collection.tracks().iter().map(|t| t.id().as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn with_tracks_drops_duplicates() {
        let collection = Collection::with_tracks("c", [track("a"), track("a"), track("b")]);
        assert_eq!(collection.len(), 2);
    }
}
