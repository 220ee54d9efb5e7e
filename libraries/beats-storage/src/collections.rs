//! Collection store
//!
//! Owns the named collections and writes the whole store through to a
//! [`KeyValueStore`] after every mutation.

use crate::error::{Result, StorageError};
use crate::snapshot::{deserialize_collections, serialize_collections};
use beats_core::{Collection, KeyValueStore, Track, TrackId};
use tracing::{debug, info, warn};

/// Reserved name of the favorites collection
pub const FAVORITES: &str = "Favorites";

/// Favorites name used by earlier releases, folded into [`FAVORITES`] on load
pub const LEGACY_FAVORITES: &str = "המועדפים שלי";

/// Key under which the serialized store lives
pub const STORAGE_KEY: &str = "beats_playlists";

/// Named collections with write-through persistence
///
/// Invariants:
/// - names are unique (exact, case-sensitive match)
/// - the favorites collection exists and is listed first
/// - no collection holds two tracks with the same id
///
/// The store is the only writer of [`STORAGE_KEY`].
pub struct CollectionStore<S: KeyValueStore> {
    backend: S,
    collections: Vec<Collection>,
}

impl<S: KeyValueStore> CollectionStore<S> {
    /// Load the store from `backend`
    ///
    /// Missing or unreadable data falls back to the default state (an empty
    /// favorites collection). This never fails.
    pub fn load(backend: S) -> Self {
        let collections = match backend.get(STORAGE_KEY) {
            Ok(Some(json)) => match deserialize_collections(&json) {
                Ok(collections) => collections,
                Err(e) => {
                    warn!(error = %e, "Stored collections unreadable, starting fresh");
                    Vec::new()
                }
            },
            Ok(None) => {
                debug!("No stored collections, starting fresh");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Failed to read stored collections, starting fresh");
                Vec::new()
            }
        };

        let mut store = Self {
            backend,
            collections,
        };
        store.adopt_legacy_favorites();
        store.ensure_favorites();

        info!(collections = store.collections.len(), "Collection store loaded");
        store
    }

    fn adopt_legacy_favorites(&mut self) {
        let Some(pos) = self.collections.iter().position(|c| c.name == LEGACY_FAVORITES) else {
            return;
        };
        let legacy = self.collections.remove(pos);

        match self.collections.iter().position(|c| c.name == FAVORITES) {
            Some(idx) => {
                for track in legacy.tracks().iter().cloned() {
                    self.collections[idx].push(track);
                }
            }
            None => {
                let tracks = legacy.tracks().iter().cloned();
                self.collections.insert(pos, Collection::with_tracks(FAVORITES, tracks));
            }
        }
        info!(tracks = legacy.len(), "Migrated legacy favorites");
    }

    fn ensure_favorites(&mut self) {
        match self.collections.iter().position(|c| c.name == FAVORITES) {
            Some(0) => {}
            Some(pos) => {
                let favorites = self.collections.remove(pos);
                self.collections.insert(0, favorites);
            }
            None => self.collections.insert(0, Collection::new(FAVORITES)),
        }
    }

    fn persist(&mut self) -> Result<()> {
        let json = serialize_collections(&self.collections)?;
        self.backend.set(STORAGE_KEY, &json).map_err(|e| {
            warn!(error = %e, "Failed to persist collections");
            StorageError::Persist(e)
        })
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut Collection> {
        self.collections.iter_mut().find(|c| c.name == name)
    }

    fn favorites_mut(&mut self) -> &mut Collection {
        self.ensure_favorites();
        &mut self.collections[0]
    }

    /// Create an empty collection
    ///
    /// # Errors
    /// - `InvalidName` if `name` is blank
    /// - `DuplicateName` if a collection with this exact name exists
    ///   (the favorites name is always taken)
    pub fn create_collection(&mut self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        if self.collection(name).is_some() {
            return Err(StorageError::DuplicateName(name.to_string()));
        }

        self.collections.push(Collection::new(name));
        info!(collection = %name, "Created collection");
        self.persist()
    }

    /// Append a track to a collection
    ///
    /// Returns `Ok(false)` without writing if the track id is already present.
    ///
    /// # Errors
    /// `UnknownCollection` if no collection has this name
    pub fn add_track(&mut self, collection_name: &str, track: Track) -> Result<bool> {
        let collection = self
            .find_mut(collection_name)
            .ok_or_else(|| StorageError::UnknownCollection(collection_name.to_string()))?;

        let track_id = track.id().clone();
        if !collection.push(track) {
            debug!(collection = %collection_name, track_id = %track_id, "Track already present");
            return Ok(false);
        }

        debug!(collection = %collection_name, track_id = %track_id, "Added track");
        self.persist()?;
        Ok(true)
    }

    /// Remove a track from a collection
    ///
    /// Returns `Ok(false)` without writing if the collection or the track is absent.
    pub fn remove_track(&mut self, collection_name: &str, track_id: &TrackId) -> Result<bool> {
        let Some(collection) = self.find_mut(collection_name) else {
            return Ok(false);
        };
        if collection.remove(track_id).is_none() {
            return Ok(false);
        }

        debug!(collection = %collection_name, track_id = %track_id, "Removed track");
        self.persist()?;
        Ok(true)
    }

    /// Add the track to favorites if absent, remove it if present
    ///
    /// Returns whether the track is a favorite afterwards. The only error is a
    /// failed write-through; the toggle itself always applies.
    pub fn toggle_favorite(&mut self, track: &Track) -> Result<bool> {
        let favorites = self.favorites_mut();
        let now_favorite = if favorites.remove(track.id()).is_some() {
            false
        } else {
            favorites.push(track.clone());
            true
        };

        debug!(track_id = %track.id(), favorite = now_favorite, "Toggled favorite");
        self.persist()?;
        Ok(now_favorite)
    }

    /// Check whether a track is in favorites
    pub fn is_favorite(&self, track_id: &TrackId) -> bool {
        self.favorites().contains(track_id)
    }

    /// The favorites collection
    pub fn favorites(&self) -> &Collection {
        &self.collections[0]
    }

    /// Look up a collection by exact name
    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.name == name)
    }

    /// Tracks of a collection, if it exists
    pub fn tracks(&self, name: &str) -> Option<&[Track]> {
        self.collection(name).map(Collection::tracks)
    }

    /// Collection names in creation order, favorites first
    pub fn list_collection_names(&self) -> Vec<&str> {
        self.collections.iter().map(|c| c.name.as_str()).collect()
    }

    /// All collections in listing order
    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    /// Borrow the storage backend
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Consume the store, returning its backend
    pub fn into_backend(self) -> S {
        self.backend
    }
}
