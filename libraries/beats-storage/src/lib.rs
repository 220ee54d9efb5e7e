//! Beats Storage
//!
//! Named collections (playlists) persisted to durable local storage.
//!
//! The store always contains the reserved favorites collection. Every
//! mutation is written through to the backing [`KeyValueStore`] before the
//! call returns, so a reload right after a mutation never loses it.
//!
//! # Example
//!
//! ```rust
//! use beats_core::{MemoryKeyValueStore, Track};
//! use beats_storage::{CollectionStore, FAVORITES};
//!
//! let mut store = CollectionStore::load(MemoryKeyValueStore::new());
//! store.create_collection("Road Trip")?;
//!
//! let track = Track::new("v1", "Song", "").unwrap();
//! store.add_track("Road Trip", track.clone())?;
//! assert!(store.toggle_favorite(&track)?);
//!
//! assert_eq!(store.list_collection_names(), vec![FAVORITES, "Road Trip"]);
//! # Ok::<(), beats_storage::StorageError>(())
//! ```
//!
//! [`KeyValueStore`]: beats_core::KeyValueStore

mod collections;
mod error;
mod snapshot;

pub use collections::{CollectionStore, FAVORITES, LEGACY_FAVORITES, STORAGE_KEY};
pub use error::{Result, StorageError};
pub use snapshot::{deserialize_collections, serialize_collections};
