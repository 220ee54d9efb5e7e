//! Whole-store serialization
//!
//! The persisted form is one JSON object mapping collection name to its
//! ordered track list. Object order is the collection creation order.

use crate::error::Result;
use beats_core::{Collection, Track};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use tracing::warn;

struct StoredCollections<'a>(&'a [Collection]);

impl Serialize for StoredCollections<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for collection in self.0 {
            map.serialize_entry(&collection.name, collection.tracks())?;
        }
        map.end()
    }
}

struct LoadedCollections(Vec<Collection>);

impl<'de> Deserialize<'de> for LoadedCollections {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(CollectionsVisitor)
    }
}

struct CollectionsVisitor;

impl<'de> Visitor<'de> for CollectionsVisitor {
    type Value = LoadedCollections;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of collection name to track list")
    }

    fn visit_map<A: MapAccess<'de>>(
        self,
        mut access: A,
    ) -> std::result::Result<Self::Value, A::Error> {
        let mut collections: Vec<Collection> = Vec::new();

        while let Some((name, entries)) = access.next_entry::<String, Vec<serde_json::Value>>()? {
            let mut tracks = Vec::with_capacity(entries.len());
            for entry in entries {
                match serde_json::from_value::<Track>(entry) {
                    Ok(track) => tracks.push(track),
                    Err(e) => {
                        warn!(collection = %name, error = %e, "Skipping malformed stored track");
                    }
                }
            }

            let collection = Collection::with_tracks(name, tracks);
            match collections.iter_mut().find(|c| c.name == collection.name) {
                Some(existing) => *existing = collection,
                None => collections.push(collection),
            }
        }

        Ok(LoadedCollections(collections))
    }
}

/// Serialize collections to the persisted JSON form
pub fn serialize_collections(collections: &[Collection]) -> Result<String> {
    Ok(serde_json::to_string(&StoredCollections(collections))?)
}

/// Deserialize collections from the persisted JSON form
///
/// Malformed individual tracks are skipped; a malformed document is an error.
pub fn deserialize_collections(json: &str) -> Result<Vec<Collection>> {
    let loaded: LoadedCollections = serde_json::from_str(json)?;
    Ok(loaded.0)
}
