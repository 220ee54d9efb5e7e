//! Property-based tests for the collection store
//!
//! Uses proptest to verify store invariants across random operation sequences.

use beats_core::{Collection, MemoryKeyValueStore, Track, TrackId};
use beats_storage::{
    deserialize_collections, serialize_collections, CollectionStore, FAVORITES,
};
use proptest::prelude::*;
use std::collections::HashSet;

// ===== Helpers =====

fn arbitrary_track() -> impl Strategy<Value = Track> {
    ("[a-z0-9]{1,6}", "[A-Za-z ]{0,20}", "(https://img/[a-z]{1,5}\\.jpg)?")
        .prop_map(|(id, title, art)| Track::new(id, title, art).unwrap())
}

fn arbitrary_collection() -> impl Strategy<Value = Collection> {
    ("[A-Za-z ]{1,12}", prop::collection::vec(arbitrary_track(), 0..20))
        .prop_map(|(name, tracks)| Collection::with_tracks(name, tracks))
}

fn arbitrary_collections() -> impl Strategy<Value = Vec<Collection>> {
    prop::collection::vec(arbitrary_collection(), 0..8).prop_map(|collections| {
        let mut seen = HashSet::new();
        collections
            .into_iter()
            .filter(|c| seen.insert(c.name.clone()))
            .collect()
    })
}

type TrackFields = (String, String, String);

/// Every stored field, since `Track` equality looks at the id only
fn fields(collections: &[Collection]) -> Vec<(String, Vec<TrackFields>)> {
    collections
        .iter()
        .map(|c| {
            let tracks = c
                .tracks()
                .iter()
                .map(|t| {
                    (
                        t.id().as_str().to_string(),
                        t.title().to_string(),
                        t.artwork_url().to_string(),
                    )
                })
                .collect();
            (c.name.clone(), tracks)
        })
        .collect()
}

#[derive(Debug, Clone)]
enum Op {
    Create(String),
    Add(usize, Track),
    Remove(usize, String),
    Toggle(Track),
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[A-C]{1,2}".prop_map(Op::Create),
        (0usize..4, arbitrary_track()).prop_map(|(i, t)| Op::Add(i, t)),
        (0usize..4, "[a-z0-9]{1,6}").prop_map(|(i, id)| Op::Remove(i, id)),
        arbitrary_track().prop_map(Op::Toggle),
    ]
}

// ===== Property Tests =====

proptest! {
    /// Property: serialize then deserialize yields the same collections
    #[test]
    fn snapshot_roundtrip(collections in arbitrary_collections()) {
        let json = serialize_collections(&collections).unwrap();
        let loaded = deserialize_collections(&json).unwrap();
        prop_assert_eq!(fields(&loaded), fields(&collections));
    }

    /// Property: adding the same track twice keeps exactly one copy
    #[test]
    fn add_twice_keeps_one(track in arbitrary_track()) {
        let mut store = CollectionStore::load(MemoryKeyValueStore::new());
        store.create_collection("Mix").unwrap();
        store.add_track("Mix", track.clone()).unwrap();
        store.add_track("Mix", track.clone()).unwrap();

        let copies = store.tracks("Mix").unwrap().iter().filter(|t| *t == &track).count();
        prop_assert_eq!(copies, 1);
    }

    /// Property: toggling a favorite twice is an involution
    #[test]
    fn toggle_favorite_is_involution(
        seed in prop::collection::vec(arbitrary_track(), 0..10),
        track in arbitrary_track()
    ) {
        let mut store = CollectionStore::load(MemoryKeyValueStore::new());
        for t in &seed {
            store.toggle_favorite(t).unwrap();
        }
        let before = store.favorites().clone();

        store.toggle_favorite(&track).unwrap();
        store.toggle_favorite(&track).unwrap();

        prop_assert_eq!(
            store.is_favorite(track.id()),
            before.contains(track.id())
        );
    }

    /// Property: invariants hold after any operation sequence, and a reload
    /// reproduces the in-memory state exactly
    #[test]
    fn invariants_hold_and_reload_matches(
        ops in prop::collection::vec(arbitrary_op(), 0..40)
    ) {
        let mut store = CollectionStore::load(MemoryKeyValueStore::new());

        for op in ops {
            let names: Vec<String> = store
                .list_collection_names()
                .into_iter()
                .map(str::to_string)
                .collect();
            match op {
                Op::Create(name) => { let _ = store.create_collection(&name); }
                Op::Add(i, track) => {
                    let name = &names[i % names.len()];
                    store.add_track(name, track).unwrap();
                }
                Op::Remove(i, id) => {
                    let name = &names[i % names.len()];
                    store.remove_track(name, &TrackId::new(id)).unwrap();
                }
                Op::Toggle(track) => { store.toggle_favorite(&track).unwrap(); }
            }
        }

        let names = store.list_collection_names();
        prop_assert_eq!(names[0], FAVORITES);
        let unique: HashSet<&str> = names.iter().copied().collect();
        prop_assert_eq!(unique.len(), names.len());

        for collection in store.collections() {
            let ids: HashSet<&TrackId> = collection.tracks().iter().map(Track::id).collect();
            prop_assert_eq!(ids.len(), collection.len());
        }

        let snapshot = store.collections().to_vec();
        let reloaded = CollectionStore::load(store.into_backend());
        prop_assert_eq!(fields(reloaded.collections()), fields(&snapshot));
    }
}
