//! Queue resolution
//!
//! Maps the active list kind onto the ordered tracks used for next/previous.
//! Resolution is re-run on every navigation so that edits to the underlying
//! lists (a track unliked or removed while playing) are visible immediately.

use crate::types::ActiveListKind;
use beats_core::{Track, TrackId};

/// Read access to every list the controller may navigate
pub trait TrackLists {
    /// Current search result set
    fn search_results(&self) -> &[Track];

    /// Tracks of a named collection, `None` if it does not exist
    fn collection(&self, name: &str) -> Option<&[Track]>;

    /// Related-items continuation feed
    fn related_items(&self) -> &[Track];
}

/// Resolve the ordered list selected by `kind`
///
/// An unknown collection resolves to an empty list.
pub fn resolve_active_list<'a, L: TrackLists + ?Sized>(
    kind: &ActiveListKind,
    lists: &'a L,
) -> &'a [Track] {
    match kind {
        ActiveListKind::SearchResults => lists.search_results(),
        ActiveListKind::Collection(name) => lists.collection(name).unwrap_or(&[]),
        ActiveListKind::RelatedItems => lists.related_items(),
    }
}

/// Index of a track id in a list
pub fn position_of(list: &[Track], id: &TrackId) -> Option<usize> {
    list.iter().position(|t| t.id() == id)
}
