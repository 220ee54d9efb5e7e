//! Domain types shared across Beats libraries

mod collection;
mod ids;
mod track;

pub use collection::Collection;
pub use ids::TrackId;
pub use track::{Track, UNTITLED};
