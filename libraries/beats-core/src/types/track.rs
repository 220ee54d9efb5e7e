/// Track domain type
use crate::error::{BeatsError, Result};
use crate::types::TrackId;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Title used when an API record carries none
pub const UNTITLED: &str = "Untitled";

/// One playable item
///
/// Immutable once constructed. Equality and hashing consider the `id` only:
/// the same video fetched from different endpoints may carry a different
/// title or thumbnail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TrackRecord")]
pub struct Track {
    id: TrackId,
    title: String,
    artwork_url: String,
}

/// Wire form of a track, validated into [`Track`] on deserialization.
///
/// Accepts the legacy `img` field name for the artwork URL.
#[derive(Deserialize)]
struct TrackRecord {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, alias = "img")]
    artwork_url: Option<String>,
}

impl TryFrom<TrackRecord> for Track {
    type Error = BeatsError;

    fn try_from(record: TrackRecord) -> Result<Self> {
        Track::from_parts(
            record.id,
            record.title.unwrap_or_default(),
            record.artwork_url.unwrap_or_default(),
        )
    }
}

impl Track {
    /// Create a track
    ///
    /// # Errors
    /// Returns `InvalidTrack` if `id` is blank
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artwork_url: impl Into<String>,
    ) -> Result<Self> {
        Self::from_parts(id.into(), title.into(), artwork_url.into())
    }

    /// Build a track from possibly incomplete API fields
    ///
    /// A missing id is rejected; a missing title becomes [`UNTITLED`] and a
    /// missing artwork URL becomes empty.
    pub fn from_api(
        id: Option<&str>,
        title: Option<&str>,
        artwork_url: Option<&str>,
    ) -> Result<Self> {
        let id = id.ok_or_else(|| BeatsError::InvalidTrack("missing id".to_string()))?;
        Self::from_parts(
            id.to_string(),
            title.unwrap_or_default().to_string(),
            artwork_url.unwrap_or_default().to_string(),
        )
    }

    fn from_parts(id: String, title: String, artwork_url: String) -> Result<Self> {
        let id = id.trim();
        if id.is_empty() {
            return Err(BeatsError::InvalidTrack("blank id".to_string()));
        }

        let title = title.trim();
        let title = if title.is_empty() { UNTITLED } else { title };

        Ok(Self {
            id: TrackId::new(id),
            title: title.to_string(),
            artwork_url: artwork_url.trim().to_string(),
        })
    }

    /// Track identifier
    pub fn id(&self) -> &TrackId {
        &self.id
    }

    /// Display title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Artwork (thumbnail) URL, possibly empty
    pub fn artwork_url(&self) -> &str {
        &self.artwork_url
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Track {}

impl Hash for Track {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
