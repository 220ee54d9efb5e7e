/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// A collection with this exact name already exists
    #[error("Collection already exists: {0}")]
    DuplicateName(String),

    /// Collection names must contain a non-whitespace character
    #[error("Invalid collection name: {0:?}")]
    InvalidName(String),

    /// No collection with this name
    #[error("Collection not found: {0}")]
    UnknownCollection(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The mutation was applied in memory but could not be written through
    #[error("Failed to persist collections: {0}")]
    Persist(#[source] beats_core::BeatsError),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<StorageError> for beats_core::BeatsError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::DuplicateName(name) => beats_core::BeatsError::Duplicate(name),
            StorageError::UnknownCollection(name) => {
                beats_core::BeatsError::not_found("Collection", name)
            }
            StorageError::InvalidName(name) => {
                beats_core::BeatsError::invalid_input(format!("collection name {name:?}"))
            }
            other => beats_core::BeatsError::storage(other.to_string()),
        }
    }
}
