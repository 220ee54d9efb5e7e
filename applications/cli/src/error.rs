/// Application error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("No track at position {0}")]
    NoSuchTrack(usize),

    #[error("Nothing is playing")]
    NothingPlaying,

    #[error(transparent)]
    Storage(#[from] beats_storage::StorageError),

    #[error(transparent)]
    Search(#[from] beats_search_client::SearchClientError),

    #[error(transparent)]
    Core(#[from] beats_core::BeatsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}
