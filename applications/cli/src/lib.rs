//! Beats CLI Library
//!
//! Terminal front-end for Beats: configuration, host adapters, application
//! state, and the interactive shell.
//!
//! This library exposes the core components for testing purposes.

pub mod config;
pub mod error;
pub mod host;
pub mod shell;
pub mod state;

// Re-export commonly used types for convenience
pub use config::BeatsConfig;
pub use error::{CliError, Result};
pub use host::{TerminalMediaSession, TerminalWidget};
pub use shell::Command;
pub use state::{AppState, Feeds};
