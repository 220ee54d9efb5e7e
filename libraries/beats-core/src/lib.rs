//! Beats Core
//!
//! Platform-agnostic core types, traits, and error handling for Beats.
//!
//! This crate provides the foundational building blocks shared by the
//! storage, playback, and search-client libraries.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackId`, `Collection`
//! - **Core Traits**: `KeyValueStore` (durable local storage)
//! - **Error Handling**: Unified `BeatsError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use beats_core::types::{Collection, Track};
//!
//! let track = Track::new("dQw4w9WgXcQ", "Some Song", "https://i.ytimg.com/vi/dQw4w9WgXcQ/mqdefault.jpg")?;
//!
//! let mut road_trip = Collection::new("Road Trip");
//! assert!(road_trip.push(track.clone()));
//! assert!(!road_trip.push(track));
//! assert_eq!(road_trip.len(), 1);
//! # Ok::<(), beats_core::BeatsError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod storage;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{BeatsError, Result};
pub use storage::{FileKeyValueStore, MemoryKeyValueStore};
pub use traits::KeyValueStore;
pub use types::{Collection, Track, TrackId};
