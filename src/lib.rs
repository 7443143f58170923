//! # Savespot - saved destinations with one-tap navigation
//!
//! Savespot keeps a small local collection of places a user wants to travel to
//! and hands them off to an external maps application for turn-by-turn
//! navigation.
//!
//! Savespot provides:
//! - An embedded SQLite destination store behind a single shared handle
//! - Create, list, partial update, delete and name search over destinations
//! - The place-selection to confirmation to save workflow
//! - Navigation URI building with a browser fallback

pub mod clock;
pub mod config;
pub mod destination;
pub mod navigation;
pub mod output;
pub mod place;
pub mod storage;
pub mod ui;
pub mod workflow;

// Re-exports for convenient access
pub use clock::{Clock, ManualClock, SystemClock};
pub use destination::{Coordinate, Destination, DestinationId, DestinationPatch, NewDestination};
pub use navigation::{Platform, UrlDispatcher};
pub use place::PlaceDetails;
pub use storage::{DestinationStore, StoreHandle, StoreLocation};
pub use workflow::{AddDestinationFlow, MapView};

use std::path::PathBuf;

/// Result type alias for Savespot operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Savespot operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The store could not be initialized. Never retried automatically.
    #[error("Failed to open destination store at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("Incompatible schema version {found} (expected {expected})")]
    IncompatibleSchema { found: i32, expected: i32 },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Invalid destination id: {0}")]
    InvalidId(String),

    /// Latitude or longitude is NaN or infinite
    #[error("Invalid {field}: {value} is not a finite number")]
    InvalidCoordinate { field: &'static str, value: f64 },

    #[error("Corrupt destination record: {0}")]
    CorruptRecord(String),

    #[error("Could not open maps application: {0}")]
    Navigation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error means the store could not be opened at all.
    pub fn is_open_error(&self) -> bool {
        matches!(self, Error::Open { .. })
    }
}
