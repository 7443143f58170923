//! Storage Layer - SQLite-backed persistence
//!
//! One table, `destinations(id, name, address, latitude, longitude, created_at)`,
//! stamped with schema version 1. The connection is owned by a single
//! [`StoreHandle`]; [`DestinationStore`] borrows it per operation.

pub mod destinations;
pub mod handle;
pub mod schema;

pub use destinations::DestinationStore;
pub use handle::{StoreGuard, StoreHandle, StoreLocation};
