//! Store handle - the single shared connection to the destination database
//!
//! A [`StoreHandle`] is built once at startup and passed to whoever needs the
//! store. The connection behind it is opened lazily on the first
//! [`StoreHandle::acquire`], reused by every later call, and torn down by
//! [`StoreHandle::release`].

use std::path::{Path, PathBuf};
use std::time::Duration;
use rusqlite::Connection;
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};
use crate::{Error, Result};
use super::schema;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the database lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// A database file, created (with its parent directories) if missing
    File(PathBuf),
    /// A private in-memory database. Its contents do not survive `release()`.
    Memory,
}

impl StoreLocation {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        StoreLocation::File(path.into())
    }

    /// Path used in logs and errors
    pub fn display_path(&self) -> PathBuf {
        match self {
            StoreLocation::File(path) => path.clone(),
            StoreLocation::Memory => PathBuf::from(":memory:"),
        }
    }
}

/// Borrowed access to the open connection for the duration of one operation
pub type StoreGuard<'a> = MappedMutexGuard<'a, Connection>;

/// Owner of the one database connection
pub struct StoreHandle {
    location: StoreLocation,
    conn: Mutex<Option<Connection>>,
}

impl StoreHandle {
    /// Create a handle. Nothing is opened until the first `acquire()`.
    pub fn new(location: StoreLocation) -> Self {
        Self {
            location,
            conn: Mutex::new(None),
        }
    }

    /// Handle backed by an in-memory database (for testing)
    pub fn in_memory() -> Self {
        Self::new(StoreLocation::Memory)
    }

    /// Get the shared connection, opening it on first use.
    ///
    /// Callers are serialized: the guard must be dropped before anyone else
    /// can acquire. A failed open is returned as [`Error::Open`] and leaves
    /// the handle closed, so the next call tries again.
    pub async fn acquire(&self) -> Result<StoreGuard<'_>> {
        let mut slot = self.conn.lock().await;

        let conn = match slot.take() {
            Some(conn) => conn,
            None => self.open().map_err(|source| {
                tracing::error!(path = %self.location.display_path().display(), error = %source, "failed to open destination store");
                Error::Open {
                    path: self.location.display_path(),
                    source: Box::new(source),
                }
            })?,
        };

        Ok(MutexGuard::map(slot, |slot| slot.insert(conn)))
    }

    /// Close the cached connection, if any. Closing twice is a no-op.
    ///
    /// When the engine refuses to close, the connection stays cached and the
    /// error is returned.
    pub async fn release(&self) -> Result<()> {
        let mut slot = self.conn.lock().await;

        let Some(conn) = slot.take() else {
            return Ok(());
        };

        match conn.close() {
            Ok(()) => {
                tracing::info!(path = %self.location.display_path().display(), "closed destination store");
                Ok(())
            }
            Err((conn, e)) => {
                tracing::warn!(error = %e, "failed to close destination store");
                *slot = Some(conn);
                Err(e.into())
            }
        }
    }

    /// Whether a connection is currently cached
    pub async fn is_open(&self) -> bool {
        self.conn.lock().await.is_some()
    }

    fn open(&self) -> Result<Connection> {
        let conn = match &self.location {
            StoreLocation::File(path) => {
                ensure_parent_dir(path)?;
                Connection::open(path)?
            }
            StoreLocation::Memory => Connection::open_in_memory()?,
        };

        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update(None, "foreign_keys", true)?;
        schema::initialize(&conn)?;

        tracing::info!(path = %self.location.display_path().display(), "opened destination store");
        Ok(conn)
    }
}

impl std::fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHandle")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
