//! Database schema definitions

use rusqlite::Connection;
use crate::{Error, Result};

/// The one schema version this build reads and writes
pub const SCHEMA_VERSION: i32 = 1;

/// SQL to create the destinations table
pub const CREATE_DESTINATIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS destinations (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    address TEXT NOT NULL,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    created_at INTEGER NOT NULL
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_destinations_created ON destinations(created_at DESC)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_DESTINATIONS_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}

/// Read the schema version stamped on the database
pub fn schema_version(conn: &Connection) -> Result<i32> {
    let version = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(version)
}

/// Bring a fresh database to [`SCHEMA_VERSION`], or check an existing one.
///
/// Version 0 means nothing was stamped yet. Any other version than ours is
/// refused; there is no migration path.
pub fn initialize(conn: &Connection) -> Result<()> {
    let found = schema_version(conn)?;

    match found {
        0 => {
            let tx = conn.unchecked_transaction()?;
            for stmt in all_schema_statements() {
                tx.execute(stmt, [])?;
            }
            tx.execute_batch(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))?;
            tx.commit()?;
            tracing::debug!(version = SCHEMA_VERSION, "created destination schema");
            Ok(())
        }
        SCHEMA_VERSION => Ok(()),
        found => Err(Error::IncompatibleSchema {
            found,
            expected: SCHEMA_VERSION,
        }),
    }
}
