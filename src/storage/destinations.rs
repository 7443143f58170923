//! Destination record store
//!
//! Create, list, update, delete and search over destinations. Every call
//! borrows the shared connection from the [`StoreHandle`] for its duration and
//! never closes it. Each mutation runs inside one SQLite transaction.

use std::sync::Arc;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, TransactionBehavior};
use crate::clock::{Clock, SystemClock};
use crate::destination::{Destination, DestinationId, DestinationPatch, NewDestination};
use crate::{Error, Result};
use super::handle::StoreHandle;

const SELECT_COLUMNS: &str =
    "SELECT id, name, address, latitude, longitude, created_at FROM destinations";

/// Destination CRUD and search on top of a shared [`StoreHandle`]
pub struct DestinationStore {
    handle: Arc<StoreHandle>,
    clock: Arc<dyn Clock>,
}

impl DestinationStore {
    /// Store stamping records with the system clock
    pub fn new(handle: Arc<StoreHandle>) -> Self {
        Self::with_clock(handle, Arc::new(SystemClock))
    }

    pub fn with_clock(handle: Arc<StoreHandle>, clock: Arc<dyn Clock>) -> Self {
        Self { handle, clock }
    }

    // ========== Writes ==========

    /// Persist a new destination and return it with its generated id and
    /// creation time. Duplicate names and addresses are allowed.
    ///
    /// Non-finite coordinates are refused with [`Error::InvalidCoordinate`]
    /// before anything is written.
    pub async fn create(&self, new: NewDestination) -> Result<Destination> {
        new.validate()?;
        let mut conn = self.handle.acquire().await?;

        let destination = Destination {
            id: DestinationId::generate(),
            name: new.name,
            address: new.address,
            latitude: new.latitude,
            longitude: new.longitude,
            created_at: truncate_to_millis(self.clock.now())?,
        };

        let tx = conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO destinations (id, name, address, latitude, longitude, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                destination.id.to_id_string(),
                destination.name,
                destination.address,
                destination.latitude,
                destination.longitude,
                destination.created_at.timestamp_millis(),
            ],
        )?;
        tx.commit()?;

        tracing::debug!(id = %destination.id, name = %destination.name, "created destination");
        Ok(destination)
    }

    /// Apply the supplied fields of `patch` to the destination `id`.
    ///
    /// Returns `false` without touching anything when no such destination
    /// exists; that case is not an error. A patch carrying a non-finite
    /// coordinate is refused with [`Error::InvalidCoordinate`] and nothing is
    /// written.
    pub async fn update(&self, id: &DestinationId, patch: &DestinationPatch) -> Result<bool> {
        patch.validate()?;
        let mut conn = self.handle.acquire().await?;

        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let current = tx
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                [id.to_id_string()],
                row_to_destination,
            )
            .optional()?;

        let Some(mut destination) = current else {
            tracing::warn!(%id, "update skipped: no such destination");
            return Ok(false);
        };

        if !patch.is_empty() {
            patch.apply_to(&mut destination);
            tx.execute(
                r#"
                UPDATE destinations
                SET name = ?2, address = ?3, latitude = ?4, longitude = ?5
                WHERE id = ?1
                "#,
                params![
                    destination.id.to_id_string(),
                    destination.name,
                    destination.address,
                    destination.latitude,
                    destination.longitude,
                ],
            )?;
        }
        tx.commit()?;

        tracing::debug!(%id, fields = ?patch.field_names(), "updated destination");
        Ok(true)
    }

    /// Remove the destination `id`. Returns `false` when it was not there.
    pub async fn delete(&self, id: &DestinationId) -> Result<bool> {
        let mut conn = self.handle.acquire().await?;

        let tx = conn.transaction()?;
        let removed = tx.execute("DELETE FROM destinations WHERE id = ?1", [id.to_id_string()])?;
        tx.commit()?;

        if removed == 0 {
            tracing::warn!(%id, "delete skipped: no such destination");
        } else {
            tracing::debug!(%id, "deleted destination");
        }
        Ok(removed > 0)
    }

    // ========== Reads ==========

    /// All destinations, newest first. Ties on creation time put the later
    /// insert first.
    pub async fn list_all(&self) -> Result<Vec<Destination>> {
        let conn = self.handle.acquire().await?;

        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY created_at DESC, rowid DESC",
            SELECT_COLUMNS
        ))?;
        let destinations = stmt
            .query_map([], row_to_destination)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!(count = destinations.len(), "listed destinations");
        Ok(destinations)
    }

    /// Look up one destination
    pub async fn get(&self, id: &DestinationId) -> Result<Option<Destination>> {
        let conn = self.handle.acquire().await?;
        conn.query_row(
            &format!("{} WHERE id = ?1", SELECT_COLUMNS),
            [id.to_id_string()],
            row_to_destination,
        )
        .optional()
        .map_err(Into::into)
    }

    /// Destinations whose name contains `term`, ignoring case.
    ///
    /// Only the name is searched. An empty term matches nothing. Results keep
    /// the newest-first order of [`list_all`](Self::list_all).
    pub async fn search(&self, term: &str) -> Result<Vec<Destination>> {
        let needle = term.to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let matches: Vec<Destination> = self
            .list_all()
            .await?
            .into_iter()
            .filter(|d| d.name.to_lowercase().contains(&needle))
            .collect();

        tracing::debug!(term, count = matches.len(), "searched destinations");
        Ok(matches)
    }

    /// Count all destinations
    pub async fn count(&self) -> Result<usize> {
        let conn = self.handle.acquire().await?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM destinations", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Stored timestamps have millisecond precision; trim before handing the
/// record back so it compares equal to what a later read returns.
fn truncate_to_millis(instant: DateTime<Utc>) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(instant.timestamp_millis())
        .ok_or_else(|| Error::CorruptRecord(format!("timestamp out of range: {}", instant)))
}

/// Helper to convert a row to a Destination
fn row_to_destination(row: &rusqlite::Row) -> rusqlite::Result<Destination> {
    let id_str: String = row.get(0)?;
    let created_ms: i64 = row.get(5)?;

    let id = DestinationId::parse(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let created_at = DateTime::from_timestamp_millis(created_ms).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            5,
            rusqlite::types::Type::Integer,
            Box::new(Error::CorruptRecord(format!("created_at {} out of range", created_ms))),
        )
    })?;

    Ok(Destination {
        id,
        name: row.get(1)?,
        address: row.get(2)?,
        latitude: row.get(3)?,
        longitude: row.get(4)?,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::destination::Coordinate;
    use chrono::{Duration, TimeZone};

    fn stepping_store() -> DestinationStore {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let clock = ManualClock::new(start, Duration::seconds(1));
        DestinationStore::with_clock(Arc::new(StoreHandle::in_memory()), Arc::new(clock))
    }

    fn logan() -> NewDestination {
        NewDestination::new(
            "Boston Logan International Airport",
            "East Boston, MA 02128, USA",
            42.3656,
            -71.0096,
        )
    }

    fn dollar_tree() -> NewDestination {
        NewDestination::new("Dollar Tree", "123 Main St, Boston, MA", 42.3601, -71.0589)
    }

    fn local_gym() -> NewDestination {
        NewDestination::new("Local Gym", "456 Fitness Ave, Boston, MA", 42.3505, -71.0765)
    }

    #[tokio::test]
    async fn test_create_is_immediately_visible() {
        let store = DestinationStore::new(Arc::new(StoreHandle::in_memory()));

        let created = store.create(dollar_tree()).await.unwrap();
        let all = store.list_all().await.unwrap();

        assert_eq!(all, vec![created.clone()]);
        assert_eq!(created.name, "Dollar Tree");
        assert_eq!(created.latitude, 42.3601);
    }

    #[tokio::test]
    async fn test_create_assigns_distinct_ids_for_duplicates() {
        let store = stepping_store();

        let a = store.create(local_gym()).await.unwrap();
        let b = store.create(local_gym()).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_list_empty_store() {
        let store = stepping_store();
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_is_reverse_creation_order() {
        let store = stepping_store();

        let mut created = Vec::new();
        for new in [logan(), dollar_tree(), local_gym()] {
            created.push(store.create(new).await.unwrap());
        }
        created.reverse();

        assert_eq!(store.list_all().await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_same_millisecond_ties_put_later_insert_first() {
        let instant = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let store = DestinationStore::with_clock(
            Arc::new(StoreHandle::in_memory()),
            Arc::new(ManualClock::frozen(instant)),
        );

        let first = store.create(logan()).await.unwrap();
        let second = store.create(dollar_tree()).await.unwrap();
        assert_eq!(first.created_at, second.created_at);

        let ids: Vec<_> = store.list_all().await.unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_update_changes_only_supplied_fields() {
        let store = stepping_store();
        let original = store.create(dollar_tree()).await.unwrap();

        let found = store
            .update(&original.id, &DestinationPatch::new().with_name("X"))
            .await
            .unwrap();
        assert!(found);

        let updated = store.get(&original.id).await.unwrap().unwrap();
        assert_eq!(updated.name, "X");
        assert_eq!(updated.address, original.address);
        assert_eq!(updated.latitude, original.latitude);
        assert_eq!(updated.longitude, original.longitude);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.id, original.id);
    }

    #[tokio::test]
    async fn test_update_coordinates() {
        let store = stepping_store();
        let original = store.create(local_gym()).await.unwrap();

        let patch = DestinationPatch::new().with_coordinate(Coordinate::new(40.7128, -74.006));
        store.update(&original.id, &patch).await.unwrap();

        let updated = store.get(&original.id).await.unwrap().unwrap();
        assert_eq!(updated.coordinate(), Coordinate::new(40.7128, -74.006));
        assert_eq!(updated.name, "Local Gym");
    }

    #[tokio::test]
    async fn test_empty_patch_leaves_record_alone() {
        let store = stepping_store();
        let original = store.create(local_gym()).await.unwrap();

        assert!(store.update(&original.id, &DestinationPatch::new()).await.unwrap());
        assert_eq!(store.get(&original.id).await.unwrap().unwrap(), original);
    }

    // Missing ids are tolerated on purpose; a stricter store would return a
    // not-found error here instead.
    #[tokio::test]
    async fn test_update_missing_id_is_silent_noop() {
        let store = stepping_store();
        store.create(dollar_tree()).await.unwrap();
        let before = store.list_all().await.unwrap();

        let missing = DestinationId::generate();
        let found = store
            .update(&missing, &DestinationPatch::new().with_name("ghost"))
            .await
            .unwrap();

        assert!(!found);
        assert_eq!(store.list_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_delete_removes_record_and_repeats_as_noop() {
        let store = stepping_store();
        let keep = store.create(logan()).await.unwrap();
        let gone = store.create(local_gym()).await.unwrap();

        assert!(store.delete(&gone.id).await.unwrap());
        let remaining = store.list_all().await.unwrap();
        assert_eq!(remaining, vec![keep]);

        assert!(!store.delete(&gone.id).await.unwrap());
        assert_eq!(store.list_all().await.unwrap(), remaining);
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_silent_noop() {
        let store = stepping_store();
        store.create(logan()).await.unwrap();
        let before = store.list_all().await.unwrap();

        assert!(!store.delete(&DestinationId::generate()).await.unwrap());
        assert_eq!(store.list_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring_on_name() {
        let store = stepping_store();
        store.create(local_gym()).await.unwrap();
        store.create(dollar_tree()).await.unwrap();
        store.create(logan()).await.unwrap();

        let hits = store.search("gym").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Local Gym");

        let upper = store.search("GYM").await.unwrap();
        assert_eq!(upper, hits);

        assert!(store.search("xyz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_empty_term_matches_nothing() {
        let store = stepping_store();
        store.create(local_gym()).await.unwrap();

        assert!(store.search("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_non_ascii_case_folding() {
        let store = stepping_store();
        store
            .create(NewDestination::new("Café Über", "Zürich", 47.37, 8.54))
            .await
            .unwrap();

        assert_eq!(store.search("ÜBER").await.unwrap().len(), 1);
        assert_eq!(store.search("CAFÉ").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_sample_scenario() {
        let store = stepping_store();
        let a = store.create(logan()).await.unwrap();
        let b = store.create(dollar_tree()).await.unwrap();
        let c = store.create(local_gym()).await.unwrap();

        assert_eq!(store.list_all().await.unwrap(), vec![c, b, a]);

        // Every address contains "MA", but search only looks at names
        assert!(store.search("ma").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_creates_are_serialized() {
        let store = Arc::new(stepping_store());

        let mut tasks = Vec::new();
        for i in 0..8 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                store
                    .create(NewDestination::new(format!("Stop {}", i), "Somewhere", 0.0, 0.0))
                    .await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(store.count().await.unwrap(), 8);
    }

    #[tokio::test]
    async fn test_operations_surface_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.db");
        std::fs::write(&path, vec![0x13u8; 4096]).unwrap();

        let handle = Arc::new(StoreHandle::new(crate::storage::StoreLocation::file(&path)));
        let store = DestinationStore::new(handle);
        let id = DestinationId::generate();

        assert!(store.create(logan()).await.unwrap_err().is_open_error());
        assert!(store.list_all().await.unwrap_err().is_open_error());
        assert!(
            store
                .update(&id, &DestinationPatch::new().with_name("X"))
                .await
                .unwrap_err()
                .is_open_error()
        );
        assert!(store.delete(&id).await.unwrap_err().is_open_error());

        // A broken store must not look like an empty one
        let searched = store.search("gym").await;
        assert!(matches!(searched, Err(ref e) if e.is_open_error()));
    }

    #[tokio::test]
    async fn test_create_rejects_non_finite_coordinates() {
        let store = stepping_store();

        let err = store
            .create(NewDestination::new("Nowhere", "?", f64::NAN, 1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCoordinate { field: "latitude", .. }));

        let err = store
            .create(NewDestination::new("Nowhere", "?", 1.0, f64::INFINITY))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCoordinate { field: "longitude", .. }));

        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_rejects_non_finite_coordinates() {
        let store = stepping_store();
        let original = store.create(dollar_tree()).await.unwrap();

        let patch = DestinationPatch::new().with_name("Dollar General").with_latitude(f64::NAN);
        let err = store.update(&original.id, &patch).await.unwrap_err();
        assert!(matches!(err, Error::InvalidCoordinate { field: "latitude", .. }));

        // Nothing from the refused patch was written, not even the name
        assert_eq!(store.get(&original.id).await.unwrap().unwrap(), original);
    }

    #[tokio::test]
    async fn test_update_writes_every_supplied_field() {
        let store = stepping_store();
        let original = store.create(dollar_tree()).await.unwrap();

        let patch = DestinationPatch::new()
            .with_name("Dollar General")
            .with_address("9 Elm St, Cambridge, MA")
            .with_latitude(0.0)
            .with_longitude(-0.5);
        assert!(store.update(&original.id, &patch).await.unwrap());

        let updated = store.get(&original.id).await.unwrap().unwrap();
        assert_eq!(updated.name, "Dollar General");
        assert_eq!(updated.address, "9 Elm St, Cambridge, MA");
        assert_eq!(updated.latitude, 0.0);
        assert_eq!(updated.longitude, -0.5);
        assert_eq!(updated.created_at, original.created_at);
    }

    #[tokio::test]
    async fn test_records_survive_release() {
        let dir = tempfile::tempdir().unwrap();
        let handle = Arc::new(StoreHandle::new(crate::storage::StoreLocation::file(
            dir.path().join("savespot.db"),
        )));
        let store = DestinationStore::new(Arc::clone(&handle));

        let created = store.create(logan()).await.unwrap();
        handle.release().await.unwrap();

        assert_eq!(store.list_all().await.unwrap(), vec![created]);
    }
}
