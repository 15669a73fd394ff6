use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use gatepass_checkout::snapshot::{
    BookingSnapshot, PendingSelection, PendingSelectionStore, SnapshotStore, StorageError,
};

use crate::local::{LocalStore, StoreError};

impl From<StoreError> for StorageError {
    fn from(e: StoreError) -> Self {
        StorageError::Io(e.to_string())
    }
}

/// Booking snapshots under `booking_{id}` keys in the local store
pub struct LocalSnapshotStore {
    store: Arc<LocalStore>,
}

impl LocalSnapshotStore {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SnapshotStore for LocalSnapshotStore {
    async fn put(&self, snapshot: &BookingSnapshot) -> Result<(), StorageError> {
        let key = BookingSnapshot::storage_key(&snapshot.booking_id);
        self.store.put(&key, snapshot)?;
        debug!(key, "Stored booking snapshot");
        Ok(())
    }

    async fn get(&self, booking_id: &str) -> Result<Option<BookingSnapshot>, StorageError> {
        let key = BookingSnapshot::storage_key(booking_id);
        Ok(self.store.get(&key)?)
    }

    async fn remove(&self, booking_id: &str) -> Result<(), StorageError> {
        let key = BookingSnapshot::storage_key(booking_id);
        self.store.remove(&key)?;
        Ok(())
    }
}

/// Pre-login quantity picks under `pending_ticket_selections_{event}` keys
pub struct LocalPendingSelectionStore {
    store: Arc<LocalStore>,
}

impl LocalPendingSelectionStore {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PendingSelectionStore for LocalPendingSelectionStore {
    async fn save(&self, event_id: &Uuid, pending: &PendingSelection) -> Result<(), StorageError> {
        let key = PendingSelection::storage_key(event_id);
        self.store.put(&key, pending)?;
        Ok(())
    }

    async fn take(&self, event_id: &Uuid) -> Result<Option<PendingSelection>, StorageError> {
        let key = PendingSelection::storage_key(event_id);
        let stashed: Option<PendingSelection> = self.store.get(&key)?;

        // One shot either way: stale or fresh, the stash is consumed.
        self.store.remove(&key)?;

        match stashed {
            Some(pending) if pending.is_fresh(Utc::now()) => Ok(Some(pending)),
            Some(_) => {
                debug!(key, "Dropping stale pending selection");
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::collections::HashMap;

    fn stores() -> (tempfile::TempDir, LocalSnapshotStore, LocalPendingSelectionStore) {
        let dir = tempfile::tempdir().unwrap();
        let local = Arc::new(LocalStore::open(dir.path()).unwrap());
        (
            dir,
            LocalSnapshotStore::new(local.clone()),
            LocalPendingSelectionStore::new(local),
        )
    }

    fn snapshot(id: &str) -> BookingSnapshot {
        BookingSnapshot {
            booking_id: id.to_string(),
            event_name: "Homecoming".to_string(),
            category_name: "Regular".to_string(),
            quantity: 2,
            price_per_ticket: 2000.0,
            payment_url: None,
            payment_reference: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_snapshot_round_trip() {
        let (_dir, snapshots, _) = stores();

        snapshots.put(&snapshot("bk_1")).await.unwrap();
        let loaded = snapshots.get("bk_1").await.unwrap().unwrap();
        assert_eq!(loaded, snapshot("bk_1"));

        snapshots.remove("bk_1").await.unwrap();
        assert!(snapshots.get("bk_1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_none() {
        let (_dir, snapshots, _) = stores();
        assert!(snapshots.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pending_take_is_single_shot() {
        let (_dir, _, pending_store) = stores();
        let event_id = Uuid::new_v4();

        let mut selections = HashMap::new();
        selections.insert(Uuid::new_v4(), 2);
        pending_store
            .save(&event_id, &PendingSelection::new(selections))
            .await
            .unwrap();

        assert!(pending_store.take(&event_id).await.unwrap().is_some());
        assert!(pending_store.take(&event_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stale_pending_is_dropped() {
        let (_dir, _, pending_store) = stores();
        let event_id = Uuid::new_v4();

        let mut pending = PendingSelection::new(HashMap::new());
        pending.timestamp = Utc::now() - Duration::minutes(31);
        pending_store.save(&event_id, &pending).await.unwrap();

        assert!(pending_store.take(&event_id).await.unwrap().is_none());
        // And it is gone afterwards as well
        assert!(pending_store.take(&event_id).await.unwrap().is_none());
    }
}
