use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How long a stashed pre-login selection stays restorable
pub const PENDING_SELECTION_TTL_MINUTES: i64 = 30;

/// Everything the checkout page needs to render after the booking call,
/// persisted locally because the page has no other source for it. If the
/// snapshot is gone, the checkout session is unrecoverable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingSnapshot {
    pub booking_id: String,
    pub event_name: String,
    pub category_name: String,
    pub quantity: i32,
    pub price_per_ticket: f64,
    #[serde(default)]
    pub payment_url: Option<String>,
    #[serde(default)]
    pub payment_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl BookingSnapshot {
    pub fn storage_key(booking_id: &str) -> String {
        format!("booking_{}", booking_id)
    }
}

/// Quantity picks stashed before bouncing an unauthenticated user to
/// login; restored at most once, and only while fresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingSelection {
    pub selections: HashMap<Uuid, i32>,
    pub timestamp: DateTime<Utc>,
}

impl PendingSelection {
    pub fn new(selections: HashMap<Uuid, i32>) -> Self {
        Self {
            selections,
            timestamp: Utc::now(),
        }
    }

    pub fn storage_key(event_id: &Uuid) -> String {
        format!("pending_ticket_selections_{}", event_id)
    }

    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now - self.timestamp <= Duration::minutes(PENDING_SELECTION_TTL_MINUTES)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Local storage error: {0}")]
    Io(String),
    #[error("Corrupt stored value for {0}")]
    Corrupt(String),
}

/// Persistence seam for booking snapshots. Backed by the local file store
/// in production; swappable for a server-side cart without touching flow
/// logic.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn put(&self, snapshot: &BookingSnapshot) -> Result<(), StorageError>;
    async fn get(&self, booking_id: &str) -> Result<Option<BookingSnapshot>, StorageError>;
    async fn remove(&self, booking_id: &str) -> Result<(), StorageError>;
}

/// Persistence seam for pre-login quantity picks
#[async_trait]
pub trait PendingSelectionStore: Send + Sync {
    async fn save(&self, event_id: &Uuid, pending: &PendingSelection) -> Result<(), StorageError>;

    /// Take the stashed picks for an event: returns them only if still
    /// fresh, and deletes them either way so a restore happens at most
    /// once.
    async fn take(&self, event_id: &Uuid) -> Result<Option<PendingSelection>, StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_keys() {
        assert_eq!(BookingSnapshot::storage_key("bk_9"), "booking_bk_9");

        let event_id = Uuid::new_v4();
        assert_eq!(
            PendingSelection::storage_key(&event_id),
            format!("pending_ticket_selections_{}", event_id)
        );
    }

    #[test]
    fn test_pending_selection_freshness_window() {
        let mut pending = PendingSelection::new(HashMap::new());
        let now = Utc::now();
        assert!(pending.is_fresh(now));

        pending.timestamp = now - Duration::minutes(29);
        assert!(pending.is_fresh(now));

        pending.timestamp = now - Duration::minutes(31);
        assert!(!pending.is_fresh(now));
    }
}
