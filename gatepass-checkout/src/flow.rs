use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use gatepass_core::payment::TransferConfirmation;
use gatepass_shared::{BookTicketsRequest, BookTicketsResponse, Event};

use crate::selection::TicketSelection;
use crate::snapshot::{
    BookingSnapshot, PendingSelection, PendingSelectionStore, SnapshotStore, StorageError,
};

type ServiceResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Backend calls the checkout flow depends on. Implemented over HTTP by
/// the API crate; mocked in tests.
#[async_trait]
pub trait BookingService: Send + Sync {
    /// POST /tickets/book/
    async fn book(&self, request: BookTicketsRequest) -> ServiceResult<BookTicketsResponse>;

    /// POST /tickets/initialize-payment/ - returns the hosted checkout URL
    async fn initialize_payment(&self, booking_id: &str) -> ServiceResult<String>;

    /// POST /tickets/confirm-payment/ - fire-and-forget manual-transfer
    /// confirmation
    async fn confirm_transfer(
        &self,
        booking_id: &str,
        confirmation: &TransferConfirmation,
    ) -> ServiceResult<()>;
}

/// Where the client goes next after a flow step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    CheckoutPayment { booking_id: String },
    MyTickets,
    Login { callback: Option<String> },
}

/// Outcome of a flow step: a soft in-app navigation, or a full external
/// redirect (hosted gateway), which by design resets all in-memory state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    Navigate(Navigation),
    Redirect { url: String },
}

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("No tickets selected")]
    NothingSelected,

    /// The checkout page found no snapshot for this booking. Terminal:
    /// the only way out is restarting the booking.
    #[error("Checkout session expired")]
    SessionExpired,

    #[error("{0}")]
    Validation(String),

    #[error("Booking service error: {0}")]
    Service(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Drives the booking and checkout steps:
/// selecting -> booking -> redirected-to-payment | booked-free,
/// then checkout resume -> pay-now | manual transfer -> done.
pub struct CheckoutFlow {
    service: Arc<dyn BookingService>,
    snapshots: Arc<dyn SnapshotStore>,
    pending: Arc<dyn PendingSelectionStore>,
}

impl CheckoutFlow {
    pub fn new(
        service: Arc<dyn BookingService>,
        snapshots: Arc<dyn SnapshotStore>,
        pending: Arc<dyn PendingSelectionStore>,
    ) -> Self {
        Self {
            service,
            snapshots,
            pending,
        }
    }

    /// Submit the current selection for an event.
    ///
    /// The backend books a single category per call, so only the first
    /// selected category is sent; any others are dropped with a warning.
    pub async fn submit(
        &self,
        event: &Event,
        selection: &TicketSelection,
    ) -> Result<FlowOutcome, FlowError> {
        let picks = selection.selections_ordered();
        let Some(&(category_id, quantity)) = picks.first() else {
            return Err(FlowError::NothingSelected);
        };

        if picks.len() > 1 {
            let dropped: Vec<String> =
                picks[1..].iter().map(|(id, _)| id.to_string()).collect();
            warn!(
                event = %event.event_id,
                dropped = ?dropped,
                "Booking supports one category per request; dropping extra selections"
            );
        }

        let response = self
            .service
            .book(BookTicketsRequest {
                event_id: event.event_id,
                category_id,
                quantity,
            })
            .await
            .map_err(|e| FlowError::Service(e.to_string()))?;

        self.handle_booking_response(event, category_id, quantity, response)
            .await
    }

    async fn handle_booking_response(
        &self,
        event: &Event,
        category_id: Uuid,
        quantity: i32,
        response: BookTicketsResponse,
    ) -> Result<FlowOutcome, FlowError> {
        // A payment URL wins: redirect straight to the hosted gateway.
        if let Some(url) = response.payment_url.clone() {
            return Ok(FlowOutcome::Redirect { url });
        }

        // A booking id without a URL means the checkout page takes over.
        // Persist the snapshot first; the page cannot recover it otherwise.
        if let Some(booking_id) = response.booking_id.clone() {
            let category = event
                .ticket_categories
                .iter()
                .find(|c| c.category_id == category_id);

            let snapshot = BookingSnapshot {
                booking_id: booking_id.clone(),
                event_name: event.name.clone(),
                category_name: category.map(|c| c.name.clone()).unwrap_or_default(),
                quantity,
                price_per_ticket: category.map(|c| c.price).unwrap_or(0.0),
                payment_url: None,
                payment_reference: response.payment_reference.clone(),
                created_at: Utc::now(),
            };
            self.snapshots.put(&snapshot).await?;

            return Ok(FlowOutcome::Navigate(Navigation::CheckoutPayment {
                booking_id,
            }));
        }

        // Free event: tickets were issued outright.
        Ok(FlowOutcome::Navigate(Navigation::MyTickets))
    }

    /// Reload checkout context after the navigation (or a page reload).
    /// A missing snapshot is terminal.
    pub async fn resume(&self, booking_id: &str) -> Result<BookingSnapshot, FlowError> {
        self.snapshots
            .get(booking_id)
            .await?
            .ok_or(FlowError::SessionExpired)
    }

    /// Pay-now tab: resolve the hosted checkout URL and redirect.
    pub async fn pay_now(&self, booking_id: &str) -> Result<FlowOutcome, FlowError> {
        let snapshot = self.resume(booking_id).await?;

        let url = match snapshot.payment_url {
            Some(url) => url,
            None => self
                .service
                .initialize_payment(booking_id)
                .await
                .map_err(|e| FlowError::Service(e.to_string()))?,
        };

        Ok(FlowOutcome::Redirect { url })
    }

    /// Manual-transfer tab: validate inline, then submit the confirmation.
    /// The submission is fire-and-forget; reconciliation is manual.
    pub async fn confirm_transfer(
        &self,
        booking_id: &str,
        confirmation: &TransferConfirmation,
    ) -> Result<(), FlowError> {
        confirmation
            .validate()
            .map_err(|e| FlowError::Validation(e.to_string()))?;

        // The snapshot must still exist; confirming against an expired
        // checkout session makes no sense.
        self.resume(booking_id).await?;

        self.service
            .confirm_transfer(booking_id, confirmation)
            .await
            .map_err(|e| FlowError::Service(e.to_string()))
    }

    /// Stash the picks of an unauthenticated user before sending them to
    /// login, so the selection survives the round trip.
    pub async fn stash_pending(
        &self,
        event: &Event,
        selection: &TicketSelection,
    ) -> Result<FlowOutcome, FlowError> {
        let pending = PendingSelection::new(selection.selections());
        self.pending.save(&event.event_id, &pending).await?;

        Ok(FlowOutcome::Navigate(Navigation::Login {
            callback: Some(format!("/events/{}", event.event_id)),
        }))
    }

    /// Restore stashed picks after login. Best effort: quantities are
    /// clamped to what the invariants allow today, and the stash is gone
    /// after one restore.
    pub async fn restore_pending(
        &self,
        event: &Event,
        selection: &mut TicketSelection,
    ) -> Result<bool, FlowError> {
        match self.pending.take(&event.event_id).await? {
            Some(pending) => {
                selection.restore(&pending.selections);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
