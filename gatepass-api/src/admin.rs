use serde::Serialize;

use gatepass_shared::{
    AdminUser, AuditLogEntry, Event, EventStatus, PaymentForm, PayoutRequest, PlatformAnalytics,
    PlatformSettings, Withdrawal,
};

use crate::client::ApiClient;
use crate::error::ApiError;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Serialize)]
struct EventStatusRequest<'a> {
    status: EventStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct PayoutActionRequest<'a> {
    action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    admin_note: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct PaymentFormReviewRequest<'a> {
    status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    admin_notes: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct UserActiveRequest {
    is_active: bool,
}

/// The admin ("lighthouse") console. Every mutation here follows
/// mutate-then-refetch: the action is requested, then the affected list
/// is reloaded so the UI reflects server ground truth, never an
/// optimistic guess.
pub struct AdminService {
    client: ApiClient,
}

impl AdminService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// GET /api/admin/analytics/
    pub async fn analytics(&self) -> Result<PlatformAnalytics, ApiError> {
        self.client.get("/api/admin/analytics/").await
    }

    // ------------------------------------------------------------------
    // Event moderation
    // ------------------------------------------------------------------

    /// GET /api/admin/events/
    pub async fn events(&self) -> Result<Vec<Event>, ApiError> {
        self.client.get("/api/admin/events/").await
    }

    /// PATCH /api/admin/events/{id}/ with the target status.
    /// Illegal transitions are rejected before any network call.
    pub async fn set_event_status(
        &self,
        event: &Event,
        next: EventStatus,
        reason: Option<&str>,
    ) -> Result<Vec<Event>, ApiError> {
        if !event.status.can_transition_to(next) {
            return Err(ApiError::validation(format!(
                "Cannot move event from {} to {}",
                event.status, next
            )));
        }
        if next == EventStatus::Denied && reason.map_or(true, |r| r.trim().is_empty()) {
            return Err(ApiError::validation("A reason is required to deny an event"));
        }

        let _: serde_json::Value = self
            .client
            .patch(
                &format!("/api/admin/events/{}/", event.event_id),
                &EventStatusRequest { status: next, reason },
            )
            .await?;

        self.events().await
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// GET /api/admin/users/
    pub async fn users(&self) -> Result<Vec<AdminUser>, ApiError> {
        self.client.get("/api/admin/users/").await
    }

    /// PATCH /api/admin/users/{id}/
    pub async fn set_user_active(
        &self,
        user_id: &str,
        is_active: bool,
    ) -> Result<Vec<AdminUser>, ApiError> {
        let _: serde_json::Value = self
            .client
            .patch(
                &format!("/api/admin/users/{}/", user_id),
                &UserActiveRequest { is_active },
            )
            .await?;
        self.users().await
    }

    // ------------------------------------------------------------------
    // Payout requests
    // ------------------------------------------------------------------

    /// GET /api/admin/payout-requests/
    pub async fn payout_requests(&self) -> Result<Vec<PayoutRequest>, ApiError> {
        self.client.get("/api/admin/payout-requests/").await
    }

    /// Approve a pending payout: the server debits the organizer wallet
    /// and creates a pending transaction awaiting manual transfer.
    pub async fn approve_payout(&self, request_id: &str) -> Result<Vec<PayoutRequest>, ApiError> {
        self.payout_action(request_id, "approve", None).await
    }

    /// Reject a pending payout; the wallet is untouched. The note is
    /// mandatory.
    pub async fn reject_payout(
        &self,
        request_id: &str,
        note: &str,
    ) -> Result<Vec<PayoutRequest>, ApiError> {
        if note.trim().is_empty() {
            return Err(ApiError::validation("A rejection note is required"));
        }
        self.payout_action(request_id, "reject", Some(note)).await
    }

    /// Mark an approved payout's manual transfer as completed (terminal).
    pub async fn complete_payout(&self, request_id: &str) -> Result<Vec<PayoutRequest>, ApiError> {
        self.payout_action(request_id, "complete", None).await
    }

    /// Mark an approved payout's manual transfer as failed (terminal; the
    /// server refunds the wallet).
    pub async fn fail_payout(&self, request_id: &str) -> Result<Vec<PayoutRequest>, ApiError> {
        self.payout_action(request_id, "fail", None).await
    }

    async fn payout_action(
        &self,
        request_id: &str,
        action: &str,
        admin_note: Option<&str>,
    ) -> Result<Vec<PayoutRequest>, ApiError> {
        let _: serde_json::Value = self
            .client
            .patch(
                &format!("/api/admin/payout-requests/{}/", request_id),
                &PayoutActionRequest { action, admin_note },
            )
            .await?;
        self.payout_requests().await
    }

    /// GET /api/admin/withdrawals/
    pub async fn withdrawals(&self) -> Result<Vec<Withdrawal>, ApiError> {
        self.client.get("/api/admin/withdrawals/").await
    }

    // ------------------------------------------------------------------
    // Manual-transfer payment forms
    // ------------------------------------------------------------------

    /// GET /api/admin/payment-forms/
    pub async fn payment_forms(&self) -> Result<Vec<PaymentForm>, ApiError> {
        self.client.get("/api/admin/payment-forms/").await
    }

    /// Confirm a submitted transfer form against the bank statement.
    pub async fn confirm_payment_form(
        &self,
        form_id: &str,
        notes: Option<&str>,
    ) -> Result<Vec<PaymentForm>, ApiError> {
        self.review_payment_form(form_id, "confirmed", notes).await
    }

    /// Reject a submitted transfer form; the note is mandatory so the
    /// attendee can be told why.
    pub async fn reject_payment_form(
        &self,
        form_id: &str,
        notes: &str,
    ) -> Result<Vec<PaymentForm>, ApiError> {
        if notes.trim().is_empty() {
            return Err(ApiError::validation("A rejection note is required"));
        }
        self.review_payment_form(form_id, "rejected", Some(notes)).await
    }

    async fn review_payment_form(
        &self,
        form_id: &str,
        status: &str,
        admin_notes: Option<&str>,
    ) -> Result<Vec<PaymentForm>, ApiError> {
        let _: serde_json::Value = self
            .client
            .patch(
                &format!("/api/admin/payment-forms/{}/", form_id),
                &PaymentFormReviewRequest { status, admin_notes },
            )
            .await?;
        self.payment_forms().await
    }

    // ------------------------------------------------------------------
    // Settings & audit
    // ------------------------------------------------------------------

    /// GET /api/admin/settings/
    pub async fn settings(&self) -> Result<PlatformSettings, ApiError> {
        self.client.get("/api/admin/settings/").await
    }

    /// PATCH /api/admin/settings/
    pub async fn update_settings(
        &self,
        settings: &PlatformSettings,
    ) -> Result<PlatformSettings, ApiError> {
        let _: serde_json::Value = self.client.patch("/api/admin/settings/", settings).await?;
        self.settings().await
    }

    /// GET /api/admin/audit-logs/
    pub async fn audit_logs(&self) -> Result<Vec<AuditLogEntry>, ApiError> {
        self.client.get("/api/admin/audit-logs/").await
    }
}
