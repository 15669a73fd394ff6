use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payout request status. Transitions happen server-side; the client only
/// requests them and reflects what comes back.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
    Failed,
}

/// Actions the admin console may request against a payout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayoutAction {
    Approve,
    Reject,
    MarkCompleted,
    MarkFailed,
}

impl PayoutStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PayoutStatus::Rejected | PayoutStatus::Completed | PayoutStatus::Failed
        )
    }

    /// Which action buttons the console shows for a payout in this status.
    /// Approved payouts are awaiting a manual bank transfer, so the only
    /// moves left are marking that transfer completed or failed.
    pub fn available_actions(&self) -> &'static [PayoutAction] {
        match self {
            PayoutStatus::Pending => &[PayoutAction::Approve, PayoutAction::Reject],
            PayoutStatus::Approved => &[PayoutAction::MarkCompleted, PayoutAction::MarkFailed],
            PayoutStatus::Rejected | PayoutStatus::Completed | PayoutStatus::Failed => &[],
        }
    }
}

impl std::fmt::Display for PayoutStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PayoutStatus::Pending => "pending",
            PayoutStatus::Approved => "approved",
            PayoutStatus::Rejected => "rejected",
            PayoutStatus::Completed => "completed",
            PayoutStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Organizer-initiated withdrawal of wallet balance to a bank account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutRequest {
    pub request_id: String,
    pub organizer_name: String,
    pub bank_name: String,
    pub account_number: String,
    pub account_name: String,
    pub amount: f64,
    pub status: PayoutStatus,
    #[serde(default)]
    pub requested_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub admin_note: Option<String>,
}

/// Withdrawal transaction as listed on the admin finance screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Withdrawal {
    pub transaction_id: String,
    pub organizer_name: String,
    pub bank_name: String,
    pub account_number: String,
    pub account_name: String,
    pub amount: f64,
    pub status: PayoutStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFormStatus {
    Pending,
    Confirmed,
    Rejected,
}

/// A manual-transfer confirmation submitted by an attendee, reconciled by
/// an admin. Field casing follows the backend's form contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentForm {
    pub id: String,
    #[serde(rename = "Firstname")]
    pub first_name: String,
    #[serde(rename = "Lastname")]
    pub last_name: String,
    pub amount_sent: f64,
    pub sent_at: DateTime<Utc>,
    pub status: PaymentFormStatus,
    #[serde(default)]
    pub admin_notes: Option<String>,
}

/// Normalized bank-verification result, regardless of provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BankAccount {
    pub account_name: String,
    pub account_number: String,
    pub bank_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bank {
    pub name: String,
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payout_action_gating() {
        assert_eq!(
            PayoutStatus::Pending.available_actions(),
            &[PayoutAction::Approve, PayoutAction::Reject]
        );
        assert_eq!(
            PayoutStatus::Approved.available_actions(),
            &[PayoutAction::MarkCompleted, PayoutAction::MarkFailed]
        );
        assert!(PayoutStatus::Completed.available_actions().is_empty());
        assert!(PayoutStatus::Failed.available_actions().is_empty());
        assert!(PayoutStatus::Rejected.available_actions().is_empty());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!PayoutStatus::Pending.is_terminal());
        assert!(!PayoutStatus::Approved.is_terminal());
        assert!(PayoutStatus::Rejected.is_terminal());
        assert!(PayoutStatus::Completed.is_terminal());
        assert!(PayoutStatus::Failed.is_terminal());
    }

    #[test]
    fn test_payment_form_wire_casing() {
        let form = PaymentForm {
            id: "pf_1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Obi".to_string(),
            amount_sent: 5000.0,
            sent_at: Utc::now(),
            status: PaymentFormStatus::Pending,
            admin_notes: None,
        };
        let json = serde_json::to_value(&form).unwrap();
        assert!(json.get("Firstname").is_some());
        assert!(json.get("Lastname").is_some());
        assert!(json.get("first_name").is_none());
    }
}
