use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Static account details shown on the manual-transfer tab
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BankDetails {
    pub bank_name: String,
    pub account_number: String,
    pub account_name: String,
}

/// The two ways an attendee can settle a paid booking: a full redirect to
/// the gateway's hosted checkout, or a manual bank transfer the attendee
/// confirms afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentMethod {
    HostedRedirect { payment_url: String },
    ManualTransfer { details: BankDetails },
}

/// Manual-transfer confirmation payload, posted fire-and-forget to the
/// confirmation endpoint. Reconciliation happens later, by an admin.
/// Field casing follows the backend's form contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfirmation {
    #[serde(rename = "Firstname")]
    pub first_name: String,
    #[serde(rename = "Lastname")]
    pub last_name: String,
    pub amount_sent: f64,
    pub sent_at: DateTime<Utc>,
}

impl TransferConfirmation {
    /// Inline validation before submission; the server re-validates.
    pub fn validate(&self) -> Result<(), crate::CoreError> {
        if self.first_name.trim().is_empty() {
            return Err(crate::CoreError::ValidationError(
                "First name is required".to_string(),
            ));
        }
        if self.last_name.trim().is_empty() {
            return Err(crate::CoreError::ValidationError(
                "Last name is required".to_string(),
            ));
        }
        if self.amount_sent <= 0.0 {
            return Err(crate::CoreError::ValidationError(
                "Amount sent must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_validation() {
        let mut confirmation = TransferConfirmation {
            first_name: "Ada".to_string(),
            last_name: "Obi".to_string(),
            amount_sent: 4500.0,
            sent_at: Utc::now(),
        };
        assert!(confirmation.validate().is_ok());

        confirmation.first_name = "  ".to_string();
        assert!(confirmation.validate().is_err());

        confirmation.first_name = "Ada".to_string();
        confirmation.amount_sent = 0.0;
        assert!(confirmation.validate().is_err());
    }

    #[test]
    fn test_confirmation_wire_casing() {
        let confirmation = TransferConfirmation {
            first_name: "Ada".to_string(),
            last_name: "Obi".to_string(),
            amount_sent: 4500.0,
            sent_at: Utc::now(),
        };
        let json = serde_json::to_value(&confirmation).unwrap();
        assert!(json.get("Firstname").is_some());
        assert!(json.get("amount_sent").is_some());
    }
}
