use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload for POST /tickets/book/ - a single category per booking,
/// which is the contract the backend actually honours.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookTicketsRequest {
    pub event_id: Uuid,
    pub category_id: Uuid,
    pub quantity: i32,
}

/// Response of POST /tickets/book/. Exactly one of three shapes comes back:
/// a payment URL (redirect now), a booking id (continue on the checkout
/// page), or issued tickets (free event).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookTicketsResponse {
    #[serde(default, alias = "id")]
    pub booking_id: Option<String>,
    #[serde(default)]
    pub payment_url: Option<String>,
    #[serde(default)]
    pub payment_reference: Option<String>,
    #[serde(default)]
    pub tickets: Option<Vec<Ticket>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Active,
    Used,
    Cancelled,
}

/// An issued ticket, as listed on the my-tickets screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub ticket_id: String,
    pub event_name: String,
    pub category_name: String,
    #[serde(default)]
    pub qr_code: Option<String>,
    pub status: TicketStatus,
    #[serde(default)]
    pub issued_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_response_accepts_id_alias() {
        // Some backend routes return `id` instead of `booking_id`
        let body = r#"{"id": "bk_123"}"#;
        let resp: BookTicketsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.booking_id.as_deref(), Some("bk_123"));
        assert!(resp.payment_url.is_none());
        assert!(resp.tickets.is_none());
    }

    #[test]
    fn test_booking_response_payment_url_shape() {
        let body = r#"{"payment_url": "https://checkout.gateway.example/abc"}"#;
        let resp: BookTicketsResponse = serde_json::from_str(body).unwrap();
        assert!(resp.booking_id.is_none());
        assert_eq!(
            resp.payment_url.as_deref(),
            Some("https://checkout.gateway.example/abc")
        );
    }
}
