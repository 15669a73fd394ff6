use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How attendees pay for an event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PricingType {
    Free,
    Paid,
}

/// Moderation status assigned by the admin console
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Pending,
    Verified,
    Denied,
}

impl EventStatus {
    /// Legal moderation transitions: verify/deny a pending event,
    /// revoke a verified one, reactivate a denied one.
    pub fn can_transition_to(&self, next: EventStatus) -> bool {
        matches!(
            (self, next),
            (EventStatus::Pending, EventStatus::Verified)
                | (EventStatus::Pending, EventStatus::Denied)
                | (EventStatus::Verified, EventStatus::Denied)
                | (EventStatus::Denied, EventStatus::Verified)
        )
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EventStatus::Pending => "pending",
            EventStatus::Verified => "verified",
            EventStatus::Denied => "denied",
        };
        write!(f, "{}", s)
    }
}

/// A named, priced tier of tickets for a paid event (e.g. VIP, Early Bird)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketCategory {
    pub category_id: Uuid,
    pub name: String,
    pub price: f64,
    pub max_tickets: i32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_sold_out: bool,
    #[serde(default)]
    pub available_quantity: i32,
}

fn default_true() -> bool {
    true
}

impl TicketCategory {
    /// A category can take more bookings only while it is live and has stock
    pub fn is_bookable(&self) -> bool {
        self.is_active && !self.is_sold_out && self.available_quantity > 0
    }
}

/// An event as served by the backend listing/detail endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub event_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub location: String,
    pub date: DateTime<Utc>,
    pub event_type: String,
    pub pricing_type: PricingType,
    #[serde(default)]
    pub image: Option<String>,
    pub max_quantity_per_booking: i32,
    #[serde(default)]
    pub ticket_categories: Vec<TicketCategory>,
    #[serde(default = "default_event_status")]
    pub status: EventStatus,
}

fn default_event_status() -> EventStatus {
    EventStatus::Pending
}

impl Event {
    pub fn is_free(&self) -> bool {
        self.pricing_type == PricingType::Free
    }
}
