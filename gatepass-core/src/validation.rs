use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gatepass_shared::PricingType;

use crate::{CoreError, CoreResult};

pub const PAID_EVENT_NEEDS_CATEGORY: &str =
    "At least one ticket category is required for paid events";

/// Organizer-side draft of a ticket category, before the backend assigns ids
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDraft {
    #[serde(default)]
    pub category_id: Option<Uuid>,
    pub name: String,
    pub price: f64,
    pub max_tickets: i32,
    #[serde(default)]
    pub description: Option<String>,
}

impl CategoryDraft {
    /// A draft counts toward the paid-event requirement only when it is
    /// actually filled in: a named category with a positive price.
    pub fn is_filled(&self) -> bool {
        !self.name.trim().is_empty() && self.price > 0.0
    }
}

/// Organizer-side draft of an event create/update submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDraft {
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
    pub ticket_categories: Vec<CategoryDraft>,
}

/// Validate an event draft before any network call is made. The server
/// re-validates; this is the inline, pre-submission pass.
pub fn validate_event_draft(draft: &EventDraft) -> CoreResult<()> {
    if draft.name.trim().is_empty() {
        return Err(CoreError::ValidationError("Event name is required".to_string()));
    }
    if draft.location.trim().is_empty() {
        return Err(CoreError::ValidationError("Event location is required".to_string()));
    }
    if draft.max_quantity_per_booking <= 0 {
        return Err(CoreError::ValidationError(
            "Maximum quantity per booking must be at least 1".to_string(),
        ));
    }
    if draft.pricing_type == PricingType::Paid
        && !draft.ticket_categories.iter().any(|c| c.is_filled())
    {
        return Err(CoreError::ValidationError(PAID_EVENT_NEEDS_CATEGORY.to_string()));
    }
    Ok(())
}
