use uuid::Uuid;

use gatepass_core::validation::{validate_event_draft, CategoryDraft, EventDraft};
use gatepass_core::CoreError;
use gatepass_shared::{Event, TicketCategory};

use crate::client::ApiClient;
use crate::error::ApiError;

/// Keep the validator's message verbatim; it is rendered inline as-is
fn validation_error(e: CoreError) -> ApiError {
    match e {
        CoreError::ValidationError(msg) => ApiError::Validation(msg),
        other => ApiError::Config(other.to_string()),
    }
}

/// Organizer-side event and category management. Every submission is
/// validated inline first; an invalid draft never reaches the network.
pub struct OrganizerService {
    client: ApiClient,
}

impl OrganizerService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// POST /events/create/
    pub async fn create_event(&self, draft: &EventDraft) -> Result<Event, ApiError> {
        validate_event_draft(draft).map_err(validation_error)?;
        self.client.post("/events/create/", draft).await
    }

    /// PATCH /events/{id}/update/
    pub async fn update_event(&self, event_id: &Uuid, draft: &EventDraft) -> Result<Event, ApiError> {
        validate_event_draft(draft).map_err(validation_error)?;
        self.client
            .patch(&format!("/events/{}/update/", event_id), draft)
            .await
    }

    /// POST /tickets/categories/create/
    pub async fn create_category(
        &self,
        event_id: &Uuid,
        draft: &CategoryDraft,
    ) -> Result<TicketCategory, ApiError> {
        if draft.name.trim().is_empty() {
            return Err(ApiError::validation("Category name is required"));
        }

        #[derive(serde::Serialize)]
        struct CreateCategoryRequest<'a> {
            event_id: &'a Uuid,
            #[serde(flatten)]
            draft: &'a CategoryDraft,
        }

        self.client
            .post(
                "/tickets/categories/create/",
                &CreateCategoryRequest { event_id, draft },
            )
            .await
    }

    /// PATCH /tickets/categories/{id}/
    pub async fn update_category(
        &self,
        category_id: &Uuid,
        draft: &CategoryDraft,
    ) -> Result<TicketCategory, ApiError> {
        if draft.name.trim().is_empty() {
            return Err(ApiError::validation("Category name is required"));
        }
        self.client
            .patch(&format!("/tickets/categories/{}/", category_id), draft)
            .await
    }
}
