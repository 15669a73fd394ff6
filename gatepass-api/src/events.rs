use uuid::Uuid;

use gatepass_shared::Event;

use crate::client::ApiClient;
use crate::error::ApiError;

/// Event discovery and the organizer's own listings
pub struct EventService {
    client: ApiClient,
}

impl EventService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// GET /events/
    pub async fn list(&self) -> Result<Vec<Event>, ApiError> {
        self.client.get("/events/").await
    }

    /// GET /events/{id}/details/
    pub async fn detail(&self, event_id: &Uuid) -> Result<Event, ApiError> {
        self.client
            .get(&format!("/events/{}/details/", event_id))
            .await
    }

    /// GET /organizer/events/
    pub async fn organizer_events(&self) -> Result<Vec<Event>, ApiError> {
        self.client.get("/organizer/events/").await
    }
}
