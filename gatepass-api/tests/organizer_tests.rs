use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gatepass_api::client::ApiClient;
use gatepass_api::error::ApiError;
use gatepass_api::organizer::OrganizerService;
use gatepass_core::session::{MemorySessionStore, SessionStore};
use gatepass_core::validation::{CategoryDraft, EventDraft, PAID_EVENT_NEEDS_CATEGORY};
use gatepass_shared::{PricingType, Role, User};

async fn organizer_over(server: &MockServer) -> OrganizerService {
    let sessions = Arc::new(MemorySessionStore::new());
    sessions
        .login(
            User {
                id: Some("org1".to_string()),
                email: "org@example.com".to_string(),
                first_name: None,
                last_name: None,
            },
            "tok".to_string(),
            None,
            Role::Organizer,
        )
        .await
        .unwrap();

    let client = ApiClient::new(&server.uri(), Duration::from_secs(5), sessions).unwrap();
    OrganizerService::new(client)
}

fn paid_draft(categories: Vec<CategoryDraft>) -> EventDraft {
    EventDraft {
        name: "Career Fair".to_string(),
        description: None,
        location: "Expo Centre".to_string(),
        date: Utc::now(),
        event_type: "fair".to_string(),
        pricing_type: PricingType::Paid,
        image: None,
        max_quantity_per_booking: 5,
        ticket_categories: categories,
    }
}

#[tokio::test]
async fn paid_event_without_categories_never_reaches_the_network() {
    let server = MockServer::start().await;
    let organizer = organizer_over(&server).await;

    // Any request at all would fail the mock's expectation
    Mock::given(method("PATCH"))
        .and(path("/events/11111111-1111-1111-1111-111111111111/update/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let event_id = "11111111-1111-1111-1111-111111111111".parse().unwrap();
    let err = organizer
        .update_event(&event_id, &paid_draft(vec![]))
        .await
        .unwrap_err();

    match err {
        ApiError::Validation(msg) => assert_eq!(msg, PAID_EVENT_NEEDS_CATEGORY),
        other => panic!("Expected a validation error, got {:?}", other),
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn valid_paid_event_is_submitted() {
    let server = MockServer::start().await;
    let organizer = organizer_over(&server).await;

    Mock::given(method("POST"))
        .and(path("/events/create/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "event_id": "22222222-2222-2222-2222-222222222222",
            "name": "Career Fair",
            "location": "Expo Centre",
            "date": Utc::now().to_rfc3339(),
            "event_type": "fair",
            "pricing_type": "paid",
            "max_quantity_per_booking": 5,
            "ticket_categories": [],
            "status": "pending"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let draft = paid_draft(vec![CategoryDraft {
        category_id: None,
        name: "General".to_string(),
        price: 1500.0,
        max_tickets: 300,
        description: None,
    }]);

    let event = organizer.create_event(&draft).await.unwrap();
    assert_eq!(event.name, "Career Fair");
}
