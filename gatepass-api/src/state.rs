use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use gatepass_checkout::flow::CheckoutFlow;
use gatepass_core::session::SessionStore;
use gatepass_store::{
    Config, LocalPendingSelectionStore, LocalSnapshotStore, LocalStore, PersistedSessionStore,
};

use crate::admin::AdminService;
use crate::auth::AuthService;
use crate::banks::BankService;
use crate::bookings::BookingApi;
use crate::client::ApiClient;
use crate::events::EventService;
use crate::organizer::OrganizerService;

/// Everything the application wires together at startup: configuration,
/// the persisted session, the API client, and the checkout flow seams.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sessions: Arc<dyn SessionStore>,
    pub client: ApiClient,
    pub flow: Arc<CheckoutFlow>,
}

impl AppState {
    pub async fn init(config: Config) -> anyhow::Result<Self> {
        let store = Arc::new(LocalStore::open(Path::new(&config.storage.dir))?);

        let sessions: Arc<dyn SessionStore> =
            Arc::new(PersistedSessionStore::new(store.clone()));
        sessions
            .hydrate()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to hydrate session: {}", e))?;

        let client = ApiClient::new(
            &config.backend.base_url,
            Duration::from_secs(config.backend.timeout_seconds),
            sessions.clone(),
        )?;

        let flow = Arc::new(CheckoutFlow::new(
            Arc::new(BookingApi::new(client.clone())),
            Arc::new(LocalSnapshotStore::new(store.clone())),
            Arc::new(LocalPendingSelectionStore::new(store)),
        ));

        Ok(Self {
            config,
            sessions,
            client,
            flow,
        })
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.client.clone())
    }

    pub fn events(&self) -> EventService {
        EventService::new(self.client.clone())
    }

    pub fn bookings(&self) -> BookingApi {
        BookingApi::new(self.client.clone())
    }

    pub fn organizer(&self) -> OrganizerService {
        OrganizerService::new(self.client.clone())
    }

    pub fn admin(&self) -> AdminService {
        AdminService::new(self.client.clone())
    }

    pub fn banks(&self) -> BankService {
        BankService::new(self.config.banking.clone())
    }
}
