use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use gatepass_core::session::{Session, SessionStore};
use gatepass_core::{CoreError, CoreResult};
use gatepass_shared::{Role, User};

use crate::local::LocalStore;

const SESSION_KEY: &str = "session";

/// Session store persisted through the local file store, so a session
/// survives process restarts the way the browser session survived
/// reloads. Consumers must check `hydrated()` before trusting
/// `current()`; an unhydrated store reads as logged out.
pub struct PersistedSessionStore {
    store: Arc<LocalStore>,
    state: RwLock<Session>,
    hydrated: AtomicBool,
}

impl PersistedSessionStore {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self {
            store,
            state: RwLock::new(Session::empty()),
            hydrated: AtomicBool::new(false),
        }
    }

    fn write_through(&self, session: &Session) -> CoreResult<()> {
        self.store
            .put(SESSION_KEY, session)
            .map_err(|e| CoreError::SessionError(e.to_string()))
    }
}

#[async_trait]
impl SessionStore for PersistedSessionStore {
    async fn hydrate(&self) -> CoreResult<()> {
        if self.hydrated.load(Ordering::Acquire) {
            return Ok(());
        }

        let loaded: Session = self
            .store
            .get(SESSION_KEY)
            .map_err(|e| CoreError::SessionError(e.to_string()))?
            .unwrap_or_else(Session::empty);

        *self.state.write().expect("session lock poisoned") = loaded;
        self.hydrated.store(true, Ordering::Release);
        Ok(())
    }

    fn hydrated(&self) -> bool {
        self.hydrated.load(Ordering::Acquire)
    }

    fn current(&self) -> Session {
        self.state.read().expect("session lock poisoned").clone()
    }

    async fn login(
        &self,
        user: User,
        token: String,
        refresh_token: Option<String>,
        role: Role,
    ) -> CoreResult<()> {
        let session = Session::authenticated(user, token, refresh_token, role);
        self.write_through(&session)?;
        *self.state.write().expect("session lock poisoned") = session;
        Ok(())
    }

    async fn logout(&self) -> CoreResult<()> {
        let session = Session::empty();
        self.write_through(&session)?;
        *self.state.write().expect("session lock poisoned") = session;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: Some("u1".to_string()),
            email: "ada@example.com".to_string(),
            first_name: Some("Ada".to_string()),
            last_name: None,
        }
    }

    #[tokio::test]
    async fn test_unhydrated_reads_as_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(LocalStore::open(dir.path()).unwrap());
        let sessions = PersistedSessionStore::new(store);

        assert!(!sessions.hydrated());
        assert!(!sessions.current().is_authenticated);
    }

    #[tokio::test]
    async fn test_session_survives_restart() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = Arc::new(LocalStore::open(dir.path()).unwrap());
            let sessions = PersistedSessionStore::new(store);
            sessions.hydrate().await.unwrap();
            sessions
                .login(user(), "tok".to_string(), Some("ref".to_string()), Role::Student)
                .await
                .unwrap();
        }

        // New process: a fresh store over the same directory
        let store = Arc::new(LocalStore::open(dir.path()).unwrap());
        let sessions = PersistedSessionStore::new(store);
        sessions.hydrate().await.unwrap();

        let session = sessions.current();
        assert!(session.is_authenticated);
        assert_eq!(session.token.as_deref(), Some("tok"));
        assert_eq!(session.role, Some(Role::Student));
    }

    #[tokio::test]
    async fn test_logout_clears_persisted_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(LocalStore::open(dir.path()).unwrap());

        let sessions = PersistedSessionStore::new(store.clone());
        sessions.hydrate().await.unwrap();
        sessions
            .login(user(), "tok".to_string(), None, Role::Admin)
            .await
            .unwrap();
        sessions.logout().await.unwrap();

        let persisted: Session = store.get(SESSION_KEY).unwrap().unwrap();
        assert_eq!(persisted, Session::empty());
    }
}
