use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use gatepass_shared::{Role, User};

use crate::CoreResult;

/// The client-side session. This is the single source of truth for
/// "am I logged in" across the whole application; the only mutation
/// paths are `SessionStore::login` and `SessionStore::logout`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub user: Option<User>,
    pub role: Option<Role>,
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub is_authenticated: bool,
}

impl Session {
    pub fn empty() -> Self {
        Self {
            user: None,
            role: None,
            token: None,
            refresh_token: None,
            is_authenticated: false,
        }
    }

    pub fn authenticated(user: User, token: String, refresh_token: Option<String>, role: Role) -> Self {
        Self {
            user: Some(user),
            role: Some(role),
            token: Some(token),
            refresh_token,
            is_authenticated: true,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::empty()
    }
}

/// Persisted session state. Hydration from storage is asynchronous, so a
/// consumer must treat "not yet hydrated" as distinct from "logged out";
/// guard decisions made before hydration would redirect a logged-in user.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the persisted session into memory. Idempotent.
    async fn hydrate(&self) -> CoreResult<()>;

    /// Whether `hydrate` has completed at least once.
    fn hydrated(&self) -> bool;

    /// Snapshot of the current session.
    fn current(&self) -> Session;

    /// Overwrite every session field atomically and mark authenticated.
    async fn login(
        &self,
        user: User,
        token: String,
        refresh_token: Option<String>,
        role: Role,
    ) -> CoreResult<()>;

    /// Reset every session field.
    async fn logout(&self) -> CoreResult<()>;
}

/// In-memory store for tests and short-lived tooling.
pub struct MemorySessionStore {
    inner: std::sync::RwLock<Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            inner: std::sync::RwLock::new(Session::empty()),
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn hydrate(&self) -> CoreResult<()> {
        Ok(())
    }

    fn hydrated(&self) -> bool {
        true
    }

    fn current(&self) -> Session {
        self.inner.read().expect("session lock poisoned").clone()
    }

    async fn login(
        &self,
        user: User,
        token: String,
        refresh_token: Option<String>,
        role: Role,
    ) -> CoreResult<()> {
        let mut guard = self.inner.write().expect("session lock poisoned");
        *guard = Session::authenticated(user, token, refresh_token, role);
        Ok(())
    }

    async fn logout(&self) -> CoreResult<()> {
        let mut guard = self.inner.write().expect("session lock poisoned");
        *guard = Session::empty();
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
            first_name: None,
            last_name: None,
        }
    }

    #[tokio::test]
    async fn test_login_overwrites_all_fields() {
        let store = MemorySessionStore::new();
        store
            .login(user(), "tok".to_string(), Some("ref".to_string()), Role::Student)
            .await
            .unwrap();

        let session = store.current();
        assert!(session.is_authenticated);
        assert_eq!(session.token.as_deref(), Some("tok"));
        assert_eq!(session.refresh_token.as_deref(), Some("ref"));
        assert_eq!(session.role, Some(Role::Student));

        // A second login replaces everything, including the refresh token
        store
            .login(user(), "tok2".to_string(), None, Role::Organizer)
            .await
            .unwrap();
        let session = store.current();
        assert_eq!(session.token.as_deref(), Some("tok2"));
        assert_eq!(session.refresh_token, None);
        assert_eq!(session.role, Some(Role::Organizer));
    }

    #[tokio::test]
    async fn test_logout_resets() {
        let store = MemorySessionStore::new();
        store
            .login(user(), "tok".to_string(), None, Role::Admin)
            .await
            .unwrap();
        store.logout().await.unwrap();

        assert_eq!(store.current(), Session::empty());
    }
}
