use serde::{Deserialize, Serialize};
use tracing::info;

use gatepass_core::session::Session;
use gatepass_shared::{Role, User};

use crate::client::ApiClient;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct GoogleSignupRequest<'a> {
    id_token: &'a str,
}

/// The auth endpoints answer in two shapes: `{access, refresh, role?}`
/// from the token routes and `{user, token}` from the legacy ones.
/// Accept both and normalize.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    access: Option<String>,
    #[serde(default)]
    refresh: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    user: Option<User>,
}

pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// POST /login/ - student/organizer login
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let response: LoginResponse = self
            .client
            .post("/login/", &LoginRequest { email, password })
            .await?;
        self.establish(email, response, Role::Student).await
    }

    /// POST /auth/login - admin console login
    pub async fn admin_login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let response: LoginResponse = self
            .client
            .post("/auth/login", &LoginRequest { email, password })
            .await?;
        self.establish(email, response, Role::Admin).await
    }

    /// POST /{student|organizer}/google-signup/
    pub async fn google_signup(
        &self,
        role: Role,
        email: &str,
        id_token: &str,
    ) -> Result<Session, ApiError> {
        let path = match role {
            Role::Student => "/student/google-signup/",
            Role::Organizer => "/organizer/google-signup/",
            Role::Admin => {
                return Err(ApiError::validation("Google signup is not available for admins"))
            }
        };
        let response: LoginResponse = self
            .client
            .post(path, &GoogleSignupRequest { id_token })
            .await?;
        self.establish(email, response, role).await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.client
            .sessions()
            .logout()
            .await
            .map_err(|e| ApiError::Config(e.to_string()))
    }

    async fn establish(
        &self,
        email: &str,
        response: LoginResponse,
        fallback_role: Role,
    ) -> Result<Session, ApiError> {
        let token = response
            .access
            .or(response.token)
            .ok_or_else(|| ApiError::Decode("Login response carried no token".to_string()))?;

        let role = response
            .role
            .as_deref()
            .and_then(|r| r.parse().ok())
            .unwrap_or(fallback_role);

        let user = response.user.unwrap_or(User {
            id: None,
            email: email.to_string(),
            first_name: None,
            last_name: None,
        });

        self.client
            .sessions()
            .login(user, token, response.refresh, role)
            .await
            .map_err(|e| ApiError::Config(e.to_string()))?;

        info!(role = %role, "Logged in");
        Ok(self.client.sessions().current())
    }
}
