use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;
use url::Url;

use gatepass_core::session::SessionStore;

use crate::error::{self, ApiError};

/// HTTP client for the backend API. Attaches the current session token to
/// every request and performs the forced logout on a terminal 401.
///
/// No retry and no refresh-token exchange: one request, one outcome.
#[derive(Clone)]
pub struct ApiClient {
    inner: reqwest::Client,
    base_url: Url,
    sessions: Arc<dyn SessionStore>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        sessions: Arc<dyn SessionStore>,
    ) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Config(format!("Invalid backend base URL: {}", e)))?;
        // Joining relative paths drops the last unslashed segment
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            inner,
            base_url,
            sessions,
        })
    }

    pub fn sessions(&self) -> Arc<dyn SessionStore> {
        self.sessions.clone()
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Config(format!("Invalid endpoint path {}: {}", path, e)))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(Method::PATCH, path, Some(body)).await
    }

    async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;

        let mut builder = self.inner.request(method, url);
        if let Some(token) = self.sessions.current().token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let error_body: serde_json::Value = response.json().await.unwrap_or_default();

        if status == StatusCode::UNAUTHORIZED && error::is_token_not_valid(&error_body) {
            // Terminal: the token is dead. Clear the session so every
            // surface sees logged-out state, then send the caller to login.
            warn!(path, "Token rejected by backend; forcing logout");
            if let Err(e) = self.sessions.logout().await {
                warn!(error = %e, "Failed to clear session after token rejection");
            }
            return Err(ApiError::SessionExpired);
        }

        Err(ApiError::Api {
            status: status.as_u16(),
            message: error::resolve_message(&error_body),
        })
    }
}
