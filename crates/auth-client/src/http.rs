//! HTTP implementation of the authentication contract
//!
//! Talks JSON to the Henteklar auth API. The client holds the bearer
//! token for the current session; callers that persist sessions can
//! restore it with [`HttpAuthClient::with_token`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::RwLock;

use crate::api::{AuthApi, AuthError, LoginOutcome, ResetError};
use crate::types::{initials_of, Role, User};

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`HttpAuthClient`]
#[derive(Debug, Clone)]
pub struct HttpAuthClientConfig {
    /// Base URL of the auth service, without a trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl HttpAuthClientConfig {
    /// Create a config for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP client for the authentication service
pub struct HttpAuthClient {
    config: HttpAuthClientConfig,
    client: reqwest::Client,
    token: RwLock<Option<String>>,
}

impl HttpAuthClient {
    /// Create a client with no active session
    pub fn new(config: HttpAuthClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("failed to build HTTP client");
        Self {
            config,
            client,
            token: RwLock::new(None),
        }
    }

    /// Create a client restoring a previously issued token
    pub fn with_token(config: HttpAuthClientConfig, token: impl Into<String>) -> Self {
        let mut client = Self::new(config);
        client.token = RwLock::new(Some(token.into()));
        client
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Extract a display message from an error response body
    async fn error_message(response: reqwest::Response) -> Option<String> {
        let body: ErrorBody = response.json().await.ok()?;
        body.message.or(body.error)
    }
}

#[async_trait]
impl AuthApi for HttpAuthClient {
    async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let response = self
            .client
            .post(self.endpoint("/v1/auth/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            // Rejected credentials are a normal negative result.
            let message = Self::error_message(response).await;
            return Ok(LoginOutcome::rejected(message));
        }
        if !status.is_success() {
            let message = Self::error_message(response)
                .await
                .unwrap_or_else(|| status.to_string());
            return Err(AuthError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        *self.token.write().await = Some(body.token);
        Ok(LoginOutcome::accepted(body.user.into_user()))
    }

    async fn logout(&self) -> Result<(), AuthError> {
        // Drop the token first; the local session ends even if the
        // revocation request fails.
        let token = self.token.write().await.take();
        let Some(token) = token else {
            return Ok(());
        };

        let response = self
            .client
            .post(self.endpoint("/v1/auth/logout"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = Self::error_message(response)
                .await
                .unwrap_or_else(|| status.to_string());
            return Err(AuthError::Service {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), ResetError> {
        let response = self
            .client
            .post(self.endpoint("/v1/auth/reset-password"))
            .json(&ResetRequest { email })
            .send()
            .await
            .map_err(|e| ResetError::new(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = Self::error_message(response)
                .await
                .unwrap_or_else(|| status.to_string());
            return Err(ResetError::new(message));
        }
        Ok(())
    }

    async fn resume_session(&self) -> Result<Option<User>, AuthError> {
        let token = self.token.read().await.clone();
        let Some(token) = token else {
            return Ok(None);
        };

        let response = self
            .client
            .get(self.endpoint("/v1/auth/session"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            // Token expired or revoked; the session is simply gone.
            self.token.write().await.take();
            return Ok(None);
        }
        if !status.is_success() {
            let message = Self::error_message(response)
                .await
                .unwrap_or_else(|| status.to_string());
            return Err(AuthError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let body: WireUser = response
            .json()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        Ok(Some(body.into_user()))
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct ResetRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    token: String,
    user: WireUser,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireUser {
    id: String,
    name: String,
    role: String,
    #[serde(default)]
    avatar_initials: Option<String>,
}

impl WireUser {
    fn into_user(self) -> User {
        let role = Role::from_wire(&self.role);
        if role.is_none() {
            tracing::warn!(role = %self.role, "service reported an unrecognized role");
        }
        let avatar_initials = self
            .avatar_initials
            .unwrap_or_else(|| initials_of(&self.name));
        User {
            id: self.id,
            name: self.name,
            role,
            avatar_initials,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}
