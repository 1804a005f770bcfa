//! The authentication service contract
//!
//! Expected login failures (wrong credentials, disabled account) are
//! negative *results*, not errors; [`LoginOutcome`] carries them.
//! [`AuthError`] is reserved for transport and protocol failures.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::User;

/// Transport and protocol errors from the authentication service
#[derive(Debug, Error)]
pub enum AuthError {
    /// The request never produced a response
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with an unexpected status
    #[error("service error {status}: {message}")]
    Service {
        /// HTTP status code
        status: u16,
        /// Human-readable message from the service, if any
        message: String,
    },

    /// The response body could not be decoded
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl AuthError {
    /// Check if this error is transient and worth retrying
    ///
    /// Status list matches the transport layer's transient failures:
    /// timeouts, rate limiting, and upstream unavailability.
    pub fn is_network_error(&self) -> bool {
        match self {
            AuthError::Network(_) => true,
            AuthError::Service { status, .. } => {
                matches!(status, 408 | 425 | 429 | 500 | 502 | 503 | 504 | 522 | 524)
            }
            AuthError::InvalidResponse(_) => false,
        }
    }
}

/// Error from a password-reset request
///
/// The service fails with a human-readable message meant to be shown
/// to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ResetError {
    /// Message suitable for display
    pub message: String,
}

impl ResetError {
    /// Create a reset error with a display message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The result of a login attempt
///
/// `success == false` is a normal negative outcome; `error` then holds
/// the service's message when it sent one. On success `user` is always
/// present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginOutcome {
    /// Whether the credentials were accepted
    pub success: bool,
    /// Failure message from the service, if any
    pub error: Option<String>,
    /// The authenticated user on success
    pub user: Option<User>,
}

impl LoginOutcome {
    /// A successful login for the given user
    pub fn accepted(user: User) -> Self {
        Self {
            success: true,
            error: None,
            user: Some(user),
        }
    }

    /// A rejected login with an optional service message
    pub fn rejected(error: Option<String>) -> Self {
        Self {
            success: false,
            error,
            user: None,
        }
    }
}

/// The authentication service as seen by the client
///
/// One implementation talks HTTP ([`crate::http::HttpAuthClient`]);
/// tests use [`crate::test_utils::StubAuthApi`].
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Attempt to log in with email and password
    ///
    /// Invalid credentials come back as `Ok` with
    /// `LoginOutcome::success == false`; `Err` means the attempt could
    /// not be completed at all.
    async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError>;

    /// Revoke the current session
    ///
    /// Callers treat this as best-effort: a failure is reported but
    /// must not keep the user signed in locally.
    async fn logout(&self) -> Result<(), AuthError>;

    /// Ask the service to email a password-reset link
    async fn request_password_reset(&self, email: &str) -> Result<(), ResetError>;

    /// Resolve the user for an existing session, if one is still valid
    async fn resume_session(&self) -> Result<Option<User>, AuthError>;
}
