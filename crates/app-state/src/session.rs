//! Session state and the auth-state source adapter
//!
//! [`SessionStore`] wraps the authentication service behind a watch
//! channel of [`Session`] snapshots. The UI reads snapshots and
//! triggers transitions through `login`/`logout`; it never mutates the
//! session directly.

use std::sync::Arc;

use auth_client::{AuthApi, LoginOutcome, User};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// A snapshot of the current authentication state
///
/// While `is_loading` is true the authentication status is
/// indeterminate and no routing decision may be based on
/// `is_authenticated`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Whether a user is signed in
    pub is_authenticated: bool,
    /// Whether the initial session resolution is still pending
    pub is_loading: bool,
    /// The signed-in user, when authenticated
    pub user: Option<User>,
}

impl Session {
    /// The initial, indeterminate state
    pub fn loading() -> Self {
        Self {
            is_authenticated: false,
            is_loading: true,
            user: None,
        }
    }

    /// No user signed in
    pub fn signed_out() -> Self {
        Self {
            is_authenticated: false,
            is_loading: false,
            user: None,
        }
    }

    /// A resolved, authenticated session
    pub fn signed_in(user: User) -> Self {
        Self {
            is_authenticated: true,
            is_loading: false,
            user: Some(user),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::loading()
    }
}

struct Inner {
    api: Arc<dyn AuthApi>,
    tx: watch::Sender<Session>,
}

/// Observable session state backed by the authentication service
///
/// Cheap to clone; all clones share the same state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    /// Create a store in the loading state
    pub fn new(api: Arc<dyn AuthApi>) -> Self {
        let (tx, _rx) = watch::channel(Session::loading());
        Self {
            inner: Arc::new(Inner { api, tx }),
        }
    }

    /// The current session snapshot
    pub fn current(&self) -> Session {
        self.inner.tx.borrow().clone()
    }

    /// Subscribe to session changes
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.tx.subscribe()
    }

    /// Resolve the initial loading state
    ///
    /// Asks the service whether an existing session is still valid.
    /// A failure resolves to signed-out; startup must never hang on
    /// the loading screen.
    pub async fn resume(&self) {
        let next = match self.inner.api.resume_session().await {
            Ok(Some(user)) => {
                tracing::info!(user = %user.id, "resumed existing session");
                Session::signed_in(user)
            }
            Ok(None) => Session::signed_out(),
            Err(e) => {
                tracing::warn!(error = %e, "session resume failed; treating as signed out");
                Session::signed_out()
            }
        };
        self.inner.tx.send_replace(next);
    }

    /// Attempt a login and update the session on success
    ///
    /// The returned outcome is for the caller's form state; routing
    /// reacts to the session change, not to this return value.
    /// Transport errors fold into a rejected outcome so the form layer
    /// sees a single failure shape.
    pub async fn login(&self, email: &str, password: &str) -> LoginOutcome {
        let outcome = match self.inner.api.login(email, password).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = %e, "login transport failure");
                LoginOutcome::rejected(Some(e.to_string()))
            }
        };

        if !outcome.success {
            return outcome;
        }
        match outcome.user.clone() {
            Some(user) => {
                tracing::info!(user = %user.id, "login accepted");
                self.inner.tx.send_replace(Session::signed_in(user));
                outcome
            }
            None => {
                // The service accepted the credentials but sent no
                // identity; without one no authenticated flow can be
                // mounted, so the attempt counts as failed.
                tracing::warn!("login succeeded without a user payload");
                LoginOutcome::rejected(None)
            }
        }
    }

    /// Sign out, best-effort
    ///
    /// Local state clears immediately; a failed remote revocation is
    /// logged and otherwise ignored.
    pub async fn logout(&self) {
        self.inner.tx.send_replace(Session::signed_out());
        if let Err(e) = self.inner.api.logout().await {
            tracing::warn!(error = %e, "remote logout failed; local session already cleared");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth_client::test_utils::{users, StubAuthApi};
    use auth_client::AuthError;

    fn store_with(stub: Arc<StubAuthApi>) -> SessionStore {
        SessionStore::new(stub)
    }

    #[tokio::test]
    async fn test_starts_loading() {
        let store = store_with(Arc::new(StubAuthApi::new()));
        let session = store.current();
        assert!(session.is_loading);
        assert!(!session.is_authenticated);
        assert!(session.user.is_none());
    }

    #[tokio::test]
    async fn test_resume_without_session_signs_out() {
        let store = store_with(Arc::new(StubAuthApi::new()));
        store.resume().await;
        assert_eq!(store.current(), Session::signed_out());
    }

    #[tokio::test]
    async fn test_resume_with_session_signs_in() {
        let stub = Arc::new(StubAuthApi::new());
        stub.set_resume_user(Some(users::parent()));
        let store = store_with(Arc::clone(&stub));

        store.resume().await;
        let session = store.current();
        assert!(session.is_authenticated);
        assert_eq!(session.user, Some(users::parent()));
    }

    #[tokio::test]
    async fn test_login_success_flips_session() {
        let stub = Arc::new(StubAuthApi::new());
        stub.queue_login(LoginOutcome::accepted(users::staff()));
        let store = store_with(Arc::clone(&stub));
        store.resume().await;

        let mut rx = store.subscribe();
        rx.mark_unchanged();

        let outcome = store.login("ola@example.no", "pw").await;
        assert!(outcome.success);
        assert!(rx.has_changed().unwrap());
        assert!(store.current().is_authenticated);
    }

    #[tokio::test]
    async fn test_login_failure_leaves_session_signed_out() {
        let stub = Arc::new(StubAuthApi::new());
        stub.queue_login(LoginOutcome::rejected(Some("bad credentials".into())));
        let store = store_with(Arc::clone(&stub));
        store.resume().await;

        let outcome = store.login("kari@example.no", "feil").await;
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("bad credentials"));
        assert_eq!(store.current(), Session::signed_out());
    }

    #[tokio::test]
    async fn test_login_transport_error_folds_into_outcome() {
        let stub = Arc::new(StubAuthApi::new());
        stub.queue_login_error(AuthError::Network("connection refused".into()));
        let store = store_with(Arc::clone(&stub));
        store.resume().await;

        let outcome = store.login("kari@example.no", "pw").await;
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("connection refused"));
        assert!(!store.current().is_authenticated);
    }

    #[tokio::test]
    async fn test_login_success_without_user_is_rejected() {
        let stub = Arc::new(StubAuthApi::new());
        stub.queue_login(LoginOutcome {
            success: true,
            error: None,
            user: None,
        });
        let store = store_with(Arc::clone(&stub));
        store.resume().await;

        let outcome = store.login("kari@example.no", "pw").await;
        assert!(!outcome.success);
        assert!(!store.current().is_authenticated);
    }

    #[tokio::test]
    async fn test_logout_clears_locally_even_if_remote_fails() {
        let stub = Arc::new(StubAuthApi::new());
        stub.queue_login(LoginOutcome::accepted(users::admin()));
        let store = store_with(Arc::clone(&stub));
        store.resume().await;
        store.login("anne@example.no", "pw").await;
        assert!(store.current().is_authenticated);

        store.logout().await;
        assert_eq!(store.current(), Session::signed_out());
        assert_eq!(stub.logout_calls(), 1);
    }
}
