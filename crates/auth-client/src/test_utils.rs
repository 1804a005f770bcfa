//! Test utilities and fixtures for authentication testing
//!
//! This module provides fixture users and a programmable stub
//! implementation of [`AuthApi`] used across the workspace's tests.

#![allow(dead_code)] // Test utilities may not all be used yet

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::api::{AuthApi, AuthError, LoginOutcome, ResetError};
use crate::types::{Role, User};

/// Fixture users for use in tests
pub mod users {
    use super::*;

    /// A parent with one child at the kindergarten
    pub fn parent() -> User {
        User::new("user-parent-1", "Kari Nordmann", Some(Role::Parent))
    }

    /// A staff member
    pub fn staff() -> User {
        User::new("user-staff-1", "Ola Hansen", Some(Role::Staff))
    }

    /// An administrator
    pub fn admin() -> User {
        User::new("user-admin-1", "Anne Lise Berg", Some(Role::Admin))
    }

    /// A user whose role the client does not recognize
    pub fn unknown_role() -> User {
        User::new("user-unknown-1", "Per Olsen", None)
    }
}

/// Programmable stub implementation of [`AuthApi`]
///
/// Outcomes are queued per operation; calls are counted; and
/// [`StubAuthApi::hold_next`] parks the next call until released so
/// tests can observe in-flight submission state.
#[derive(Default)]
pub struct StubAuthApi {
    login_results: Mutex<VecDeque<Result<LoginOutcome, AuthError>>>,
    reset_results: Mutex<VecDeque<Result<(), ResetError>>>,
    resume_user: Mutex<Option<User>>,
    gate: Mutex<Option<Arc<Notify>>>,
    login_calls: AtomicUsize,
    logout_calls: AtomicUsize,
    reset_calls: AtomicUsize,
}

impl StubAuthApi {
    /// Create a stub with nothing queued
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome of the next login call
    pub fn queue_login(&self, outcome: LoginOutcome) {
        self.login_results.lock().unwrap().push_back(Ok(outcome));
    }

    /// Queue a transport error for the next login call
    pub fn queue_login_error(&self, error: AuthError) {
        self.login_results.lock().unwrap().push_back(Err(error));
    }

    /// Queue the result of the next password-reset call
    pub fn queue_reset(&self, result: Result<(), ResetError>) {
        self.reset_results.lock().unwrap().push_back(result);
    }

    /// Set the user returned by `resume_session`
    pub fn set_resume_user(&self, user: Option<User>) {
        *self.resume_user.lock().unwrap() = user;
    }

    /// Park the next API call until the returned handle is notified
    pub fn hold_next(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    /// Number of completed login calls
    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    /// Number of logout calls
    pub fn logout_calls(&self) -> usize {
        self.logout_calls.load(Ordering::SeqCst)
    }

    /// Number of password-reset calls
    pub fn reset_calls(&self) -> usize {
        self.reset_calls.load(Ordering::SeqCst)
    }

    async fn wait_if_held(&self) {
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl AuthApi for StubAuthApi {
    async fn login(&self, _email: &str, _password: &str) -> Result<LoginOutcome, AuthError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_if_held().await;
        self.login_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(LoginOutcome::rejected(Some("no queued outcome".into()))))
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_if_held().await;
        Ok(())
    }

    async fn request_password_reset(&self, _email: &str) -> Result<(), ResetError> {
        self.reset_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_if_held().await;
        self.reset_results.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    async fn resume_session(&self) -> Result<Option<User>, AuthError> {
        self.wait_if_held().await;
        Ok(self.resume_user.lock().unwrap().clone())
    }
}
