//! Login and password-reset interaction machines
//!
//! Both forms run as `Idle -> Submitting -> (Success | Error)`. Expected
//! authentication failures are values in the form state, never errors;
//! only an authentication-state change reaches the session router.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use app_state::SessionStore;
use auth_client::AuthApi;
use i18n::Translator;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

// =============================================================================
// Alerts
// =============================================================================

/// A blocking alert raised by a form
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    /// Alert title
    pub title: String,
    /// Alert body
    pub message: String,
}

/// Collaborator that presents blocking alerts
pub trait AlertSink: Send + Sync {
    /// Present an alert to the user
    fn alert(&self, title: &str, message: &str);
}

/// Alert sink that records alerts in memory
#[derive(Debug, Default)]
pub struct MemoryAlerts {
    alerts: Mutex<Vec<Alert>>,
}

impl MemoryAlerts {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain all recorded alerts
    pub fn take(&self) -> Vec<Alert> {
        std::mem::take(&mut *self.alerts.lock())
    }

    /// The most recent alert, if any
    pub fn last(&self) -> Option<Alert> {
        self.alerts.lock().last().cloned()
    }

    /// Number of alerts recorded so far
    pub fn len(&self) -> usize {
        self.alerts.lock().len()
    }

    /// Check whether no alerts have been recorded
    pub fn is_empty(&self) -> bool {
        self.alerts.lock().is_empty()
    }
}

impl AlertSink for MemoryAlerts {
    fn alert(&self, title: &str, message: &str) {
        self.alerts.lock().push(Alert {
            title: title.to_string(),
            message: message.to_string(),
        });
    }
}

// =============================================================================
// Login form
// =============================================================================

/// A focusable login field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormField {
    /// Email input
    Email,
    /// Password input
    Password,
}

/// Observable state of the login form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginFormState {
    /// Email input value
    pub email: String,
    /// Password input value
    pub password: String,
    /// Whether the password is shown as plain text
    pub show_password: bool,
    /// Which field has focus, if any
    pub focused: Option<FormField>,
    /// Remember-me checkbox, on by default
    pub remember_me: bool,
    /// Inline error message, if the last submission failed
    pub error: Option<String>,
    /// True from submission start until failure or flow teardown
    pub is_submitting: bool,
    /// Whether the forgot-password modal is open
    pub forgot_open: bool,
}

impl Default for LoginFormState {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            show_password: false,
            focused: None,
            remember_me: true,
            error: None,
            is_submitting: false,
            forgot_open: false,
        }
    }
}

/// Result of a login submit request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Credentials accepted; the session router takes over
    Accepted,
    /// Credentials rejected; the error landed in the form state
    Rejected,
    /// A field was empty; no network call was made
    ValidationFailed,
    /// A submission was already in flight; this one was dropped
    Ignored,
}

/// The login interaction machine
///
/// On success the form does not navigate and `is_submitting` stays set;
/// the session router observes the session change and replaces the
/// whole flow.
pub struct LoginForm {
    store: SessionStore,
    translator: Arc<Translator>,
    state: Mutex<LoginFormState>,
    mounted: AtomicBool,
    reset: ResetForm,
}

impl LoginForm {
    /// Create a login form over the session store
    pub fn new(
        store: SessionStore,
        api: Arc<dyn AuthApi>,
        translator: Arc<Translator>,
        alerts: Arc<dyn AlertSink>,
    ) -> Self {
        Self {
            store,
            translator: Arc::clone(&translator),
            state: Mutex::new(LoginFormState::default()),
            mounted: AtomicBool::new(true),
            reset: ResetForm::new(api, translator, alerts),
        }
    }

    /// A snapshot of the current form state
    pub fn state(&self) -> LoginFormState {
        self.state.lock().clone()
    }

    /// The password-reset machine behind the forgot-password modal
    pub fn reset_form(&self) -> &ResetForm {
        &self.reset
    }

    /// Update the email field; clears any previous error
    pub fn set_email(&self, email: &str) {
        let mut state = self.state.lock();
        state.email = email.to_string();
        state.error = None;
    }

    /// Update the password field; clears any previous error
    pub fn set_password(&self, password: &str) {
        let mut state = self.state.lock();
        state.password = password.to_string();
        state.error = None;
    }

    /// Toggle password visibility
    pub fn toggle_show_password(&self) {
        let mut state = self.state.lock();
        state.show_password = !state.show_password;
    }

    /// Move focus to a field, or blur with `None`
    pub fn set_focus(&self, field: Option<FormField>) {
        self.state.lock().focused = field;
    }

    /// Toggle the remember-me checkbox
    pub fn set_remember_me(&self, remember: bool) {
        self.state.lock().remember_me = remember;
    }

    /// Open the forgot-password modal
    pub fn open_forgot(&self) {
        self.state.lock().forgot_open = true;
    }

    /// Close the forgot-password modal, clearing its state entirely
    pub fn close_forgot(&self) {
        self.state.lock().forgot_open = false;
        self.reset.clear();
    }

    /// Submit the form
    ///
    /// `is_submitting` flips under the state lock before the first
    /// await, so rapid repeated submissions reach the service at most
    /// once per completed cycle.
    pub async fn submit(&self) -> SubmitOutcome {
        let (email, password) = {
            let mut state = self.state.lock();
            if state.is_submitting {
                return SubmitOutcome::Ignored;
            }
            if state.email.trim().is_empty() || state.password.is_empty() {
                state.error = Some(self.translator.t("loginPage.fillAllFields"));
                return SubmitOutcome::ValidationFailed;
            }
            state.error = None;
            state.is_submitting = true;
            (state.email.clone(), state.password.clone())
        };

        let outcome = self.store.login(&email, &password).await;

        if !self.mounted.load(Ordering::SeqCst) {
            // The flow was torn down while the call was in flight;
            // the result must not touch dead form state.
            return SubmitOutcome::Ignored;
        }

        if outcome.success {
            // is_submitting stays set; the flow is about to be
            // replaced by the session router.
            SubmitOutcome::Accepted
        } else {
            let mut state = self.state.lock();
            state.error = Some(
                outcome
                    .error
                    .unwrap_or_else(|| self.translator.t("loginPage.loginError")),
            );
            state.is_submitting = false;
            SubmitOutcome::Rejected
        }
    }

    /// Reset the form to its initial state
    ///
    /// Called when the login screen is left; coming back starts with a
    /// blank form, as if freshly mounted.
    pub fn clear(&self) {
        *self.state.lock() = LoginFormState::default();
        self.reset.clear();
    }

    /// Mark the form as torn down; late results are dropped
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
        self.reset.unmount();
    }
}

// =============================================================================
// Password reset form
// =============================================================================

/// Observable state of the password-reset modal
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResetFormState {
    /// Email input value
    pub email: String,
    /// Whether a reset request is in flight
    pub is_submitting: bool,
    /// Terminal state after a successful send
    pub is_sent: bool,
}

/// The password-reset interaction machine
///
/// `is_sent` is terminal; sending again requires closing the modal,
/// which clears the state entirely.
pub struct ResetForm {
    api: Arc<dyn AuthApi>,
    translator: Arc<Translator>,
    alerts: Arc<dyn AlertSink>,
    state: Mutex<ResetFormState>,
    mounted: AtomicBool,
}

impl ResetForm {
    /// Create a reset form over the authentication service
    pub fn new(
        api: Arc<dyn AuthApi>,
        translator: Arc<Translator>,
        alerts: Arc<dyn AlertSink>,
    ) -> Self {
        Self {
            api,
            translator,
            alerts,
            state: Mutex::new(ResetFormState::default()),
            mounted: AtomicBool::new(true),
        }
    }

    /// A snapshot of the current state
    pub fn state(&self) -> ResetFormState {
        self.state.lock().clone()
    }

    /// Update the email field
    pub fn set_email(&self, email: &str) {
        self.state.lock().email = email.to_string();
    }

    /// Clear the state entirely, as when the modal closes
    pub fn clear(&self) {
        *self.state.lock() = ResetFormState::default();
    }

    /// Submit the reset request
    ///
    /// A coarse syntactic check gates the call: an address without '@'
    /// raises a blocking alert and never reaches the service.
    pub async fn submit(&self) {
        let email = {
            let mut state = self.state.lock();
            if state.is_submitting || state.is_sent {
                return;
            }
            if !state.email.contains('@') {
                drop(state);
                self.alerts.alert(
                    &self.translator.t("loginPage.error"),
                    &self.translator.t("loginPage.invalidEmail"),
                );
                return;
            }
            state.is_submitting = true;
            state.email.clone()
        };

        let result = self.api.request_password_reset(&email).await;

        if !self.mounted.load(Ordering::SeqCst) {
            return;
        }

        let mut state = self.state.lock();
        state.is_submitting = false;
        match result {
            Ok(()) => state.is_sent = true,
            Err(e) => {
                drop(state);
                tracing::warn!(error = %e, "password reset request failed");
                self.alerts
                    .alert(&self.translator.t("loginPage.error"), &e.message);
            }
        }
    }

    fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use auth_client::test_utils::{users, StubAuthApi};
    use auth_client::{AuthError, LoginOutcome, ResetError, User};
    use mockall::mock;

    mock! {
        Api {}

        #[async_trait::async_trait]
        impl AuthApi for Api {
            async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError>;
            async fn logout(&self) -> Result<(), AuthError>;
            async fn request_password_reset(&self, email: &str) -> Result<(), ResetError>;
            async fn resume_session(&self) -> Result<Option<User>, AuthError>;
        }
    }

    struct Fixture {
        stub: Arc<StubAuthApi>,
        alerts: Arc<MemoryAlerts>,
        form: LoginForm,
    }

    fn fixture() -> Fixture {
        let stub = Arc::new(StubAuthApi::new());
        let alerts = Arc::new(MemoryAlerts::new());
        let api: Arc<dyn AuthApi> = Arc::clone(&stub) as Arc<dyn AuthApi>;
        let form = LoginForm::new(
            SessionStore::new(Arc::clone(&api)),
            api,
            Arc::new(Translator::default()),
            Arc::clone(&alerts) as Arc<dyn AlertSink>,
        );
        Fixture { stub, alerts, form }
    }

    #[tokio::test]
    async fn test_submit_forwards_credentials() {
        let mut mock = MockApi::new();
        mock.expect_login()
            .withf(|email, password| email == "kari@example.no" && password == "pw")
            .times(1)
            .returning(|_, _| Ok(LoginOutcome::rejected(None)));
        let api: Arc<dyn AuthApi> = Arc::new(mock);

        let form = LoginForm::new(
            SessionStore::new(Arc::clone(&api)),
            api,
            Arc::new(Translator::default()),
            Arc::new(MemoryAlerts::new()),
        );
        form.set_email("kari@example.no");
        form.set_password("pw");
        assert_eq!(form.submit().await, SubmitOutcome::Rejected);
    }

    #[tokio::test]
    async fn test_defaults() {
        let f = fixture();
        let state = f.form.state();
        assert!(state.remember_me);
        assert!(!state.is_submitting);
        assert!(state.error.is_none());
        assert!(!state.forgot_open);
    }

    #[tokio::test]
    async fn test_empty_fields_never_reach_the_service() {
        let f = fixture();
        f.form.set_email("kari@example.no");

        let outcome = f.form.submit().await;
        assert_eq!(outcome, SubmitOutcome::ValidationFailed);
        assert_eq!(
            f.form.state().error.as_deref(),
            Some("Fyll ut alle feltene")
        );
        assert_eq!(f.stub.login_calls(), 0);
    }

    #[tokio::test]
    async fn test_rejected_login_sets_error_and_reenables() {
        let f = fixture();
        f.stub
            .queue_login(LoginOutcome::rejected(Some("bad credentials".into())));
        f.form.set_email("kari@example.no");
        f.form.set_password("feil");

        let outcome = f.form.submit().await;
        assert_eq!(outcome, SubmitOutcome::Rejected);
        let state = f.form.state();
        assert_eq!(state.error.as_deref(), Some("bad credentials"));
        assert!(!state.is_submitting);
    }

    #[tokio::test]
    async fn test_rejected_login_without_message_uses_default() {
        let f = fixture();
        f.stub.queue_login(LoginOutcome::rejected(None));
        f.form.set_email("kari@example.no");
        f.form.set_password("feil");

        f.form.submit().await;
        assert_eq!(
            f.form.state().error.as_deref(),
            Some("Innlogging feilet. Prøv igjen.")
        );
    }

    #[tokio::test]
    async fn test_accepted_login_keeps_submitting_set() {
        let f = fixture();
        f.stub.queue_login(LoginOutcome::accepted(users::parent()));
        f.form.set_email("kari@example.no");
        f.form.set_password("riktig");

        let outcome = f.form.submit().await;
        assert_eq!(outcome, SubmitOutcome::Accepted);
        let state = f.form.state();
        assert!(state.is_submitting);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_editing_a_field_clears_the_error() {
        let f = fixture();
        f.stub.queue_login(LoginOutcome::rejected(None));
        f.form.set_email("kari@example.no");
        f.form.set_password("feil");
        f.form.submit().await;
        assert!(f.form.state().error.is_some());

        f.form.set_password("nytt");
        assert!(f.form.state().error.is_none());
    }

    #[tokio::test]
    async fn test_double_submit_calls_service_once() {
        let f = fixture();
        f.stub.queue_login(LoginOutcome::accepted(users::parent()));
        let gate = f.stub.hold_next();
        f.form.set_email("kari@example.no");
        f.form.set_password("pw");

        let form = Arc::new(f.form);
        let first = tokio::spawn({
            let form = Arc::clone(&form);
            async move { form.submit().await }
        });
        tokio::task::yield_now().await;

        // Second tap while the first call is pending.
        assert_eq!(form.submit().await, SubmitOutcome::Ignored);

        gate.notify_one();
        assert_eq!(first.await.unwrap(), SubmitOutcome::Accepted);
        assert_eq!(f.stub.login_calls(), 1);
    }

    #[tokio::test]
    async fn test_unmounted_form_drops_late_results() {
        let f = fixture();
        f.stub
            .queue_login(LoginOutcome::rejected(Some("late".into())));
        let gate = f.stub.hold_next();
        f.form.set_email("kari@example.no");
        f.form.set_password("pw");

        let form = Arc::new(f.form);
        let pending = tokio::spawn({
            let form = Arc::clone(&form);
            async move { form.submit().await }
        });
        tokio::task::yield_now().await;

        form.unmount();
        gate.notify_one();

        assert_eq!(pending.await.unwrap(), SubmitOutcome::Ignored);
        assert!(form.state().error.is_none());
    }

    #[tokio::test]
    async fn test_reset_guards_invalid_email_with_alert() {
        let f = fixture();
        let reset = f.form.reset_form();
        reset.set_email("not-an-email");

        reset.submit().await;
        assert_eq!(f.stub.reset_calls(), 0);
        let alert = f.alerts.last().unwrap();
        assert_eq!(alert.message, "Skriv inn en gyldig e-postadresse");
        assert!(!reset.state().is_sent);
    }

    #[tokio::test]
    async fn test_reset_success_is_terminal_until_closed() {
        let f = fixture();
        f.stub.queue_reset(Ok(()));
        f.form.open_forgot();
        let reset = f.form.reset_form();
        reset.set_email("a@b.com");

        reset.submit().await;
        assert!(reset.state().is_sent);

        // A second submit in the sent state is a no-op.
        reset.submit().await;
        assert_eq!(f.stub.reset_calls(), 1);

        f.form.close_forgot();
        assert_eq!(reset.state(), ResetFormState::default());
        assert!(!f.form.state().forgot_open);
    }

    #[tokio::test]
    async fn test_reset_double_tap_calls_service_once() {
        let f = fixture();
        f.stub.queue_reset(Ok(()));
        let gate = f.stub.hold_next();
        let form = Arc::new(f.form);
        form.reset_form().set_email("a@b.com");

        let first = tokio::spawn({
            let form = Arc::clone(&form);
            async move { form.reset_form().submit().await }
        });
        tokio::task::yield_now().await;

        form.reset_form().submit().await;
        gate.notify_one();
        first.await.unwrap();

        assert_eq!(f.stub.reset_calls(), 1);
        assert!(form.reset_form().state().is_sent);
    }

    #[tokio::test]
    async fn test_reset_failure_raises_alert_and_reenables() {
        let f = fixture();
        f.stub.queue_reset(Err(ResetError::new(
            "Fant ingen bruker med denne e-posten",
        )));
        let reset = f.form.reset_form();
        reset.set_email("ukjent@example.no");

        reset.submit().await;
        let state = reset.state();
        assert!(!state.is_submitting);
        assert!(!state.is_sent);
        assert_eq!(
            f.alerts.last().unwrap().message,
            "Fant ingen bruker med denne e-posten"
        );
    }
}
