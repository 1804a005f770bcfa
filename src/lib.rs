//! Henteklar application wiring
//!
//! Assembles the authentication client, session store, session router,
//! translator, and theme state into one [`App`]. Member crates carry
//! the behavior; this crate only connects them.

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::sync::Arc;

use app_state::SessionStore;
use app_ui::{AlertSink, MemoryAlerts, RenderState, RouterDeps, SessionRouter, ThemeState};
use auth_client::AuthApi;
use i18n::{negotiate, LanguageIdentifier, Translator};
use parking_lot::Mutex;

/// Install the global tracing subscriber
///
/// Filter comes from `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
}

/// The assembled application
pub struct App {
    store: SessionStore,
    router: SessionRouter,
    translator: Arc<Translator>,
    theme: Mutex<ThemeState>,
}

impl App {
    /// Assemble the application around an authentication service
    ///
    /// The locale is negotiated against the built-in catalogs; alerts
    /// go to the given sink.
    pub fn new(
        api: Arc<dyn AuthApi>,
        alerts: Arc<dyn AlertSink>,
        requested_locales: &[LanguageIdentifier],
    ) -> anyhow::Result<Self> {
        let locale = negotiate(requested_locales);
        let translator = Arc::new(Translator::builtin(locale)?);
        let store = SessionStore::new(Arc::clone(&api));
        let router = SessionRouter::new(RouterDeps {
            store: store.clone(),
            api,
            translator: Arc::clone(&translator),
            alerts,
        });
        Ok(Self {
            store,
            router,
            translator,
            theme: Mutex::new(ThemeState::default()),
        })
    }

    /// Assemble with defaults: Norwegian locale, in-memory alerts
    pub fn with_defaults(api: Arc<dyn AuthApi>) -> anyhow::Result<Self> {
        Self::new(api, Arc::new(MemoryAlerts::new()), &[])
    }

    /// The session store
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// The shared translator
    pub fn translator(&self) -> &Arc<Translator> {
        &self.translator
    }

    /// Toggle between light and dark theme, returning the new state
    pub fn toggle_theme(&self) -> ThemeState {
        let mut theme = self.theme.lock();
        theme.toggle();
        theme.clone()
    }

    /// The current theme state
    pub fn theme(&self) -> ThemeState {
        self.theme.lock().clone()
    }

    /// Resolve the initial session and route on it
    pub async fn start(&self) -> RenderState {
        self.store.resume().await;
        self.sync()
    }

    /// Apply the current session snapshot to the router
    pub fn sync(&self) -> RenderState {
        self.router.apply(&self.store.current())
    }

    /// The current render state without re-applying the session
    pub fn render_state(&self) -> RenderState {
        self.router.current()
    }

    /// Sign out and route back to the unauthenticated flow
    pub async fn logout(&self) -> RenderState {
        self.store.logout().await;
        self.sync()
    }

    /// Apply every session change until the store is dropped
    ///
    /// Long-running companion to event-driven [`App::sync`] calls; the
    /// host shell spawns this once and reads render states elsewhere.
    pub async fn watch_sessions(&self) {
        let mut rx = self.store.subscribe();
        loop {
            let session = rx.borrow_and_update().clone();
            self.router.apply(&session);
            if rx.changed().await.is_err() {
                break;
            }
        }
    }
}
