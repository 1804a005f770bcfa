//! User interface layer for Henteklar
//!
//! This crate decides which screen the user may see at any moment. The
//! session router maps authentication state onto a loading screen, the
//! unauthenticated landing/login flow, or the authenticated in-app
//! flow; the role menu, navigator, and screen switch live inside the
//! authenticated flow and are rebuilt from scratch for every session.
//!
//! # Modules
//!
//! - [`router`] - Session router and flow containers
//! - [`menu`] - Role-based menu resolver and header view-model
//! - [`navigation`] - Destinations, navigator, and deep links
//! - [`screens`] - Screen registry and the in-place screen switch
//! - [`login`] - Login and password-reset interaction machines
//! - [`theme`] - Theme selection

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod login;
pub mod menu;
pub mod navigation;
pub mod router;
pub mod screens;
pub mod theme;

// Re-export commonly used types
pub use login::{
    Alert, AlertSink, FormField, LoginForm, LoginFormState, MemoryAlerts, ResetForm,
    ResetFormState, SubmitOutcome,
};

pub use menu::{resolve_menu, Header, HeaderTab, Menu, NavItem};

pub use navigation::{
    DeepLinkRouter, Destination, NavigationStack, Navigator, PresentationMode, StackEntry,
};

pub use router::{
    AuthenticatedFlow, RenderState, RouterDeps, SessionRouter, UnauthenticatedFlow,
};

pub use screens::{
    default_registry, registry_key, PlaceholderScreen, RenderOutput, Screen, ScreenRegistry,
    ScreenSwitch,
};

pub use theme::{ColorScheme, ThemeName, ThemeState};
