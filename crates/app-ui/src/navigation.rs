//! Navigation system for Henteklar
//!
//! Destinations are typed routes; their parameters live inside the enum
//! variants. Main destinations swap in place, secondary destinations
//! push onto a back stack, and deep-link paths map onto destinations
//! through [`DeepLinkRouter`].

use serde::{Deserialize, Serialize};

// =============================================================================
// Destinations
// =============================================================================

/// How a destination is presented when navigated to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationMode {
    /// Replace the visible main screen in place, no back-stack entry
    Swap,
    /// Push onto the navigation stack with back support
    Stack,
}

/// All destinations in the application
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "destination", content = "params")]
pub enum Destination {
    // Unauthenticated flow
    /// Landing screen with the login entry point
    Landing,
    /// Login screen
    Login,

    // Main screens (parent)
    /// Parent overview of their own children
    MyChild,

    // Main screens (staff/admin)
    /// Staff overview of the whole group
    Dashboard,
    /// Check-in / check-out board
    CheckInOut,

    // Main screens (shared)
    /// Calendar of events and absences
    Calendar,
    /// Attendance history
    History,
    /// App settings
    Settings,

    // Secondary screens
    /// Detail view for one child
    ChildProfile {
        /// Child identifier
        child_id: String,
    },
    /// Register a new child
    AddChild,
    /// Edit an existing child
    EditChild {
        /// Child identifier
        child_id: String,
    },
}

impl Destination {
    /// How this destination is presented inside the authenticated flow
    pub fn presentation(&self) -> PresentationMode {
        match self {
            Destination::MyChild
            | Destination::Dashboard
            | Destination::CheckInOut
            | Destination::Calendar
            | Destination::History
            | Destination::Settings => PresentationMode::Swap,
            Destination::ChildProfile { .. }
            | Destination::AddChild
            | Destination::EditChild { .. } => PresentationMode::Stack,
            // Unauthenticated destinations never enter the in-app
            // switch; stack is the harmless answer if asked.
            Destination::Landing | Destination::Login => PresentationMode::Stack,
        }
    }

    /// Check if this destination requires an authenticated session
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Destination::Landing | Destination::Login)
    }

    /// Translation key for this destination's title
    pub fn title_key(&self) -> &'static str {
        match self {
            Destination::Landing => "nav.landing",
            Destination::Login => "nav.login",
            Destination::MyChild => "nav.myChild",
            Destination::Dashboard => "nav.overview",
            Destination::CheckInOut => "nav.checkInOut",
            Destination::Calendar => "nav.calendar",
            Destination::History => "nav.history",
            Destination::Settings => "nav.settings",
            Destination::ChildProfile { .. } => "nav.childProfile",
            Destination::AddChild => "nav.addChild",
            Destination::EditChild { .. } => "nav.editChild",
        }
    }

    /// Literal title used when no translation is available
    pub fn fallback_title(&self) -> &'static str {
        match self {
            Destination::Landing => "Henteklar",
            Destination::Login => "Logg inn",
            Destination::MyChild => "Mitt barn",
            Destination::Dashboard => "Oversikt",
            Destination::CheckInOut => "Inn/Ut-sjekk",
            Destination::Calendar => "Kalender",
            Destination::History => "Historikk",
            Destination::Settings => "Innstillinger",
            Destination::ChildProfile { .. } => "Barneprofil",
            Destination::AddChild => "Legg til barn",
            Destination::EditChild { .. } => "Rediger barn",
        }
    }

    /// Get the URL path for this destination
    pub fn to_path(&self) -> String {
        match self {
            Destination::Landing => "/".to_string(),
            Destination::Login => "/login".to_string(),
            Destination::MyChild => "/my-child".to_string(),
            Destination::Dashboard => "/dashboard".to_string(),
            Destination::CheckInOut => "/check-in-out".to_string(),
            Destination::Calendar => "/calendar".to_string(),
            Destination::History => "/history".to_string(),
            Destination::Settings => "/settings".to_string(),
            Destination::ChildProfile { child_id } => {
                format!("/children/{}", urlencoding::encode(child_id))
            }
            Destination::AddChild => "/children/new".to_string(),
            Destination::EditChild { child_id } => {
                format!("/children/{}/edit", urlencoding::encode(child_id))
            }
        }
    }
}

// =============================================================================
// Navigation Stack
// =============================================================================

/// A navigation stack entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackEntry {
    /// The destination
    pub destination: Destination,
    /// Unique key for this entry
    pub key: String,
}

impl StackEntry {
    /// Create a new stack entry
    pub fn new(destination: Destination) -> Self {
        Self {
            destination,
            key: uuid::Uuid::new_v4().to_string(),
        }
    }
}

/// Back stack for pushed (secondary) destinations
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NavigationStack {
    entries: Vec<StackEntry>,
}

impl NavigationStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a destination onto the stack
    pub fn push(&mut self, destination: Destination) {
        self.entries.push(StackEntry::new(destination));
    }

    /// Pop the top destination (returns false if already empty)
    pub fn pop(&mut self) -> bool {
        self.entries.pop().is_some()
    }

    /// Drop every pushed entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The top entry, if any
    pub fn top(&self) -> Option<&StackEntry> {
        self.entries.last()
    }

    /// Get stack depth
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Get all entries (bottom to top)
    pub fn entries(&self) -> &[StackEntry] {
        &self.entries
    }
}

// =============================================================================
// Navigator
// =============================================================================

/// Single navigation entry point for the authenticated flow
///
/// Dispatches on [`Destination::presentation`]: `Swap` destinations
/// replace the active main screen synchronously and never touch the
/// stack; `Stack` destinations push onto the back stack on top of the
/// active screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Navigator {
    /// The visible main screen when the stack is empty
    active: Destination,
    /// Role-dependent default, used when recovering from bad input
    default: Destination,
    /// Pushed secondary destinations
    stack: NavigationStack,
}

impl Navigator {
    /// Create a navigator starting at the given main destination
    pub fn new(default: Destination) -> Self {
        Self {
            active: default.clone(),
            default,
            stack: NavigationStack::new(),
        }
    }

    /// Navigate to a destination
    pub fn navigate(&mut self, destination: Destination) {
        if !destination.requires_auth() {
            tracing::warn!(
                destination = ?destination,
                "ignoring unauthenticated destination inside authenticated flow"
            );
            return;
        }
        match destination.presentation() {
            PresentationMode::Swap => self.active = destination,
            PresentationMode::Stack => self.stack.push(destination),
        }
    }

    /// Go back one pushed entry (returns false when nothing is pushed)
    pub fn go_back(&mut self) -> bool {
        self.stack.pop()
    }

    /// Pop all pushed entries, returning to the active main screen
    pub fn pop_to_main(&mut self) {
        self.stack.clear();
    }

    /// Return to the role default main screen, dropping pushed entries
    pub fn reset(&mut self) {
        self.active = self.default.clone();
        self.stack.clear();
    }

    /// The destination currently on screen
    pub fn current(&self) -> &Destination {
        match self.stack.top() {
            Some(entry) => &entry.destination,
            None => &self.active,
        }
    }

    /// The active main screen, regardless of pushed entries
    pub fn active_main(&self) -> &Destination {
        &self.active
    }

    /// The role default this navigator was created with
    pub fn default_destination(&self) -> &Destination {
        &self.default
    }

    /// Check if we can go back
    pub fn can_go_back(&self) -> bool {
        self.stack.depth() > 0
    }

    /// Depth of the pushed stack (0 when only the main screen shows)
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }
}

// =============================================================================
// Deep links
// =============================================================================

/// Maps URL-ish paths onto destinations
///
/// Unmatched paths return `None`; callers fall back to the role
/// default rather than rendering nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeepLinkRouter;

impl DeepLinkRouter {
    /// Create a new router
    pub fn new() -> Self {
        Self
    }

    /// Match a path to a destination
    pub fn match_path(&self, path: &str) -> Option<Destination> {
        let pathname = path.split('?').next().unwrap_or(path);
        let segments: Vec<&str> = pathname.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Some(Destination::Landing),
            ["login"] => Some(Destination::Login),
            ["my-child"] => Some(Destination::MyChild),
            ["dashboard"] => Some(Destination::Dashboard),
            ["check-in-out"] => Some(Destination::CheckInOut),
            ["calendar"] => Some(Destination::Calendar),
            ["history"] => Some(Destination::History),
            ["settings"] => Some(Destination::Settings),
            ["children", "new"] => Some(Destination::AddChild),
            ["children", id] => Some(Destination::ChildProfile {
                child_id: urlencoding::decode(id).ok()?.into_owned(),
            }),
            ["children", id, "edit"] => Some(Destination::EditChild {
                child_id: urlencoding::decode(id).ok()?.into_owned(),
            }),
            _ => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
