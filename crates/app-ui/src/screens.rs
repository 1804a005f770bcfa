//! Screen registry and the in-place screen switch

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::navigation::{Destination, PresentationMode};

/// A renderable screen
///
/// Rendering is abstract here; a screen reports its identity and
/// produces a render payload the host shell can display.
pub trait Screen: Send + Sync {
    /// Stable identifier, used for logging
    fn name(&self) -> &'static str;

    /// Produce the render payload for a destination
    ///
    /// The destination carries any parameters (child id etc.).
    fn render(&self, destination: &Destination) -> RenderOutput;
}

/// The payload a screen hands to the host shell
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    /// Screen identifier
    pub screen: &'static str,
    /// Title shown in the header
    pub title: String,
}

/// Fixed mapping from destinations to screens
///
/// Keyed by the destination's path shape, not its parameters, so
/// `ChildProfile { child_id: "a" }` and `ChildProfile { child_id: "b" }`
/// resolve to the same screen.
#[derive(Default)]
pub struct ScreenRegistry {
    screens: HashMap<&'static str, Arc<dyn Screen>>,
}

impl fmt::Debug for ScreenRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenRegistry")
            .field("screens", &self.screens.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ScreenRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a screen under a destination key
    pub fn register(&mut self, key: &'static str, screen: Arc<dyn Screen>) {
        self.screens.insert(key, screen);
    }

    /// Look up the screen for a destination
    pub fn get(&self, destination: &Destination) -> Option<&Arc<dyn Screen>> {
        self.screens.get(registry_key(destination))
    }

    /// Number of registered screens
    pub fn len(&self) -> usize {
        self.screens.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }
}

/// Registry key for a destination, ignoring parameters
pub fn registry_key(destination: &Destination) -> &'static str {
    match destination {
        Destination::Landing => "landing",
        Destination::Login => "login",
        Destination::MyChild => "my_child",
        Destination::Dashboard => "dashboard",
        Destination::CheckInOut => "check_in_out",
        Destination::Calendar => "calendar",
        Destination::History => "history",
        Destination::Settings => "settings",
        Destination::ChildProfile { .. } => "child_profile",
        Destination::AddChild => "add_child",
        Destination::EditChild { .. } => "edit_child",
    }
}

/// Resolves the screen for the current destination
///
/// A destination with no registered screen falls back to the role
/// default instead of rendering nothing.
#[derive(Debug)]
pub struct ScreenSwitch {
    registry: ScreenRegistry,
    default: Destination,
}

impl ScreenSwitch {
    /// Create a switch over a registry with a role default
    pub fn new(registry: ScreenRegistry, default: Destination) -> Self {
        debug_assert_eq!(default.presentation(), PresentationMode::Swap);
        Self { registry, default }
    }

    /// Render the screen for a destination
    pub fn render(&self, destination: &Destination) -> RenderOutput {
        if let Some(screen) = self.registry.get(destination) {
            return screen.render(destination);
        }
        tracing::warn!(
            destination = ?destination,
            "no screen registered; falling back to role default"
        );
        match self.registry.get(&self.default) {
            Some(screen) => screen.render(&self.default),
            None => RenderOutput {
                screen: "missing",
                title: self.default.fallback_title().to_string(),
            },
        }
    }

    /// The fallback destination
    pub fn default_destination(&self) -> &Destination {
        &self.default
    }
}

/// A screen that renders only its destination title
///
/// Stands in for real screens in the shell wiring and in tests.
#[derive(Debug, Clone)]
pub struct PlaceholderScreen {
    name: &'static str,
}

impl PlaceholderScreen {
    /// Create a placeholder with a stable name
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Screen for PlaceholderScreen {
    fn name(&self) -> &'static str {
        self.name
    }

    fn render(&self, destination: &Destination) -> RenderOutput {
        RenderOutput {
            screen: self.name,
            title: destination.fallback_title().to_string(),
        }
    }
}

/// Registry with a placeholder screen for every in-app destination
pub fn default_registry() -> ScreenRegistry {
    let mut registry = ScreenRegistry::new();
    for key in [
        "my_child",
        "dashboard",
        "check_in_out",
        "calendar",
        "history",
        "settings",
        "child_profile",
        "add_child",
        "edit_child",
    ] {
        registry.register(key, Arc::new(PlaceholderScreen::new(key)));
    }
    registry
}
