//! Role-based menu resolution and the header view-model

use auth_client::Role;
use i18n::Translator;
use serde::Serialize;

use crate::navigation::Destination;

// =============================================================================
// Menu items
// =============================================================================

/// One entry in the main navigation menu
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavItem {
    /// Where the entry navigates
    pub destination: Destination,
    /// Translation key for the label
    pub label_key: &'static str,
    /// Literal label used when no translation is available
    pub fallback_label: &'static str,
    /// Icon name
    pub icon: &'static str,
}

impl NavItem {
    fn new(destination: Destination, icon: &'static str) -> Self {
        Self {
            label_key: destination.title_key(),
            fallback_label: destination.fallback_title(),
            destination,
            icon,
        }
    }

    /// Resolve the display label, never empty
    pub fn label(&self, translator: &Translator) -> String {
        translator.t_or(self.label_key, self.fallback_label)
    }
}

/// A resolved menu: ordered items plus the role default destination
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Menu {
    /// Items in left-to-right tab order
    pub items: Vec<NavItem>,
    /// Destination shown when the authenticated flow mounts
    pub default: Destination,
}

impl Menu {
    /// Check whether a destination is one of this menu's entries
    pub fn contains(&self, destination: &Destination) -> bool {
        self.items.iter().any(|item| item.destination == *destination)
    }
}

/// Resolve the menu for a role
///
/// Parents see their own children; everyone else (staff, admins, and
/// sessions with an unrecognized role) sees the broader staff menu.
pub fn resolve_menu(role: Option<Role>) -> Menu {
    match role {
        Some(Role::Parent) => Menu {
            items: vec![
                NavItem::new(Destination::MyChild, "child"),
                NavItem::new(Destination::Calendar, "calendar"),
                NavItem::new(Destination::History, "clock"),
                NavItem::new(Destination::Settings, "gear"),
            ],
            default: Destination::MyChild,
        },
        Some(Role::Staff) | Some(Role::Admin) => staff_menu(),
        None => {
            tracing::warn!("missing or unrecognized role; falling back to staff menu");
            staff_menu()
        }
    }
}

fn staff_menu() -> Menu {
    Menu {
        items: vec![
            NavItem::new(Destination::Dashboard, "grid"),
            NavItem::new(Destination::CheckInOut, "swap"),
            NavItem::new(Destination::Calendar, "calendar"),
            NavItem::new(Destination::History, "clock"),
            NavItem::new(Destination::Settings, "gear"),
        ],
        default: Destination::Dashboard,
    }
}

// =============================================================================
// Header view-model
// =============================================================================

/// One tab in the rendered header
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderTab {
    /// Where the tab navigates
    pub destination: Destination,
    /// Resolved display label
    pub label: String,
    /// Icon name
    pub icon: &'static str,
    /// Whether this tab's destination is the active main screen
    pub is_active: bool,
}

/// View-model for the in-app header bar
///
/// Pure projection of menu plus active screen; it owns no routing
/// state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    /// User initials shown in the header avatar
    pub avatar_initials: String,
    /// Tabs in menu order
    pub tabs: Vec<HeaderTab>,
}

impl Header {
    /// Build the header for a menu and the current active main screen
    pub fn build(
        menu: &Menu,
        active: &Destination,
        avatar_initials: &str,
        translator: &Translator,
    ) -> Self {
        Self {
            avatar_initials: avatar_initials.to_string(),
            tabs: menu
                .items
                .iter()
                .map(|item| HeaderTab {
                    destination: item.destination.clone(),
                    label: item.label(translator),
                    icon: item.icon,
                    is_active: item.destination == *active,
                })
                .collect(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_menu() {
        let menu = resolve_menu(Some(Role::Parent));
        assert_eq!(menu.default, Destination::MyChild);
        let destinations: Vec<_> = menu.items.iter().map(|i| i.destination.clone()).collect();
        assert_eq!(
            destinations,
            vec![
                Destination::MyChild,
                Destination::Calendar,
                Destination::History,
                Destination::Settings,
            ]
        );
    }

    #[test]
    fn test_staff_and_admin_share_menu() {
        let staff = resolve_menu(Some(Role::Staff));
        let admin = resolve_menu(Some(Role::Admin));
        assert_eq!(staff, admin);
        assert_eq!(staff.default, Destination::Dashboard);
        assert_eq!(staff.items.len(), 5);
        assert_eq!(staff.items[0].destination, Destination::Dashboard);
        assert_eq!(staff.items[1].destination, Destination::CheckInOut);
    }

    #[test]
    fn test_missing_role_falls_back_to_staff_menu() {
        let menu = resolve_menu(None);
        assert_eq!(menu.default, Destination::Dashboard);
        assert!(menu.contains(&Destination::CheckInOut));
    }

    #[test]
    fn test_menu_labels_resolve_with_fallback() {
        let translator = Translator::default();
        let menu = resolve_menu(Some(Role::Parent));
        assert_eq!(menu.items[0].label(&translator), "Mitt barn");
        assert_eq!(menu.items[1].label(&translator), "Kalender");
        for item in &menu.items {
            assert!(!item.label(&translator).is_empty());
        }
    }

    #[test]
    fn test_header_marks_active_tab() {
        let translator = Translator::default();
        let menu = resolve_menu(Some(Role::Staff));
        let header = Header::build(&menu, &Destination::Calendar, "OH", &translator);

        assert_eq!(header.avatar_initials, "OH");
        let active: Vec<_> = header
            .tabs
            .iter()
            .filter(|t| t.is_active)
            .map(|t| t.destination.clone())
            .collect();
        assert_eq!(active, vec![Destination::Calendar]);
    }
}
