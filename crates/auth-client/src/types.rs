//! User identity types shared across the client

use serde::{Deserialize, Serialize};

/// A user's role in the kindergarten
///
/// The role drives which navigation menu a user sees and which screen
/// they land on after login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A parent or guardian of one or more children
    Parent,
    /// Kindergarten staff
    Staff,
    /// Kindergarten administrator
    Admin,
}

impl Role {
    /// Parse a role from its wire representation
    ///
    /// Unrecognized values map to `None` so callers decide the
    /// fallback; the wire never gets to invent a role.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "parent" => Some(Role::Parent),
            "staff" => Some(Role::Staff),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// The wire representation of this role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Parent => "parent",
            Role::Staff => "staff",
            Role::Admin => "admin",
        }
    }

    /// Whether this is the parent role
    pub fn is_parent(&self) -> bool {
        matches!(self, Role::Parent)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signed-in user
///
/// Immutable from the client's perspective; a role of `None` means the
/// service reported a role this client version does not know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable user identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Role, when recognized
    pub role: Option<Role>,
    /// Initials shown in the avatar badge
    pub avatar_initials: String,
}

impl User {
    /// Create a user with avatar initials derived from the name
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Option<Role>) -> Self {
        let name = name.into();
        let avatar_initials = initials_of(&name);
        Self {
            id: id.into(),
            name,
            role,
            avatar_initials,
        }
    }
}

/// Derive avatar initials from a display name
///
/// Takes the first letter of the first two words, uppercased. An empty
/// name yields a "?" placeholder so the badge never renders blank.
pub fn initials_of(name: &str) -> String {
    let initials: String = name
        .split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(|c| c.to_uppercase())
        .collect();
    if initials.is_empty() {
        "?".to_string()
    } else {
        initials
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_round_trip() {
        for role in [Role::Parent, Role::Staff, Role::Admin] {
            assert_eq!(Role::from_wire(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_role_unknown_wire_value() {
        assert_eq!(Role::from_wire("superuser"), None);
        assert_eq!(Role::from_wire(""), None);
        assert_eq!(Role::from_wire("Parent"), None); // wire is lowercase
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Parent).unwrap(), "\"parent\"");
        let parsed: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(parsed, Role::Admin);
    }

    #[test]
    fn test_initials_of() {
        assert_eq!(initials_of("Kari Nordmann"), "KN");
        assert_eq!(initials_of("Ola"), "O");
        assert_eq!(initials_of("anne lise berg"), "AL");
        assert_eq!(initials_of(""), "?");
    }

    #[test]
    fn test_user_new_derives_initials() {
        let user = User::new("u1", "Kari Nordmann", Some(Role::Parent));
        assert_eq!(user.avatar_initials, "KN");
        assert!(user.role.unwrap().is_parent());
    }
}
