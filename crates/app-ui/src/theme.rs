//! Theme provider for Henteklar
//!
//! Two themes are supported:
//! - Light: bright theme with white background
//! - Dark: dark theme with near-black background

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A color represented as an RGB hex string (e.g., "#FFFFFF")
pub type Color = String;

/// Henteklar brand colors
pub mod brand {
    /// Primary brand color (kindergarten green)
    pub const PRIMARY: &str = "#4C9A62";

    /// Accent amber for check-in highlights
    pub const ACCENT: &str = "#F2A33C";

    /// Pure white
    pub const WHITE: &str = "#FFFFFF";

    /// Near black
    pub const BLACK: &str = "#16181C";
}

/// Available theme names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    /// Light theme
    #[default]
    Light,
    /// Dark theme
    Dark,
}

impl ThemeName {
    /// Whether this theme uses a dark color scheme
    pub fn is_dark(&self) -> bool {
        matches!(self, ThemeName::Dark)
    }

    /// The opposite theme
    pub fn toggled(&self) -> ThemeName {
        match self {
            ThemeName::Light => ThemeName::Dark,
            ThemeName::Dark => ThemeName::Light,
        }
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeName::Light => write!(f, "light"),
            ThemeName::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for ThemeName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeName::Light),
            "dark" => Ok(ThemeName::Dark),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

/// Color scheme for a theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScheme {
    /// Screen background
    pub background: Color,
    /// Primary text
    pub text: Color,
    /// Brand primary
    pub primary: Color,
    /// Accent highlights
    pub accent: Color,
}

impl ThemeName {
    /// The color scheme for this theme
    pub fn color_scheme(&self) -> ColorScheme {
        match self {
            ThemeName::Light => ColorScheme {
                background: brand::WHITE.to_string(),
                text: brand::BLACK.to_string(),
                primary: brand::PRIMARY.to_string(),
                accent: brand::ACCENT.to_string(),
            },
            ThemeName::Dark => ColorScheme {
                background: brand::BLACK.to_string(),
                text: brand::WHITE.to_string(),
                primary: brand::PRIMARY.to_string(),
                accent: brand::ACCENT.to_string(),
            },
        }
    }
}

/// Current theme selection
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ThemeState {
    /// Current theme name
    pub theme_name: ThemeName,
}

impl ThemeState {
    /// Create a theme state with the given theme
    pub fn new(theme_name: ThemeName) -> Self {
        Self { theme_name }
    }

    /// Set the current theme
    pub fn set_theme(&mut self, theme_name: ThemeName) {
        self.theme_name = theme_name;
    }

    /// Switch between light and dark
    pub fn toggle(&mut self) {
        self.theme_name = self.theme_name.toggled();
    }

    /// Whether the current theme is dark
    pub fn is_dark(&self) -> bool {
        self.theme_name.is_dark()
    }

    /// The current color scheme
    pub fn colors(&self) -> ColorScheme {
        self.theme_name.color_scheme()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_is_light() {
        let state = ThemeState::default();
        assert_eq!(state.theme_name, ThemeName::Light);
        assert!(!state.is_dark());
    }

    #[test]
    fn test_toggle_round_trips() {
        let mut state = ThemeState::default();
        state.toggle();
        assert!(state.is_dark());
        state.toggle();
        assert!(!state.is_dark());
    }

    #[test]
    fn test_theme_name_parsing() {
        assert_eq!("dark".parse::<ThemeName>().unwrap(), ThemeName::Dark);
        assert_eq!("Light".parse::<ThemeName>().unwrap(), ThemeName::Light);
        assert!("sepia".parse::<ThemeName>().is_err());
    }

    #[test]
    fn test_display_matches_from_str() {
        for name in [ThemeName::Light, ThemeName::Dark] {
            assert_eq!(name.to_string().parse::<ThemeName>().unwrap(), name);
        }
    }

    #[test]
    fn test_color_schemes_differ() {
        let light = ThemeName::Light.color_scheme();
        let dark = ThemeName::Dark.color_scheme();
        assert_ne!(light.background, dark.background);
        assert_eq!(light.primary, dark.primary);
    }

    #[test]
    fn test_theme_serialization() {
        let state = ThemeState::new(ThemeName::Dark);
        let json = serde_json::to_string(&state).unwrap();
        let parsed: ThemeState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, parsed);
    }
}
