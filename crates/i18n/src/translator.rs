//! Translation catalogs and lookup
//!
//! Catalogs are JSON documents with nested sections flattened into
//! dot-separated keys (`"nav": { "myChild": … }` becomes
//! `nav.myChild`). Lookup never fails: a missing key echoes the key
//! itself, and call sites with a designed fallback use [`Translator::t_or`].

use std::collections::HashMap;

use thiserror::Error;
use unic_langid::LanguageIdentifier;

use crate::lang;

/// Built-in Norwegian catalog
const CATALOG_NB: &str = include_str!("../locales/nb.json");

/// Built-in English catalog
const CATALOG_EN: &str = include_str!("../locales/en.json");

/// Errors raised while loading a catalog
#[derive(Debug, Error)]
pub enum I18nError {
    /// The catalog was not valid JSON
    #[error("invalid catalog JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The catalog root was not a JSON object
    #[error("catalog root must be a JSON object")]
    NotAnObject,

    /// A leaf value was neither a string nor a nested object
    #[error("catalog entry {key} is not a string")]
    InvalidEntry {
        /// The flattened key of the offending entry
        key: String,
    },
}

/// A loaded translation catalog for a single locale
#[derive(Debug, Clone)]
pub struct Translator {
    locale: LanguageIdentifier,
    messages: HashMap<String, String>,
}

impl Translator {
    /// Load a translator from a JSON catalog string
    pub fn from_json(locale: LanguageIdentifier, json: &str) -> Result<Self, I18nError> {
        let root: serde_json::Value = serde_json::from_str(json)?;
        let object = root.as_object().ok_or(I18nError::NotAnObject)?;

        let mut messages = HashMap::new();
        flatten_into(&mut messages, "", object)?;

        Ok(Self { locale, messages })
    }

    /// Load the built-in catalog for a locale
    ///
    /// Unsupported locales are negotiated down to the closest built-in
    /// one, so this never fails to find a catalog.
    pub fn builtin(requested: LanguageIdentifier) -> Result<Self, I18nError> {
        let locale = lang::negotiate(std::slice::from_ref(&requested));
        let json = if locale.language.as_str() == "en" {
            CATALOG_EN
        } else {
            CATALOG_NB
        };
        Self::from_json(locale, json)
    }

    /// The locale this translator serves
    pub fn locale(&self) -> &LanguageIdentifier {
        &self.locale
    }

    /// Look up a message, echoing the key when it is missing
    pub fn t(&self, key: &str) -> String {
        match self.messages.get(key) {
            Some(message) => message.clone(),
            None => key.to_string(),
        }
    }

    /// Look up a message with a literal fallback for missing keys
    pub fn t_or(&self, key: &str, fallback: &str) -> String {
        match self.messages.get(key) {
            Some(message) => message.clone(),
            None => fallback.to_string(),
        }
    }

    /// Check whether a key exists in the catalog
    pub fn has(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::builtin(lang::default_locale()).expect("embedded catalog is valid")
    }
}

fn flatten_into(
    messages: &mut HashMap<String, String>,
    prefix: &str,
    object: &serde_json::Map<String, serde_json::Value>,
) -> Result<(), I18nError> {
    for (name, value) in object {
        let key = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };
        match value {
            serde_json::Value::String(message) => {
                messages.insert(key, message.clone());
            }
            serde_json::Value::Object(nested) => {
                flatten_into(messages, &key, nested)?;
            }
            _ => return Err(I18nError::InvalidEntry { key }),
        }
    }
    Ok(())
}
