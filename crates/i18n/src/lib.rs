//! Internationalization for Henteklar
//!
//! This crate provides translation lookup with literal fallbacks,
//! locale negotiation, and the built-in Norwegian/English catalogs.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod lang;
pub mod translator;

pub use lang::{default_locale, negotiate, supported_locales};
pub use translator::{I18nError, Translator};

pub use unic_langid::LanguageIdentifier;
