//! Locale identifiers and negotiation
//!
//! Henteklar ships Norwegian bokmål as its primary language with an
//! English fallback. Negotiation follows BCP 47 matching via
//! `fluent-langneg`, so a request for `nb-NO` or `no` still lands on
//! the Norwegian catalog.

use fluent_langneg::{negotiate_languages, NegotiationStrategy};
use unic_langid::LanguageIdentifier;

/// The default locale (Norwegian bokmål)
pub fn default_locale() -> LanguageIdentifier {
    "nb".parse().expect("static locale id")
}

/// All locales with a built-in catalog, in preference order
pub fn supported_locales() -> Vec<LanguageIdentifier> {
    ["nb", "en"]
        .iter()
        .map(|tag| tag.parse().expect("static locale id"))
        .collect()
}

/// Negotiate the best supported locale for a list of requested locales
///
/// Returns the default locale when nothing matches or the request is
/// empty.
pub fn negotiate(requested: &[LanguageIdentifier]) -> LanguageIdentifier {
    let available = supported_locales();
    let default = default_locale();
    let chosen = negotiate_languages(
        requested,
        &available,
        Some(&default),
        NegotiationStrategy::Filtering,
    );
    chosen
        .first()
        .map(|locale| (*locale).clone())
        .unwrap_or(default)
}
