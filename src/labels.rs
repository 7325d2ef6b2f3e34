//! Display-text lookup for parameter and feature labels.
//!
//! The embedding application supplies a static [`LabelTable`]; the core only
//! resolves keys against it. The locale is always passed in explicitly
//! (usually from [`crate::config::CoreConfig`]), never read from process
//! global state, so two views with different locales can coexist.

use serde::{Deserialize, Serialize};

/// Supported display languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    English,
    Thai,
    Sinhala,
}

impl Locale {
    /// BCP 47 language code.
    pub fn code(&self) -> &'static str {
        match self {
            Locale::English => "en",
            Locale::Thai => "th",
            Locale::Sinhala => "si",
        }
    }

    /// Name of the language in that language.
    pub fn display_name(&self) -> &'static str {
        match self {
            Locale::English => "English",
            Locale::Thai => "ไทย",
            Locale::Sinhala => "සිංහල",
        }
    }

    /// All supported locales.
    pub fn all() -> &'static [Locale] {
        &[Locale::English, Locale::Thai, Locale::Sinhala]
    }

    /// Parse a language code back into a locale.
    pub fn from_code(code: &str) -> Option<Locale> {
        Locale::all().iter().find(|l| l.code() == code).copied()
    }
}

/// One label: a default string plus per-locale overrides.
#[derive(Debug, Clone, Copy)]
pub struct LabelEntry {
    pub default: &'static str,
    pub localized: &'static [(Locale, &'static str)],
}

impl LabelEntry {
    pub const fn plain(default: &'static str) -> Self {
        Self {
            default,
            localized: &[],
        }
    }

    fn resolve(&self, locale: Locale) -> &'static str {
        self.localized
            .iter()
            .find(|(l, _)| *l == locale)
            .map(|(_, text)| *text)
            .unwrap_or(self.default)
    }
}

/// Static key-to-label table supplied by the embedding application.
///
/// Tables are small (one entry per visible control), so lookup is a linear
/// scan over a static slice rather than an owned map.
#[derive(Debug, Clone, Copy)]
pub struct LabelTable {
    entries: &'static [(&'static str, LabelEntry)],
}

impl LabelTable {
    /// A table with no entries; every lookup falls back to the key.
    pub const EMPTY: LabelTable = LabelTable { entries: &[] };

    pub const fn new(entries: &'static [(&'static str, LabelEntry)]) -> Self {
        Self { entries }
    }

    /// Resolve a key for the given locale, falling back to the entry's
    /// default string when no localized variant exists.
    pub fn resolve(&self, key: &str, locale: Locale) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, entry)| entry.resolve(locale))
    }

    /// Like [`LabelTable::resolve`], but unknown keys resolve to themselves.
    pub fn resolve_or_key<'a>(&self, key: &'a str, locale: Locale) -> &'a str {
        match self.resolve(key, locale) {
            Some(text) => text,
            None => key,
        }
    }
}
