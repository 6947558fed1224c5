//! Label translation and collation
//!
//! Display labels are resolved per session locale through [`Translate`]; the
//! matching [`CollationKey`] is computed once per label so alphabetic sorting
//! never re-normalizes strings.

use crate::types::{LabelKey, Locale};
use std::collections::HashMap;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Resolves a label reference for a locale
pub trait Translate: Send + Sync {
    fn label_for(&self, key: &LabelKey, locale: &Locale) -> String;
}

/// Produces locale-specific sort keys
pub trait Collator: Send + Sync {
    fn collation_key(&self, label: &str, locale: &Locale) -> CollationKey;
}

/// Precomputed sort key; compares base letters first, then accents, then case
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CollationKey {
    primary: String,
    secondary: String,
    tertiary: String,
}

/// Turn `account_settings` into `Account settings`
pub fn humanize(key: &str) -> String {
    let spaced = key.replace(['_', '-', '.'], " ");
    let mut chars = spaced.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// In-memory translation table.
///
/// Lookup tries the full locale tag, then its language, and finally falls back
/// to a humanized form of the label key.
#[derive(Debug, Clone, Default)]
pub struct MapTranslator {
    entries: HashMap<(String, String), String>,
}

impl MapTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, locale: &str, key: &str, label: impl Into<String>) {
        self.entries
            .insert((locale.to_string(), key.to_string()), label.into());
    }

    pub fn with(mut self, locale: &str, key: &str, label: impl Into<String>) -> Self {
        self.insert(locale, key, label);
        self
    }
}

impl Translate for MapTranslator {
    fn label_for(&self, key: &LabelKey, locale: &Locale) -> String {
        let exact = (locale.as_str().to_string(), key.as_str().to_string());
        if let Some(label) = self.entries.get(&exact) {
            return label.clone();
        }
        let language = (locale.language().to_string(), key.as_str().to_string());
        if let Some(label) = self.entries.get(&language) {
            return label.clone();
        }
        humanize(key.as_str())
    }
}

/// Collator built on Unicode canonical decomposition.
///
/// Letters are compared without accents and case first. Scandinavian locales
/// sort å, ä, ö (and æ, ø) after z.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeCollator;

const NORDIC: [&str; 5] = ["sv", "fi", "da", "nb", "no"];

impl UnicodeCollator {
    fn primary(label: &str, locale: &Locale) -> String {
        let nordic = NORDIC.contains(&locale.language());
        let mut out = String::with_capacity(label.len());
        for c in label.chars().flat_map(char::to_lowercase) {
            if nordic {
                let tail = match c {
                    'å' => Some('\u{F8F1}'),
                    'ä' | 'æ' => Some('\u{F8F2}'),
                    'ö' | 'ø' => Some('\u{F8F3}'),
                    _ => None,
                };
                if let Some(tail) = tail {
                    out.push('z');
                    out.push(tail);
                    continue;
                }
            }
            if c == 'ß' {
                out.push_str("ss");
                continue;
            }
            out.extend(c.to_string().nfkd().filter(|c| !is_combining_mark(*c)));
        }
        out
    }
}

impl Collator for UnicodeCollator {
    fn collation_key(&self, label: &str, locale: &Locale) -> CollationKey {
        CollationKey {
            primary: Self::primary(label, locale),
            secondary: label.to_lowercase().nfkd().collect(),
            tertiary: label.to_string(),
        }
    }
}
