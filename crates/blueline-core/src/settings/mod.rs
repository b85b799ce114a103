//! User settings: the API credential and the recent-search history.
//!
//! Storage sits behind [`SettingsStore`], which has exactly two
//! operations, `load` and `save`. The session reads once at startup and
//! writes after every mutation.

pub mod file;
pub mod memory;

use serde::{Deserialize, Serialize};

pub use file::FileSettingsStore;
pub use memory::MemorySettingsStore;

/// Errors raised by a [`SettingsStore`].
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Persistence for [`Settings`].
pub trait SettingsStore: Send + Sync {
    /// Read the stored settings. A store with nothing saved yet returns
    /// [`Settings::default`].
    fn load(&self) -> Result<Settings, SettingsError>;

    /// Replace the stored settings.
    fn save(&self, settings: &Settings) -> Result<(), SettingsError>;
}

/// Everything the tool remembers between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default)]
    pub recent_searches: RecentSearches,
}

impl Settings {
    /// The stored API key, if it is non-blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

/// Bounded, most-recent-first, de-duplicated list of search terms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct RecentSearches(Vec<String>);

impl RecentSearches {
    pub const CAPACITY: usize = 5;

    /// Record a search. The trimmed term moves to the front; blank terms
    /// are ignored. Returns `false` when nothing changed.
    pub fn push(&mut self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() {
            return false;
        }
        if self.0.first().is_some_and(|t| t == term) {
            return false;
        }
        self.0.retain(|t| t != term);
        self.0.insert(0, term.to_owned());
        self.0.truncate(Self::CAPACITY);
        true
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Normalises whatever was on disk: trims, drops blanks and duplicates,
/// caps the length.
impl From<Vec<String>> for RecentSearches {
    fn from(terms: Vec<String>) -> Self {
        let mut out: Vec<String> = Vec::with_capacity(Self::CAPACITY);
        for term in terms {
            let term = term.trim();
            if term.is_empty() || out.iter().any(|t| t == term) {
                continue;
            }
            out.push(term.to_owned());
            if out.len() == Self::CAPACITY {
                break;
            }
        }
        Self(out)
    }
}

impl From<RecentSearches> for Vec<String> {
    fn from(recent: RecentSearches) -> Self {
        recent.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_puts_latest_first() {
        let mut recent = RecentSearches::default();
        recent.push("a");
        recent.push("b");
        assert_eq!(recent.as_slice(), ["b", "a"]);
    }

    #[test]
    fn push_deduplicates_by_moving_to_front() {
        let mut recent = RecentSearches::default();
        recent.push("a");
        recent.push("b");
        recent.push("a");
        assert_eq!(recent.as_slice(), ["a", "b"]);
    }

    #[test]
    fn repeated_push_of_same_term_keeps_one_entry() {
        let mut recent = RecentSearches::default();
        assert!(recent.push("תמא/35/א/8"));
        for _ in 0..10 {
            assert!(!recent.push("תמא/35/א/8"));
        }
        assert_eq!(recent.len(), 1);
    }

    #[test]
    fn capacity_is_five() {
        let mut recent = RecentSearches::default();
        for i in 0..12 {
            recent.push(&format!("term-{i}"));
            assert!(recent.len() <= RecentSearches::CAPACITY);
        }
        assert_eq!(
            recent.as_slice(),
            ["term-11", "term-10", "term-9", "term-8", "term-7"]
        );
    }

    #[test]
    fn push_trims_and_ignores_blank() {
        let mut recent = RecentSearches::default();
        assert!(!recent.push("   "));
        recent.push("  חיפה ");
        recent.push("חיפה");
        assert_eq!(recent.as_slice(), ["חיפה"]);
    }

    #[test]
    fn from_vec_normalises() {
        let raw = vec![
            "a".to_owned(),
            " a ".to_owned(),
            "".to_owned(),
            "b".to_owned(),
            "c".to_owned(),
            "d".to_owned(),
            "e".to_owned(),
            "f".to_owned(),
        ];
        let recent = RecentSearches::from(raw);
        assert_eq!(recent.as_slice(), ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn credential_ignores_blank_key() {
        let mut settings = Settings::default();
        assert_eq!(settings.credential(), None);
        settings.api_key = Some("   ".to_owned());
        assert_eq!(settings.credential(), None);
        settings.api_key = Some(" abc ".to_owned());
        assert_eq!(settings.credential(), Some("abc"));
    }

    #[test]
    fn settings_toml_roundtrip() {
        let mut settings = Settings {
            api_key: Some("secret".to_owned()),
            ..Settings::default()
        };
        settings.recent_searches.push("תמא/35/א/8");
        settings.recent_searches.push("חיפה");

        let text = toml::to_string_pretty(&settings).unwrap();
        let back: Settings = toml::from_str(&text).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn settings_parse_empty_document() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }
}
