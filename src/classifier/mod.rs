//! Topic classification for crawled pages
//!
//! A [`TopicFilter`] decides whether the cleaned text of a page is relevant
//! enough to be indexed. Matching is a case-insensitive substring test per
//! keyword, combined either with OR ([`MatchMode::Any`]) or AND
//! ([`MatchMode::All`]) semantics.

use serde::Deserialize;
use std::fmt;

/// How topic keywords combine when classifying a page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// A page is topical if it contains at least one keyword
    #[default]
    Any,

    /// A page is topical only if it contains every keyword
    All,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::All => write!(f, "all"),
        }
    }
}

/// Keyword-based topic filter
#[derive(Debug, Clone, Default)]
pub struct TopicFilter {
    keywords: Vec<String>,
    mode: MatchMode,
}

impl TopicFilter {
    /// Creates a filter from raw keywords
    ///
    /// Keywords are trimmed and lower-cased; blank keywords are discarded. A
    /// filter left without keywords is disabled and accepts every page.
    pub fn new<I, S>(keywords: I, mode: MatchMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        Self { keywords, mode }
    }

    pub fn is_enabled(&self) -> bool {
        !self.keywords.is_empty()
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Returns true if the text should be indexed
    pub fn is_topical(&self, text: &str) -> bool {
        if !self.is_enabled() {
            return true;
        }

        let haystack = text.to_lowercase();
        match self.mode {
            MatchMode::Any => self.keywords.iter().any(|k| haystack.contains(k.as_str())),
            MatchMode::All => self.keywords.iter().all(|k| haystack.contains(k.as_str())),
        }
    }
}
