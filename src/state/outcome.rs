/// Per-URL outcome definitions
///
/// Every URL a worker dispatches ends in exactly one of these outcomes.
use std::fmt;

/// Result of running one dispatched URL through the crawl pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageOutcome {
    /// URL was already dispatched by another worker or an earlier pop
    Duplicate,

    /// robots.txt forbids fetching the URL
    Disallowed,

    /// Transport error, timeout, non-2xx status or non-text content
    FetchFailed,

    /// Page was fetched; `indexed` is false when the topic filter rejected it
    Retrieved { indexed: bool },
}

impl PageOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Duplicate => "duplicate",
            Self::Disallowed => "disallowed",
            Self::FetchFailed => "fetch_failed",
            Self::Retrieved { indexed: true } => "indexed",
            Self::Retrieved { indexed: false } => "retrieved",
        }
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
