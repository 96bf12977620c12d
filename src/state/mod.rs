//! State module for tracking crawl progress
//!
//! This module provides the shared bookkeeping every worker touches during a
//! crawl.
//!
//! # Components
//!
//! - `VisitedSet`: at-most-once dispatch record plus the slot-bounded retrieved list
//! - `CrawlCounters`: dispatched/duplicate/ignored/retrieved/failed/indexed tallies
//! - `PageOutcome`: how a single dispatched URL ended

mod counters;
mod outcome;
mod visited;

// Re-export main types
pub use counters::{CounterSnapshot, CrawlCounters};
pub use outcome::PageOutcome;
pub use visited::{RetrievalSlot, VisitedSet};
