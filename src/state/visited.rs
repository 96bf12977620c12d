//! Visited-set tracking
//!
//! Membership is keyed by the canonical URL string, so two spellings that
//! normalize to the same URL are one entry. Retrieval is bounded by slots: a
//! worker reserves a slot before fetching, and a slot is either committed
//! with the retrieved URL or released when dropped.

use parking_lot::Mutex;
use std::collections::HashSet;
use url::Url;

#[derive(Debug, Default)]
struct Retrieval {
    urls: Vec<Url>,
    reserved: usize,
}

/// Thread-safe record of dispatched and retrieved URLs
#[derive(Debug, Default)]
pub struct VisitedSet {
    members: Mutex<HashSet<String>>,
    retrieval: Mutex<Retrieval>,
}

/// A reserved place in the retrieved list
///
/// Dropping the slot without [`RetrievalSlot::commit`] gives it back.
#[derive(Debug)]
pub struct RetrievalSlot<'a> {
    visited: &'a VisitedSet,
    committed: bool,
}

impl RetrievalSlot<'_> {
    /// Records `url` as retrieved and returns the new retrieved count
    pub fn commit(mut self, url: Url) -> usize {
        self.committed = true;
        let mut retrieval = self.visited.retrieval.lock();
        retrieval.reserved = retrieval.reserved.saturating_sub(1);
        retrieval.urls.push(url);
        retrieval.urls.len()
    }
}

impl Drop for RetrievalSlot<'_> {
    fn drop(&mut self) {
        if !self.committed {
            let mut retrieval = self.visited.retrieval.lock();
            retrieval.reserved = retrieval.reserved.saturating_sub(1);
        }
    }
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically marks the URL as visited
    ///
    /// Returns true only for the first caller; every later call for the same
    /// URL (from any task) returns false.
    pub fn mark_if_new(&self, url: &Url) -> bool {
        self.members.lock().insert(url.as_str().to_string())
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.members.lock().contains(url.as_str())
    }

    /// Reserves a retrieval slot unless retrieved plus reserved pages already reach `limit`
    pub fn try_reserve(&self, limit: usize) -> Option<RetrievalSlot<'_>> {
        let mut retrieval = self.retrieval.lock();
        if retrieval.urls.len() + retrieval.reserved >= limit {
            return None;
        }
        retrieval.reserved += 1;

        Some(RetrievalSlot {
            visited: self,
            committed: false,
        })
    }

    pub fn retrieved_count(&self) -> usize {
        self.retrieval.lock().urls.len()
    }

    /// Retrieved URLs in retrieval order
    pub fn retrieved_urls(&self) -> Vec<Url> {
        self.retrieval.lock().urls.clone()
    }
}
