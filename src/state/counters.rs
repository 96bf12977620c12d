use crate::state::PageOutcome;
use parking_lot::Mutex;

/// Point-in-time copy of the crawl counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub dispatched: u64,
    pub duplicates: u64,
    pub ignored: u64,
    pub retrieved: u64,
    pub failed: u64,
    pub indexed: u64,
}

/// Crawl statistics shared by all workers
///
/// Kept under its own lock so counting never contends with visited-set
/// membership checks.
#[derive(Debug, Default)]
pub struct CrawlCounters {
    inner: Mutex<CounterSnapshot>,
}

impl CrawlCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a dispatch and returns the new total
    pub fn record_dispatch(&self) -> u64 {
        let mut inner = self.inner.lock();
        inner.dispatched += 1;
        inner.dispatched
    }

    /// Counts the final outcome of a dispatched URL
    pub fn record_outcome(&self, outcome: PageOutcome) {
        let mut inner = self.inner.lock();
        match outcome {
            PageOutcome::Duplicate => inner.duplicates += 1,
            PageOutcome::Disallowed => inner.ignored += 1,
            PageOutcome::FetchFailed => inner.failed += 1,
            PageOutcome::Retrieved { indexed } => {
                inner.retrieved += 1;
                if indexed {
                    inner.indexed += 1;
                }
            }
        }
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        *self.inner.lock()
    }
}
