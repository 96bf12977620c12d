//! Crawl frontier
//!
//! A FIFO of URLs waiting to be fetched, shared by every worker. Popped URLs
//! are handed out inside a [`Dispatch`] guard so the queue knows how many
//! URLs are still being processed; the crawl is exhausted only when the queue
//! is empty and nothing is in flight.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::ops::Deref;
use std::time::Duration;
use tokio::sync::Notify;
use url::Url;

#[derive(Debug, Default)]
struct Inner {
    queue: VecDeque<Url>,
    in_flight: usize,
}

/// Thread-safe FIFO frontier with in-flight accounting
#[derive(Debug, Default)]
pub struct FrontierQueue {
    inner: Mutex<Inner>,
    notify: Notify,
}

/// A URL taken from the frontier
///
/// The URL counts as in flight until the guard is dropped.
#[derive(Debug)]
pub struct Dispatch<'a> {
    url: Url,
    frontier: &'a FrontierQueue,
}

impl<'a> Dispatch<'a> {
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Puts the URL back at the head of the queue
    ///
    /// No waiting worker is woken; the URL is picked up by the next pop.
    pub fn requeue(self) {
        self.frontier.inner.lock().queue.push_front(self.url.clone());
    }
}

impl Deref for Dispatch<'_> {
    type Target = Url;

    fn deref(&self) -> &Url {
        &self.url
    }
}

impl Drop for Dispatch<'_> {
    fn drop(&mut self) {
        let exhausted = {
            let mut inner = self.frontier.inner.lock();
            inner.in_flight = inner.in_flight.saturating_sub(1);
            inner.in_flight == 0 && inner.queue.is_empty()
        };

        // idle workers re-check exhaustion instead of waiting out their backoff
        if exhausted {
            self.frontier.notify.notify_waiters();
        }
    }
}

impl FrontierQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a URL to the tail and wakes one waiting worker
    pub fn push(&self, url: Url) {
        self.inner.lock().queue.push_back(url);
        self.notify.notify_one();
    }

    /// Removes the head without blocking
    pub fn pop(&self) -> Option<Dispatch<'_>> {
        let mut inner = self.inner.lock();
        let url = inner.queue.pop_front()?;
        inner.in_flight += 1;
        drop(inner);

        Some(Dispatch {
            url,
            frontier: self,
        })
    }

    /// Removes the head, waiting up to `timeout` for a push if the queue is empty
    pub async fn pop_wait(&self, timeout: Duration) -> Option<Dispatch<'_>> {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        // register before checking so a push in between is not missed
        notified.as_mut().enable();

        if let Some(dispatch) = self.pop() {
            return Some(dispatch);
        }

        if tokio::time::timeout(timeout, notified).await.is_err() {
            return None;
        }

        self.pop()
    }

    /// True when nothing is queued and no dispatched URL is still being processed
    pub fn is_exhausted(&self) -> bool {
        let inner = self.inner.lock();
        inner.queue.is_empty() && inner.in_flight == 0
    }

    pub fn in_flight(&self) -> usize {
        self.inner.lock().in_flight
    }

    pub fn len(&self) -> usize {
        self.inner.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().queue.is_empty()
    }
}
