//! Politeness cache
//!
//! Two caches live for the duration of a crawl: robots.txt rulesets keyed by
//! host authority, and allow/deny decisions keyed by canonical URL.

use crate::robots::{fetch_robots, ParsedRobots};
use crate::url::robots_authority;
use crate::SumiError;
use parking_lot::RwLock;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Outcome of a politeness check
#[derive(Debug)]
pub struct RobotsVerdict {
    pub allowed: bool,
    /// Set when robots.txt could not be obtained and permit-all was assumed
    pub error: Option<SumiError>,
}

impl RobotsVerdict {
    fn decided(allowed: bool) -> Self {
        Self {
            allowed,
            error: None,
        }
    }
}

/// Per-crawl robots.txt cache shared by all workers
pub struct PolitenessCache {
    client: Client,
    user_agent: String,
    timeout: Duration,
    decisions: RwLock<HashMap<String, bool>>,
    rulesets: RwLock<HashMap<String, Arc<ParsedRobots>>>,
}

impl PolitenessCache {
    /// # Arguments
    ///
    /// * `client` - HTTP client used for robots.txt requests
    /// * `user_agent` - Product token matched against `User-agent` lines
    /// * `timeout` - Bound on each robots.txt request
    pub fn new(client: Client, user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            user_agent: user_agent.into(),
            timeout,
            decisions: RwLock::new(HashMap::new()),
            rulesets: RwLock::new(HashMap::new()),
        }
    }

    /// Decides whether `url` may be fetched
    ///
    /// Never fails: when robots.txt is unreachable the URL is allowed and the
    /// failure is reported in [`RobotsVerdict::error`].
    pub async fn check(&self, url: &Url) -> RobotsVerdict {
        if let Some(allowed) = self.cached_decision(url) {
            return RobotsVerdict::decided(allowed);
        }

        let Some(authority) = robots_authority(url) else {
            return RobotsVerdict::decided(true);
        };

        let (ruleset, error) = self.ruleset_for(&authority).await;
        let allowed = ruleset.is_allowed(url.as_str(), &self.user_agent);
        self.decisions
            .write()
            .entry(url.as_str().to_string())
            .or_insert(allowed);

        RobotsVerdict { allowed, error }
    }

    async fn ruleset_for(&self, authority: &str) -> (Arc<ParsedRobots>, Option<SumiError>) {
        if let Some(ruleset) = self.cached_ruleset(authority) {
            return (ruleset, None);
        }

        let (fetched, error) = match fetch_robots(&self.client, authority, self.timeout).await {
            Ok(robots) => (robots, None),
            Err(e) => (ParsedRobots::allow_all(), Some(e)),
        };

        // a concurrent lookup may have stored a ruleset meanwhile; keep the first
        let stored = self
            .rulesets
            .write()
            .entry(authority.to_string())
            .or_insert_with(|| Arc::new(fetched))
            .clone();

        (stored, error)
    }

    fn cached_decision(&self, url: &Url) -> Option<bool> {
        self.decisions.read().get(url.as_str()).copied()
    }

    fn cached_ruleset(&self, authority: &str) -> Option<Arc<ParsedRobots>> {
        self.rulesets.read().get(authority).cloned()
    }

    /// Number of hosts with a cached ruleset
    pub fn host_count(&self) -> usize {
        self.rulesets.read().len()
    }

    /// Number of URLs with a cached decision
    pub fn decision_count(&self) -> usize {
        self.decisions.read().len()
    }
}
