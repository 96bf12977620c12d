use crate::classifier::MatchMode;
use serde::Deserialize;

/// Main configuration structure for Sumi-Index
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub topic: TopicConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Absolute URL the crawl starts from
    pub seed: String,

    /// Number of successfully retrieved pages after which the crawl stops
    #[serde(rename = "target-count")]
    pub target_count: usize,

    /// Size of the worker pool
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Wall-clock limit for the whole crawl in seconds (0 = no limit)
    #[serde(rename = "time-limit-secs", default)]
    pub time_limit_secs: u64,

    /// Timeout for a single page fetch in seconds
    #[serde(rename = "page-timeout-secs", default = "default_page_timeout")]
    pub page_timeout_secs: u64,

    /// Timeout for a single robots.txt fetch in seconds
    #[serde(rename = "robots-timeout-secs", default = "default_robots_timeout")]
    pub robots_timeout_secs: u64,

    /// How long an idle worker waits for new frontier entries (milliseconds)
    #[serde(rename = "idle-backoff-ms", default = "default_idle_backoff")]
    pub idle_backoff_ms: u64,

    /// Emit a progress snapshot every this many dispatches
    #[serde(rename = "progress-interval", default = "default_progress_interval")]
    pub progress_interval: u64,

    /// Only follow links inside the element with this id
    #[serde(rename = "link-scope", default)]
    pub link_scope: Option<String>,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler, also the product token matched against robots.txt
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Full User-Agent header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite index file
    #[serde(rename = "index-path")]
    pub index_path: String,

    /// Periodic export interval in seconds (0 = export only when the crawl ends)
    #[serde(rename = "export-interval-secs", default)]
    pub export_interval_secs: u64,
}

/// Topic filter configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopicConfig {
    /// Keywords describing the topic; empty disables the filter
    #[serde(default)]
    pub keywords: Vec<String>,

    /// How keywords combine
    #[serde(default)]
    pub mode: MatchMode,
}

fn default_workers() -> usize {
    40
}

fn default_page_timeout() -> u64 {
    10
}

fn default_robots_timeout() -> u64 {
    2
}

fn default_idle_backoff() -> u64 {
    500
}

fn default_progress_interval() -> u64 {
    100
}
