//! Robots.txt handling module
//!
//! This module fetches, parses and caches robots.txt files so the crawler only
//! requests pages a host permits. Failures to obtain robots.txt fail open.

mod cache;
mod parser;

pub use cache::{PolitenessCache, RobotsVerdict};
pub use parser::ParsedRobots;

use crate::SumiError;
use reqwest::Client;
use std::time::Duration;

/// Fetches robots.txt for a host
///
/// Tries `https://{authority}/robots.txt` first and falls back to plain http
/// when that fails. A 4xx response means the host publishes no rules and
/// yields a permit-all ruleset.
///
/// # Arguments
///
/// * `client` - HTTP client carrying the crawler's User-Agent
/// * `authority` - Host plus explicit port, e.g. `example.com:8080`
/// * `timeout` - Bound on each attempt
///
/// # Returns
///
/// * `Ok(ParsedRobots)` - Rules to apply for this host
/// * `Err(SumiError::Robots)` - Neither scheme produced a usable answer
pub async fn fetch_robots(
    client: &Client,
    authority: &str,
    timeout: Duration,
) -> Result<ParsedRobots, SumiError> {
    let https_error = match fetch_robots_over(client, "https", authority, timeout).await {
        Ok(robots) => return Ok(robots),
        Err(e) => e,
    };
    tracing::debug!("robots.txt over https failed for {}: {}", authority, https_error);

    fetch_robots_over(client, "http", authority, timeout)
        .await
        .map_err(|http_error| SumiError::Robots {
            host: authority.to_string(),
            message: format!("https: {}; http: {}", https_error, http_error),
        })
}

async fn fetch_robots_over(
    client: &Client,
    scheme: &str,
    authority: &str,
    timeout: Duration,
) -> Result<ParsedRobots, SumiError> {
    let url = format!("{}://{}/robots.txt", scheme, authority);

    let response = client
        .get(&url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| request_error(&url, e))?;

    let status = response.status();
    if status.is_success() {
        let body = response.text().await.map_err(|e| request_error(&url, e))?;
        Ok(ParsedRobots::from_content(&body))
    } else if status.is_client_error() {
        Ok(ParsedRobots::allow_all())
    } else {
        Err(SumiError::HttpStatus {
            url,
            status: status.as_u16(),
        })
    }
}

fn request_error(url: &str, e: reqwest::Error) -> SumiError {
    if e.is_timeout() {
        SumiError::Timeout {
            url: url.to_string(),
        }
    } else {
        SumiError::Http {
            url: url.to_string(),
            source: e,
        }
    }
}
