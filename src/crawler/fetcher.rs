//! HTTP fetcher implementation
//!
//! This module handles page requests for the crawler:
//! - Building the shared HTTP client with the crawler's user agent
//! - GET requests bounded by the page timeout
//! - Rejecting error statuses and non-text content
//! - Error classification into `SumiError` variants

use crate::config::UserAgentConfig;
use crate::SumiError;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// A successfully fetched page
#[derive(Debug)]
pub struct FetchedPage {
    /// Final URL after redirects; the requested URL stays the page identity
    pub final_url: Url,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value, if the server sent one
    pub content_type: Option<String>,
    /// Page body
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `page_timeout` - Bound on a whole request, body included
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sumi_index::config::UserAgentConfig;
/// use sumi_index::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "SumiIndex".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    page_timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(page_timeout)
        .connect_timeout(page_timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page body
///
/// Redirects are followed by the client. The fetch fails when:
///
/// | Condition | Error |
/// |-----------|-------|
/// | Request exceeds the client timeout | `Timeout` |
/// | Connection, TLS or body read error | `Http` |
/// | Non-2xx final status | `HttpStatus` |
/// | Content-Type present but not text | `ContentMismatch` |
pub async fn fetch_page(client: &Client, url: &Url) -> Result<FetchedPage, SumiError> {
    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    let final_url = response.url().clone();

    if !status.is_success() {
        return Err(SumiError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if let Some(ct) = content_type.as_deref() {
        if !is_text_content(ct) {
            return Err(SumiError::ContentMismatch {
                url: url.to_string(),
                content_type: ct.to_string(),
            });
        }
    }

    let body = response.text().await.map_err(|e| classify_error(url, e))?;

    if final_url != *url {
        tracing::debug!("{} redirected to {}", url, final_url);
    }

    Ok(FetchedPage {
        final_url,
        status_code: status.as_u16(),
        content_type,
        body,
    })
}

/// Returns true for content types whose body can be treated as page text
fn is_text_content(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    mime.starts_with("text/") || mime.ends_with("+xml") || mime == "application/xml"
}

fn classify_error(url: &Url, e: reqwest::Error) -> SumiError {
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
