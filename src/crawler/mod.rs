//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The shared URL frontier
//! - HTTP fetching
//! - HTML parsing, link extraction and text cleaning
//! - Overall crawl coordination across a pool of workers

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{process_url, CrawlContext, CrawlReport, Coordinator, StopReason};
pub use fetcher::{build_http_client, fetch_page, FetchedPage};
pub use frontier::{Dispatch, FrontierQueue};
pub use parser::{clean_text, extract_links, extract_links_in_element, parse_html, ParsedPage};

use crate::config::Config;
use crate::index::InvertedIndex;
use crate::SumiError;
use std::path::Path;
use std::sync::Arc;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Load the previously exported index, if any
/// 2. Build the HTTP client and politeness cache
/// 3. Crawl from the seed with the configured worker pool
/// 4. Export the index and return a report
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl finished and the index was exported
/// * `Err(SumiError)` - Setup or the final export failed
///
/// # Example
///
/// ```no_run
/// use sumi_index::config::load_config;
/// use sumi_index::crawler::crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let report = crawl(config).await?;
/// println!("retrieved {} pages", report.retrieved.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: Config) -> Result<CrawlReport, SumiError> {
    run_crawl(config, None, false).await
}

/// Runs a crawl, optionally discarding the existing index first
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `config_hash` - Hash recorded with every export
/// * `fresh` - Start from an empty index instead of the exported one
pub async fn run_crawl(
    config: Config,
    config_hash: Option<String>,
    fresh: bool,
) -> Result<CrawlReport, SumiError> {
    let index = if fresh {
        tracing::info!("Starting with a fresh index");
        InvertedIndex::new()
    } else {
        let index = InvertedIndex::load_or_empty(Path::new(&config.output.index_path))?;
        tracing::info!(
            "Loaded index with {} keywords ({} postings)",
            index.keyword_count(),
            index.posting_count()
        );
        index
    };

    let mut coordinator = Coordinator::new(config, Arc::new(index))?;
    if let Some(hash) = config_hash {
        coordinator = coordinator.with_config_hash(hash);
    }

    coordinator.run().await
}
