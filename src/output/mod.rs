//! Output module for crawl reports and query results
//!
//! This module handles:
//! - Printing the summary of a finished crawl
//! - Index statistics for `--stats`
//! - Ranked search results for `--search`

pub mod stats;

pub use stats::{load_statistics, print_statistics, IndexStatistics};

use crate::crawler::CrawlReport;
use crate::index::SearchHit;

/// Prints a crawl report to stdout
pub fn print_report(report: &CrawlReport) {
    let counters = &report.counters;

    println!("=== Crawl Report ===\n");
    println!("Stopped: {} after {:.1}s", report.reason, report.elapsed.as_secs_f64());
    println!();

    println!("Pages:");
    println!("  Dispatched: {}", counters.dispatched);
    println!("  Retrieved: {}", counters.retrieved);
    println!("  Indexed: {}", counters.indexed);
    println!("  Duplicates skipped: {}", counters.duplicates);
    println!("  Disallowed by robots.txt: {}", counters.ignored);
    println!("  Failed: {}", counters.failed);
    println!("  Left in frontier: {}", report.frontier_remaining);
    println!();

    println!("Index:");
    println!("  Keywords: {}", report.export.keyword_count);
    println!("  Postings: {}", report.export.posting_count);
}

/// Formats ranked search results, one `hits<TAB>url` line per page
pub fn format_search_results(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(|hit| format!("{}\t{}\n", hit.hits, hit.url))
        .collect()
}

/// Prints ranked search results to stdout
pub fn print_search_results(keywords: &[String], hits: &[SearchHit]) {
    if hits.is_empty() {
        println!("No results for {}", keywords.join(", "));
        return;
    }

    print!("{}", format_search_results(hits));
}
