//! Statistics generation from an exported index
//!
//! This module provides functionality for extracting and displaying
//! statistics about a persisted index.

use crate::storage::{ExportRecord, IndexStorage, SqliteIndexStore};
use crate::SumiError;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use url::Url;

/// Number of keywords listed in the "most frequent" section
const TOP_KEYWORDS: usize = 10;

/// Index statistics summary
#[derive(Debug, Clone)]
pub struct IndexStatistics {
    /// Number of distinct keywords
    pub keyword_count: usize,

    /// Total postings across all keywords
    pub posting_count: usize,

    /// Number of distinct pages referenced by any posting
    pub page_count: usize,

    /// Keywords with the most postings, highest first
    pub top_keywords: Vec<(String, usize)>,

    /// Most recent export, if the index records one
    pub latest_export: Option<ExportRecord>,
}

impl IndexStatistics {
    /// Computes statistics from keyword records
    pub fn from_mapping(
        mapping: &BTreeMap<String, Vec<Url>>,
        latest_export: Option<ExportRecord>,
    ) -> Self {
        let posting_count = mapping.values().map(Vec::len).sum();
        let page_count = mapping
            .values()
            .flatten()
            .map(Url::as_str)
            .collect::<HashSet<_>>()
            .len();

        let mut top_keywords: Vec<(String, usize)> = mapping
            .iter()
            .map(|(keyword, urls)| (keyword.clone(), urls.len()))
            .collect();
        // BTreeMap order makes ties alphabetical
        top_keywords.sort_by(|a, b| b.1.cmp(&a.1));
        top_keywords.truncate(TOP_KEYWORDS);

        Self {
            keyword_count: mapping.len(),
            posting_count,
            page_count,
            top_keywords,
            latest_export,
        }
    }
}

/// Loads statistics from an exported index file
///
/// # Arguments
///
/// * `path` - Path to the SQLite index file
///
/// # Returns
///
/// * `Ok(IndexStatistics)` - Successfully loaded statistics
/// * `Err(SumiError)` - Index missing or unreadable
pub fn load_statistics(path: &Path) -> Result<IndexStatistics, SumiError> {
    let store = SqliteIndexStore::open_read_only(path)?;
    let mapping = store.load_keywords()?;
    let latest_export = store.latest_export()?;

    Ok(IndexStatistics::from_mapping(&mapping, latest_export))
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &IndexStatistics) {
    println!("=== Index Statistics ===\n");

    println!("Overview:");
    println!("  Keywords: {}", stats.keyword_count);
    println!("  Postings: {}", stats.posting_count);
    println!("  Pages referenced: {}", stats.page_count);
    println!();

    if !stats.top_keywords.is_empty() {
        println!("Most Frequent Keywords:");
        for (keyword, count) in &stats.top_keywords {
            let percentage = if stats.posting_count > 0 {
                (*count as f64 / stats.posting_count as f64) * 100.0
            } else {
                0.0
            };
            println!("  {}: {} ({:.1}%)", keyword, count, percentage);
        }
        println!();
    }

    match &stats.latest_export {
        Some(export) => {
            println!("Latest Export:");
            println!("  Exported at: {}", export.exported_at);
            println!(
                "  Config hash: {}",
                export.config_hash.as_deref().unwrap_or("(none)")
            );
        }
        None => println!("No export metadata recorded"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_statistics_from_mapping() {
        let mut mapping = BTreeMap::new();
        mapping.insert(
            "cat".to_string(),
            vec![url("https://a.example/"), url("https://a.example/")],
        );
        mapping.insert("dog".to_string(), vec![url("https://b.example/")]);
        mapping.insert("ant".to_string(), vec![url("https://b.example/")]);

        let stats = IndexStatistics::from_mapping(&mapping, None);

        assert_eq!(stats.keyword_count, 3);
        assert_eq!(stats.posting_count, 4);
        assert_eq!(stats.page_count, 2);
        assert_eq!(
            stats.top_keywords,
            vec![
                ("cat".to_string(), 2),
                ("ant".to_string(), 1),
                ("dog".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_top_keywords_truncated() {
        let mapping: BTreeMap<String, Vec<Url>> = (0..25)
            .map(|i| (format!("word{:02}", i), vec![url("https://a.example/")]))
            .collect();

        let stats = IndexStatistics::from_mapping(&mapping, None);
        assert_eq!(stats.top_keywords.len(), TOP_KEYWORDS);
        assert_eq!(stats.keyword_count, 25);
    }
}
