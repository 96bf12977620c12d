//! Integration tests for the inverted index and its persistence

use std::collections::HashMap;
use sumi_index::storage::StorageError;
use sumi_index::{prep_keyword, search, IndexItem, InvertedIndex};
use tempfile::TempDir;
use url::Url;

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

#[test]
fn test_prep_keyword_strips_symbols() {
    assert_eq!(prep_keyword("Test!123"), "test123");
}

#[test]
fn test_cat_cat_dog_ranking_survives_export() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index.db");

    let index = InvertedIndex::new();
    index.add_item("cat", IndexItem::new(url("https://a.example/")));
    index.add_item("cat", IndexItem::new(url("https://a.example/")));
    index.add_item("dog", IndexItem::new(url("https://b.example/")));
    index.export(&path).unwrap();

    let restored = InvertedIndex::import(&path).unwrap();
    let hits = search(&restored, &["cat", "dog"]);

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].url, url("https://a.example/"));
    assert_eq!(hits[0].hits, 2);
    assert_eq!(hits[1].url, url("https://b.example/"));
    assert_eq!(hits[1].hits, 1);
}

#[test]
fn test_round_trip_preserves_url_multisets() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index.db");

    let index = InvertedIndex::new();
    index.index_page(&url("https://a.example/one"), "Alpha beta, beta! gamma");
    index.index_page(&url("https://b.example/two?x=1&y=2"), "beta delta");
    index.export(&path).unwrap();

    let restored = InvertedIndex::import(&path).unwrap();
    assert_eq!(restored.keyword_count(), index.keyword_count());

    for (keyword, items) in index.snapshot() {
        let mut expected: HashMap<Url, usize> = HashMap::new();
        for item in items {
            *expected.entry(item.url).or_default() += 1;
        }

        let mut actual: HashMap<Url, usize> = HashMap::new();
        for item in restored.get_items(&keyword) {
            *actual.entry(item.url).or_default() += 1;
        }

        assert_eq!(actual, expected, "postings differ for '{}'", keyword);
    }
}

#[test]
fn test_export_overwrites_previous_index() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index.db");

    let first = InvertedIndex::new();
    first.add_item("old", IndexItem::new(url("https://a.example/")));
    first.export(&path).unwrap();

    let second = InvertedIndex::new();
    second.add_item("new", IndexItem::new(url("https://b.example/")));
    second.export(&path).unwrap();

    let restored = InvertedIndex::import(&path).unwrap();
    assert!(restored.get_items("old").is_empty());
    assert_eq!(restored.get_items("new").len(), 1);
}

#[test]
fn test_missing_index_is_distinct_from_corruption() {
    let dir = TempDir::new().unwrap();

    let missing = InvertedIndex::import(&dir.path().join("absent.db"));
    assert!(matches!(missing, Err(StorageError::MissingIndex(_))));

    let corrupt_path = dir.path().join("corrupt.db");
    std::fs::write(&corrupt_path, "cat,https://a.example/\n".repeat(64)).unwrap();
    let corrupt = InvertedIndex::load_or_empty(&corrupt_path);
    assert!(matches!(corrupt, Err(StorageError::Sqlite(_))));
}
