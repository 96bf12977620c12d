use crate::index::prep_keyword;
use crate::storage::{ExportRecord, IndexStorage, SqliteIndexStore, StorageResult};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use url::Url;

/// One posting: a page a keyword appeared on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexItem {
    pub url: Url,
}

impl IndexItem {
    pub fn new(url: Url) -> Self {
        Self { url }
    }
}

impl From<Url> for IndexItem {
    fn from(url: Url) -> Self {
        Self::new(url)
    }
}

/// Concurrent keyword → postings map
///
/// All keys are normalized with [`prep_keyword`]. A keyword's postings keep
/// insertion order and may repeat the same URL; a repeat means the word
/// occurred more than once on that page.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    mapping: RwLock<HashMap<String, Vec<IndexItem>>>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from already-persisted keyword records
    pub fn from_mapping(mapping: BTreeMap<String, Vec<Url>>) -> Self {
        let mapping = mapping
            .into_iter()
            .map(|(keyword, urls)| {
                (
                    prep_keyword(&keyword),
                    urls.into_iter().map(IndexItem::new).collect(),
                )
            })
            .collect();

        Self {
            mapping: RwLock::new(mapping),
        }
    }

    /// Appends a posting for `keyword`
    pub fn add_item(&self, keyword: &str, item: IndexItem) {
        let key = prep_keyword(keyword);
        self.mapping.write().entry(key).or_default().push(item);
    }

    /// Appends the same posting under every keyword, holding the lock once
    pub fn add_items<S: AsRef<str>>(&self, keywords: &[S], item: &IndexItem) {
        let mut mapping = self.mapping.write();
        for keyword in keywords {
            let key = prep_keyword(keyword.as_ref());
            mapping.entry(key).or_default().push(item.clone());
        }
    }

    /// Postings for `keyword` in insertion order; empty if unknown
    pub fn get_items(&self, keyword: &str) -> Vec<IndexItem> {
        let key = prep_keyword(keyword);
        self.mapping.read().get(&key).cloned().unwrap_or_default()
    }

    /// Indexes every word of a page's cleaned text
    ///
    /// Words are split on whitespace; words that normalize to nothing are
    /// skipped. Returns the number of postings added.
    pub fn index_page(&self, url: &Url, text: &str) -> usize {
        let words: Vec<String> = text
            .split_whitespace()
            .map(prep_keyword)
            .filter(|w| !w.is_empty())
            .collect();

        if words.is_empty() {
            return 0;
        }

        let item = IndexItem::new(url.clone());
        let mut mapping = self.mapping.write();
        for word in &words {
            match mapping.get_mut(word) {
                Some(items) => items.push(item.clone()),
                None => {
                    mapping.insert(word.clone(), vec![item.clone()]);
                }
            }
        }

        words.len()
    }

    pub fn keyword_count(&self) -> usize {
        self.mapping.read().len()
    }

    pub fn posting_count(&self) -> usize {
        self.mapping.read().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.read().is_empty()
    }

    /// Copy of the whole index sorted by keyword
    pub fn snapshot(&self) -> Vec<(String, Vec<IndexItem>)> {
        let mapping = self.mapping.read();
        let mut entries: Vec<(String, Vec<IndexItem>)> = mapping
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        drop(mapping);

        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Writes the index to `path`, replacing whatever was there
    pub fn export(&self, path: &Path) -> StorageResult<ExportRecord> {
        self.export_with_hash(path, None)
    }

    /// Writes the index and records the configuration hash with the export
    pub fn export_with_hash(
        &self,
        path: &Path,
        config_hash: Option<&str>,
    ) -> StorageResult<ExportRecord> {
        let entries: Vec<(String, Vec<Url>)> = self
            .snapshot()
            .into_iter()
            .map(|(keyword, items)| (keyword, items.into_iter().map(|i| i.url).collect()))
            .collect();

        let mut store = SqliteIndexStore::create(path)?;
        store.replace_keywords(&entries, config_hash)
    }

    /// Reads an index previously written by [`InvertedIndex::export`]
    ///
    /// Returns `StorageError::MissingIndex` when nothing exists at `path`.
    pub fn import(path: &Path) -> StorageResult<Self> {
        let store = SqliteIndexStore::open_read_only(path)?;
        let mapping = store.load_keywords()?;
        Ok(Self::from_mapping(mapping))
    }

    /// Like [`InvertedIndex::import`], but a missing index yields an empty one
    pub fn load_or_empty(path: &Path) -> StorageResult<Self> {
        match Self::import(path) {
            Ok(index) => Ok(index),
            Err(e) if e.is_missing_index() => {
                tracing::info!("No index at {}, starting empty", path.display());
                Ok(Self::new())
            }
            Err(e) => Err(e),
        }
    }
}
