//! Storage module for persisting the inverted index
//!
//! The index is written to a SQLite file with one record per keyword. An
//! export replaces the whole keyword table inside one transaction, so readers
//! never observe a partially written index.

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteIndexStore;
pub use traits::{IndexStorage, StorageError, StorageResult};

/// Metadata recorded for every export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRecord {
    pub id: i64,
    pub exported_at: String,
    pub config_hash: Option<String>,
    pub keyword_count: usize,
    pub posting_count: usize,
}
