//! Storage traits and error types
//!
//! This module defines the trait interface for index storage backends and
//! associated error types.

use crate::storage::ExportRecord;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// No index has been exported to this path yet
    #[error("No index found at {0}")]
    MissingIndex(PathBuf),

    #[error("Index path is a directory: {0}")]
    IndexIsDirectory(PathBuf),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl StorageError {
    /// Returns true if the error only means "nothing persisted yet"
    pub fn is_missing_index(&self) -> bool {
        matches!(self, Self::MissingIndex(_))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for index storage backend implementations
pub trait IndexStorage {
    /// Replaces every persisted keyword record with `entries`
    ///
    /// Either all records are replaced or none are. An export record is
    /// appended on success.
    fn replace_keywords(
        &mut self,
        entries: &[(String, Vec<Url>)],
        config_hash: Option<&str>,
    ) -> StorageResult<ExportRecord>;

    /// Reads every keyword record, keyed by keyword
    fn load_keywords(&self) -> StorageResult<BTreeMap<String, Vec<Url>>>;

    /// Metadata of the most recent export, if any
    fn latest_export(&self) -> StorageResult<Option<ExportRecord>>;

    /// Number of persisted keyword records
    fn keyword_count(&self) -> StorageResult<usize>;
}
