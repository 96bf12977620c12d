//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the IndexStorage trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{IndexStorage, StorageError, StorageResult};
use crate::storage::ExportRecord;
use chrono::Utc;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::collections::BTreeMap;
use std::path::Path;
use url::Url;

/// SQLite index store
pub struct SqliteIndexStore {
    conn: Connection,
}

impl SqliteIndexStore {
    /// Opens or creates an index file for writing
    ///
    /// Missing parent directories are created.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite index file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteIndexStore)` - Successfully opened/created database
    /// * `Err(StorageError)` - Path is a directory or the database could not be opened
    pub fn create(path: &Path) -> StorageResult<Self> {
        if path.is_dir() {
            return Err(StorageError::IndexIsDirectory(path.to_path_buf()));
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;
        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Opens an existing index file without write access
    ///
    /// A path that does not exist yields `StorageError::MissingIndex`, which
    /// callers treat as "start with an empty index". Any other failure is a
    /// real error.
    pub fn open_read_only(path: &Path) -> StorageResult<Self> {
        if !path.exists() {
            return Err(StorageError::MissingIndex(path.to_path_buf()));
        }
        if path.is_dir() {
            return Err(StorageError::IndexIsDirectory(path.to_path_buf()));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn parse_posting_urls(keyword: &str, urls: &str) -> StorageResult<Vec<Url>> {
    urls.lines()
        .filter(|line| !line.is_empty())
        .map(|line| {
            Url::parse(line).map_err(|e| {
                StorageError::Serialization(format!(
                    "Invalid URL '{}' for keyword '{}': {}",
                    line, keyword, e
                ))
            })
        })
        .collect()
}

impl IndexStorage for SqliteIndexStore {
    fn replace_keywords(
        &mut self,
        entries: &[(String, Vec<Url>)],
        config_hash: Option<&str>,
    ) -> StorageResult<ExportRecord> {
        let exported_at = Utc::now().to_rfc3339();
        let posting_count: usize = entries.iter().map(|(_, urls)| urls.len()).sum();

        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM keywords", [])?;
        {
            let mut stmt = tx.prepare("INSERT INTO keywords (keyword, urls) VALUES (?1, ?2)")?;
            for (keyword, urls) in entries {
                let joined = urls
                    .iter()
                    .map(Url::as_str)
                    .collect::<Vec<_>>()
                    .join("\n");
                stmt.execute(params![keyword, joined])?;
            }
        }
        tx.execute(
            "INSERT INTO exports (exported_at, config_hash, keyword_count, posting_count)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                exported_at,
                config_hash,
                entries.len() as i64,
                posting_count as i64
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(ExportRecord {
            id,
            exported_at,
            config_hash: config_hash.map(str::to_string),
            keyword_count: entries.len(),
            posting_count,
        })
    }

    fn load_keywords(&self) -> StorageResult<BTreeMap<String, Vec<Url>>> {
        let mut stmt = self
            .conn
            .prepare("SELECT keyword, urls FROM keywords ORDER BY keyword")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut mapping = BTreeMap::new();
        for row in rows {
            let (keyword, urls) = row?;
            let urls = parse_posting_urls(&keyword, &urls)?;
            mapping.insert(keyword, urls);
        }

        Ok(mapping)
    }

    fn latest_export(&self) -> StorageResult<Option<ExportRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, exported_at, config_hash, keyword_count, posting_count
                 FROM exports ORDER BY id DESC LIMIT 1",
                [],
                |row| {
                    Ok(ExportRecord {
                        id: row.get(0)?,
                        exported_at: row.get(1)?,
                        config_hash: row.get(2)?,
                        keyword_count: row.get::<_, i64>(3)? as usize,
                        posting_count: row.get::<_, i64>(4)? as usize,
                    })
                },
            )
            .optional()?;

        Ok(record)
    }

    fn keyword_count(&self) -> StorageResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM keywords", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
