//! Database schema definitions
//!
//! This module contains the SQL schema for the persisted inverted index.

/// SQL schema for the index database
pub const SCHEMA_SQL: &str = r#"
-- One record per keyword; urls holds the posting URLs in order, newline-delimited
CREATE TABLE IF NOT EXISTS keywords (
    keyword TEXT PRIMARY KEY,
    urls TEXT NOT NULL
);

-- One row per export
CREATE TABLE IF NOT EXISTS exports (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    exported_at TEXT NOT NULL,
    config_hash TEXT,
    keyword_count INTEGER NOT NULL,
    posting_count INTEGER NOT NULL
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
