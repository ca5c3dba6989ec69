//! Database schema and initialization

use crate::config::StoreConfig;
use crate::error::Result;
use parking_lot::{Mutex, MutexGuard};
use rusqlite::functions::FunctionFlags;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Main database handle
///
/// One handle is opened per process and shared by reference (or `Arc`).
/// Every operation takes the connection lock exactly once.
pub struct Database {
    pub(crate) conn: Mutex<Connection>,
    pub(crate) legacy_dir: Option<PathBuf>,
}

const CREATE_TABLES: &str = r#"
-- One-time migration markers
CREATE TABLE IF NOT EXISTS app_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- Single settings row
CREATE TABLE IF NOT EXISTS app_settings (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    settings_json TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);

-- Indexed files, partitioned by section
CREATE TABLE IF NOT EXISTS documents (
    section_id TEXT NOT NULL,
    id TEXT NOT NULL,
    nombre TEXT NOT NULL,
    ruta TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    PRIMARY KEY (section_id, id)
);

-- User metadata; rows are never removed by a re-index
CREATE TABLE IF NOT EXISTS document_metadata (
    section_id TEXT NOT NULL,
    document_id TEXT NOT NULL,
    metadata_json TEXT NOT NULL,
    updated_at INTEGER NOT NULL,
    PRIMARY KEY (section_id, document_id)
);

-- Query frequency counters
CREATE TABLE IF NOT EXISTS search_stats (
    section_id TEXT NOT NULL,
    query_key TEXT NOT NULL,
    query TEXT NOT NULL,
    count INTEGER NOT NULL,
    last_searched INTEGER NOT NULL,
    PRIMARY KEY (section_id, query_key)
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_documents_section_nombre ON documents(section_id, nombre);
CREATE INDEX IF NOT EXISTS idx_documents_section_ruta ON documents(section_id, ruta);
CREATE INDEX IF NOT EXISTS idx_document_metadata_section ON document_metadata(section_id);
CREATE INDEX IF NOT EXISTS idx_search_stats_section_count ON search_stats(section_id, count DESC);
"#;

pub(crate) const LEGACY_MIGRATION_KEY: &str = "legacy_json_migrated_v1";
pub(crate) const LEGACY_SEED_CLEANUP_KEY: &str = "legacy_seed_sections_cleanup_v1";

impl Database {
    /// Open database at path, creating if necessary, and make it ready
    pub fn open(path: impl AsRef<Path>, config: &StoreConfig) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        Self::from_connection(conn, config)
    }

    /// Open in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        Self::open_in_memory_with(&StoreConfig::default())
    }

    /// Open in-memory database reading legacy data from `config`
    pub fn open_in_memory_with(config: &StoreConfig) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, config)
    }

    fn from_connection(conn: Connection, config: &StoreConfig) -> Result<Self> {
        register_functions(&conn)?;
        let db = Self {
            conn: Mutex::new(conn),
            legacy_dir: config.legacy_dir.clone(),
        };
        db.ensure_ready()?;
        Ok(db)
    }

    /// Create tables and run the one-time legacy steps; idempotent
    pub fn ensure_ready(&self) -> Result<()> {
        let conn = self.lock();
        conn.execute_batch(CREATE_TABLES)?;

        if get_meta(&conn, LEGACY_MIGRATION_KEY)?.as_deref() != Some("true") {
            super::legacy::migrate_legacy_json(&conn, self.legacy_dir.as_deref())?;
            set_meta(&conn, LEGACY_MIGRATION_KEY, "true")?;
        }

        super::settings::ensure_settings_row(&conn)?;

        if get_meta(&conn, LEGACY_SEED_CLEANUP_KEY)?.as_deref() != Some("true") {
            super::legacy::cleanup_legacy_seed_sections(&conn, self.legacy_dir.as_deref())?;
            set_meta(&conn, LEGACY_SEED_CLEANUP_KEY, "true")?;
        }

        Ok(())
    }

    /// Read a marker from `app_meta`
    pub fn meta_value(&self, key: &str) -> Result<Option<String>> {
        get_meta(&self.lock(), key)
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock()
    }
}

pub(crate) fn get_meta(conn: &Connection, key: &str) -> Result<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM app_meta WHERE key = ?1", params![key], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(value)
}

pub(crate) fn set_meta(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO app_meta (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Run `work` inside `BEGIN IMMEDIATE`/`COMMIT`, rolling back on error
pub(crate) fn with_transaction<T>(
    conn: &Connection,
    work: impl FnOnce(&Connection) -> Result<T>,
) -> Result<T> {
    conn.execute_batch("BEGIN IMMEDIATE")?;
    let result = work(conn).and_then(|value| {
        conn.execute_batch("COMMIT")?;
        Ok(value)
    });

    if result.is_err() {
        if let Err(e) = conn.execute_batch("ROLLBACK") {
            warn!(error = %e, "rollback failed");
        }
    }
    result
}

/// Text after the last `.` in a file name, lowercased; empty without a dot
pub(crate) fn file_extension(name: &str) -> String {
    match name.rfind('.') {
        Some(idx) => name[idx + 1..].to_lowercase(),
        None => String::new(),
    }
}

/// Full Unicode lowercase, unlike SQLite's ASCII-only `LOWER`
pub(crate) fn unicode_lower(text: &str) -> String {
    text.to_lowercase()
}

fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        "unicode_lower",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.as_deref().map(unicode_lower))
        },
    )?;
    conn.create_scalar_function(
        "file_extension",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let name: Option<String> = ctx.get(0)?;
            Ok(name.as_deref().map(file_extension).unwrap_or_default())
        },
    )?;
    Ok(())
}
