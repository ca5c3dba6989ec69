//! FileFinder Core Library
//!
//! Document store and search subsystem for the FileFinder local file portal.
//!
//! # Features
//! - SQLite-backed document store partitioned by section
//! - Stable, content-derived document ids (SHA-256) that survive re-indexing
//! - Paginated substring search with extension filtering
//! - Per-document key/value metadata with an independent lifecycle
//! - Per-section search frequency statistics
//! - One-time import of legacy JSON snapshots

pub mod config;
pub mod db;
pub mod error;
pub mod index;
pub mod settings;

pub use config::StoreConfig;
pub use db::{
    clean_metadata, extract_inline_metadata, normalize_for_id, stable_document_id, Database,
    DatabaseStats, Document, DocumentMetadata, DocumentPage, DocumentPageQuery,
    MetadataByDocumentId, MetadataValue, RecordedSearch, ReplaceDocument, ReplaceReport,
    SavedMetadata, SearchStat, DEFAULT_TOP_SEARCHES, KNOWN_METADATA_KEYS,
};
pub use error::{ErrorKind, FileFinderError, Error, Result};
pub use index::{scan_index_paths, IndexReport, ScanOptions};
pub use settings::{
    normalize_section_id, normalize_settings, resolve_section_paths, sanitize_section_id, Section,
    Settings,
};

/// Section id every unknown or empty section collapses to
pub const DEFAULT_SECTION_ID: &str = "default";

/// Default cache directory name
pub const CACHE_DIR_NAME: &str = "filefinder";

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "filefinder";
