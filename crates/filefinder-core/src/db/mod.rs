//! Database layer for filefinder
//!
//! Provides SQLite-based storage with:
//! - Section-partitioned documents keyed by stable SHA-256 ids
//! - Per-document metadata rows that outlive re-indexing
//! - Per-section search counters with atomic upserts
//! - One-time import of legacy JSON snapshots

mod documents;
mod identity;
mod legacy;
mod metadata;
mod schema;
mod search_stats;
mod settings;
mod stats;

pub use documents::{Document, DocumentPage, DocumentPageQuery, ReplaceDocument, ReplaceReport};
pub use identity::{normalize_for_id, stable_document_id};
pub use metadata::{
    clean_metadata, extract_inline_metadata, DocumentMetadata, MetadataByDocumentId,
    MetadataValue, SavedMetadata, KNOWN_METADATA_KEYS,
};
pub use schema::Database;
pub use search_stats::{RecordedSearch, SearchStat, DEFAULT_TOP_SEARCHES};
pub use stats::DatabaseStats;

