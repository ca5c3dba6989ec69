//! Per-document metadata operations

use super::schema::Database;
use crate::error::{FileFinderError, Result};
use crate::settings::normalize_section_id;
use chrono::Utc;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Metadata keys surfaced as first-class fields on [`super::Document`]
pub const KNOWN_METADATA_KEYS: [&str; 4] = ["maestro", "paginas", "precio", "universidad"];

/// A single metadata value: a non-empty string or a finite number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Text(String),
    Number(serde_json::Number),
}

impl MetadataValue {
    /// Accept only non-empty strings and numbers
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self::Text(s.clone())),
            Value::Number(n) => Some(Self::Number(n.clone())),
            _ => None,
        }
    }

    /// Parse a CLI-style literal: numbers become numbers, anything else text
    pub fn parse_literal(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Number(n)) => Some(Self::Number(n)),
            _ => Some(Self::Text(raw.to_string())),
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

/// Cleaned key/value annotations of one document
pub type DocumentMetadata = BTreeMap<String, MetadataValue>;

/// Metadata of a whole section, keyed by document id
pub type MetadataByDocumentId = BTreeMap<String, DocumentMetadata>;

/// Result of a metadata upsert
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedMetadata {
    pub section_id: String,
    pub document_id: String,
    pub metadata: DocumentMetadata,
}

/// Keep only non-empty keys holding non-empty strings or numbers
///
/// Non-object input cleans to an empty map.
pub fn clean_metadata(input: &Value) -> DocumentMetadata {
    let Some(object) = input.as_object() else {
        return DocumentMetadata::new();
    };

    object
        .iter()
        .filter(|(key, _)| !key.is_empty())
        .filter_map(|(key, value)| MetadataValue::from_json(value).map(|v| (key.clone(), v)))
        .collect()
}

/// Metadata carried on a legacy record itself
///
/// Starts from the record's `metadata` object; known keys missing there are
/// filled from top-level fields of the record.
pub fn extract_inline_metadata(record: &Value) -> DocumentMetadata {
    let mut metadata = clean_metadata(record.get("metadata").unwrap_or(&Value::Null));

    for key in KNOWN_METADATA_KEYS {
        if metadata.contains_key(key) {
            continue;
        }
        if let Some(value) = record.get(key).and_then(MetadataValue::from_json) {
            metadata.insert(key.to_string(), value);
        }
    }

    metadata
}

/// Parse a stored `metadata_json` column; garbage yields an empty map
pub(crate) fn parse_metadata_json(raw: Option<&str>) -> DocumentMetadata {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(json) => serde_json::from_str::<Value>(json)
            .map(|value| clean_metadata(&value))
            .unwrap_or_default(),
        None => DocumentMetadata::new(),
    }
}

pub(crate) fn upsert_metadata(
    conn: &Connection,
    section_id: &str,
    document_id: &str,
    metadata: &DocumentMetadata,
    timestamp: i64,
) -> Result<()> {
    conn.execute(
        "INSERT INTO document_metadata (section_id, document_id, metadata_json, updated_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(section_id, document_id) DO UPDATE
         SET metadata_json = excluded.metadata_json,
             updated_at = excluded.updated_at",
        params![section_id, document_id, serde_json::to_string(metadata)?, timestamp],
    )?;
    Ok(())
}

impl Database {
    /// All metadata rows of a section
    pub fn get_metadata_map(&self, section_id: &str) -> Result<MetadataByDocumentId> {
        let section_id = normalize_section_id(section_id);
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT document_id, metadata_json FROM document_metadata WHERE section_id = ?1",
        )?;

        let rows = stmt.query_map(params![section_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
        })?;

        let mut map = MetadataByDocumentId::new();
        for row in rows {
            let (document_id, json) = row?;
            if document_id.is_empty() {
                continue;
            }
            map.insert(document_id, parse_metadata_json(json.as_deref()));
        }
        Ok(map)
    }

    /// Clean and write-through metadata for a document
    ///
    /// The document does not need to exist yet.
    pub fn save_document_metadata(
        &self,
        section_id: &str,
        document_id: &str,
        metadata: &Value,
    ) -> Result<SavedMetadata> {
        let document_id = document_id.trim();
        if document_id.is_empty() {
            return Err(FileFinderError::invalid("documentId is required"));
        }

        let section_id = normalize_section_id(section_id);
        let metadata = clean_metadata(metadata);
        upsert_metadata(
            &self.lock(),
            &section_id,
            document_id,
            &metadata,
            Utc::now().timestamp_millis(),
        )?;
        debug!(section = %section_id, document = %document_id, keys = metadata.len(), "saved metadata");

        Ok(SavedMetadata {
            section_id,
            document_id: document_id.to_string(),
            metadata,
        })
    }
}
