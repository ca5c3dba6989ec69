//! One-time import of legacy JSON snapshots
//!
//! A legacy tree looks like:
//!
//! ```text
//! <legacy_dir>/setting.json
//! <legacy_dir>/data/documents.json
//! <legacy_dir>/data/documents-metadata.json
//! <legacy_dir>/data/search-stats.json
//! <legacy_dir>/data/documents-<section>.json
//! ...
//! ```
//!
//! Every unreadable, malformed or wrongly shaped file is logged and treated
//! as "no legacy data" for that source only.

use super::identity::stable_document_id;
use super::metadata::{clean_metadata, extract_inline_metadata, upsert_metadata, DocumentMetadata, MetadataByDocumentId};
use super::schema::with_transaction;
use super::search_stats::{merge_search_stat, SearchStat};
use super::settings::{load_settings, store_settings};
use crate::error::{FileFinderError, Result};
use crate::settings::{normalize_section_id, normalize_settings, Section, Settings, LEGACY_SEED_SECTION_IDS};
use crate::DEFAULT_SECTION_ID;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const LEGACY_SETTINGS_FILE: &str = "setting.json";
const LEGACY_DATA_DIR: &str = "data";

/// Snapshot files of one section
#[derive(Debug, Clone, PartialEq)]
struct LegacySectionFiles {
    documents: PathBuf,
    metadata: PathBuf,
    stats: PathBuf,
}

/// Default snapshot file names `(documents, metadata, stats)` for a section
fn default_file_names(section_id: &str) -> (String, String, String) {
    let section_id = normalize_section_id(section_id);
    if section_id == DEFAULT_SECTION_ID {
        (
            "documents.json".to_string(),
            "documents-metadata.json".to_string(),
            "search-stats.json".to_string(),
        )
    } else {
        (
            format!("documents-{}.json", section_id),
            format!("documents-metadata-{}.json", section_id),
            format!("search-stats-{}.json", section_id),
        )
    }
}

/// Resolve a `/data/<file>.json` hint inside the legacy tree, else the default file
fn resolve_legacy_path(legacy_dir: &Path, hint: Option<&str>, fallback: &str) -> PathBuf {
    if let Some(hint) = hint.map(str::trim) {
        if hint.starts_with("/data/") && hint.ends_with(".json") {
            return legacy_dir.join(hint.trim_start_matches('/'));
        }
    }
    legacy_dir.join(LEGACY_DATA_DIR).join(fallback)
}

fn section_files(legacy_dir: &Path, section_id: &str, section: Option<&Section>) -> LegacySectionFiles {
    let (documents, metadata, stats) = default_file_names(section_id);
    LegacySectionFiles {
        documents: resolve_legacy_path(
            legacy_dir,
            section.map(|s| s.documents_path.as_str()),
            &documents,
        ),
        metadata: legacy_dir.join(LEGACY_DATA_DIR).join(metadata),
        stats: resolve_legacy_path(legacy_dir, section.map(|s| s.stats_path.as_str()), &stats),
    }
}

/// Read a legacy JSON file; a missing file is `Ok(None)`
fn read_legacy_json(path: &Path) -> Result<Option<Value>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|err| FileFinderError::LegacyRead {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    let value = serde_json::from_str(&content).map_err(|err| FileFinderError::LegacyRead {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    Ok(Some(value))
}

fn read_or_skip(path: &Path) -> Option<Value> {
    match read_legacy_json(path) {
        Ok(Some(value)) => Some(value),
        Ok(None) => {
            debug!(path = %path.display(), "no legacy file");
            None
        }
        Err(err) => {
            warn!(error = %err, "skipping legacy file");
            None
        }
    }
}

fn warn_bad_shape(path: &Path, expected: &str) {
    let err = FileFinderError::LegacyRead {
        path: path.to_path_buf(),
        reason: format!("expected {}", expected),
    };
    warn!(error = %err, "skipping legacy file");
}

/// Accept `{metadataByDocumentId: {...}}` or a bare `{id: {...}}` map
fn normalize_metadata_map(input: &Value) -> MetadataByDocumentId {
    let raw = match input.get("metadataByDocumentId") {
        Some(inner) => inner,
        None => input,
    };
    let Some(object) = raw.as_object() else {
        return MetadataByDocumentId::new();
    };

    object
        .iter()
        .filter(|(id, value)| !id.is_empty() && value.is_object())
        .map(|(id, value)| (id.clone(), clean_metadata(value)))
        .collect()
}

fn legacy_record_id(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Inline fields first; the external map wins on conflicting keys
fn merge_legacy_metadata(record: &Value, external: &MetadataByDocumentId) -> DocumentMetadata {
    let mut merged = extract_inline_metadata(record);
    if let Some(from_map) = legacy_record_id(record).and_then(|id| external.get(&id)) {
        merged.extend(from_map.clone());
    }
    merged
}

struct LegacyCandidate {
    nombre: String,
    ruta: String,
    metadata: DocumentMetadata,
}

fn migrate_documents(conn: &Connection, section_id: &str, files: &LegacySectionFiles) -> Result<usize> {
    let Some(parsed) = read_or_skip(&files.documents) else {
        return Ok(0);
    };
    let Some(records) = parsed.get("documents").and_then(Value::as_array) else {
        warn_bad_shape(&files.documents, "an object with a `documents` array");
        return Ok(0);
    };
    if records.is_empty() {
        return Ok(0);
    }

    let external = read_or_skip(&files.metadata)
        .map(|value| normalize_metadata_map(&value))
        .unwrap_or_default();

    let mut candidates: BTreeMap<String, LegacyCandidate> = BTreeMap::new();
    for record in records.iter().filter(|r| r.is_object()) {
        let nombre = record.get("nombre").and_then(Value::as_str).unwrap_or_default().trim();
        let ruta = record.get("ruta").and_then(Value::as_str).unwrap_or_default().trim();
        if nombre.is_empty() || ruta.is_empty() {
            continue;
        }

        let id = stable_document_id(section_id, nombre, ruta);
        let metadata = merge_legacy_metadata(record, &external);
        let candidate = candidates.entry(id).or_insert_with(|| LegacyCandidate {
            nombre: nombre.to_string(),
            ruta: ruta.to_string(),
            metadata: DocumentMetadata::new(),
        });
        candidate.nombre = nombre.to_string();
        candidate.ruta = ruta.to_string();
        candidate.metadata.extend(metadata);
    }

    if candidates.is_empty() {
        return Ok(0);
    }

    with_transaction(conn, |conn| {
        let mut insert = conn.prepare(
            "INSERT OR REPLACE INTO documents (section_id, id, nombre, ruta, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        )?;
        let timestamp = Utc::now().timestamp_millis();
        for (id, candidate) in &candidates {
            insert.execute(params![section_id, id, candidate.nombre, candidate.ruta, timestamp])?;
            if !candidate.metadata.is_empty() {
                upsert_metadata(conn, section_id, id, &candidate.metadata, timestamp)?;
            }
        }
        Ok(())
    })?;

    Ok(candidates.len())
}

fn parse_legacy_stat(record: &Value, now: i64) -> Option<SearchStat> {
    let query = record.get("query")?.as_str()?.trim();
    if query.is_empty() {
        return None;
    }

    let count = record
        .get("count")
        .and_then(Value::as_f64)
        .map(|c| (c.floor() as i64).max(1))
        .unwrap_or(1);
    let last_searched = record
        .get("lastSearched")
        .and_then(Value::as_f64)
        .map(|t| t.floor() as i64)
        .unwrap_or(now);

    Some(SearchStat {
        query: query.to_string(),
        count,
        last_searched,
    })
}

fn migrate_search_stats(conn: &Connection, section_id: &str, path: &Path) -> Result<usize> {
    let Some(parsed) = read_or_skip(path) else {
        return Ok(0);
    };
    let Some(records) = parsed.as_array() else {
        warn_bad_shape(path, "an array of search stats");
        return Ok(0);
    };

    let now = Utc::now().timestamp_millis();
    let stats: Vec<SearchStat> = records.iter().filter_map(|r| parse_legacy_stat(r, now)).collect();
    if stats.is_empty() {
        return Ok(0);
    }

    with_transaction(conn, |conn| {
        for stat in &stats {
            merge_search_stat(conn, section_id, stat)?;
        }
        Ok(())
    })?;
    Ok(stats.len())
}

/// Import settings, documents, metadata and stats from the legacy tree
pub(crate) fn migrate_legacy_json(conn: &Connection, legacy_dir: Option<&Path>) -> Result<()> {
    let Some(legacy_dir) = legacy_dir else {
        store_settings(conn, &Settings::default())?;
        debug!("no legacy directory configured");
        return Ok(());
    };

    info!(dir = %legacy_dir.display(), "migrating legacy JSON data");
    let raw_settings = read_or_skip(&legacy_dir.join(LEGACY_SETTINGS_FILE)).unwrap_or(Value::Null);
    let settings = normalize_settings(&raw_settings);
    store_settings(conn, &settings)?;

    let mut sections: Vec<(String, LegacySectionFiles)> =
        vec![(DEFAULT_SECTION_ID.to_string(), section_files(legacy_dir, DEFAULT_SECTION_ID, None))];
    for section in &settings.sections {
        let section_id = normalize_section_id(&section.id);
        let files = section_files(legacy_dir, &section_id, Some(section));
        match sections.iter_mut().find(|(id, _)| *id == section_id) {
            Some(existing) => existing.1 = files,
            None => sections.push((section_id, files)),
        }
    }

    for (section_id, files) in &sections {
        let documents = migrate_documents(conn, section_id, files)?;
        let stats = migrate_search_stats(conn, section_id, &files.stats)?;
        info!(section = %section_id, documents, stats, "migrated legacy section");
    }

    info!("legacy migration complete");
    Ok(())
}

fn section_has_rows(conn: &Connection, table: &str) -> Result<bool> {
    let present = conn
        .query_row(
            &format!("SELECT 1 FROM {} WHERE section_id IN (?1, ?2) LIMIT 1", table),
            params![LEGACY_SEED_SECTION_IDS[0], LEGACY_SEED_SECTION_IDS[1]],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    Ok(present)
}

/// Drop unused seed sections from stored settings
///
/// Skipped when a legacy `setting.json` exists or a seed section holds any
/// documents or stats. Seed sections with index paths are kept. Settings are
/// left untouched when nothing would remain.
pub(crate) fn cleanup_legacy_seed_sections(conn: &Connection, legacy_dir: Option<&Path>) -> Result<()> {
    if legacy_dir.is_some_and(|dir| dir.join(LEGACY_SETTINGS_FILE).exists()) {
        return Ok(());
    }

    let settings = load_settings(conn)?;
    let is_seed =
        |section: &Section| LEGACY_SEED_SECTION_IDS.contains(&normalize_section_id(&section.id).as_str());
    if !settings.sections.iter().any(is_seed) {
        return Ok(());
    }
    if section_has_rows(conn, "documents")? || section_has_rows(conn, "search_stats")? {
        return Ok(());
    }

    let kept: Vec<Section> = settings
        .sections
        .iter()
        .filter(|section| !is_seed(*section) || !section.index_paths.is_empty())
        .cloned()
        .collect();
    if kept.is_empty() || kept.len() == settings.sections.len() {
        return Ok(());
    }

    info!(removed = settings.sections.len() - kept.len(), "removed unused seed sections");
    store_settings(conn, &Settings { sections: kept, ..settings })
}
