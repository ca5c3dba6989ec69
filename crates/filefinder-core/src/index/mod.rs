//! Indexing: scan directories and swap a section's document set

mod scanner;

pub use scanner::{scan_index_paths, ScanOptions};

use crate::db::Database;
use crate::error::{FileFinderError, Result};
use crate::settings::normalize_section_id;
use serde::Serialize;
use tracing::info;

/// Outcome of an indexing run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexReport {
    pub section_id: String,
    /// Files found on disk
    pub scanned: usize,
    /// Documents stored after dedup
    pub count: usize,
}

impl Database {
    /// Scan `paths` (or the section's configured index paths when empty)
    /// and replace the section's documents with what was found
    pub fn index_section(
        &self,
        section_id: &str,
        paths: &[String],
        options: &ScanOptions,
    ) -> Result<IndexReport> {
        let section_id = normalize_section_id(section_id);

        let mut roots: Vec<String> = paths
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        if roots.is_empty() {
            roots = self
                .get_settings()?
                .section(&section_id)
                .map(|section| section.index_paths.clone())
                .unwrap_or_default();
        }
        if roots.is_empty() {
            return Err(FileFinderError::invalid(format!(
                "no index paths configured for section '{}'",
                section_id
            )));
        }

        let documents = scan_index_paths(&roots, options)?;
        let report = self.replace_documents_for_section(&section_id, &documents)?;
        info!(section = %report.section_id, scanned = documents.len(), count = report.count, "indexed section");

        Ok(IndexReport {
            section_id: report.section_id,
            scanned: documents.len(),
            count: report.count,
        })
    }
}
