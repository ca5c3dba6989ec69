//! File scanning for indexing

use crate::db::ReplaceDocument;
use crate::error::Result;
use glob::Pattern;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Scan options
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Glob matched against the path relative to each scanned root
    pub pattern: String,
    pub follow_symlinks: bool,
    pub exclude_hidden: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            pattern: "**/*".to_string(),
            follow_symlinks: false,
            exclude_hidden: false,
        }
    }
}

/// Walk every path and collect regular files as `(name, full path)` pairs
///
/// Blank paths are ignored and unreadable entries are logged and skipped.
/// The result is sorted by path.
pub fn scan_index_paths(paths: &[String], options: &ScanOptions) -> Result<Vec<ReplaceDocument>> {
    let pattern = Pattern::new(&options.pattern)?;
    let mut results = Vec::new();

    for root in paths.iter().map(|p| p.trim()).filter(|p| !p.is_empty()) {
        let before = results.len();
        scan_root(Path::new(root), &pattern, options, &mut results);
        debug!(root, files = results.len() - before, "scanned index path");
    }

    results.sort_by(|a: &ReplaceDocument, b| a.ruta.cmp(&b.ruta));
    Ok(results)
}

fn scan_root(root: &Path, pattern: &Pattern, options: &ScanOptions, results: &mut Vec<ReplaceDocument>) {
    let walker = WalkDir::new(root)
        .follow_links(options.follow_symlinks)
        .into_iter()
        .filter_entry(|e| !should_skip(e, options));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(root = %root.display(), error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path
            .strip_prefix(root)
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|_| path.to_string_lossy().to_string());

        if pattern.matches(&relative) {
            results.push(ReplaceDocument {
                nombre: entry.file_name().to_string_lossy().to_string(),
                ruta: path.to_string_lossy().to_string(),
            });
        }
    }
}

fn should_skip(entry: &DirEntry, options: &ScanOptions) -> bool {
    // never skip the root itself
    if entry.depth() == 0 {
        return false;
    }
    options.exclude_hidden && entry.file_name().to_string_lossy().starts_with('.')
}
