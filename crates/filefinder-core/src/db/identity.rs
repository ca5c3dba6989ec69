//! Stable document identity

use crate::settings::normalize_section_id;
use sha2::{Digest, Sha256};

/// Normalize a name or path for hashing
///
/// Backslashes become forward slashes, runs of slashes collapse to one,
/// surrounding whitespace is trimmed and the result is lowercased.
pub fn normalize_for_id(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        let c = if c == '\\' { '/' } else { c };
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.push(c);
    }
    out.trim().to_lowercase()
}

/// Compute the stable id of a document: hex SHA-256 over
/// `section + "\n" + name + "\n" + path` after normalization
pub fn stable_document_id(section_id: &str, nombre: &str, ruta: &str) -> String {
    let key = format!(
        "{}\n{}\n{}",
        normalize_section_id(section_id),
        normalize_for_id(nombre),
        normalize_for_id(ruta)
    );
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}
