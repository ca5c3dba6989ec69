//! Application settings and section id normalization
//!
//! Settings arrive as untrusted JSON (from the API layer or a legacy
//! `setting.json`). [`normalize_settings`] turns any value into a fully
//! populated [`Settings`]: unknown fields are dropped, missing fields take
//! their defaults, and duplicate section ids collapse to the first
//! occurrence.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::DEFAULT_SECTION_ID;

/// Section ids that seeded fresh installs before sections were user-defined
pub const LEGACY_SEED_SECTION_IDS: [&str; 2] = ["libros", "curriculum"];

const DEFAULT_APP_TITLE: &str = "FileFinder";
const DEFAULT_APP_SUBTITLE: &str = "Find your local files instantly";
const DEFAULT_FILE_EXTENSIONS: [&str; 2] = ["pdf", "docx"];

/// A namespace isolating documents, metadata and stats
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub label: String,
    pub description: String,
    pub documents_path: String,
    pub stats_path: String,
    pub index_paths: Vec<String>,
}

/// Global and per-section configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub index_paths: Vec<String>,
    pub app_title: String,
    pub app_subtitle: String,
    pub logo_url: String,
    pub show_app_title: bool,
    pub show_app_subtitle: bool,
    pub use_abrir_adobe: bool,
    pub file_extensions: Vec<String>,
    pub sections: Vec<Section>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            index_paths: Vec::new(),
            app_title: DEFAULT_APP_TITLE.to_string(),
            app_subtitle: DEFAULT_APP_SUBTITLE.to_string(),
            logo_url: String::new(),
            show_app_title: true,
            show_app_subtitle: true,
            use_abrir_adobe: false,
            file_extensions: DEFAULT_FILE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            sections: default_sections(),
        }
    }
}

impl Settings {
    /// Find a section by (normalized) id
    pub fn section(&self, section_id: &str) -> Option<&Section> {
        let wanted = normalize_section_id(section_id);
        self.sections
            .iter()
            .find(|section| normalize_section_id(&section.id) == wanted)
    }
}

/// Lowercase, trim, and strip everything outside `[a-z0-9-_]`
pub fn sanitize_section_id(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '_')
        .collect()
}

/// Sanitize, then collapse empty / catch-all ids to `"default"`
pub fn normalize_section_id(raw: &str) -> String {
    let safe = sanitize_section_id(raw);
    match safe.as_str() {
        "" | "todos" | "all" => DEFAULT_SECTION_ID.to_string(),
        _ => safe,
    }
}

/// Default `(documentsPath, statsPath)` hints for a section
pub fn resolve_section_paths(section_id: &str) -> (String, String) {
    let safe = sanitize_section_id(section_id);
    if safe.is_empty() || safe == DEFAULT_SECTION_ID {
        (
            "/data/documents.json".to_string(),
            "/data/search-stats.json".to_string(),
        )
    } else {
        (
            format!("/data/documents-{}.json", safe),
            format!("/data/search-stats-{}.json", safe),
        )
    }
}

/// The seed sections a fresh install starts with
pub fn default_sections() -> Vec<Section> {
    vec![
        Section {
            id: "libros".to_string(),
            label: "Libros".to_string(),
            description: "Busca libros y PDFs".to_string(),
            documents_path: "/data/documents-libros.json".to_string(),
            stats_path: "/data/search-stats-libros.json".to_string(),
            index_paths: Vec::new(),
        },
        Section {
            id: "curriculum".to_string(),
            label: "Curriculum".to_string(),
            description: "CVs y perfiles profesionales".to_string(),
            documents_path: "/data/documents-curriculum.json".to_string(),
            stats_path: "/data/search-stats-curriculum.json".to_string(),
            index_paths: Vec::new(),
        },
    ]
}

/// Normalize untrusted settings JSON into [`Settings`]
pub fn normalize_settings(input: &Value) -> Settings {
    let Some(raw) = input.as_object() else {
        return Settings::default();
    };

    let file_extensions = normalize_string_array(raw.get("fileExtensions"), true);

    Settings {
        index_paths: normalize_string_array(raw.get("indexPaths"), false),
        app_title: non_empty_string(raw, "appTitle").unwrap_or_else(|| DEFAULT_APP_TITLE.to_string()),
        app_subtitle: non_empty_string(raw, "appSubtitle")
            .unwrap_or_else(|| DEFAULT_APP_SUBTITLE.to_string()),
        logo_url: raw
            .get("logoUrl")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        show_app_title: raw.get("showAppTitle").and_then(Value::as_bool).unwrap_or(true),
        show_app_subtitle: raw
            .get("showAppSubtitle")
            .and_then(Value::as_bool)
            .unwrap_or(true),
        use_abrir_adobe: raw
            .get("useAbrirAdobe")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        file_extensions: if file_extensions.is_empty() {
            DEFAULT_FILE_EXTENSIONS.iter().map(|s| s.to_string()).collect()
        } else {
            file_extensions
        },
        sections: normalize_sections(raw.get("sections")),
    }
}

fn normalize_sections(input: Option<&Value>) -> Vec<Section> {
    let Some(items) = input.and_then(Value::as_array) else {
        return default_sections();
    };

    let mut seen = HashSet::new();
    let mut sections = Vec::new();

    for item in items {
        let Some(raw) = item.as_object() else {
            continue;
        };
        let id = sanitize_section_id(raw.get("id").and_then(Value::as_str).unwrap_or_default());
        if id.is_empty() || !seen.insert(id.clone()) {
            continue;
        }

        let (default_documents, default_stats) = resolve_section_paths(&id);
        sections.push(Section {
            label: non_empty_string(raw, "label").unwrap_or_else(|| id.clone()),
            description: raw
                .get("description")
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
            documents_path: non_empty_string(raw, "documentsPath").unwrap_or(default_documents),
            stats_path: non_empty_string(raw, "statsPath").unwrap_or(default_stats),
            index_paths: normalize_string_array(raw.get("indexPaths"), false),
            id,
        });
    }

    if sections.is_empty() {
        default_sections()
    } else {
        sections
    }
}

fn non_empty_string(raw: &Map<String, Value>, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Keep trimmed, non-empty, first-occurrence strings in input order
fn normalize_string_array(input: Option<&Value>, lower: bool) -> Vec<String> {
    let Some(items) = input.and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    items
        .iter()
        .filter_map(Value::as_str)
        .map(|item| {
            if lower {
                item.trim().to_lowercase()
            } else {
                item.trim().to_string()
            }
        })
        .filter(|item| !item.is_empty() && seen.insert(item.clone()))
        .collect()
}
