//! Import of a legacy JSON tree on first open

use filefinder_core::{stable_document_id, Database, MetadataValue, StoreConfig};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_json(path: &Path, value: serde_json::Value) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
}

fn legacy_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write_json(
        &root.join("setting.json"),
        json!({
            "appTitle": "Portal",
            "sections": [
                {"id": "libros", "documentsPath": "/data/documents-libros.json"},
                {"id": "tesis", "documentsPath": "../../outside.json"}
            ]
        }),
    );
    write_json(
        &root.join("data/documents.json"),
        json!({
            "documents": [
                {"id": 1, "nombre": "a.pdf", "ruta": "/x/a.pdf", "precio": 5, "maestro": "Inline"},
                {"id": 2, "nombre": "", "ruta": "/x/skip.pdf"},
                {"id": 3, "nombre": "b.pdf", "ruta": "/x/b.pdf"},
                "garbage"
            ]
        }),
    );
    write_json(
        &root.join("data/documents-metadata.json"),
        json!({"metadataByDocumentId": {"1": {"maestro": "External", "universidad": "UNAM"}}}),
    );
    write_json(
        &root.join("data/search-stats.json"),
        json!([
            {"query": "Tesis", "count": 3.7, "lastSearched": 1000},
            {"query": ""},
            {"query": "otra"}
        ]),
    );
    fs::write(root.join("data/documents-libros.json"), "not json {").unwrap();
    write_json(&root.join("data/search-stats-libros.json"), json!([{"query": "Libro", "count": 2, "lastSearched": 5}]));
    write_json(&root.join("data/documents-tesis.json"), json!([{"nombre": "wrong shape"}]));

    dir
}

fn config_for(legacy: &TempDir) -> StoreConfig {
    StoreConfig {
        db_path: None,
        legacy_dir: Some(legacy.path().to_path_buf()),
    }
}

#[test]
fn legacy_tree_is_imported() {
    let legacy = legacy_tree();
    let db = Database::open_in_memory_with(&config_for(&legacy)).unwrap();

    let settings = db.get_settings().unwrap();
    assert_eq!(settings.app_title, "Portal");
    let ids: Vec<_> = settings.sections.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["libros", "tesis"]);

    let documents = db.list_documents(Some("default")).unwrap();
    assert_eq!(documents.len(), 2);

    let a = db
        .get_document("default", &stable_document_id("default", "a.pdf", "/x/a.pdf"))
        .unwrap()
        .unwrap();
    assert_eq!(a.maestro, Some(MetadataValue::from("External")));
    assert_eq!(a.precio, Some(MetadataValue::from(5i64)));
    assert_eq!(a.universidad, Some(MetadataValue::from("UNAM")));

    let b = db
        .get_document("default", &stable_document_id("default", "b.pdf", "/x/b.pdf"))
        .unwrap()
        .unwrap();
    assert!(b.metadata.is_empty());

    let stats = db.get_top_searches("default", 10).unwrap();
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].query, "Tesis");
    assert_eq!(stats[0].count, 3);
    assert_eq!(stats[0].last_searched, 1000);
    assert_eq!(stats[1].count, 1);

    // a malformed documents file does not stop the section's stats
    assert!(db.list_documents(Some("libros")).unwrap().is_empty());
    assert_eq!(db.get_top_searches("libros", 5).unwrap()[0].count, 2);
    assert!(db.list_documents(Some("tesis")).unwrap().is_empty());

    assert_eq!(db.meta_value("legacy_json_migrated_v1").unwrap().as_deref(), Some("true"));
}

#[test]
fn migration_runs_once() {
    let legacy = legacy_tree();
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("search.sqlite");
    let config = config_for(&legacy);

    {
        let db = Database::open(&path, &config).unwrap();
        assert_eq!(db.list_documents(Some("default")).unwrap().len(), 2);
        db.replace_documents_for_section("default", &[]).unwrap();
        db.record_search("default", "tesis").unwrap();
    }

    let db = Database::open(&path, &config).unwrap();
    db.ensure_ready().unwrap();
    assert!(db.list_documents(Some("default")).unwrap().is_empty());
    assert_eq!(db.get_top_searches("default", 1).unwrap()[0].count, 4);
    assert_eq!(db.meta_value("legacy_json_migrated_v1").unwrap().as_deref(), Some("true"));
}

#[test]
fn missing_legacy_tree_yields_defaults() {
    let legacy = TempDir::new().unwrap();
    let db = Database::open_in_memory_with(&config_for(&legacy)).unwrap();
    assert_eq!(db.get_settings().unwrap(), filefinder_core::Settings::default());
    assert_eq!(db.get_stats().unwrap().document_count, 0);
}

#[test]
fn seed_cleanup_skipped_with_legacy_settings() {
    let legacy = legacy_tree();
    let db = Database::open_in_memory_with(&config_for(&legacy)).unwrap();
    // libros has stats and setting.json exists; nothing is removed
    assert_eq!(db.get_settings().unwrap().sections.len(), 2);
    assert_eq!(
        db.meta_value("legacy_seed_sections_cleanup_v1").unwrap().as_deref(),
        Some("true")
    );
}
