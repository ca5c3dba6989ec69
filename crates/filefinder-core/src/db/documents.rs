//! Document operations

use super::identity::stable_document_id;
use super::metadata::{parse_metadata_json, DocumentMetadata, MetadataValue, KNOWN_METADATA_KEYS};
use super::schema::{with_transaction, Database};
use crate::error::Result;
use crate::settings::normalize_section_id;
use chrono::Utc;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 500;
const MAX_PAGE: i64 = 100_000;

const SELECT_DOCUMENT: &str = "SELECT d.section_id, d.id, d.nombre, d.ruta, d.created_at, d.updated_at, m.metadata_json
     FROM documents d
     LEFT JOIN document_metadata m
       ON m.section_id = d.section_id
      AND m.document_id = d.id";

const ORDER_BY_NAME: &str = "ORDER BY unicode_lower(d.nombre) ASC, d.id ASC";

/// Merged document view: the stored row with its metadata overlaid
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub section_id: String,
    pub id: String,
    pub nombre: String,
    pub ruta: String,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maestro: Option<MetadataValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paginas: Option<MetadataValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precio: Option<MetadataValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub universidad: Option<MetadataValue>,
    #[serde(skip_serializing_if = "DocumentMetadata::is_empty")]
    pub metadata: DocumentMetadata,
}

impl Document {
    /// Overlay cleaned metadata, surfacing known keys as fields
    pub fn with_metadata(mut self, metadata: DocumentMetadata) -> Self {
        for key in KNOWN_METADATA_KEYS {
            let value = metadata.get(key).cloned();
            match key {
                "maestro" => self.maestro = value,
                "paginas" => self.paginas = value,
                "precio" => self.precio = value,
                _ => self.universidad = value,
            }
        }
        self.metadata = metadata;
        self
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let metadata_json: Option<String> = row.get(6)?;
        let document = Document {
            section_id: row.get(0)?,
            id: row.get(1)?,
            nombre: row.get(2)?,
            ruta: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
            maestro: None,
            paginas: None,
            precio: None,
            universidad: None,
            metadata: DocumentMetadata::new(),
        };
        Ok(document.with_metadata(parse_metadata_json(metadata_json.as_deref())))
    }
}

/// A `(name, path)` pair submitted by an indexing run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceDocument {
    pub nombre: String,
    pub ruta: String,
}

impl ReplaceDocument {
    pub fn new(nombre: impl Into<String>, ruta: impl Into<String>) -> Self {
        Self {
            nombre: nombre.into(),
            ruta: ruta.into(),
        }
    }
}

/// Outcome of a section replace
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceReport {
    pub section_id: String,
    pub count: usize,
}

/// Filters and page selection for [`Database::list_documents_page`]
#[derive(Debug, Clone, Default)]
pub struct DocumentPageQuery {
    pub section_id: String,
    pub query: Option<String>,
    pub extensions: Vec<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// One page of a filtered search
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPage {
    pub section_id: String,
    pub documents: Vec<Document>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

/// Escape `\`, `%` and `_` so they match literally under `ESCAPE '\'`
pub(crate) fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Lowercase, strip a leading dot, keep `[a-z0-9]+`, dedupe
pub(crate) fn normalize_extensions(raw: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.iter()
        .map(|item| {
            let item = item.trim().to_lowercase();
            item.strip_prefix('.').map(str::to_string).unwrap_or(item)
        })
        .filter(|item| {
            !item.is_empty() && item.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        })
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Non-positive or missing values take `fallback`; the rest cap at `max`
fn positive_or(value: Option<i64>, fallback: i64, max: i64) -> i64 {
    match value {
        Some(v) if v > 0 => v.min(max),
        _ => fallback,
    }
}

impl Database {
    /// Atomically swap the document set of a section
    ///
    /// Entries with a blank name or path are skipped; entries sharing a
    /// stable id collapse to the last one. On error the previous set is kept.
    pub fn replace_documents_for_section(
        &self,
        section_id: &str,
        documents: &[ReplaceDocument],
    ) -> Result<ReplaceReport> {
        let section_id = normalize_section_id(section_id);

        let mut by_id: HashMap<String, (&str, &str)> = HashMap::new();
        for document in documents {
            let nombre = document.nombre.trim();
            let ruta = document.ruta.trim();
            if nombre.is_empty() || ruta.is_empty() {
                continue;
            }
            by_id.insert(stable_document_id(&section_id, nombre, ruta), (nombre, ruta));
        }

        let conn = self.lock();
        with_transaction(&conn, |conn| {
            conn.execute("DELETE FROM documents WHERE section_id = ?1", params![section_id])?;

            let mut stmt = conn.prepare(
                "INSERT INTO documents (section_id, id, nombre, ruta, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            )?;
            let timestamp = Utc::now().timestamp_millis();
            for (id, (nombre, ruta)) in &by_id {
                stmt.execute(params![section_id, id, nombre, ruta, timestamp])?;
            }
            Ok(())
        })?;

        debug!(section = %section_id, count = by_id.len(), "replaced section documents");
        Ok(ReplaceReport {
            section_id,
            count: by_id.len(),
        })
    }

    /// Look up one document with its metadata
    pub fn get_document(&self, section_id: &str, document_id: &str) -> Result<Option<Document>> {
        let document_id = document_id.trim();
        if document_id.is_empty() {
            return Ok(None);
        }

        let section_id = normalize_section_id(section_id);
        let conn = self.lock();
        let document = conn
            .query_row(
                &format!("{} WHERE d.section_id = ?1 AND d.id = ?2", SELECT_DOCUMENT),
                params![section_id, document_id],
                Document::from_row,
            )
            .optional()?;
        Ok(document)
    }

    /// Check whether a document row exists
    pub fn document_exists(&self, section_id: &str, document_id: &str) -> Result<bool> {
        let document_id = document_id.trim();
        if document_id.is_empty() {
            return Ok(false);
        }

        let section_id = normalize_section_id(section_id);
        let exists = self
            .lock()
            .query_row(
                "SELECT 1 FROM documents WHERE section_id = ?1 AND id = ?2",
                params![section_id, document_id],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        Ok(exists)
    }

    /// List a section's documents by name; `None`, empty or `"todos"` lists every section
    pub fn list_documents(&self, section_id: Option<&str>) -> Result<Vec<Document>> {
        let input = section_id.map(|s| s.trim().to_lowercase()).unwrap_or_default();
        let conn = self.lock();

        let documents = if input.is_empty() || input == "todos" {
            let mut stmt = conn.prepare(&format!("{} {}", SELECT_DOCUMENT, ORDER_BY_NAME))?;
            let rows = stmt.query_map([], Document::from_row)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        } else {
            let mut stmt = conn.prepare(&format!(
                "{} WHERE d.section_id = ?1 {}",
                SELECT_DOCUMENT, ORDER_BY_NAME
            ))?;
            let rows = stmt.query_map(params![normalize_section_id(&input)], Document::from_row)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };

        Ok(documents)
    }

    /// Filtered, paginated search over one section
    ///
    /// `query` matches case-insensitively as a literal substring of name or
    /// path. A requested page past the end clamps to the last page.
    pub fn list_documents_page(&self, options: &DocumentPageQuery) -> Result<DocumentPage> {
        let section_id = normalize_section_id(&options.section_id);
        let query = options
            .query
            .as_deref()
            .map(|q| q.trim().to_lowercase())
            .unwrap_or_default();
        let extensions = normalize_extensions(&options.extensions);
        let page_size = positive_or(options.page_size, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
        let requested_page = positive_or(options.page, 1, MAX_PAGE);

        let mut clauses = vec!["d.section_id = ?".to_string()];
        let mut values: Vec<SqlValue> = vec![SqlValue::Text(section_id.clone())];

        if !query.is_empty() {
            let pattern = format!("%{}%", escape_like(&query));
            clauses.push(
                "(unicode_lower(d.nombre) LIKE ? ESCAPE '\\' OR unicode_lower(d.ruta) LIKE ? ESCAPE '\\')"
                    .to_string(),
            );
            values.push(SqlValue::Text(pattern.clone()));
            values.push(SqlValue::Text(pattern));
        }

        if !extensions.is_empty() {
            let placeholders = vec!["?"; extensions.len()].join(", ");
            clauses.push(format!("file_extension(d.nombre) IN ({})", placeholders));
            values.extend(extensions.iter().cloned().map(SqlValue::Text));
        }

        let where_sql = format!("WHERE {}", clauses.join(" AND "));

        let conn = self.lock();
        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM documents d {}", where_sql),
            params_from_iter(values.iter()),
            |row| row.get(0),
        )?;

        let total_pages = ((total + page_size - 1) / page_size).max(1);
        let page = requested_page.min(total_pages);
        let offset = (page - 1) * page_size;

        values.push(SqlValue::Integer(page_size));
        values.push(SqlValue::Integer(offset));

        let mut stmt = conn.prepare(&format!(
            "{} {} {} LIMIT ? OFFSET ?",
            SELECT_DOCUMENT, where_sql, ORDER_BY_NAME
        ))?;
        let documents = stmt
            .query_map(params_from_iter(values.iter()), Document::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!(
            section = %section_id,
            total,
            page,
            returned = documents.len(),
            "searched documents"
        );

        Ok(DocumentPage {
            section_id,
            documents,
            total,
            page,
            page_size,
            total_pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn docs(pairs: &[(&str, &str)]) -> Vec<ReplaceDocument> {
        pairs.iter().map(|(n, r)| ReplaceDocument::new(*n, *r)).collect()
    }

    fn page_query(section: &str) -> DocumentPageQuery {
        DocumentPageQuery {
            section_id: section.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("100%_done\\x"), "100\\%\\_done\\\\x");
    }

    #[test]
    fn test_normalize_extensions() {
        let raw = vec![".PDF".to_string(), "pdf".into(), " docx ".into(), "tar.gz".into(), "".into()];
        assert_eq!(normalize_extensions(&raw), vec!["pdf", "docx"]);
    }

    #[test]
    fn test_replace_dedupes_and_skips_blank() {
        let db = Database::open_in_memory().unwrap();
        let report = db
            .replace_documents_for_section(
                "Libros",
                &docs(&[
                    ("a.pdf", "/x/a.pdf"),
                    ("A.PDF", "\\x\\a.pdf"),
                    ("  ", "/x/blank.pdf"),
                    ("b.pdf", ""),
                    ("c.pdf", "/x/c.pdf"),
                ]),
            )
            .unwrap();
        assert_eq!(report, ReplaceReport { section_id: "libros".into(), count: 2 });

        let listed = db.list_documents(Some("libros")).unwrap();
        assert_eq!(listed.len(), 2);
        // last duplicate wins
        assert_eq!(listed[0].nombre, "A.PDF");
    }

    #[test]
    fn test_replace_swaps_whole_section() {
        let db = Database::open_in_memory().unwrap();
        db.replace_documents_for_section("s", &docs(&[("a.pdf", "/a.pdf"), ("b.pdf", "/b.pdf")]))
            .unwrap();
        db.replace_documents_for_section("other", &docs(&[("z.pdf", "/z.pdf")]))
            .unwrap();
        db.replace_documents_for_section("s", &docs(&[("c.pdf", "/c.pdf")]))
            .unwrap();

        let names: Vec<_> = db
            .list_documents(Some("s"))
            .unwrap()
            .into_iter()
            .map(|d| d.nombre)
            .collect();
        assert_eq!(names, vec!["c.pdf"]);
        assert_eq!(db.list_documents(Some("other")).unwrap().len(), 1);
        assert_eq!(db.list_documents(None).unwrap().len(), 2);
        assert_eq!(db.list_documents(Some("TODOS")).unwrap().len(), 2);
    }

    #[test]
    fn test_replace_rolls_back_on_failure() {
        let db = Database::open_in_memory().unwrap();
        db.replace_documents_for_section(
            "s",
            &docs(&[("a.pdf", "/a.pdf"), ("b.pdf", "/b.pdf"), ("c.pdf", "/c.pdf")]),
        )
        .unwrap();
        db.lock()
            .execute_batch(
                "CREATE TRIGGER fail_insert BEFORE INSERT ON documents
                 WHEN new.nombre = 'boom.pdf'
                 BEGIN SELECT RAISE(ABORT, 'simulated failure'); END;",
            )
            .unwrap();

        let result = db.replace_documents_for_section(
            "s",
            &docs(&[("d.pdf", "/d.pdf"), ("boom.pdf", "/boom.pdf"), ("e.pdf", "/e.pdf")]),
        );
        let err = result.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Storage);

        let names: Vec<_> = db
            .list_documents(Some("s"))
            .unwrap()
            .into_iter()
            .map(|d| d.nombre)
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf", "c.pdf"]);

        // the connection is usable again after the rollback
        db.replace_documents_for_section("s", &docs(&[("f.pdf", "/f.pdf")]))
            .unwrap();
        assert_eq!(db.list_documents(Some("s")).unwrap().len(), 1);
    }

    #[test]
    fn test_get_and_exists() {
        let db = Database::open_in_memory().unwrap();
        db.replace_documents_for_section("s", &docs(&[("a.pdf", "/x/a.pdf")]))
            .unwrap();
        let id = stable_document_id("s", "a.pdf", "/x/a.pdf");

        let doc = db.get_document("S", &id).unwrap().unwrap();
        assert_eq!(doc.section_id, "s");
        assert_eq!(doc.ruta, "/x/a.pdf");
        assert!(doc.created_at > 0);
        assert_eq!(doc.created_at, doc.updated_at);
        assert!(doc.metadata.is_empty());

        assert!(db.document_exists("s", &id).unwrap());
        assert!(!db.document_exists("other", &id).unwrap());
        assert!(!db.document_exists("s", "  ").unwrap());
        assert!(db.get_document("s", "").unwrap().is_none());
        assert!(db.get_document("s", "missing").unwrap().is_none());
    }

    #[test]
    fn test_metadata_overlay_on_document() {
        let db = Database::open_in_memory().unwrap();
        db.replace_documents_for_section("s", &docs(&[("a.pdf", "/x/a.pdf")]))
            .unwrap();
        let id = stable_document_id("s", "a.pdf", "/x/a.pdf");
        db.save_document_metadata("s", &id, &json!({"precio": 10, "editorial": "X"}))
            .unwrap();

        let doc = db.get_document("s", &id).unwrap().unwrap();
        assert_eq!(doc.precio, Some(MetadataValue::from(10i64)));
        assert_eq!(doc.maestro, None);
        assert_eq!(doc.metadata.len(), 2);

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["precio"], json!(10));
        assert_eq!(value["metadata"]["editorial"], json!("X"));
        assert!(value.get("maestro").is_none());
    }

    #[test]
    fn test_plain_document_serializes_without_metadata() {
        let db = Database::open_in_memory().unwrap();
        db.replace_documents_for_section("s", &docs(&[("a.pdf", "/x/a.pdf")]))
            .unwrap();
        let listed = db.list_documents(Some("s")).unwrap();
        let value = serde_json::to_value(&listed[0]).unwrap();
        assert!(value.get("metadata").is_none());
        assert_eq!(value["sectionId"], json!("s"));
    }

    #[test]
    fn test_page_sorting_is_case_insensitive() {
        let db = Database::open_in_memory().unwrap();
        db.replace_documents_for_section(
            "s",
            &docs(&[("beta.pdf", "/1"), ("Alpha.pdf", "/2"), ("alpha.pdf", "/3"), ("Gamma.pdf", "/4")]),
        )
        .unwrap();
        let page = db.list_documents_page(&page_query("s")).unwrap();
        let names: Vec<_> = page.documents.iter().map(|d| d.nombre.to_lowercase()).collect();
        assert_eq!(names, vec!["alpha.pdf", "alpha.pdf", "beta.pdf", "gamma.pdf"]);
        assert_eq!(page.total, 4);
        assert_eq!(page.page_size, 20);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_page_clamping() {
        let db = Database::open_in_memory().unwrap();
        let many: Vec<_> = (0..25)
            .map(|i| ReplaceDocument::new(format!("doc{:02}.pdf", i), format!("/d/doc{:02}.pdf", i)))
            .collect();
        db.replace_documents_for_section("s", &many).unwrap();

        let mut query = page_query("s");
        query.page_size = Some(10);

        query.page = Some(0);
        let zero = db.list_documents_page(&query).unwrap();
        query.page = Some(1);
        let first = db.list_documents_page(&query).unwrap();
        assert_eq!(zero, first);

        query.page = Some(1_000_000);
        let huge = db.list_documents_page(&query).unwrap();
        query.page = Some(3);
        let last = db.list_documents_page(&query).unwrap();
        assert_eq!(huge, last);
        assert_eq!(last.page, 3);
        assert_eq!(last.total_pages, 3);
        assert_eq!(last.documents.len(), 5);

        query.page_size = Some(-4);
        assert_eq!(db.list_documents_page(&query).unwrap().page_size, 20);
        query.page_size = Some(10_000);
        assert_eq!(db.list_documents_page(&query).unwrap().page_size, 500);
    }

    #[test]
    fn test_empty_section_has_one_page() {
        let db = Database::open_in_memory().unwrap();
        let mut query = page_query("nothing");
        query.page = Some(7);
        let page = db.list_documents_page(&query).unwrap();
        assert_eq!(page.total, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.documents.is_empty());
    }

    #[test]
    fn test_query_matches_name_or_path() {
        let db = Database::open_in_memory().unwrap();
        db.replace_documents_for_section(
            "s",
            &docs(&[("Informe.pdf", "/srv/tesis/Informe.pdf"), ("otro.pdf", "/srv/TESIS/otro.pdf"), ("x.pdf", "/srv/x.pdf")]),
        )
        .unwrap();

        let mut query = page_query("s");
        query.query = Some("  INFORME ".to_string());
        assert_eq!(db.list_documents_page(&query).unwrap().total, 1);

        query.query = Some("tesis".to_string());
        assert_eq!(db.list_documents_page(&query).unwrap().total, 2);
    }
}
