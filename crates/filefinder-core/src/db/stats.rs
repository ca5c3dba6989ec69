//! Database statistics

use super::Database;
use crate::error::Result;

/// Database stats
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DatabaseStats {
    pub section_count: usize,
    pub document_count: usize,
    pub metadata_count: usize,
    pub search_query_count: usize,
}

impl Database {
    /// Get database statistics
    pub fn get_stats(&self) -> Result<DatabaseStats> {
        let conn = self.lock();

        let section_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM (
                 SELECT section_id FROM documents
                 UNION SELECT section_id FROM document_metadata
                 UNION SELECT section_id FROM search_stats
             )",
            [],
            |row| row.get(0),
        )?;

        let document_count: i64 =
            conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;

        let metadata_count: i64 =
            conn.query_row("SELECT COUNT(*) FROM document_metadata", [], |row| row.get(0))?;

        let search_query_count: i64 =
            conn.query_row("SELECT COUNT(*) FROM search_stats", [], |row| row.get(0))?;

        Ok(DatabaseStats {
            section_count: section_count as usize,
            document_count: document_count as usize,
            metadata_count: metadata_count as usize,
            search_query_count: search_query_count as usize,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ReplaceDocument;
    use serde_json::json;

    #[test]
    fn test_get_stats() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(
            db.get_stats().unwrap(),
            DatabaseStats { section_count: 0, document_count: 0, metadata_count: 0, search_query_count: 0 }
        );

        db.replace_documents_for_section(
            "libros",
            &[ReplaceDocument::new("a.pdf", "/a.pdf"), ReplaceDocument::new("b.pdf", "/b.pdf")],
        )
        .unwrap();
        db.save_document_metadata("libros", "orphan", &json!({"precio": 1})).unwrap();
        db.record_search("curriculum", "cv").unwrap();

        let stats = db.get_stats().unwrap();
        assert_eq!(stats.section_count, 2);
        assert_eq!(stats.document_count, 2);
        assert_eq!(stats.metadata_count, 1);
        assert_eq!(stats.search_query_count, 1);
    }
}
