//! Terminal output formatter

use filefinder_core::{Document, DocumentPage, SearchStat};

/// Short id shown in listings
fn short_id(id: &str) -> &str {
    id.get(..12).unwrap_or(id)
}

fn format_document_line(document: &Document) -> String {
    let mut line = format!("{}  {}  #{}", document.nombre, document.ruta, short_id(&document.id));
    if !document.metadata.is_empty() {
        let pairs: Vec<String> = document
            .metadata
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        line.push_str(&format!("  [{}]", pairs.join(", ")));
    }
    line
}

pub fn format_documents(documents: &[Document]) -> String {
    let mut output = String::new();
    for document in documents {
        output.push_str(&format_document_line(document));
        output.push('\n');
    }
    output
}

pub fn format_page(page: &DocumentPage) -> String {
    let mut output = format_documents(&page.documents);
    output.push_str(&format!(
        "-- section {}: page {}/{} ({} matches)\n",
        page.section_id, page.page, page.total_pages, page.total
    ));
    output
}

pub fn format_document(document: &Document) -> String {
    let mut output = format!(
        "Id:       {}\nSection:  {}\nName:     {}\nPath:     {}\n",
        document.id, document.section_id, document.nombre, document.ruta
    );
    if !document.metadata.is_empty() {
        output.push_str("Metadata:\n");
        for (key, value) in &document.metadata {
            output.push_str(&format!("  {}: {}\n", key, value));
        }
    }
    output
}

pub fn format_search_stats(stats: &[SearchStat]) -> String {
    let mut output = String::new();
    for stat in stats {
        output.push_str(&format!("{:>5}  {}\n", stat.count, stat.query));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use filefinder_core::MetadataValue;

    fn document() -> Document {
        Document {
            section_id: "libros".into(),
            id: "0123456789abcdef".into(),
            nombre: "a.pdf".into(),
            ruta: "/x/a.pdf".into(),
            created_at: 1,
            updated_at: 1,
            maestro: None,
            paginas: None,
            precio: None,
            universidad: None,
            metadata: Default::default(),
        }
    }

    #[test]
    fn test_document_line() {
        let line = format_document_line(&document());
        assert_eq!(line, "a.pdf  /x/a.pdf  #0123456789ab");

        let mut metadata = filefinder_core::DocumentMetadata::new();
        metadata.insert("precio".into(), MetadataValue::from(10i64));
        let line = format_document_line(&document().with_metadata(metadata));
        assert!(line.ends_with("[precio=10]"));
    }

    #[test]
    fn test_short_id_handles_short_input() {
        assert_eq!(short_id("abc"), "abc");
    }
}
