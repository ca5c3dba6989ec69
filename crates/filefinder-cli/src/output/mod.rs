//! Output formatters

pub mod json;
pub mod terminal;

use crate::app::OutputFormat;
use filefinder_core::{Document, DocumentPage, SearchStat};

/// Format a document list
pub fn format_documents(documents: &[Document], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format(documents),
        OutputFormat::Cli => terminal::format_documents(documents),
    }
}

/// Format one search page
pub fn format_page(page: &DocumentPage, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format(page),
        OutputFormat::Cli => terminal::format_page(page),
    }
}

/// Format top searches
pub fn format_search_stats(stats: &[SearchStat], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format(stats),
        OutputFormat::Cli => terminal::format_search_stats(stats),
    }
}
