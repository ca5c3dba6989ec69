//! Status command

use crate::app::OutputFormat;
use anyhow::Result;
use filefinder_core::Database;
use std::path::Path;

pub fn run(db: &Database, db_path: &Path, format: OutputFormat) -> Result<()> {
    let stats = db.get_stats()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Cli => {
            println!("Database:        {}", db_path.display());
            println!("Sections:        {}", stats.section_count);
            println!("Documents:       {}", stats.document_count);
            println!("Metadata rows:   {}", stats.metadata_count);
            println!("Tracked queries: {}", stats.search_query_count);
        }
    }
    Ok(())
}
