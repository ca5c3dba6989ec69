//! Search statistics commands

use crate::app::{OutputFormat, StatsAction, StatsArgs};
use crate::output;
use anyhow::Result;
use filefinder_core::Database;

pub fn run(args: StatsArgs, db: &Database, format: OutputFormat) -> Result<()> {
    match args.action {
        StatsAction::Top { section, limit } => {
            let stats = db.get_top_searches(&section, limit)?;
            print!("{}", output::format_search_stats(&stats, format));
        }
        StatsAction::Record { query, section } => {
            let recorded = db.record_search(&section, &query)?;
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&recorded)?);
                }
                OutputFormat::Cli => {
                    println!("Recorded '{}' in section '{}'", recorded.query, recorded.section_id);
                }
            }
        }
    }
    Ok(())
}
