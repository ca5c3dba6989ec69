//! Index command

use crate::app::{IndexArgs, OutputFormat};
use anyhow::Result;
use filefinder_core::{Database, ScanOptions};

pub fn run(args: IndexArgs, db: &Database, format: OutputFormat) -> Result<()> {
    let options = ScanOptions {
        pattern: args.pattern,
        follow_symlinks: args.follow_symlinks,
        exclude_hidden: args.exclude_hidden,
    };
    let report = db.index_section(&args.section, &args.paths, &options)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Cli => {
            println!(
                "Indexed {} documents into section '{}' ({} files scanned)",
                report.count, report.section_id, report.scanned
            );
        }
    }
    Ok(())
}
