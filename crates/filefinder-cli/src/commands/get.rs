//! Get command

use crate::app::{GetArgs, OutputFormat};
use crate::output::terminal;
use anyhow::Result;
use filefinder_core::{Database, FileFinderError};

pub fn run(args: GetArgs, db: &Database, format: OutputFormat) -> Result<()> {
    let Some(document) = db.get_document(&args.section, &args.id)? else {
        return Err(FileFinderError::DocumentNotFound(args.id).into());
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        OutputFormat::Cli => {
            print!("{}", terminal::format_document(&document));
        }
    }
    Ok(())
}
