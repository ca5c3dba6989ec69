//! List command

use crate::app::{LsArgs, OutputFormat};
use crate::output;
use anyhow::Result;
use filefinder_core::Database;

pub fn run(args: LsArgs, db: &Database, format: OutputFormat) -> Result<()> {
    let documents = db.list_documents(args.section.as_deref())?;
    print!("{}", output::format_documents(&documents, format));
    Ok(())
}
