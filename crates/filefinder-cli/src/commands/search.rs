//! Search command

use crate::app::{OutputFormat, SearchArgs};
use crate::output;
use anyhow::Result;
use filefinder_core::{Database, DocumentPageQuery};

pub fn run(args: SearchArgs, db: &Database, format: OutputFormat) -> Result<()> {
    let query = args.query.join(" ");

    if args.record && !query.trim().is_empty() {
        db.record_search(&args.section, &query)?;
    }

    let page = db.list_documents_page(&DocumentPageQuery {
        section_id: args.section,
        query: Some(query),
        extensions: args.extensions,
        page: args.page,
        page_size: args.page_size,
    })?;

    print!("{}", output::format_page(&page, format));
    Ok(())
}
