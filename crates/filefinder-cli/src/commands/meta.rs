//! Metadata commands

use crate::app::{MetaAction, MetaArgs, OutputFormat};
use crate::output::terminal;
use anyhow::{bail, Result};
use filefinder_core::{Database, MetadataValue};
use serde_json::{Map, Value};

pub fn run(args: MetaArgs, db: &Database, format: OutputFormat) -> Result<()> {
    match args.action {
        MetaAction::Show { section } => {
            let map = db.get_metadata_map(&section)?;
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&map)?);
                }
                OutputFormat::Cli => {
                    for (document_id, metadata) in &map {
                        let pairs: Vec<String> =
                            metadata.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                        println!("{}  {}", document_id, pairs.join(", "));
                    }
                }
            }
        }
        MetaAction::Set {
            id,
            entries,
            section,
        } => {
            let mut metadata: Map<String, Value> = db
                .get_metadata_map(&section)?
                .remove(id.trim())
                .map(|existing| {
                    existing
                        .into_iter()
                        .map(|(k, v)| (k, metadata_to_json(v)))
                        .collect()
                })
                .unwrap_or_default();

            for entry in &entries {
                let Some((key, value)) = entry.split_once('=') else {
                    bail!("Expected KEY=VALUE, got '{}'", entry);
                };
                let value = MetadataValue::parse_literal(value)
                    .map(metadata_to_json)
                    .unwrap_or(Value::Null);
                metadata.insert(key.trim().to_string(), value);
            }

            let saved = db.save_document_metadata(&section, &id, &Value::Object(metadata))?;
            let document = db.get_document(&saved.section_id, &saved.document_id)?;

            match (format, document) {
                (OutputFormat::Json, Some(document)) => {
                    println!("{}", serde_json::to_string_pretty(&document)?);
                }
                (OutputFormat::Json, None) => {
                    println!("{}", serde_json::to_string_pretty(&saved)?);
                }
                (OutputFormat::Cli, Some(document)) => {
                    print!("{}", terminal::format_document(&document));
                }
                (OutputFormat::Cli, None) => {
                    println!(
                        "Saved {} metadata keys for {} (no indexed document yet)",
                        saved.metadata.len(),
                        saved.document_id
                    );
                }
            }
        }
    }
    Ok(())
}

fn metadata_to_json(value: MetadataValue) -> Value {
    match value {
        MetadataValue::Text(s) => Value::String(s),
        MetadataValue::Number(n) => Value::Number(n),
    }
}
