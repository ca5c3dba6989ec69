//! Settings commands

use crate::app::{OutputFormat, SettingsAction, SettingsArgs};
use anyhow::{Context, Result};
use filefinder_core::{Database, Settings};

pub fn run(args: SettingsArgs, db: &Database, format: OutputFormat) -> Result<()> {
    let settings = match args.action {
        SettingsAction::Show => db.get_settings()?,
        SettingsAction::Import { file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let raw: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", file.display()))?;
            db.save_settings(&raw)?
        }
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        OutputFormat::Cli => print_settings(&settings),
    }
    Ok(())
}

fn print_settings(settings: &Settings) {
    println!("Title:       {}", settings.app_title);
    println!("Subtitle:    {}", settings.app_subtitle);
    println!("Extensions:  {}", settings.file_extensions.join(", "));
    println!();
    println!("Sections:");
    for section in &settings.sections {
        println!("  {} ({})", section.id, section.label);
        for path in &section.index_paths {
            println!("    {}", path);
        }
    }
}
