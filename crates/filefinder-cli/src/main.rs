//! FileFinder CLI
//!
//! Index, search and annotate local documents.

use anyhow::Result;
use clap::Parser;
use filefinder_core::error::exit_codes;
use filefinder_core::{Database, FileFinderError, StoreConfig};

mod app;
mod commands;
mod output;

use app::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    if let Err(err) = run(cli) {
        eprintln!("Error: {:#}", err);
        let code = err
            .downcast_ref::<FileFinderError>()
            .map(FileFinderError::exit_code)
            .unwrap_or(exit_codes::GENERAL_ERROR);
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = StoreConfig::load()?;
    if cli.db.is_some() {
        config.db_path = cli.db.clone();
    }
    if cli.legacy_dir.is_some() {
        config.legacy_dir = cli.legacy_dir.clone();
    }

    let db_path = config.resolved_db_path();
    let db = Database::open(&db_path, &config)?;

    match cli.command {
        Commands::Index(args) => commands::index::run(args, &db, cli.format),
        Commands::Search(args) => commands::search::run(args, &db, cli.format),
        Commands::Ls(args) => commands::ls::run(args, &db, cli.format),
        Commands::Get(args) => commands::get::run(args, &db, cli.format),
        Commands::Meta(args) => commands::meta::run(args, &db, cli.format),
        Commands::Stats(args) => commands::stats::run(args, &db, cli.format),
        Commands::Settings(args) => commands::settings::run(args, &db, cli.format),
        Commands::Status => commands::status::run(&db, &db_path, cli.format),
    }
}
