//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "filefinder")]
#[command(author, version, about = "Index, search and annotate your local documents")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database file (overrides FILEFINDER_DB and the config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Legacy snapshot directory imported on first open
    #[arg(long, global = true)]
    pub legacy_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan directories and replace a section's documents
    Index(IndexArgs),

    /// Search documents in a section
    Search(SearchArgs),

    /// List documents
    Ls(LsArgs),

    /// Get a document by id
    Get(GetArgs),

    /// Show or edit document metadata
    Meta(MetaArgs),

    /// Search statistics
    Stats(StatsArgs),

    /// Show or import settings
    Settings(SettingsArgs),

    /// Show store status
    Status,
}

#[derive(Args)]
pub struct IndexArgs {
    /// Directories to scan (defaults to the section's index paths)
    pub paths: Vec<String>,

    /// Section to replace
    #[arg(short, long, default_value = "default")]
    pub section: String,

    /// Glob applied to paths relative to each directory
    #[arg(long, default_value = "**/*")]
    pub pattern: String,

    /// Skip hidden files and directories
    #[arg(long)]
    pub exclude_hidden: bool,

    /// Follow symbolic links
    #[arg(long)]
    pub follow_symlinks: bool,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Search query
    pub query: Vec<String>,

    /// Section to search
    #[arg(short, long, default_value = "default")]
    pub section: String,

    /// Only match these file extensions (repeatable)
    #[arg(long = "ext")]
    pub extensions: Vec<String>,

    /// Page number (1-based)
    #[arg(long, allow_negative_numbers = true)]
    pub page: Option<i64>,

    /// Results per page
    #[arg(long, allow_negative_numbers = true)]
    pub page_size: Option<i64>,

    /// Count this query in the section's search statistics
    #[arg(long)]
    pub record: bool,
}

#[derive(Args)]
pub struct LsArgs {
    /// Section to list (all sections when omitted)
    #[arg(short, long)]
    pub section: Option<String>,
}

#[derive(Args)]
pub struct GetArgs {
    /// Document id
    pub id: String,

    /// Section of the document
    #[arg(short, long, default_value = "default")]
    pub section: String,
}

#[derive(Args)]
pub struct MetaArgs {
    #[command(subcommand)]
    pub action: MetaAction,
}

#[derive(Subcommand)]
pub enum MetaAction {
    /// Show all metadata of a section
    Show {
        #[arg(short, long, default_value = "default")]
        section: String,
    },
    /// Set metadata entries on a document (`KEY=` removes a key)
    Set {
        id: String,
        #[arg(required = true)]
        entries: Vec<String>,
        #[arg(short, long, default_value = "default")]
        section: String,
    },
}

#[derive(Args)]
pub struct StatsArgs {
    #[command(subcommand)]
    pub action: StatsAction,
}

#[derive(Subcommand)]
pub enum StatsAction {
    /// Most frequent queries
    Top {
        #[arg(short, long, default_value = "default")]
        section: String,
        #[arg(
            short = 'n',
            long,
            default_value_t = filefinder_core::DEFAULT_TOP_SEARCHES,
            allow_negative_numbers = true
        )]
        limit: i64,
    },
    /// Count one search
    Record {
        query: String,
        #[arg(short, long, default_value = "default")]
        section: String,
    },
}

#[derive(Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub action: SettingsAction,
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the current settings
    Show,
    /// Normalize and store settings from a JSON file
    Import { file: PathBuf },
}

#[derive(Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Cli,
    Json,
}
