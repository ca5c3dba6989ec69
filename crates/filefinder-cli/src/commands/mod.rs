//! CLI command handlers

pub mod get;
pub mod index;
pub mod ls;
pub mod meta;
pub mod search;
pub mod settings;
pub mod stats;
pub mod status;
