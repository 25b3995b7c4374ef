//! Command line arguments

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Import translator documents and browse import records
#[derive(Parser, Debug, Clone)]
#[command(name = "translator-docs", version)]
#[command(about = "Batch import of translator documents", long_about = None)]
pub struct Args {
    /// SQLite database path (defaults to the user data directory)
    #[arg(long, env = "TRANSLATOR_DOCS_DB_PATH")]
    pub db: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create the database schema
    InitDb,

    /// Import one or more document files (';'-delimited, header first)
    Import {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// List import records, newest first
    List {
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        size: u32,
    },

    /// Search import records by file name
    Search {
        text: String,
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        size: u32,
    },

    /// Show one import record with its documents and errors
    Show { id: i64 },

    /// Delete one import record with its documents and errors
    Delete { id: i64 },

    /// Register a translator
    AddTranslator {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        source_language: String,
        #[arg(long)]
        target_language: String,
    },

    /// Store a configuration value
    SetConfig { key: String, value: String },
}
