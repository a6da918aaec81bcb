//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod catalog;
mod db;
mod export;
mod init;
mod label;
mod serve;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use imagelabel::config::{LoadOptions, Settings};
use imagelabel::repository::migrations::run_migrations;
use imagelabel::repository::Repositories;

#[derive(Parser)]
#[command(name = "imagelabel")]
#[command(about = "Image labeling server")]
#[command(version)]
pub struct Cli {
    /// Data directory or database file (overrides config file).
    /// Can be a directory containing imagelabel.db or a .db file directly.
    #[arg(long, short = 'd', global = true)]
    data: Option<PathBuf>,

    /// Directory containing the images to label
    #[arg(long, short = 'i', global = true)]
    images: Option<PathBuf>,

    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Settings sources named on the command line.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            data: self.data.clone(),
            images: self.images.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and database
    Init,

    /// Register new images and labels in the catalog
    Sync,

    /// Start web server for labeling
    Serve {
        /// Address to bind to: PORT, HOST, or HOST:PORT (default: 127.0.0.1:3030)
        #[arg(default_value = "127.0.0.1:3030")]
        bind: String,
    },

    /// Show catalog size and annotator progress
    Status,

    /// Show the next image for an annotator
    Next {
        /// Annotator name
        annotator: String,
    },

    /// Record a label for an image
    Label {
        /// Annotator name
        annotator: String,
        /// Image filename
        filename: String,
        /// Label text
        label: String,
    },

    /// Export the labeling history as JSON
    Export {
        /// One JSON object per line instead of a single array
        #[arg(long)]
        jsonl: bool,
    },

    /// Database management
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Subcommand)]
enum DbCommands {
    /// Run database migrations
    Migrate {
        /// Only check migration status, don't run migrations
        #[arg(long)]
        check: bool,
    },
}

/// Open the repositories, applying any pending migrations first.
///
/// Lets read-side commands work against a fresh data directory.
pub(crate) async fn open_repositories(settings: &Settings) -> anyhow::Result<Repositories> {
    if let Some(parent) = settings.database_path().parent() {
        std::fs::create_dir_all(parent)?;
    }
    for name in run_migrations(&settings.database_url()).await? {
        tracing::info!("Applied migration {}", name);
    }
    Ok(settings.repositories()?)
}

/// Run the CLI with already-loaded settings.
pub async fn run(cli: Cli, settings: Settings) -> anyhow::Result<()> {
    match cli.command {
        Commands::Init => init::cmd_init(&settings).await,
        Commands::Sync => catalog::cmd_sync(&settings).await,
        Commands::Serve { bind } => serve::cmd_serve(&settings, &bind).await,
        Commands::Status => status::cmd_status(&settings).await,
        Commands::Next { annotator } => label::cmd_next(&settings, &annotator).await,
        Commands::Label {
            annotator,
            filename,
            label,
        } => label::cmd_label(&settings, &annotator, &filename, &label).await,
        Commands::Export { jsonl } => export::cmd_export(&settings, jsonl).await,
        Commands::Db { command } => match command {
            DbCommands::Migrate { check } => db::cmd_migrate(&settings, check).await,
        },
    }
}
