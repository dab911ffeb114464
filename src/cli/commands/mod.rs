//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod browse;
mod config_cmd;
mod markdown;
mod record;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use pageshell::config::Config;

#[derive(Parser)]
#[command(name = "pageshell")]
#[command(about = "Page navigation and fragment injection for a personal website")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Site root directory or base URL (overrides config)
    #[arg(short, long, global = true)]
    site: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Load pages into the composing page one after another and print the result
    Open {
        /// Pages to load, relative to the site root
        #[arg(required = true)]
        pages: Vec<String>,
        #[command(flatten)]
        page: PageArgs,
    },

    /// Drive the navigator interactively from stdin
    Browse {
        #[command(flatten)]
        page: PageArgs,
    },

    /// Manage activity records
    Record {
        #[command(subcommand)]
        command: RecordCommands,
    },

    /// Render a markdown file to HTML
    Markdown {
        /// Markdown file to render
        file: PathBuf,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Options describing the page the navigator starts on.
#[derive(clap::Args, Debug, Clone)]
pub struct PageArgs {
    /// Location of the starting page
    #[arg(long, default_value = "/index.html")]
    location: String,

    /// Start on a standalone page (no navigation container)
    #[arg(long)]
    standalone: bool,

    /// Skip the transition delays
    #[arg(long)]
    instant: bool,
}

#[derive(Subcommand)]
enum RecordCommands {
    /// Append a record
    Add {
        /// Record type (e.g. run, swim)
        kind: String,
        /// Date (YYYY-MM-DD)
        date: chrono::NaiveDate,
        /// Duration in minutes
        minutes: u32,
        /// Optional note
        #[arg(default_value = "")]
        note: String,
    },
    /// List records of a type
    List {
        /// Record type
        kind: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).await?;
    if let Some(site) = cli.site {
        config.site = site;
    }

    match cli.command {
        Commands::Open { pages, page } => browse::cmd_open(&config, &page, &pages).await,
        Commands::Browse { page } => browse::cmd_browse(&config, &page).await,
        Commands::Record { command } => match command {
            RecordCommands::Add {
                kind,
                date,
                minutes,
                note,
            } => record::cmd_record_add(&config, &kind, date, minutes, &note),
            RecordCommands::List { kind, json } => record::cmd_record_list(&config, &kind, json),
        },
        Commands::Markdown { file } => markdown::cmd_markdown(&file).await,
        Commands::Config { command } => match command {
            ConfigCommands::Show => config_cmd::cmd_config_show(&config),
        },
    }
}
