use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{ConfigLoader, CONFIG_ENV};
use crate::parser::ListingLayout;

pub mod commands;

use self::commands::{CatalogArgs, ListArgs};

#[derive(Parser, Debug)]
#[command(
    name = "lctop",
    version,
    about = "Browse, filter and sort algorithm problem listings in the terminal"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Override the config file location (takes precedence over LCTOP_CONFIG)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Listing file to load (overrides data_file from the config)
    #[arg(long, short)]
    pub file: Option<PathBuf>,

    /// Metric columns trailing each listing line
    #[arg(long, value_enum)]
    pub layout: Option<ListingLayout>,

    /// Minimum log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the interactive table (default)
    Tui,
    /// Print the filtered, sorted listing
    List(ListArgs),
    /// Print the selectable categories and tags
    Catalog(CatalogArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config {
        env::set_var(CONFIG_ENV, path);
    }
    init_tracing(&cli.log_level)
        .with_context(|| format!("initialising logging at level {}", cli.log_level))?;

    let loader = ConfigLoader::discover()?;
    let mut config = loader.load_or_init()?;
    if let Some(file) = cli.file {
        config.data_file = file;
    }
    if let Some(layout) = cli.layout {
        config.layout = layout;
    }
    let config = Arc::new(config);

    let command = cli.command.unwrap_or(Commands::Tui);
    match command {
        Commands::Tui => {
            let repo = commands::load_repository(&config)?;
            commands::run_tui(config, repo)
        }
        Commands::List(args) => {
            let repo = commands::load_repository(&config)?;
            commands::list_problems(&config, repo, args)
        }
        Commands::Catalog(args) => commands::print_catalog(&config, args),
    }
}

fn init_tracing(level: &str) -> Result<()> {
    static INIT: OnceCell<()> = OnceCell::new();
    INIT.get_or_try_init(|| {
        let env_filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
        fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
        Ok(())
    })
    .map(|_| ())
}
