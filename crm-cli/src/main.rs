use std::fs::OpenOptions;

use anyhow::{Context, Result};
use clap::Parser;
use once_cell::sync::OnceCell;

mod cli;
mod config;
mod import;
mod metadata;
mod records;
mod tui;

use cli::commands::{config::handle_config_command, match_columns::handle_match_columns_command};
use cli::commands::record::handle_record_command;
use cli::{Cli, Commands};
use config::Config;
use tui::RuntimeConfig;

static RUNTIME_CONFIG: OnceCell<RuntimeConfig> = OnceCell::new();

/// UI settings for renderers. Defaults apply until `init_runtime_config` runs.
pub fn global_runtime_config() -> &'static RuntimeConfig {
    RUNTIME_CONFIG.get_or_init(RuntimeConfig::default)
}

fn init_runtime_config(config: &Config) {
    if RUNTIME_CONFIG.set(RuntimeConfig::from_config(config)).is_err() {
        log::warn!("Runtime config already initialized, keeping the existing one");
    }
}

/// Log to a file; the terminal belongs to the TUI
fn init_logging() -> Result<()> {
    let dir = config::config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

    let path = dir.join("crm-cli.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging()?;
    log::info!("crm-cli {} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    init_runtime_config(&config);

    match cli.command {
        Commands::MatchColumns(args) => handle_match_columns_command(args, &config),
        Commands::Record(args) => handle_record_command(args),
        Commands::Config { command } => handle_config_command(command, config),
    }
}
