mod cli;
mod commands;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use kbsave_core::{SaveParser, ScanConfig};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("kbsave").join("config.toml"))
}

/// Explicit `--config` must load; the default location is optional
fn load_config(explicit: Option<&Path>) -> Result<ScanConfig> {
    if let Some(path) = explicit {
        return ScanConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()));
    }

    match default_config_path() {
        Some(path) if path.is_file() => match ScanConfig::load(&path) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                Ok(config)
            }
            Err(e) => {
                warn!("Failed to load config {}: {}, using defaults", path.display(), e);
                Ok(ScanConfig::default())
            }
        },
        _ => Ok(ScanConfig::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let directive = if cli.verbose { "kbsave=debug" } else { "kbsave=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref())?;
    let parser = SaveParser::new(config);

    match cli.command {
        Commands::Shops {
            save,
            output,
            pretty,
        } => commands::shops::run(&parser, &save, output.as_deref(), pretty),
        Commands::Hero { save } => commands::hero::run(&parser, &save),
        Commands::Inventory {
            save,
            accept_prefixes,
            output,
            pretty,
        } => commands::inventory::run(&parser, &save, &accept_prefixes, output.as_deref(), pretty),
        Commands::Hash { name } => commands::profile::hash(&name.join(" ")),
        Commands::Match { hash, saves } => commands::profile::find_match(&parser, &hash, &saves),
        Commands::List { dir, limit } => commands::profile::list(&dir, limit),
        Commands::Locate { save } => commands::locate::run(&parser, &save),
        Commands::Hexdump {
            save,
            offset,
            size,
            ascii,
        } => {
            let offset = commands::hex_utils::parse_hex_offset(&offset)?;
            commands::hexdump::run(&parser, &save, offset, size, ascii)
        }
        Commands::Spells { file, pretty } => commands::spells::run(&file, pretty),
        Commands::Config => commands::config::run(parser.config()),
    }
}
