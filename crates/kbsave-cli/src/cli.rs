//! Command line definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kbsave")]
#[command(about = "King's Bounty save decoder", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Scanner config (TOML); defaults to <config dir>/kbsave/config.toml
    #[arg(short, long, global = true, env = "KBSAVE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log scanner detail
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode every shop inventory of a save as JSON
    Shops {
        /// Save directory or .sav archive
        save: PathBuf,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long)]
        pretty: bool,
    },

    /// Show the hero name and fingerprint of a save
    Hero {
        save: PathBuf,
    },

    /// Decode the items the hero carries
    Inventory {
        save: PathBuf,

        /// Only accept items with this prefix (repeatable)
        #[arg(short, long = "accept-prefix")]
        accept_prefixes: Vec<String>,

        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long)]
        pretty: bool,
    },

    /// Fingerprint of a hero name
    Hash {
        /// Full hero name; multiple words are joined by spaces
        #[arg(required = true)]
        name: Vec<String>,
    },

    /// Find the newest save whose hero matches a fingerprint
    Match {
        #[arg(long)]
        hash: String,

        /// Candidate saves
        #[arg(required = true)]
        saves: Vec<PathBuf>,
    },

    /// List the saves of a save directory, newest first
    List {
        dir: PathBuf,

        #[arg(short, long, default_value_t = 100)]
        limit: usize,
    },

    /// Show located shops and their section spans
    Locate {
        save: PathBuf,
    },

    /// Hexdump the decoded primary payload
    Hexdump {
        save: PathBuf,

        /// Start offset (hex, with or without 0x)
        #[arg(long, default_value = "0")]
        offset: String,

        /// Number of bytes
        #[arg(long, default_value_t = 256)]
        size: usize,

        /// Show the ASCII column
        #[arg(long)]
        ascii: bool,
    },

    /// Decode spell costs from a spells definition file
    Spells {
        file: PathBuf,

        #[arg(long)]
        pretty: bool,
    },

    /// Print the effective scanner config
    Config,
}
