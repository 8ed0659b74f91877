//! CLI argument definitions using clap
//!
//! Commands:
//! - postfile serve [--config <path>] [--port <port>] [--data-dir <dir>]
//! - postfile init [--config <path>] [--data-dir <dir>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// postfile - CRUD over posts stored in a single JSON file
#[derive(Parser, Debug)]
#[command(name = "postfile")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to a JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port to listen on (overrides config and PORT)
        #[arg(long)]
        port: Option<u16>,

        /// Directory holding posts.json (overrides config and POSTFILE_DATA_DIR)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Create the data directory and an empty posts file, then exit
    Init {
        /// Path to a JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory holding posts.json
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
