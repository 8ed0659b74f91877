//! CLI module for postfile
//!
//! Provides command-line interface for:
//! - serve: open the store and run the HTTP server
//! - init: prepare the data directory and exit

mod args;
mod commands;
mod config;
mod errors;

pub use args::{Cli, Command};
pub use commands::{init, open_store, run, run_command, serve};
pub use config::{Config, Overrides, ENV_DATA_DIR, ENV_LOG, ENV_PORT};
pub use errors::{CliError, CliErrorCode, CliResult};
