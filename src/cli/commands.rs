//! CLI command implementations
//!
//! Startup sequence for `serve`:
//! 1. Configuration load (file, environment, flags)
//! 2. Store open (creates data dir and posts.json; failure is fatal)
//! 3. HTTP server start

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::http_server::HttpServer;
use crate::observability::{log_event, log_event_with_fields, Event, Logger};
use crate::store::{FilePostStore, PostStore};

use super::args::Command;
use super::config::{Config, Overrides};
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve {
            config,
            port,
            data_dir,
        } => serve(
            config.or_else(default_config_path).as_deref(),
            Overrides { port, data_dir },
        ),
        Command::Init { config, data_dir } => init(
            config.or_else(default_config_path).as_deref(),
            Overrides {
                port: None,
                data_dir,
            },
        ),
    }
}

fn load_config(config_path: Option<&Path>, overrides: &Overrides) -> CliResult<Config> {
    let config = Config::resolve(config_path, overrides)?;
    Logger::set_min_severity(config.log_severity()?);

    let config_source = config_path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("data_dir", &config.data_dir), ("source", &config_source)],
    );

    Ok(config)
}

/// Open the store once for this process. Failure is logged as FATAL.
pub fn open_store(data_dir: &Path) -> CliResult<FilePostStore> {
    match FilePostStore::open(data_dir) {
        Ok(store) => {
            log_event_with_fields(
                Event::StoreOpened,
                &[("path", &store.path().display().to_string())],
            );
            Ok(store)
        }
        Err(e) => {
            log_event_with_fields(Event::BootFailed, &[("error", &e.to_string())]);
            Err(e.into())
        }
    }
}

/// Create the data directory and an empty posts file if missing
pub fn init(config_path: Option<&Path>, overrides: Overrides) -> CliResult<()> {
    let config = load_config(config_path, &overrides)?;
    open_store(config.data_path())?;
    Ok(())
}

/// Open the store and serve HTTP until shutdown
pub fn serve(config_path: Option<&Path>, overrides: Overrides) -> CliResult<()> {
    log_event(Event::BootStart);

    let config = load_config(config_path, &overrides)?;
    let store: Arc<dyn PostStore> = Arc::new(open_store(config.data_path())?);

    let server = HttpServer::new(config.http_config(), store);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// `./postfile.json`, used when `--config` is not given and the file exists
pub fn default_config_path() -> Option<PathBuf> {
    let path = PathBuf::from("./postfile.json");
    path.exists().then_some(path)
}
