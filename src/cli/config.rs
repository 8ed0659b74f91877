//! Service configuration
//!
//! Precedence, lowest first: defaults, JSON config file, environment
//! (`PORT`, `POSTFILE_DATA_DIR`, `POSTFILE_LOG`), command-line flags.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::http_server::config::{default_host, default_port};
use crate::http_server::HttpServerConfig;
use crate::observability::Severity;

pub const ENV_PORT: &str = "PORT";
pub const ENV_DATA_DIR: &str = "POSTFILE_DATA_DIR";
pub const ENV_LOG: &str = "POSTFILE_LOG";

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding posts.json (default "./data")
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Empty means any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// trace, info, warn, error or fatal
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            log_level: default_log_level(),
        }
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub port: Option<u16>,
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))
    }

    /// Build the effective configuration from every source
    pub fn resolve(path: Option<&Path>, overrides: &Overrides) -> CliResult<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.apply_overrides(overrides);
        config.validate()?;

        Ok(config)
    }

    /// Apply environment values, looked up through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> CliResult<()> {
        if let Some(port) = lookup(ENV_PORT).filter(|v| !v.is_empty()) {
            self.port = port.parse().map_err(|_| {
                CliError::config_error(format!("Invalid {} value: '{}'", ENV_PORT, port))
            })?;
        }

        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
            self.data_dir = dir;
        }

        if let Some(level) = lookup(ENV_LOG).filter(|v| !v.is_empty()) {
            self.log_level = level;
        }

        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(ref dir) = overrides.data_dir {
            self.data_dir = dir.to_string_lossy().into_owned();
        }
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }
        self.log_severity()?;
        Ok(())
    }

    /// Parsed `log_level`
    pub fn log_severity(&self) -> CliResult<Severity> {
        self.log_level.parse().map_err(CliError::config_error)
    }

    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    pub fn http_config(&self) -> HttpServerConfig {
        HttpServerConfig {
            host: self.host.clone(),
            port: self.port,
            cors_origins: self.cors_origins.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.data_dir, "./data");
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_severity().unwrap(), Severity::Info);
    }

    #[test]
    fn test_load_partial_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("postfile.json");
        fs::write(&path, r#"{"data_dir": "/srv/posts", "port": 9000}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.data_dir, "/srv/posts");
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let temp = TempDir::new().unwrap();
        let err = Config::load(&temp.path().join("absent.json")).unwrap_err();
        assert_eq!(err.code_str(), "POSTFILE_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config::default();
        config
            .apply_env(env(&[("PORT", "7000"), ("POSTFILE_DATA_DIR", "/var/posts")]))
            .unwrap();
        assert_eq!(config.port, 7000);
        assert_eq!(config.data_dir, "/var/posts");
    }

    #[test]
    fn test_empty_port_env_is_ignored() {
        let mut config = Config::default();
        config.apply_env(env(&[("PORT", "")])).unwrap();
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_invalid_port_env() {
        let mut config = Config::default();
        let err = config.apply_env(env(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.message().contains("PORT"));
    }

    #[test]
    fn test_flags_win_over_env() {
        let mut config = Config::default();
        config.apply_env(env(&[("PORT", "7000")])).unwrap();
        config.apply_overrides(&Overrides {
            port: Some(3000),
            data_dir: Some(PathBuf::from("/tmp/flag")),
        });
        assert_eq!(config.port, 3000);
        assert_eq!(config.data_dir, "/tmp/flag");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config {
            data_dir: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            log_level: "chatty".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_http_config() {
        let config = Config {
            port: 4000,
            cors_origins: vec!["http://localhost:3000".to_string()],
            ..Default::default()
        };
        let http = config.http_config();
        assert_eq!(http.socket_addr(), "0.0.0.0:4000");
        assert_eq!(http.cors_origins.len(), 1);
    }
}
