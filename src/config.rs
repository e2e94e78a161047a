use std::path::{Path, PathBuf};

use nix::sys::signal::Signal;
use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub signals: SignalConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Signal sent by the kill options, e.g. "SIGKILL" or "TERM"
    pub terminate: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracing filter directive, overridden by RUST_LOG
    pub filter: String,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            terminate: "SIGKILL".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load from an explicit path, or from the first readable default
    /// location. Only an explicit path turns read or parse failures into
    /// errors.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }

        for path in Self::search_paths() {
            if !path.exists() {
                continue;
            }
            match Self::from_path(&path) {
                Ok(config) => return Ok(config),
                Err(e) => eprintln!("Warning: ignoring config: {e}"),
            }
        }

        Ok(Config::default())
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn search_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("proctree/config.toml")),
            dirs::home_dir().map(|p| p.join(".proctree.toml")),
            Some(PathBuf::from("proctree.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

impl SignalConfig {
    pub fn terminate_signal(&self) -> Result<Signal, ConfigError> {
        parse_signal(&self.terminate)
    }
}

/// Accepts "SIGTERM", "TERM" or "term"
fn parse_signal(name: &str) -> Result<Signal, ConfigError> {
    let upper = name.trim().to_ascii_uppercase();
    let full = if upper.starts_with("SIG") {
        upper
    } else {
        format!("SIG{upper}")
    };
    full.parse::<Signal>()
        .map_err(|_| ConfigError::UnknownSignal(name.to_string()))
}
