//! Error types shared by the process table, the relation engine and the CLI

use std::path::PathBuf;

use thiserror::Error;

use crate::process::{Pid, SignalKind};

/// A process id that cannot name a live process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PidError {
    #[error("invalid process id: {0:?}")]
    NotNumeric(String),

    #[error("process id must be positive, got {0}")]
    NotPositive(i64),
}

/// Failures of the process table itself.
#[derive(Debug, Error)]
pub enum TableError {
    /// The table cannot be queried at all on this host.
    #[error("process table unavailable: {0}")]
    Unavailable(String),

    /// The process is not (or no longer) in the table.
    #[error("no process with PID {0}")]
    NotFound(Pid),
}

/// A signal that could not be delivered.
#[derive(Debug, Error)]
#[error("{}: {}", .kind.action(), .source.desc())]
pub struct SignalError {
    pub pid: Pid,
    pub kind: SignalKind,
    #[source]
    pub source: nix::errno::Errno,
}

/// Malformed command lines.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("missing arguments")]
    MissingArguments,

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error(transparent)]
    InvalidPid(#[from] PidError),
}

/// Problems reading or interpreting the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown signal name: {0}")]
    UnknownSignal(String),
}
