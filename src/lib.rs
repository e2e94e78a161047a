//! Proctree library - relation queries and signals over a process tree

pub mod config;
pub mod dispatch;
pub mod error;
pub mod process;

// Re-export commonly used types
pub use config::Config;
pub use dispatch::{Caller, Dispatcher, Mode, Outcome, Request, USAGE};
pub use error::{ConfigError, PidError, SignalError, TableError, UsageError};
pub use process::{Pid, ProcessState, ProcessTable, SignalKind, StaticTable, SysinfoTable};
