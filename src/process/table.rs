//! Process table accessor - the narrow view of the OS the relation engine needs

use std::fmt;
use std::str::FromStr;

use crate::error::{PidError, SignalError, TableError};

/// A positive process id.
///
/// Holding a `Pid` says nothing about whether the process still exists;
/// every access goes back to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pid(i32);

impl Pid {
    pub fn new(raw: i32) -> Result<Self, PidError> {
        if raw <= 0 {
            return Err(PidError::NotPositive(i64::from(raw)));
        }
        Ok(Self(raw))
    }

    pub fn as_raw(self) -> i32 {
        self.0
    }

    /// PID of the running program
    pub fn current() -> Self {
        Self(nix::unistd::getpid().as_raw())
    }
}

impl FromStr for Pid {
    type Err = PidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: i64 = s
            .trim()
            .parse()
            .map_err(|_| PidError::NotNumeric(s.to_string()))?;
        let raw = i32::try_from(raw).map_err(|_| PidError::NotNumeric(s.to_string()))?;
        Self::new(raw)
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Pid> for nix::unistd::Pid {
    fn from(pid: Pid) -> Self {
        nix::unistd::Pid::from_raw(pid.0)
    }
}

/// Classification of a process at the moment the table was read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// Running, sleeping, or anything else that is neither stopped nor a zombie
    Running,
    Stopped,
    Zombie,
}

impl ProcessState {
    pub fn is_defunct(self) -> bool {
        self == ProcessState::Zombie
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Stopped => write!(f, "stopped"),
            Self::Zombie => write!(f, "zombie"),
        }
    }
}

/// Signals the dispatcher may send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Terminate,
    Stop,
    Continue,
}

impl SignalKind {
    /// Name used in per-action diagnostics
    pub fn action(self) -> &'static str {
        match self {
            Self::Terminate => "kill",
            Self::Stop => "stop",
            Self::Continue => "continue",
        }
    }
}

/// Read access to the parent/child relation plus signal delivery.
///
/// Implementations must return children in a stable order for a given
/// snapshot; callers never sort.
pub trait ProcessTable {
    /// Direct children of `pid`. Empty if `pid` has none or does not exist.
    fn children_of(&self, pid: Pid) -> Result<Vec<Pid>, TableError>;

    /// Parent of `pid`, if `pid` exists and its parent is a real process.
    fn parent_of(&self, pid: Pid) -> Result<Option<Pid>, TableError>;

    /// Current state of `pid`; `TableError::NotFound` if it is gone.
    fn state_of(&self, pid: Pid) -> Result<ProcessState, TableError>;

    /// Deliver one signal. Never retried.
    fn send_signal(&self, pid: Pid, kind: SignalKind) -> Result<(), SignalError>;
}
