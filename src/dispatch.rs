//! Action dispatcher - one gated query or signal per invocation

use std::io::{self, Write};
use std::str::FromStr;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::error::{SignalError, UsageError};
use crate::process::relation::{self, Listing};
use crate::process::{Pid, ProcessTable, SignalKind};

pub const USAGE: &str = "Usage: proctree [process_id] [root_process] [OPTION]";

/// What to do once the target is known to be inside the root's tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// No option given: print the target and the caller's parent
    Check,
    KillRoot,
    KillTarget,
    PauseTarget,
    /// Continue every child of the caller's own parent (not of root/target)
    ResumeAllPaused,
    List(Listing),
    Status,
}

impl FromStr for Mode {
    type Err = UsageError;

    fn from_str(option: &str) -> Result<Self, Self::Err> {
        let mode = match option {
            "-xt" => Mode::PauseTarget,
            "-xc" => Mode::ResumeAllPaused,
            "-xg" => Mode::List(Listing::Grandchildren),
            "-xn" => Mode::List(Listing::NonImmediate),
            "-xd" => Mode::List(Listing::Immediate),
            "-xs" => Mode::List(Listing::Siblings),
            "-xz" => Mode::List(Listing::Zombies),
            "-xa" => Mode::List(Listing::All),
            "-zs" => Mode::Status,
            // -pr and -rp, plus any other -p... / -r... spelling
            _ if option.starts_with("-p") => Mode::KillRoot,
            _ if option.starts_with("-r") => Mode::KillTarget,
            _ => return Err(UsageError::InvalidOption(option.to_string())),
        };
        Ok(mode)
    }
}

impl UsageError {
    /// Print the diagnostic and usage line, returning the exit code.
    ///
    /// Bad options are announced on `out` before the usage line; bad PIDs
    /// are described on `err`.
    pub fn report<W: Write, E: Write>(&self, mut out: W, mut err: E) -> io::Result<u8> {
        match self {
            UsageError::InvalidOption(_) => writeln!(out, "Invalid option.")?,
            UsageError::InvalidPid(e) => writeln!(err, "{e}")?,
            UsageError::MissingArguments => {}
        }
        writeln!(out, "{USAGE}")?;
        Ok(1)
    }
}

/// A validated command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub target: Pid,
    pub root: Pid,
    pub mode: Mode,
}

impl Request {
    pub fn parse(target: &str, root: &str, option: Option<&str>) -> Result<Self, UsageError> {
        let target = target.parse::<Pid>()?;
        let root = root.parse::<Pid>()?;
        let mode = match option {
            Some(option) => option.parse()?,
            None => Mode::Check,
        };
        Ok(Self { target, root, mode })
    }
}

/// Identity of the running program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub pid: Pid,
    /// Raw parent pid; 0 when the parent lives outside our PID namespace
    pub parent: i32,
}

impl Caller {
    pub fn current() -> Self {
        Self {
            pid: Pid::current(),
            parent: nix::unistd::getppid().as_raw(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    NotInTree,
}

impl Outcome {
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Success => 0,
            Outcome::NotInTree => 1,
        }
    }
}

/// Runs a [`Request`] against a process table, writing results to `out`
/// and per-action failures to `err`
pub struct Dispatcher<'a, T: ?Sized, W, E> {
    table: &'a T,
    caller: Caller,
    out: W,
    err: E,
}

impl<'a, T, W, E> Dispatcher<'a, T, W, E>
where
    T: ProcessTable + ?Sized,
    W: Write,
    E: Write,
{
    pub fn new(table: &'a T, caller: Caller, out: W, err: E) -> Self {
        Self {
            table,
            caller,
            out,
            err,
        }
    }

    /// Gate on the ancestry check, then perform the requested mode.
    ///
    /// Table failures propagate; signal failures are reported and swallowed.
    pub fn run(&mut self, request: &Request) -> Result<Outcome> {
        let Request { target, root, mode } = *request;
        debug!(%target, %root, ?mode, "dispatching");

        if !relation::is_descendant(self.table, root, target)? {
            writeln!(
                self.out,
                "Process with PID {target} does not belong to the process tree rooted at {root}."
            )?;
            return Ok(Outcome::NotInTree);
        }

        match mode {
            Mode::Check => writeln!(self.out, "{} {}", target, self.caller.parent)?,
            Mode::KillRoot => self.kill(root)?,
            Mode::KillTarget => self.kill(target)?,
            Mode::PauseTarget => self.pause(target)?,
            Mode::ResumeAllPaused => self.resume_all_paused()?,
            Mode::List(listing) => self.list(listing, target)?,
            Mode::Status => self.status(target)?,
        }

        Ok(Outcome::Success)
    }

    /// Consume the dispatcher, returning its writers
    pub fn into_writers(self) -> (W, E) {
        (self.out, self.err)
    }

    fn kill(&mut self, pid: Pid) -> Result<()> {
        match self.table.send_signal(pid, SignalKind::Terminate) {
            Ok(()) => writeln!(self.out, "Process with PID {pid} killed.")?,
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    fn pause(&mut self, pid: Pid) -> Result<()> {
        match self.table.send_signal(pid, SignalKind::Stop) {
            Ok(()) => writeln!(self.out, "Process with PID {pid} is paused with SIGSTOP.")?,
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    // Scoped to the invoking shell's children, whatever root/target are.
    fn resume_all_paused(&mut self) -> Result<()> {
        match Pid::new(self.caller.parent) {
            Ok(parent) => {
                let children = self.table.children_of(parent)?;
                info!(%parent, count = children.len(), "continuing children of caller's parent");
                for child in children {
                    if let Err(e) = self.table.send_signal(child, SignalKind::Continue) {
                        self.report(&e)?;
                    }
                }
            }
            Err(_) => warn!(parent = self.caller.parent, "caller has no visible parent"),
        }
        writeln!(self.out, "Continued all paused processes.")?;
        Ok(())
    }

    fn list(&mut self, listing: Listing, pid: Pid) -> Result<()> {
        let found = listing.collect(self.table, pid, self.caller.pid)?;
        for p in &found {
            writeln!(self.out, "{p}")?;
        }
        if found.is_empty() {
            writeln!(self.out, "{}", listing.empty_message())?;
        }
        Ok(())
    }

    fn status(&mut self, pid: Pid) -> Result<()> {
        let state = relation::status(self.table, pid)?;
        debug!(%pid, %state, "status read");
        let label = if state.is_defunct() {
            "Defunct"
        } else {
            "Not Defunct"
        };
        writeln!(self.out, "{label}")?;
        Ok(())
    }

    fn report(&mut self, error: &SignalError) -> Result<()> {
        warn!(pid = %error.pid, kind = ?error.kind, %error, "signal failed");
        writeln!(self.err, "{error}")?;
        Ok(())
    }
}
