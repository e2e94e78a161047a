//! Live process table backed by sysinfo and nix

use std::collections::{HashMap, HashSet};

use nix::sys::signal::{self, Signal};
use sysinfo::{ProcessStatus, System};
use tracing::{debug, info};

use super::table::{Pid, ProcessState, ProcessTable, SignalKind};
use crate::error::{SignalError, TableError};

/// One snapshot of the OS process table.
///
/// The snapshot is taken once on construction; build a new table for every
/// invocation so queries always reflect live state.
pub struct SysinfoTable {
    system: System,
    children: HashMap<Pid, Vec<Pid>>,
    terminate: Signal,
}

impl SysinfoTable {
    /// Read every process currently known to the OS
    pub fn snapshot() -> Result<Self, TableError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(TableError::Unavailable(format!(
                "process listing is not supported on {}",
                std::env::consts::OS
            )));
        }

        let mut system = System::new();
        system.refresh_processes();

        if system.processes().is_empty() {
            return Err(TableError::Unavailable(
                "the OS reported no processes".to_string(),
            ));
        }

        // Linux lists threads alongside processes; they are never children.
        let threads: HashSet<sysinfo::Pid> = system
            .processes()
            .iter()
            .filter_map(|(pid, proc)| proc.tasks().map(|tasks| (pid, tasks)))
            .flat_map(|(pid, tasks)| tasks.iter().filter(move |task| *task != pid))
            .copied()
            .collect();

        let mut children: HashMap<Pid, Vec<Pid>> = HashMap::new();
        for (pid, proc) in system.processes() {
            if threads.contains(pid) {
                continue;
            }
            let (Some(child), Some(parent)) = (from_sys(*pid), proc.parent().and_then(from_sys))
            else {
                continue;
            };
            children.entry(parent).or_default().push(child);
        }

        // pgrep order
        for list in children.values_mut() {
            list.sort_unstable();
        }

        debug!(
            processes = system.processes().len(),
            threads = threads.len(),
            "process table snapshot taken"
        );

        Ok(Self {
            system,
            children,
            terminate: Signal::SIGKILL,
        })
    }

    /// Signal delivered for `SignalKind::Terminate` (SIGKILL unless configured)
    pub fn with_terminate_signal(mut self, signal: Signal) -> Self {
        self.terminate = signal;
        self
    }

    fn signal_for(&self, kind: SignalKind) -> Signal {
        match kind {
            SignalKind::Terminate => self.terminate,
            SignalKind::Stop => Signal::SIGSTOP,
            SignalKind::Continue => Signal::SIGCONT,
        }
    }

    fn process(&self, pid: Pid) -> Option<&sysinfo::Process> {
        let raw = u32::try_from(pid.as_raw()).ok()?;
        self.system.process(sysinfo::Pid::from_u32(raw))
    }
}

impl ProcessTable for SysinfoTable {
    fn children_of(&self, pid: Pid) -> Result<Vec<Pid>, TableError> {
        Ok(self.children.get(&pid).cloned().unwrap_or_default())
    }

    fn parent_of(&self, pid: Pid) -> Result<Option<Pid>, TableError> {
        Ok(self
            .process(pid)
            .and_then(|proc| proc.parent())
            .and_then(from_sys))
    }

    fn state_of(&self, pid: Pid) -> Result<ProcessState, TableError> {
        let proc = self.process(pid).ok_or(TableError::NotFound(pid))?;
        Ok(classify(proc.status()))
    }

    fn send_signal(&self, pid: Pid, kind: SignalKind) -> Result<(), SignalError> {
        let signal = self.signal_for(kind);
        signal::kill(pid.into(), signal).map_err(|source| SignalError { pid, kind, source })?;
        info!(%pid, ?signal, "signal sent");
        Ok(())
    }
}

fn classify(status: ProcessStatus) -> ProcessState {
    match status {
        ProcessStatus::Zombie => ProcessState::Zombie,
        ProcessStatus::Stop | ProcessStatus::Tracing => ProcessState::Stopped,
        _ => ProcessState::Running,
    }
}

fn from_sys(pid: sysinfo::Pid) -> Option<Pid> {
    let raw = i32::try_from(pid.as_u32()).ok()?;
    Pid::new(raw).ok()
}
