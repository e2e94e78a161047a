//! In-memory process table built from explicit parent/child edges

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use nix::errno::Errno;

use super::table::{Pid, ProcessState, ProcessTable, SignalKind};
use crate::error::{SignalError, TableError};

#[derive(Debug, Clone)]
struct Entry {
    parent: Option<Pid>,
    state: ProcessState,
}

/// A process table whose contents are supplied by the caller.
///
/// Children are reported in insertion order. Signals are recorded instead of
/// delivered; Stop and Continue update the recorded state.
#[derive(Debug, Default)]
pub struct StaticTable {
    entries: RefCell<HashMap<Pid, Entry>>,
    children: HashMap<Pid, Vec<Pid>>,
    refused: HashSet<Pid>,
    unavailable: bool,
    sent: RefCell<Vec<(Pid, SignalKind)>>,
}

impl StaticTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a process. Re-inserting a pid replaces its state but keeps its
    /// original position among its parent's children.
    pub fn insert(&mut self, pid: Pid, parent: Option<Pid>, state: ProcessState) {
        let previous = self
            .entries
            .get_mut()
            .insert(pid, Entry { parent, state });

        if let Some(old_parent) = previous.and_then(|e| e.parent) {
            if Some(old_parent) != parent {
                if let Some(list) = self.children.get_mut(&old_parent) {
                    list.retain(|p| *p != pid);
                }
            }
        }

        if let Some(parent) = parent {
            let list = self.children.entry(parent).or_default();
            if !list.contains(&pid) {
                list.push(pid);
            }
        }
    }

    /// Builder form of [`StaticTable::insert`]
    pub fn with(mut self, pid: Pid, parent: Option<Pid>, state: ProcessState) -> Self {
        self.insert(pid, parent, state);
        self
    }

    /// Make every signal to `pid` fail with EPERM
    pub fn refuse_signals(&mut self, pid: Pid) {
        self.refused.insert(pid);
    }

    /// Make every query fail as if the OS table could not be read
    pub fn set_unavailable(&mut self) {
        self.unavailable = true;
    }

    /// Signals received so far, in delivery order
    pub fn signals_sent(&self) -> Vec<(Pid, SignalKind)> {
        self.sent.borrow().clone()
    }

    fn check_available(&self) -> Result<(), TableError> {
        if self.unavailable {
            return Err(TableError::Unavailable(
                "static table marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

impl ProcessTable for StaticTable {
    fn children_of(&self, pid: Pid) -> Result<Vec<Pid>, TableError> {
        self.check_available()?;
        Ok(self.children.get(&pid).cloned().unwrap_or_default())
    }

    fn parent_of(&self, pid: Pid) -> Result<Option<Pid>, TableError> {
        self.check_available()?;
        Ok(self.entries.borrow().get(&pid).and_then(|e| e.parent))
    }

    fn state_of(&self, pid: Pid) -> Result<ProcessState, TableError> {
        self.check_available()?;
        self.entries
            .borrow()
            .get(&pid)
            .map(|e| e.state)
            .ok_or(TableError::NotFound(pid))
    }

    fn send_signal(&self, pid: Pid, kind: SignalKind) -> Result<(), SignalError> {
        let mut entries = self.entries.borrow_mut();
        let Some(entry) = entries.get_mut(&pid) else {
            return Err(SignalError {
                pid,
                kind,
                source: Errno::ESRCH,
            });
        };
        if self.refused.contains(&pid) {
            return Err(SignalError {
                pid,
                kind,
                source: Errno::EPERM,
            });
        }

        match (kind, entry.state) {
            (SignalKind::Stop, ProcessState::Running) => entry.state = ProcessState::Stopped,
            (SignalKind::Continue, ProcessState::Stopped) => entry.state = ProcessState::Running,
            _ => {}
        }
        self.sent.borrow_mut().push((pid, kind));
        Ok(())
    }
}
