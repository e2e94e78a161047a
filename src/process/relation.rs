//! Process-tree relations: ancestry checks and the named descendant listings
//!
//! Every function here re-queries the table it is given; nothing is cached
//! between calls. The listings are deliberately shallow: grandchildren,
//! non-immediate and zombie descendants look at depth 1 and 2 only. Use
//! [`all_descendants`] for a full walk.

use tracing::debug;

use super::table::{Pid, ProcessState, ProcessTable};
use crate::error::TableError;

/// True if `candidate` is reachable from `root` by one or more child steps.
///
/// A process is not its own descendant unless the table lists it as its
/// own child.
pub fn is_descendant<T>(table: &T, root: Pid, candidate: Pid) -> Result<bool, TableError>
where
    T: ProcessTable + ?Sized,
{
    let children = table.children_of(root)?;
    if children.contains(&candidate) {
        debug!(%root, %candidate, "direct child");
        return Ok(true);
    }

    for child in children {
        if is_descendant(table, child, candidate)? {
            return Ok(true);
        }
    }

    Ok(false)
}

/// Direct children of `pid`
pub fn immediate_descendants<T>(table: &T, pid: Pid) -> Result<Vec<Pid>, TableError>
where
    T: ProcessTable + ?Sized,
{
    table.children_of(pid)
}

/// Children of each direct child of `pid`, in child iteration order
pub fn grandchildren<T>(table: &T, pid: Pid) -> Result<Vec<Pid>, TableError>
where
    T: ProcessTable + ?Sized,
{
    let mut found = Vec::new();
    for child in table.children_of(pid)? {
        found.extend(table.children_of(child)?);
    }
    Ok(found)
}

/// Depth-2 descendants, contributed only by children that have children
/// of their own
pub fn non_immediate_descendants<T>(table: &T, pid: Pid) -> Result<Vec<Pid>, TableError>
where
    T: ProcessTable + ?Sized,
{
    let mut found = Vec::new();
    for child in table.children_of(pid)? {
        let below = table.children_of(child)?;
        if below.is_empty() {
            continue;
        }
        debug!(%child, count = below.len(), "child has descendants");
        found.extend(below);
    }
    Ok(found)
}

/// Other children of `pid`'s parent, never including `pid` or `caller`
pub fn siblings<T>(table: &T, pid: Pid, caller: Pid) -> Result<Vec<Pid>, TableError>
where
    T: ProcessTable + ?Sized,
{
    let Some(parent) = table.parent_of(pid)? else {
        debug!(%pid, "no parent, no siblings");
        return Ok(Vec::new());
    };

    Ok(table
        .children_of(parent)?
        .into_iter()
        .filter(|sibling| *sibling != pid && *sibling != caller)
        .collect())
}

/// Direct children of `pid` that are zombies. Deeper zombies are not listed.
pub fn zombie_descendants<T>(table: &T, pid: Pid) -> Result<Vec<Pid>, TableError>
where
    T: ProcessTable + ?Sized,
{
    let mut found = Vec::new();
    for child in table.children_of(pid)? {
        match table.state_of(child) {
            Ok(ProcessState::Zombie) => found.push(child),
            Ok(_) => {}
            // Exited and reaped since it was listed
            Err(TableError::NotFound(_)) => debug!(%child, "child vanished"),
            Err(e) => return Err(e),
        }
    }
    Ok(found)
}

/// Every descendant of `pid`, pre-order
pub fn all_descendants<T>(table: &T, pid: Pid) -> Result<Vec<Pid>, TableError>
where
    T: ProcessTable + ?Sized,
{
    let mut found = Vec::new();
    collect_subtree(table, pid, &mut found)?;
    Ok(found)
}

fn collect_subtree<T>(table: &T, pid: Pid, found: &mut Vec<Pid>) -> Result<(), TableError>
where
    T: ProcessTable + ?Sized,
{
    for child in table.children_of(pid)? {
        found.push(child);
        collect_subtree(table, child, found)?;
    }
    Ok(())
}

/// Current state of `pid`. A missing process is an error, not "not defunct".
pub fn status<T>(table: &T, pid: Pid) -> Result<ProcessState, TableError>
where
    T: ProcessTable + ?Sized,
{
    table.state_of(pid)
}

/// The named listings, each paired with the line printed when it is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    Immediate,
    Grandchildren,
    NonImmediate,
    Siblings,
    Zombies,
    All,
}

impl Listing {
    pub fn empty_message(self) -> &'static str {
        match self {
            Self::Immediate => "No direct descendants",
            Self::Grandchildren => "No grandchildren",
            Self::NonImmediate => "No non-direct descendants",
            Self::Siblings => "No sibling/s",
            Self::Zombies => "No descendant zombie process/es",
            Self::All => "No descendants",
        }
    }

    /// Run the listing for `pid`; `caller` only matters for siblings
    pub fn collect<T>(self, table: &T, pid: Pid, caller: Pid) -> Result<Vec<Pid>, TableError>
    where
        T: ProcessTable + ?Sized,
    {
        match self {
            Self::Immediate => immediate_descendants(table, pid),
            Self::Grandchildren => grandchildren(table, pid),
            Self::NonImmediate => non_immediate_descendants(table, pid),
            Self::Siblings => siblings(table, pid, caller),
            Self::Zombies => zombie_descendants(table, pid),
            Self::All => all_descendants(table, pid),
        }
    }
}
