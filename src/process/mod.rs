//! Process table access and the relations computed over it

pub mod live;
pub mod memory;
pub mod relation;
pub mod table;

pub use live::SysinfoTable;
pub use memory::StaticTable;
pub use relation::{
    all_descendants, grandchildren, immediate_descendants, is_descendant,
    non_immediate_descendants, siblings, status, zombie_descendants, Listing,
};
pub use table::{Pid, ProcessState, ProcessTable, SignalKind};
