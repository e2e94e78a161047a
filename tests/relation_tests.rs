//! Relation engine tests against an in-memory process table
//!
//! Fixture used throughout:
//!
//! ```text
//! 1000
//! ├── 1001
//! │   └── 1003
//! │       └── 1004
//! └── 1002 (zombie)
//! ```

use proctree::process::relation::{
    all_descendants, grandchildren, immediate_descendants, is_descendant,
    non_immediate_descendants, siblings, status, zombie_descendants, Listing,
};
use proctree::{Pid, ProcessState, StaticTable, TableError};

fn pid(raw: i32) -> Pid {
    Pid::new(raw).expect("positive pid")
}

fn pids(raw: &[i32]) -> Vec<Pid> {
    raw.iter().copied().map(pid).collect()
}

fn fixture() -> StaticTable {
    StaticTable::new()
        .with(pid(1), None, ProcessState::Running)
        .with(pid(1000), Some(pid(1)), ProcessState::Running)
        .with(pid(1001), Some(pid(1000)), ProcessState::Running)
        .with(pid(1002), Some(pid(1000)), ProcessState::Zombie)
        .with(pid(1003), Some(pid(1001)), ProcessState::Running)
        .with(pid(1004), Some(pid(1003)), ProcessState::Running)
}

const CALLER: i32 = 4242;

#[cfg(test)]
mod descendant_tests {
    use super::*;

    #[test]
    fn test_deep_descendant_found() {
        let table = fixture();
        assert!(is_descendant(&table, pid(1000), pid(1004)).unwrap());
    }

    #[test]
    fn test_every_subtree_member_is_a_descendant() {
        let table = fixture();
        for member in [1001, 1002, 1003, 1004] {
            assert!(
                is_descendant(&table, pid(1000), pid(member)).unwrap(),
                "{member} should be under 1000"
            );
        }
    }

    #[test]
    fn test_outside_processes_are_not_descendants() {
        let table = fixture();
        assert!(!is_descendant(&table, pid(1000), pid(1)).unwrap());
        assert!(!is_descendant(&table, pid(1001), pid(1002)).unwrap());
        assert!(!is_descendant(&table, pid(1003), pid(1001)).unwrap());
        assert!(!is_descendant(&table, pid(1000), pid(31337)).unwrap());
    }

    #[test]
    fn test_root_is_not_its_own_descendant() {
        let table = fixture();
        assert!(!is_descendant(&table, pid(1000), pid(1000)).unwrap());
    }

    #[test]
    fn test_self_child_degenerate_case() {
        // A table that lists a process as its own child would loop forever;
        // the direct-child check answers before recursing.
        let table = StaticTable::new().with(pid(9), Some(pid(9)), ProcessState::Running);
        assert!(is_descendant(&table, pid(9), pid(9)).unwrap());
    }

    #[test]
    fn test_matches_transitive_closure() {
        let table = fixture();
        let closure = all_descendants(&table, pid(1000)).unwrap();
        for candidate in [1, 1000, 1001, 1002, 1003, 1004, 5000] {
            let expected = closure.contains(&pid(candidate));
            assert_eq!(
                is_descendant(&table, pid(1000), pid(candidate)).unwrap(),
                expected,
                "candidate {candidate}"
            );
        }
    }
}

#[cfg(test)]
mod listing_tests {
    use super::*;

    #[test]
    fn test_immediate_descendants() {
        let table = fixture();
        assert_eq!(
            immediate_descendants(&table, pid(1000)).unwrap(),
            pids(&[1001, 1002])
        );
        assert!(immediate_descendants(&table, pid(1004)).unwrap().is_empty());
    }

    #[test]
    fn test_grandchildren_exclude_depth_three() {
        let table = fixture();
        assert_eq!(grandchildren(&table, pid(1000)).unwrap(), pids(&[1003]));
    }

    #[test]
    fn test_grandchildren_follow_child_order() {
        let table = StaticTable::new()
            .with(pid(10), None, ProcessState::Running)
            .with(pid(12), Some(pid(10)), ProcessState::Running)
            .with(pid(11), Some(pid(10)), ProcessState::Running)
            .with(pid(20), Some(pid(11)), ProcessState::Running)
            .with(pid(21), Some(pid(12)), ProcessState::Running)
            .with(pid(22), Some(pid(12)), ProcessState::Running);

        assert_eq!(
            grandchildren(&table, pid(10)).unwrap(),
            pids(&[21, 22, 20])
        );
    }

    #[test]
    fn test_non_immediate_descendants_stop_at_depth_two() {
        let table = fixture();
        // 1001 contributes its child; 1002 has none; 1004 is depth three.
        assert_eq!(
            non_immediate_descendants(&table, pid(1000)).unwrap(),
            pids(&[1003])
        );
        assert_eq!(
            non_immediate_descendants(&table, pid(1001)).unwrap(),
            pids(&[1004])
        );
        assert!(non_immediate_descendants(&table, pid(1003))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_zombie_descendants_direct_children_only() {
        let mut table = fixture();
        // Depth-two zombie must not show up under 1000
        table.insert(pid(1003), Some(pid(1001)), ProcessState::Zombie);

        assert_eq!(
            zombie_descendants(&table, pid(1000)).unwrap(),
            pids(&[1002])
        );
        assert_eq!(
            zombie_descendants(&table, pid(1001)).unwrap(),
            pids(&[1003])
        );
    }

    #[test]
    fn test_siblings_exclude_self_and_caller() {
        let mut table = fixture();
        assert_eq!(
            siblings(&table, pid(1001), pid(CALLER)).unwrap(),
            pids(&[1002])
        );

        table.insert(pid(CALLER), Some(pid(1000)), ProcessState::Running);
        table.insert(pid(1005), Some(pid(1000)), ProcessState::Running);
        assert_eq!(
            siblings(&table, pid(1001), pid(CALLER)).unwrap(),
            pids(&[1002, 1005])
        );
    }

    #[test]
    fn test_siblings_use_exact_pid_match() {
        let table = StaticTable::new()
            .with(pid(1), None, ProcessState::Running)
            .with(pid(10), Some(pid(1)), ProcessState::Running)
            .with(pid(100), Some(pid(1)), ProcessState::Running)
            .with(pid(1010), Some(pid(1)), ProcessState::Running);

        assert_eq!(
            siblings(&table, pid(10), pid(CALLER)).unwrap(),
            pids(&[100, 1010])
        );
    }

    #[test]
    fn test_only_child_has_no_siblings() {
        let table = fixture();
        assert!(siblings(&table, pid(1003), pid(CALLER)).unwrap().is_empty());
    }

    #[test]
    fn test_all_descendants_walks_whole_subtree() {
        let table = fixture();
        assert_eq!(
            all_descendants(&table, pid(1000)).unwrap(),
            pids(&[1001, 1003, 1004, 1002])
        );
    }

    #[test]
    fn test_listing_empty_messages() {
        assert_eq!(Listing::Immediate.empty_message(), "No direct descendants");
        assert_eq!(Listing::Grandchildren.empty_message(), "No grandchildren");
        assert_eq!(
            Listing::NonImmediate.empty_message(),
            "No non-direct descendants"
        );
        assert_eq!(Listing::Siblings.empty_message(), "No sibling/s");
        assert_eq!(
            Listing::Zombies.empty_message(),
            "No descendant zombie process/es"
        );
    }
}

#[cfg(test)]
mod status_tests {
    use super::*;

    #[test]
    fn test_status_reads_state() {
        let table = fixture();
        assert!(status(&table, pid(1002)).unwrap().is_defunct());
        assert!(!status(&table, pid(1001)).unwrap().is_defunct());
    }

    #[test]
    fn test_status_of_missing_process_is_an_error() {
        let table = fixture();
        assert!(matches!(
            status(&table, pid(5555)),
            Err(TableError::NotFound(p)) if p == pid(5555)
        ));
    }

    #[test]
    fn test_unavailable_table_is_fatal_for_every_query() {
        let mut table = fixture();
        table.set_unavailable();

        assert!(is_descendant(&table, pid(1000), pid(1004)).is_err());
        assert!(grandchildren(&table, pid(1000)).is_err());
        assert!(zombie_descendants(&table, pid(1000)).is_err());
        assert!(siblings(&table, pid(1001), pid(CALLER)).is_err());
        assert!(status(&table, pid(1000)).is_err());
    }
}
