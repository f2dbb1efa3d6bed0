//! Item-location assignment tests
//!
//! Covers the single-primary rule: after any upsert with is_primary=true,
//! exactly one of the item's assignments is primary.

use proptest::prelude::*;

use shared::models::primary_flags_after_upsert;

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Promoting a second location demotes the current primary
    #[test]
    fn test_promotion_is_exclusive() {
        let flags = primary_flags_after_upsert(&[(1u8, true), (2, false)], 2, true);
        assert_eq!(flags, vec![(1, false), (2, true)]);
    }

    /// A non-primary upsert leaves the existing primary alone
    #[test]
    fn test_non_primary_upsert_preserves_primary() {
        let flags = primary_flags_after_upsert(&[(1u8, true), (2, false)], 3, false);
        assert_eq!(flags, vec![(1, true), (2, false), (3, false)]);
    }

    /// The first assignment for an item can start out primary
    #[test]
    fn test_first_assignment_may_be_primary() {
        let flags = primary_flags_after_upsert::<u8>(&[], 7, true);
        assert_eq!(flags, vec![(7, true)]);
    }

    /// Re-upserting the primary row without the flag demotes it; no other
    /// row is promoted in its place
    #[test]
    fn test_demoting_the_primary_leaves_none() {
        let flags = primary_flags_after_upsert(&[(1u8, true), (2, false)], 1, false);
        assert_eq!(flags, vec![(1, false), (2, false)]);
    }
}

proptest! {
    /// Over any sequence of upserts, at most one assignment is primary;
    /// an upsert with is_primary=true leaves exactly the target primary.
    #[test]
    fn single_primary_over_upsert_sequences(
        ops in proptest::collection::vec((0u8..8, any::<bool>()), 1..50),
    ) {
        let mut rows: Vec<(u8, bool)> = Vec::new();
        for (target, make_primary) in ops {
            rows = primary_flags_after_upsert(&rows, target, make_primary);

            let primaries = rows.iter().filter(|(_, p)| *p).count();
            prop_assert!(primaries <= 1);
            if make_primary {
                prop_assert_eq!(primaries, 1);
                prop_assert!(rows.iter().any(|&(k, p)| k == target && p));
            }
        }
    }

    /// Upserts never drop or duplicate assignment rows
    #[test]
    fn upsert_keeps_rows_unique(
        ops in proptest::collection::vec((0u8..8, any::<bool>()), 1..50),
    ) {
        let mut rows: Vec<(u8, bool)> = Vec::new();
        for (target, make_primary) in ops {
            let known = rows.iter().any(|&(k, _)| k == target);
            let before = rows.len();
            rows = primary_flags_after_upsert(&rows, target, make_primary);
            prop_assert_eq!(rows.len(), if known { before } else { before + 1 });

            let mut keys: Vec<u8> = rows.iter().map(|&(k, _)| k).collect();
            keys.sort_unstable();
            keys.dedup();
            prop_assert_eq!(keys.len(), rows.len());
        }
    }
}
