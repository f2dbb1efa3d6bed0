//! Location registry tests
//!
//! Covers capacity admission and occupancy reporting.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::{capacity_allows, occupancy_rate};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Scenario: location with capacity 50 holding 40 admits 10 more but
    /// not 11 (the assignment overwrite still counts the existing 40).
    #[test]
    fn test_capacity_admission() {
        assert!(capacity_allows(dec("50"), dec("40"), dec("10")));
        assert!(!capacity_allows(dec("50"), dec("40"), dec("20")));
    }

    /// Capacity 0 is unlimited
    #[test]
    fn test_unlimited_capacity() {
        assert!(capacity_allows(Decimal::ZERO, dec("1000000"), dec("1000000")));
        assert_eq!(occupancy_rate(dec("1000000"), Decimal::ZERO), 0);
    }

    /// Occupancy is a rounded percentage
    #[test]
    fn test_occupancy_rounding() {
        assert_eq!(occupancy_rate(dec("40"), dec("50")), 80);
        assert_eq!(occupancy_rate(dec("50"), dec("50")), 100);
        assert_eq!(occupancy_rate(dec("1"), dec("3")), 33);
        assert_eq!(occupancy_rate(Decimal::ZERO, dec("50")), 0);
    }
}

proptest! {
    /// Whenever admission succeeds against a bounded capacity, the
    /// resulting occupancy stays within 100%.
    #[test]
    fn admitted_assignments_fit(
        capacity in 1u32..10_000,
        occupancy in 0u32..10_000,
        additional in 0u32..10_000,
    ) {
        let capacity = Decimal::from(capacity);
        let occupancy = Decimal::from(occupancy);
        let additional = Decimal::from(additional);

        if capacity_allows(capacity, occupancy, additional) {
            prop_assert!(occupancy + additional <= capacity);
            prop_assert!(occupancy_rate(occupancy + additional, capacity) <= 100);
        }
    }
}
