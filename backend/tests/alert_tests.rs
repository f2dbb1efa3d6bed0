//! Alert engine tests
//!
//! Covers stock-health tiering: threshold boundaries, priority mirroring,
//! and the forward-only tier progression as stock drains.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::{alert_level, AlertLevel, PriorityLevel};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Rank tiers along the draining direction: overstock -> normal ->
/// warning -> critical
fn rank(level: AlertLevel) -> u8 {
    match level {
        AlertLevel::Overstock => 0,
        AlertLevel::Normal => 1,
        AlertLevel::Warning => 2,
        AlertLevel::Critical => 3,
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Scenario from the item lifecycle: 100 on hand, min 20, max 500
    #[test]
    fn test_healthy_item_is_normal() {
        assert_eq!(alert_level(dec("100"), dec("20"), dec("500")), AlertLevel::Normal);
    }

    /// After drawing down to 15, the item is critical (15 <= 20)
    #[test]
    fn test_depleted_item_is_critical() {
        assert_eq!(alert_level(dec("15"), dec("20"), dec("500")), AlertLevel::Critical);
    }

    /// Warning band sits between min and 120% of min
    #[test]
    fn test_warning_band() {
        assert_eq!(alert_level(dec("21"), dec("20"), dec("500")), AlertLevel::Warning);
        assert_eq!(alert_level(dec("24"), dec("20"), dec("500")), AlertLevel::Warning);
        assert_eq!(alert_level(dec("24.01"), dec("20"), dec("500")), AlertLevel::Normal);
    }

    /// Overstock triggers at the bounded maximum, inclusive
    #[test]
    fn test_overstock_boundary() {
        assert_eq!(alert_level(dec("500"), dec("20"), dec("500")), AlertLevel::Overstock);
        assert_eq!(alert_level(dec("499"), dec("20"), dec("500")), AlertLevel::Normal);
    }

    /// max_quantity 0 means unbounded: no overstock tier
    #[test]
    fn test_unbounded_max() {
        assert_eq!(
            alert_level(dec("999999"), dec("20"), Decimal::ZERO),
            AlertLevel::Normal
        );
    }

    /// Priority mirrors the tier
    #[test]
    fn test_priority_mirror() {
        assert_eq!(AlertLevel::Critical.priority(), PriorityLevel::High);
        assert_eq!(AlertLevel::Warning.priority(), PriorityLevel::Medium);
        assert_eq!(AlertLevel::Overstock.priority(), PriorityLevel::Low);
        assert_eq!(AlertLevel::Normal.priority(), PriorityLevel::None);
    }

    /// Zero minimum: only an empty item is critical
    #[test]
    fn test_zero_minimum() {
        assert_eq!(alert_level(dec("0"), Decimal::ZERO, dec("100")), AlertLevel::Critical);
        assert_eq!(alert_level(dec("1"), Decimal::ZERO, dec("100")), AlertLevel::Normal);
    }
}

proptest! {
    /// As quantity strictly decreases, the tier only moves forward through
    /// overstock -> normal -> warning -> critical, never backward.
    #[test]
    fn tier_progression_is_monotonic(
        min in 1u32..1_000,
        max_extra in 1u32..10_000,
        mut quantities in proptest::collection::vec(0u32..20_000, 2..50),
    ) {
        let min = Decimal::from(min);
        let max = min * Decimal::from(2) + Decimal::from(max_extra);

        quantities.sort_unstable_by(|a, b| b.cmp(a));
        quantities.dedup();

        let mut last_rank = 0u8;
        for q in quantities {
            let level = alert_level(Decimal::from(q), min, max);
            let r = rank(level);
            prop_assert!(
                r >= last_rank,
                "tier moved backward at quantity {} ({:?})", q, level
            );
            last_rank = r;
        }
    }

    /// The tier function is total: every combination lands in exactly one tier.
    #[test]
    fn tier_is_total(q in 0u32..100_000, min in 0u32..1_000, max in 0u32..2_000) {
        let level = alert_level(Decimal::from(q), Decimal::from(min), Decimal::from(max));
        let _ = rank(level);
    }
}
