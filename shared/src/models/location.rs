//! Storage location domain types and capacity math

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kind of storage location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Standard,
    Warehouse,
    Shelf,
    Bin,
}

impl LocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Standard => "standard",
            LocationType::Warehouse => "warehouse",
            LocationType::Shelf => "shelf",
            LocationType::Bin => "bin",
        }
    }
}

impl FromStr for LocationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(LocationType::Standard),
            "warehouse" => Ok(LocationType::Warehouse),
            "shelf" => Ok(LocationType::Shelf),
            "bin" => Ok(LocationType::Bin),
            other => Err(format!("unknown location type: {other}")),
        }
    }
}

/// Lifecycle status of a location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationStatus {
    Active,
    Inactive,
}

impl LocationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationStatus::Active => "active",
            LocationStatus::Inactive => "inactive",
        }
    }
}

impl FromStr for LocationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(LocationStatus::Active),
            "inactive" => Ok(LocationStatus::Inactive),
            other => Err(format!("unknown location status: {other}")),
        }
    }
}

/// Occupancy of a location as a rounded percentage of its capacity.
///
/// Capacity 0 means unlimited, for which the rate is reported as 0.
pub fn occupancy_rate(total_quantity: Decimal, capacity: Decimal) -> i32 {
    if capacity <= Decimal::ZERO {
        return 0;
    }
    (total_quantity * Decimal::from(100) / capacity)
        .round()
        .to_i32()
        .unwrap_or(i32::MAX)
}

/// Whether a location with `capacity` can absorb `additional` units on top
/// of `current_occupancy`. Capacity 0 admits everything.
pub fn capacity_allows(capacity: Decimal, current_occupancy: Decimal, additional: Decimal) -> bool {
    if capacity <= Decimal::ZERO {
        return true;
    }
    current_occupancy + additional <= capacity
}

/// Primary flags for an item's assignments after upserting one of them.
///
/// Promoting an assignment demotes every other row, so at most one
/// assignment per item is primary afterwards.
pub fn primary_flags_after_upsert<K: PartialEq + Copy>(
    existing: &[(K, bool)],
    target: K,
    make_primary: bool,
) -> Vec<(K, bool)> {
    let mut rows: Vec<(K, bool)> = existing
        .iter()
        .map(|&(key, primary)| (key, primary && !make_primary))
        .collect();
    match rows.iter_mut().find(|(key, _)| *key == target) {
        Some(row) => row.1 = make_primary,
        None => rows.push((target, make_primary)),
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn occupancy_rounds_to_nearest_percent() {
        assert_eq!(occupancy_rate(dec("40"), dec("50")), 80);
        assert_eq!(occupancy_rate(dec("1"), dec("3")), 33);
        assert_eq!(occupancy_rate(dec("2"), dec("3")), 67);
    }

    #[test]
    fn unlimited_capacity_reports_zero_occupancy() {
        assert_eq!(occupancy_rate(dec("1000"), Decimal::ZERO), 0);
    }

    #[test]
    fn capacity_check_is_inclusive() {
        assert!(capacity_allows(dec("50"), dec("40"), dec("10")));
        assert!(!capacity_allows(dec("50"), dec("40"), dec("11")));
        assert!(capacity_allows(Decimal::ZERO, dec("1000000"), dec("1")));
    }

    #[test]
    fn promoting_demotes_the_previous_primary() {
        let flags = primary_flags_after_upsert(&[(1, true), (2, false)], 2, true);
        assert_eq!(flags, vec![(1, false), (2, true)]);
    }

    #[test]
    fn non_primary_upsert_keeps_the_existing_primary() {
        let flags = primary_flags_after_upsert(&[(1, true)], 2, false);
        assert_eq!(flags, vec![(1, true), (2, false)]);
    }
}
