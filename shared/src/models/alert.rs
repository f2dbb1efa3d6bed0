//! Stock-health tiering
//!
//! Alert levels are a pure function of the item's current quantity and its
//! configured thresholds; nothing here touches the database.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Health tier of an item's stock level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Critical,
    Warning,
    Overstock,
    Normal,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Critical => "critical",
            AlertLevel::Warning => "warning",
            AlertLevel::Overstock => "overstock",
            AlertLevel::Normal => "normal",
        }
    }

    /// Priority mirroring the alert tier
    pub fn priority(&self) -> PriorityLevel {
        match self {
            AlertLevel::Critical => PriorityLevel::High,
            AlertLevel::Warning => PriorityLevel::Medium,
            AlertLevel::Overstock => PriorityLevel::Low,
            AlertLevel::Normal => PriorityLevel::None,
        }
    }
}

/// Notification priority derived from the alert tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLevel {
    High,
    Medium,
    Low,
    None,
}

impl PriorityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityLevel::High => "high",
            PriorityLevel::Medium => "medium",
            PriorityLevel::Low => "low",
            PriorityLevel::None => "none",
        }
    }
}

/// Warning tier sits at 120% of the minimum threshold.
fn warning_threshold(min_quantity: Decimal) -> Decimal {
    min_quantity * Decimal::new(12, 1)
}

/// Derive the alert tier for an item.
///
/// `max_quantity` of 0 means unbounded (no overstock tier).
pub fn alert_level(quantity: Decimal, min_quantity: Decimal, max_quantity: Decimal) -> AlertLevel {
    if quantity <= min_quantity {
        AlertLevel::Critical
    } else if quantity <= warning_threshold(min_quantity) {
        AlertLevel::Warning
    } else if max_quantity > Decimal::ZERO && quantity >= max_quantity {
        AlertLevel::Overstock
    } else {
        AlertLevel::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn tiers_at_boundaries() {
        // min=20, max=500
        assert_eq!(alert_level(dec("20"), dec("20"), dec("500")), AlertLevel::Critical);
        assert_eq!(alert_level(dec("24"), dec("20"), dec("500")), AlertLevel::Warning);
        assert_eq!(alert_level(dec("25"), dec("20"), dec("500")), AlertLevel::Normal);
        assert_eq!(alert_level(dec("500"), dec("20"), dec("500")), AlertLevel::Overstock);
        assert_eq!(alert_level(dec("100"), dec("20"), dec("500")), AlertLevel::Normal);
    }

    #[test]
    fn unbounded_max_never_overstocks() {
        assert_eq!(alert_level(dec("1000000"), dec("20"), Decimal::ZERO), AlertLevel::Normal);
    }

    #[test]
    fn priority_mirrors_tier() {
        assert_eq!(AlertLevel::Critical.priority(), PriorityLevel::High);
        assert_eq!(AlertLevel::Warning.priority(), PriorityLevel::Medium);
        assert_eq!(AlertLevel::Overstock.priority(), PriorityLevel::Low);
        assert_eq!(AlertLevel::Normal.priority(), PriorityLevel::None);
    }
}
