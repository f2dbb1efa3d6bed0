//! Analytics engine tests
//!
//! Covers consumption statistics, division-by-zero guards, reorder
//! predictions, and unusual-movement detection.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::{
    days_until_stockout, is_unusual_movement, monthly_turnover_rate, ConsumptionStats,
    DailyMovement, ReorderAdvice,
};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn day(d: u32, total_in: &str, total_out: &str) -> DailyMovement {
    DailyMovement {
        day: NaiveDate::from_ymd_opt(2026, 8, d).unwrap(),
        total_in: dec(total_in),
        total_out: dec(total_out),
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Scenario: item with zero consumption days analyzes without a
    /// division error and reports an undefined stockout horizon.
    #[test]
    fn test_no_consumption_no_division_error() {
        let stats = ConsumptionStats::from_daily(&[]);
        assert_eq!(stats.avg_daily_consumption, Decimal::ZERO);
        assert_eq!(stats.active_days, 0);
        assert_eq!(days_until_stockout(dec("100"), stats.avg_daily_consumption), None);
        assert_eq!(monthly_turnover_rate(Decimal::ZERO, dec("100")), Decimal::ZERO);
        assert_eq!(monthly_turnover_rate(dec("10"), Decimal::ZERO), Decimal::ZERO);
    }

    /// Steady consumption of 20/day with 100 on hand: five days of cover
    #[test]
    fn test_stockout_horizon() {
        let stats = ConsumptionStats::from_daily(&[
            day(1, "0", "20"),
            day(2, "0", "20"),
            day(3, "0", "20"),
        ]);
        assert_eq!(stats.avg_daily_consumption, dec("20"));
        assert_eq!(days_until_stockout(dec("100"), stats.avg_daily_consumption), Some(dec("5")));
    }

    /// Turnover: 50 consumed over 30 days against 200 on hand is 25%
    #[test]
    fn test_turnover_rate() {
        assert_eq!(monthly_turnover_rate(dec("50"), dec("200")), dec("25"));
    }

    /// Intake and consumption averages are computed independently
    #[test]
    fn test_intake_average() {
        let stats = ConsumptionStats::from_daily(&[day(1, "30", "10"), day(2, "0", "20")]);
        assert_eq!(stats.avg_daily_intake, dec("15"));
        assert_eq!(stats.avg_daily_consumption, dec("15"));
        assert_eq!(stats.active_days, 2);
    }

    /// Reorder advice: 30-day demand below current stock yields a negative
    /// order quantity, meaning no reorder is needed.
    #[test]
    fn test_reorder_advice_sign() {
        let stats = ConsumptionStats {
            avg_daily_consumption: dec("3"),
            stddev_consumption: dec("1.5"),
            avg_daily_intake: Decimal::ZERO,
            active_days: 30,
        };
        let advice = ReorderAdvice::derive(&stats, dec("200"));
        assert_eq!(advice.next_week_consumption, dec("21"));
        assert_eq!(advice.next_month_consumption, dec("90"));
        assert_eq!(advice.recommended_reorder_point, dec("24"));
        assert_eq!(advice.recommended_order_quantity, dec("-110"));

        let advice_low = ReorderAdvice::derive(&stats, dec("10"));
        assert_eq!(advice_low.recommended_order_quantity, dec("80"));
    }

    /// Unusual movement: a spike beyond avg + 2 sigma flags, steady
    /// consumption does not, and a single-day history never flags.
    #[test]
    fn test_unusual_movement_detection() {
        assert!(is_unusual_movement(dec("100"), dec("10"), dec("5"), 10));
        assert!(!is_unusual_movement(dec("19"), dec("10"), dec("5"), 10));
        assert!(!is_unusual_movement(dec("1000"), dec("10"), dec("5"), 1));
    }

    /// Sample stddev over a known series
    #[test]
    fn test_stddev() {
        let stats = ConsumptionStats::from_daily(&[
            day(1, "0", "10"),
            day(2, "0", "20"),
            day(3, "0", "30"),
        ]);
        assert!((stats.stddev_consumption - dec("10")).abs() < dec("0.0001"));
    }
}

proptest! {
    /// Statistics are a pure function of the series: identical input
    /// always produces identical output.
    #[test]
    fn stats_are_deterministic(
        outs in proptest::collection::vec(0u32..1_000, 0..40),
    ) {
        let series: Vec<DailyMovement> = outs
            .iter()
            .enumerate()
            .map(|(i, &out)| DailyMovement {
                day: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                total_in: Decimal::ZERO,
                total_out: Decimal::from(out),
            })
            .collect();

        let a = ConsumptionStats::from_daily(&series);
        let b = ConsumptionStats::from_daily(&series);
        prop_assert_eq!(a, b);
    }

    /// The stockout horizon is defined exactly when consumption is positive.
    #[test]
    fn stockout_horizon_definedness(current in 0u32..100_000, avg in 0u32..1_000) {
        let horizon = days_until_stockout(Decimal::from(current), Decimal::from(avg));
        if avg == 0 {
            prop_assert!(horizon.is_none());
        } else {
            prop_assert!(horizon.is_some());
        }
    }

    /// Turnover never divides by zero and is never negative for
    /// non-negative inputs.
    #[test]
    fn turnover_is_total(out_30 in 0u32..100_000, current in 0u32..100_000) {
        let rate = monthly_turnover_rate(Decimal::from(out_30), Decimal::from(current));
        prop_assert!(rate >= Decimal::ZERO);
    }
}
