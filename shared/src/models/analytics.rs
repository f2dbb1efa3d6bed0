//! Consumption analytics over the transaction ledger
//!
//! The backend fetches per-day movement totals and hands them to these
//! functions; everything here is plain arithmetic so the guards around
//! division by zero can be tested without a database.

use chrono::NaiveDate;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One day of aggregated ledger activity for an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMovement {
    pub day: NaiveDate,
    pub total_in: Decimal,
    pub total_out: Decimal,
}

/// Consumption statistics over an observation window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionStats {
    pub avg_daily_consumption: Decimal,
    pub stddev_consumption: Decimal,
    pub avg_daily_intake: Decimal,
    pub active_days: i64,
}

impl ConsumptionStats {
    /// Compute statistics over the days that saw any movement.
    ///
    /// An empty series yields all-zero stats, which downstream guards turn
    /// into "no prediction" rather than a division error.
    pub fn from_daily(days: &[DailyMovement]) -> Self {
        let active_days = days.len() as i64;
        if days.is_empty() {
            return Self {
                avg_daily_consumption: Decimal::ZERO,
                stddev_consumption: Decimal::ZERO,
                avg_daily_intake: Decimal::ZERO,
                active_days: 0,
            };
        }

        let n = Decimal::from(active_days);
        let avg_out: Decimal = days.iter().map(|d| d.total_out).sum::<Decimal>() / n;
        let avg_in: Decimal = days.iter().map(|d| d.total_in).sum::<Decimal>() / n;

        Self {
            avg_daily_consumption: avg_out,
            stddev_consumption: sample_stddev(days.iter().map(|d| d.total_out)),
            avg_daily_intake: avg_in,
            active_days,
        }
    }
}

/// Sample standard deviation; 0 for fewer than two observations.
pub fn sample_stddev<I: IntoIterator<Item = Decimal>>(values: I) -> Decimal {
    let values: Vec<f64> = values
        .into_iter()
        .map(|v| v.to_f64().unwrap_or(0.0))
        .collect();
    if values.len() < 2 {
        return Decimal::ZERO;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Decimal::from_f64(variance.sqrt()).unwrap_or(Decimal::ZERO)
}

/// Days of cover left at the current consumption rate.
///
/// None when consumption is zero: the horizon is undefined, not infinite.
pub fn days_until_stockout(current_quantity: Decimal, avg_daily_consumption: Decimal) -> Option<Decimal> {
    if avg_daily_consumption <= Decimal::ZERO {
        return None;
    }
    Some(current_quantity / avg_daily_consumption)
}

/// Monthly turnover as a percentage of current stock; 0 when stock is 0.
pub fn monthly_turnover_rate(out_30_days: Decimal, current_quantity: Decimal) -> Decimal {
    if current_quantity <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    out_30_days * Decimal::from(100) / current_quantity
}

/// Reorder predictions derived from the consumption statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderAdvice {
    pub next_week_consumption: Decimal,
    pub next_month_consumption: Decimal,
    pub recommended_reorder_point: Decimal,
    /// Negative means current stock already covers the coming month.
    pub recommended_order_quantity: Decimal,
}

impl ReorderAdvice {
    pub fn derive(stats: &ConsumptionStats, current_quantity: Decimal) -> Self {
        let avg = stats.avg_daily_consumption;
        let stddev = stats.stddev_consumption;
        Self {
            next_week_consumption: avg * Decimal::from(7),
            next_month_consumption: avg * Decimal::from(30),
            recommended_reorder_point: avg * Decimal::from(7) + Decimal::from(2) * stddev,
            recommended_order_quantity: avg * Decimal::from(30) - current_quantity,
        }
    }
}

/// Whether today's consumption stands out against the observation window.
///
/// Flags when today exceeds avg + 2 sigma; windows with fewer than two
/// active days carry no usable deviation and never flag.
pub fn is_unusual_movement(
    today_out: Decimal,
    avg_daily_consumption: Decimal,
    stddev_consumption: Decimal,
    active_days: i64,
) -> bool {
    if active_days < 2 {
        return false;
    }
    today_out > avg_daily_consumption + Decimal::from(2) * stddev_consumption
}
