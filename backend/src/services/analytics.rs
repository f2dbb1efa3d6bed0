//! Analytics engine
//!
//! Read-only consumption statistics, turnover, and reorder predictions
//! computed from ledger history. The arithmetic lives in the shared crate;
//! this service only fetches the per-day aggregates and assembles results.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::models::{
    days_until_stockout, monthly_turnover_rate, ConsumptionStats, DailyMovement, ReorderAdvice,
};

use crate::error::{AppError, AppResult};

/// Observation window for per-item analysis, in days
const ANALYSIS_WINDOW_DAYS: i64 = 90;

/// Analytics service over the transaction ledger
#[derive(Clone)]
pub struct AnalyticsService {
    db: PgPool,
}

/// Per-item consumption analysis and reorder predictions
#[derive(Debug, Serialize)]
pub struct ItemAnalysis {
    pub item_id: Uuid,
    pub item_name: String,
    pub current_quantity: Decimal,
    pub window_days: i64,
    #[serde(flatten)]
    pub stats: ConsumptionStats,
    /// None when consumption is zero (undefined horizon)
    pub days_until_stockout: Option<Decimal>,
    pub monthly_turnover_rate: Decimal,
    pub predictions: ReorderAdvice,
}

/// Aggregate statistics across all non-archived items
#[derive(Debug, Serialize)]
pub struct GlobalStatistics {
    pub total_items: i64,
    pub total_quantity: Decimal,
    pub total_inventory_value: Decimal,
    pub low_stock_count: i64,
    pub overstock_count: i64,
    /// Average of quantity/max_quantity across items with a bounded maximum
    pub average_stock_level_percent: Decimal,
    pub movements_last_30_days: i64,
    pub average_movement_value: Decimal,
    pub overall_turnover_rate: Decimal,
}

#[derive(Debug, FromRow)]
struct DailyRow {
    day: chrono::NaiveDate,
    total_in: Decimal,
    total_out: Decimal,
}

#[derive(Debug, FromRow)]
struct ItemAggregateRow {
    total_items: i64,
    total_quantity: Decimal,
    total_inventory_value: Decimal,
    low_stock_count: i64,
    overstock_count: i64,
    average_stock_level_percent: Decimal,
}

#[derive(Debug, FromRow)]
struct MovementAggregateRow {
    movement_count: i64,
    average_movement_value: Decimal,
    out_total: Decimal,
}

impl AnalyticsService {
    /// Create a new AnalyticsService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Analyze one item's consumption over the last 90 days
    pub async fn analyze(&self, item_id: Uuid) -> AppResult<ItemAnalysis> {
        let item = sqlx::query_as::<_, (String, Decimal)>(
            "SELECT name, quantity FROM inventory_items WHERE id = $1",
        )
        .bind(item_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Item".to_string()))?;
        let (item_name, current_quantity) = item;

        let rows = sqlx::query_as::<_, DailyRow>(
            r#"
            SELECT created_at::date AS day,
                   COALESCE(SUM(quantity) FILTER (WHERE transaction_type = 'in'), 0) AS total_in,
                   COALESCE(SUM(quantity) FILTER (WHERE transaction_type = 'out'), 0) AS total_out
            FROM inventory_transactions
            WHERE item_id = $1
              AND transaction_type IN ('in', 'out')
              AND created_at >= NOW() - INTERVAL '90 days'
            GROUP BY day
            ORDER BY day
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.db)
        .await?;

        let daily: Vec<DailyMovement> = rows
            .into_iter()
            .map(|r| DailyMovement {
                day: r.day,
                total_in: r.total_in,
                total_out: r.total_out,
            })
            .collect();

        let stats = ConsumptionStats::from_daily(&daily);

        let cutoff_30 = Utc::now().date_naive() - Duration::days(30);
        let out_30_days: Decimal = daily
            .iter()
            .filter(|d| d.day >= cutoff_30)
            .map(|d| d.total_out)
            .sum();

        let stockout = days_until_stockout(current_quantity, stats.avg_daily_consumption);
        let turnover = monthly_turnover_rate(out_30_days, current_quantity);
        let predictions = ReorderAdvice::derive(&stats, current_quantity);

        Ok(ItemAnalysis {
            item_id,
            item_name,
            current_quantity,
            window_days: ANALYSIS_WINDOW_DAYS,
            stats,
            days_until_stockout: stockout,
            monthly_turnover_rate: turnover,
            predictions,
        })
    }

    /// Aggregate statistics across all non-archived items.
    ///
    /// Every division is guarded to yield 0 rather than error on empty
    /// inventories.
    pub async fn global_statistics(&self) -> AppResult<GlobalStatistics> {
        let items = sqlx::query_as::<_, ItemAggregateRow>(
            r#"
            SELECT COUNT(*) AS total_items,
                   COALESCE(SUM(quantity), 0) AS total_quantity,
                   COALESCE(SUM(quantity * COALESCE(unit_price, 0)), 0) AS total_inventory_value,
                   COUNT(*) FILTER (WHERE quantity <= min_quantity * 1.2) AS low_stock_count,
                   COUNT(*) FILTER (WHERE max_quantity > 0 AND quantity >= max_quantity)
                       AS overstock_count,
                   COALESCE(AVG(CASE WHEN max_quantity > 0
                                     THEN quantity * 100 / max_quantity END), 0)
                       AS average_stock_level_percent
            FROM inventory_items
            WHERE status <> 'archived'
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let movements = sqlx::query_as::<_, MovementAggregateRow>(
            r#"
            SELECT COUNT(*) AS movement_count,
                   COALESCE(AVG(t.quantity * COALESCE(t.unit_price, 0)), 0)
                       AS average_movement_value,
                   COALESCE(SUM(t.quantity) FILTER (WHERE t.transaction_type = 'out'), 0)
                       AS out_total
            FROM inventory_transactions t
            JOIN inventory_items i ON i.id = t.item_id AND i.status <> 'archived'
            WHERE t.created_at >= NOW() - INTERVAL '30 days'
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let overall_turnover_rate =
            monthly_turnover_rate(movements.out_total, items.total_quantity);

        Ok(GlobalStatistics {
            total_items: items.total_items,
            total_quantity: items.total_quantity,
            total_inventory_value: items.total_inventory_value,
            low_stock_count: items.low_stock_count,
            overstock_count: items.overstock_count,
            average_stock_level_percent: items.average_stock_level_percent,
            movements_last_30_days: movements.movement_count,
            average_movement_value: movements.average_movement_value,
            overall_turnover_rate,
        })
    }
}
