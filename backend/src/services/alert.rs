//! Alert engine
//!
//! The read path derives stock-health tiers from current item state without
//! touching storage. The write path inserts notification rows for every
//! item still breaching a threshold; all three derivations run in one
//! database transaction so a failure leaves no partial alert set.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use shared::models::{
    alert_level, is_unusual_movement, sample_stddev, AlertLevel, PriorityLevel,
};

use crate::error::AppResult;

/// Alert service deriving stock-health signals from catalog and ledger state
#[derive(Clone)]
pub struct AlertService {
    db: PgPool,
}

/// An item annotated with its derived alert tier
#[derive(Debug, Clone, Serialize)]
pub struct AlertItem {
    pub id: Uuid,
    pub name: String,
    pub reference: String,
    pub quantity: Decimal,
    pub min_quantity: Decimal,
    pub max_quantity: Decimal,
    pub unit: String,
    pub category: Option<String>,
    pub alert_level: AlertLevel,
    pub priority_level: PriorityLevel,
}

/// Alerting read view: non-normal items grouped by tier
#[derive(Debug, Serialize)]
pub struct StockAlerts {
    pub critical: Vec<AlertItem>,
    pub warning: Vec<AlertItem>,
    pub overstock: Vec<AlertItem>,
    pub counts: AlertCounts,
}

#[derive(Debug, Serialize)]
pub struct AlertCounts {
    pub critical: usize,
    pub warning: usize,
    pub overstock: usize,
    pub total: usize,
}

/// Notifications generated per category by one check pass
#[derive(Debug, Serialize)]
pub struct AlertCheckSummary {
    pub low_stock: u64,
    pub overstock: u64,
    pub unusual_movement: u64,
}

#[derive(Debug, FromRow)]
struct ItemThresholdRow {
    id: Uuid,
    name: String,
    reference: String,
    quantity: Decimal,
    min_quantity: Decimal,
    max_quantity: Decimal,
    unit: String,
    category: Option<String>,
}

#[derive(Debug, FromRow)]
struct DailyOutRow {
    item_id: Uuid,
    item_name: String,
    day: chrono::NaiveDate,
    total_out: Decimal,
}

impl AlertService {
    /// Create a new AlertService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Derive current alerts for all active items.
    ///
    /// Pure read: identical underlying state always produces the same
    /// buckets, and archived items never alert.
    pub async fn current_alerts(&self) -> AppResult<StockAlerts> {
        let rows = sqlx::query_as::<_, ItemThresholdRow>(
            r#"
            SELECT id, name, reference, quantity, min_quantity, max_quantity, unit, category
            FROM inventory_items
            WHERE status = 'active'
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let mut critical = Vec::new();
        let mut warning = Vec::new();
        let mut overstock = Vec::new();

        for row in rows {
            let level = alert_level(row.quantity, row.min_quantity, row.max_quantity);
            let item = AlertItem {
                id: row.id,
                name: row.name,
                reference: row.reference,
                quantity: row.quantity,
                min_quantity: row.min_quantity,
                max_quantity: row.max_quantity,
                unit: row.unit,
                category: row.category,
                alert_level: level,
                priority_level: level.priority(),
            };
            match level {
                AlertLevel::Critical => critical.push(item),
                AlertLevel::Warning => warning.push(item),
                AlertLevel::Overstock => overstock.push(item),
                AlertLevel::Normal => {}
            }
        }

        let counts = AlertCounts {
            critical: critical.len(),
            warning: warning.len(),
            overstock: overstock.len(),
            total: critical.len() + warning.len() + overstock.len(),
        };

        Ok(StockAlerts {
            critical,
            warning,
            overstock,
            counts,
        })
    }

    /// Run the alert check pass, persisting one notification per breaching
    /// item per category. Not idempotent: re-running re-inserts for items
    /// still matching.
    pub async fn check_and_generate(&self) -> AppResult<AlertCheckSummary> {
        let mut tx = self.db.begin().await?;

        let low_stock = self.generate_low_stock(&mut tx).await?;
        let overstock = self.generate_overstock(&mut tx).await?;
        let unusual_movement = self.generate_unusual_movement(&mut tx).await?;

        tx.commit().await?;

        Ok(AlertCheckSummary {
            low_stock,
            overstock,
            unusual_movement,
        })
    }

    /// Low/critical stock: active items at or under 120% of their minimum
    async fn generate_low_stock(&self, tx: &mut Transaction<'_, Postgres>) -> AppResult<u64> {
        let rows = sqlx::query_as::<_, ItemThresholdRow>(
            r#"
            SELECT id, name, reference, quantity, min_quantity, max_quantity, unit, category
            FROM inventory_items
            WHERE status = 'active' AND quantity <= min_quantity * 1.2
            "#,
        )
        .fetch_all(&mut **tx)
        .await?;

        let mut generated = 0;
        for row in rows {
            let is_critical = row.quantity <= row.min_quantity;
            let (notification_type, title, priority) = if is_critical {
                (
                    "stock_critical",
                    format!("Critical stock level: {}", row.name),
                    PriorityLevel::High,
                )
            } else {
                (
                    "stock_warning",
                    format!("Low stock warning: {}", row.name),
                    PriorityLevel::Medium,
                )
            };
            let content = format!(
                "{} ({}) is at {} {} (minimum {})",
                row.name, row.reference, row.quantity, row.unit, row.min_quantity
            );
            let metadata = serde_json::json!({
                "item_id": row.id,
                "quantity": row.quantity,
                "min_quantity": row.min_quantity,
            });
            insert_notification(tx, notification_type, &title, &content, priority, &metadata)
                .await?;
            generated += 1;
        }
        Ok(generated)
    }

    /// Overstock: active items above a bounded maximum
    async fn generate_overstock(&self, tx: &mut Transaction<'_, Postgres>) -> AppResult<u64> {
        let rows = sqlx::query_as::<_, ItemThresholdRow>(
            r#"
            SELECT id, name, reference, quantity, min_quantity, max_quantity, unit, category
            FROM inventory_items
            WHERE status = 'active' AND max_quantity > 0 AND quantity > max_quantity
            "#,
        )
        .fetch_all(&mut **tx)
        .await?;

        let mut generated = 0;
        for row in rows {
            let title = format!("Overstock: {}", row.name);
            let content = format!(
                "{} ({}) is at {} {} (maximum {})",
                row.name, row.reference, row.quantity, row.unit, row.max_quantity
            );
            let metadata = serde_json::json!({
                "item_id": row.id,
                "quantity": row.quantity,
                "max_quantity": row.max_quantity,
            });
            insert_notification(
                tx,
                "stock_overstock",
                &title,
                &content,
                PriorityLevel::Low,
                &metadata,
            )
            .await?;
            generated += 1;
        }
        Ok(generated)
    }

    /// Unusual movement: today's consumption beyond avg + 2 sigma of the
    /// 30-day daily `out` series
    async fn generate_unusual_movement(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> AppResult<u64> {
        let rows = sqlx::query_as::<_, DailyOutRow>(
            r#"
            SELECT t.item_id, i.name AS item_name, t.created_at::date AS day,
                   SUM(t.quantity) AS total_out
            FROM inventory_transactions t
            JOIN inventory_items i ON i.id = t.item_id AND i.status = 'active'
            WHERE t.transaction_type = 'out'
              AND t.created_at >= NOW() - INTERVAL '30 days'
            GROUP BY t.item_id, i.name, day
            ORDER BY t.item_id, day
            "#,
        )
        .fetch_all(&mut **tx)
        .await?;

        let today = Utc::now().date_naive();
        let mut generated = 0;

        let mut by_item: Vec<(Uuid, String, Vec<(chrono::NaiveDate, Decimal)>)> = Vec::new();
        for row in rows {
            match by_item.last_mut() {
                Some((id, _, series)) if *id == row.item_id => {
                    series.push((row.day, row.total_out));
                }
                _ => by_item.push((row.item_id, row.item_name, vec![(row.day, row.total_out)])),
            }
        }

        for (item_id, item_name, series) in by_item {
            let today_out = series
                .iter()
                .find(|(day, _)| *day == today)
                .map(|(_, qty)| *qty)
                .unwrap_or(Decimal::ZERO);
            let active_days = series.len() as i64;
            let avg = series.iter().map(|(_, q)| *q).sum::<Decimal>()
                / Decimal::from(active_days.max(1));
            let stddev = sample_stddev(series.iter().map(|(_, q)| *q));

            if is_unusual_movement(today_out, avg, stddev, active_days) {
                let title = format!("Unusual stock movement: {}", item_name);
                let content = format!(
                    "Today's consumption of {} ({}) exceeds the 30-day average {} by more \
                     than two standard deviations",
                    item_name, today_out, avg
                );
                let metadata = serde_json::json!({
                    "item_id": item_id,
                    "today_consumption": today_out,
                    "average_consumption": avg,
                    "stddev_consumption": stddev,
                });
                insert_notification(
                    tx,
                    "unusual_movement",
                    &title,
                    &content,
                    PriorityLevel::Medium,
                    &metadata,
                )
                .await?;
                generated += 1;
            }
        }

        Ok(generated)
    }
}

async fn insert_notification(
    tx: &mut Transaction<'_, Postgres>,
    notification_type: &str,
    title: &str,
    content: &str,
    priority: PriorityLevel,
    metadata: &serde_json::Value,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO notifications (notification_type, title, content, priority, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(notification_type)
    .bind(title)
    .bind(content)
    .bind(priority.as_str())
    .bind(metadata)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
