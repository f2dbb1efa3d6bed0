//! Transaction ledger service
//!
//! The ledger is the single writer for item quantities. Every movement
//! inserts an immutable transaction row and adjusts the item (and any
//! source/destination location assignments) inside one database
//! transaction; the item row stays locked for the duration so concurrent
//! movements on the same item serialize instead of losing updates.

use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, QueryBuilder};
use uuid::Uuid;

use shared::models::TransactionType;
use shared::validation::strict_decimal;

use crate::error::{AppError, AppResult};

/// Ledger service for recording and listing stock movements
#[derive(Clone)]
pub struct LedgerService {
    db: PgPool,
}

/// A ledger entry enriched with item, location, and user names
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockTransaction {
    pub id: Uuid,
    pub item_id: Uuid,
    pub item_name: String,
    pub transaction_type: String,
    /// Stored unsigned; the type carries the direction
    pub quantity: Decimal,
    /// Snapshot of the item's unit price at transaction time
    pub unit_price: Option<Decimal>,
    pub source_location_id: Option<Uuid>,
    pub source_location_name: Option<String>,
    pub destination_location_id: Option<Uuid>,
    pub destination_location_name: Option<String>,
    pub reference: Option<String>,
    pub user_id: Option<Uuid>,
    pub user_name: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a stock movement
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMovementInput {
    pub item_id: Option<Uuid>,
    pub transaction_type: Option<String>,
    #[serde(default, deserialize_with = "strict_decimal")]
    pub quantity: Option<Decimal>,
    pub source_location_id: Option<Uuid>,
    pub destination_location_id: Option<Uuid>,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

/// Filters for listing ledger entries
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsFilter {
    pub item_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl LedgerService {
    /// Create a new LedgerService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a stock movement.
    ///
    /// Source-location decrements are strict: if the source assignment does
    /// not hold the moved quantity the whole movement fails, keeping the
    /// item-level and location-level totals in agreement.
    pub async fn record_movement(
        &self,
        user_id: Option<Uuid>,
        input: RecordMovementInput,
    ) -> AppResult<StockTransaction> {
        let item_id = input.item_id.ok_or_else(|| AppError::Validation {
            field: "itemId".to_string(),
            message: "itemId is required".to_string(),
        })?;
        let transaction_type = input
            .transaction_type
            .as_deref()
            .ok_or_else(|| AppError::Validation {
                field: "transactionType".to_string(),
                message: "transactionType is required".to_string(),
            })?;
        let transaction_type = TransactionType::from_str(transaction_type)
            .map_err(|e| AppError::InvalidArgument(e.to_string()))?;
        let quantity = input
            .quantity
            .ok_or_else(|| AppError::Validation {
                field: "quantity".to_string(),
                message: "quantity must be a number".to_string(),
            })?
            .abs();

        let mut tx = self.db.begin().await?;

        // Lock the item row; concurrent movements on the same item serialize here
        let item = sqlx::query_as::<_, (Decimal, Option<Decimal>)>(
            "SELECT quantity, unit_price FROM inventory_items WHERE id = $1 FOR UPDATE",
        )
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Item".to_string()))?;
        let (current_quantity, unit_price) = item;

        let new_quantity = transaction_type
            .apply(current_quantity, quantity)
            .map_err(|e| AppError::InsufficientStock(e.to_string()))?;

        let transaction_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO inventory_transactions (
                item_id, transaction_type, quantity, unit_price,
                source_location_id, destination_location_id, reference, user_id, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(item_id)
        .bind(transaction_type.as_str())
        .bind(quantity)
        .bind(unit_price)
        .bind(input.source_location_id)
        .bind(input.destination_location_id)
        .bind(&input.reference)
        .bind(user_id)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE inventory_items SET quantity = $1, updated_at = NOW() WHERE id = $2")
            .bind(new_quantity)
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        if let Some(source_id) = input.source_location_id {
            // Strict conservation: the guarded UPDATE only matches when the
            // assignment holds enough stock
            let result = sqlx::query(
                r#"
                UPDATE inventory_item_locations
                SET quantity = quantity - $1, updated_at = NOW()
                WHERE item_id = $2 AND location_id = $3 AND quantity >= $1
                "#,
            )
            .bind(quantity)
            .bind(item_id)
            .bind(source_id)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(AppError::Conflict {
                    resource: "sourceLocationId".to_string(),
                    message: "Source location does not hold enough of this item".to_string(),
                });
            }
        }

        if let Some(destination_id) = input.destination_location_id {
            sqlx::query(
                r#"
                INSERT INTO inventory_item_locations (item_id, location_id, quantity, is_primary)
                VALUES ($1, $2, $3, false)
                ON CONFLICT (item_id, location_id)
                DO UPDATE SET quantity = inventory_item_locations.quantity + EXCLUDED.quantity,
                              updated_at = NOW()
                "#,
            )
            .bind(item_id)
            .bind(destination_id)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.get(transaction_id).await
    }

    /// Fetch one enriched ledger entry
    pub async fn get(&self, id: Uuid) -> AppResult<StockTransaction> {
        sqlx::query_as::<_, StockTransaction>(&format!("{} WHERE t.id = $1", SELECT_ENRICHED))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Transaction".to_string()))
    }

    /// List ledger entries, newest first
    pub async fn list(&self, filter: ListTransactionsFilter) -> AppResult<Vec<StockTransaction>> {
        if let Some(t) = &filter.transaction_type {
            TransactionType::from_str(t).map_err(|e| AppError::InvalidArgument(e.to_string()))?;
        }

        let mut qb = QueryBuilder::new(format!("{} WHERE 1 = 1", SELECT_ENRICHED));
        if let Some(item_id) = filter.item_id {
            qb.push(" AND t.item_id = ").push_bind(item_id);
        }
        if let Some(transaction_type) = &filter.transaction_type {
            qb.push(" AND t.transaction_type = ").push_bind(transaction_type.clone());
        }
        if let Some(start) = filter.start_date {
            qb.push(" AND t.created_at >= ")
                .push_bind(start.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc());
        }
        if let Some(end) = filter.end_date {
            let exclusive_end = end + Duration::days(1);
            qb.push(" AND t.created_at < ")
                .push_bind(exclusive_end.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc());
        }
        qb.push(" ORDER BY t.created_at DESC");

        let rows: Vec<StockTransaction> = qb.build_query_as().fetch_all(&self.db).await?;
        Ok(rows)
    }
}

const SELECT_ENRICHED: &str = r#"
    SELECT t.id, t.item_id, t.transaction_type, t.quantity, t.unit_price,
           t.source_location_id, t.destination_location_id, t.reference,
           t.user_id, t.notes, t.created_at,
           i.name AS item_name,
           src.name AS source_location_name,
           dst.name AS destination_location_name,
           u.display_name AS user_name
    FROM inventory_transactions t
    JOIN inventory_items i ON i.id = t.item_id
    LEFT JOIN inventory_locations src ON src.id = t.source_location_id
    LEFT JOIN inventory_locations dst ON dst.id = t.destination_location_id
    LEFT JOIN users u ON u.id = t.user_id
"#;
