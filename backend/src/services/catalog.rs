//! Item catalog service
//!
//! Owns inventory item records. Quantity is only ever changed through the
//! transaction ledger; the update operation here covers metadata and
//! thresholds and rejects direct quantity edits.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, QueryBuilder};
use uuid::Uuid;

use shared::models::ItemStatus;
use shared::validation::lenient_decimal;

use crate::error::{AppError, AppResult};

/// Number of recent ledger entries attached to each listed item
const RECENT_TRANSACTION_COUNT: i64 = 5;

/// Catalog service for managing inventory items
#[derive(Clone)]
pub struct CatalogService {
    db: PgPool,
}

/// An inventory item record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockItem {
    pub id: Uuid,
    pub name: String,
    pub reference: String,
    pub description: Option<String>,
    pub quantity: Decimal,
    pub unit: String,
    pub min_quantity: Decimal,
    pub max_quantity: Decimal,
    pub category: Option<String>,
    pub status: String,
    pub unit_price: Option<Decimal>,
    pub supplier_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Item row joined with its supplier summary
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockItemWithSupplier {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub item: StockItem,
    pub supplier_name: Option<String>,
}

/// A recent ledger entry shown alongside a listed item
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecentTransaction {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub item_id: Uuid,
    pub transaction_type: String,
    pub quantity: Decimal,
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Listed item with its most recent ledger activity, newest first
#[derive(Debug, Serialize)]
pub struct ItemWithDetails {
    #[serde(flatten)]
    pub item: StockItemWithSupplier,
    pub recent_transactions: Vec<RecentTransaction>,
}

/// Filters for listing items
#[derive(Debug, Default, Deserialize)]
pub struct ListItemsFilter {
    pub id: Option<Uuid>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub supplier: Option<Uuid>,
}

/// Input for creating an item.
///
/// Numeric fields coerce leniently: numbers, numeric strings, or garbage
/// (which falls back to the default) are all accepted.
#[derive(Debug, Deserialize)]
pub struct CreateItemInput {
    pub name: Option<String>,
    pub reference: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub min_quantity: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub max_quantity: Option<Decimal>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub unit_price: Option<Decimal>,
    pub supplier_id: Option<Uuid>,
}

/// Input for updating item metadata. Strict numerics: a non-numeric value
/// fails deserialization rather than being silently defaulted.
#[derive(Debug, Deserialize)]
pub struct UpdateItemInput {
    pub id: Uuid,
    pub name: Option<String>,
    pub reference: Option<String>,
    pub description: Option<String>,
    /// Present only to reject it: quantity changes must go through the ledger.
    #[serde(default)]
    pub quantity: Option<serde_json::Value>,
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "shared::validation::strict_decimal")]
    pub min_quantity: Option<Decimal>,
    #[serde(default, deserialize_with = "shared::validation::strict_decimal")]
    pub max_quantity: Option<Decimal>,
    pub category: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "shared::validation::strict_decimal")]
    pub unit_price: Option<Decimal>,
    pub supplier_id: Option<Uuid>,
}

impl CatalogService {
    /// Create a new CatalogService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List items with supplier summary and recent ledger activity.
    ///
    /// Archived items are excluded unless an explicit status filter asks
    /// for them.
    pub async fn list(&self, filter: ListItemsFilter) -> AppResult<Vec<ItemWithDetails>> {
        let mut qb = QueryBuilder::new(
            r#"
            SELECT i.id, i.name, i.reference, i.description, i.quantity, i.unit,
                   i.min_quantity, i.max_quantity, i.category, i.status, i.unit_price,
                   i.supplier_id, i.created_at, i.updated_at,
                   s.name AS supplier_name
            FROM inventory_items i
            LEFT JOIN suppliers s ON s.id = i.supplier_id
            WHERE 1 = 1
            "#,
        );

        if let Some(id) = filter.id {
            qb.push(" AND i.id = ").push_bind(id);
        }
        if let Some(category) = &filter.category {
            qb.push(" AND i.category = ").push_bind(category.clone());
        }
        if let Some(supplier) = filter.supplier {
            qb.push(" AND i.supplier_id = ").push_bind(supplier);
        }
        match &filter.status {
            Some(status) => {
                let status = ItemStatus::from_str(status)
                    .map_err(AppError::InvalidArgument)?;
                qb.push(" AND i.status = ").push_bind(status.as_str());
            }
            None => {
                qb.push(" AND i.status <> ").push_bind(ItemStatus::Archived.as_str());
            }
        }
        qb.push(" ORDER BY i.name");

        let items: Vec<StockItemWithSupplier> =
            qb.build_query_as().fetch_all(&self.db).await?;

        let ids: Vec<Uuid> = items.iter().map(|i| i.item.id).collect();
        let mut recent = self.recent_transactions(&ids).await?;

        Ok(items
            .into_iter()
            .map(|item| {
                let recent_transactions = recent.remove(&item.item.id).unwrap_or_default();
                ItemWithDetails {
                    item,
                    recent_transactions,
                }
            })
            .collect())
    }

    /// Most recent ledger entries per item, newest first
    async fn recent_transactions(
        &self,
        item_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, Vec<RecentTransaction>>> {
        if item_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, RecentTransaction>(
            r#"
            SELECT id, item_id, transaction_type, quantity, reference, created_at
            FROM (
                SELECT t.id, t.item_id, t.transaction_type, t.quantity, t.reference,
                       t.created_at,
                       ROW_NUMBER() OVER (
                           PARTITION BY t.item_id ORDER BY t.created_at DESC
                       ) AS rn
                FROM inventory_transactions t
                WHERE t.item_id = ANY($1)
            ) ranked
            WHERE rn <= $2
            ORDER BY item_id, created_at DESC
            "#,
        )
        .bind(item_ids)
        .bind(RECENT_TRANSACTION_COUNT)
        .fetch_all(&self.db)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<RecentTransaction>> = HashMap::new();
        for row in rows {
            grouped.entry(row.item_id).or_default().push(row);
        }
        Ok(grouped)
    }

    /// Create an item. An initial quantity > 0 synthesizes one `initial`
    /// ledger entry in the same database transaction.
    pub async fn create(&self, input: CreateItemInput) -> AppResult<StockItem> {
        let name = require_text("name", input.name)?;
        let reference = require_text("reference", input.reference)?;
        let unit = require_text("unit", input.unit)?;

        let quantity = input.quantity.unwrap_or(Decimal::ZERO);
        let min_quantity = input.min_quantity.unwrap_or(Decimal::ZERO);
        let max_quantity = input.max_quantity.unwrap_or(Decimal::ZERO);

        if quantity < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: "Quantity cannot be negative".to_string(),
            });
        }
        if min_quantity < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "min_quantity".to_string(),
                message: "Minimum quantity cannot be negative".to_string(),
            });
        }

        let mut tx = self.db.begin().await?;

        let item = sqlx::query_as::<_, StockItem>(
            r#"
            INSERT INTO inventory_items (
                name, reference, description, quantity, unit, min_quantity,
                max_quantity, category, status, unit_price, supplier_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'active', $9, $10)
            RETURNING id, name, reference, description, quantity, unit, min_quantity,
                      max_quantity, category, status, unit_price, supplier_id,
                      created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(&reference)
        .bind(&input.description)
        .bind(quantity)
        .bind(&unit)
        .bind(min_quantity)
        .bind(max_quantity)
        .bind(&input.category)
        .bind(input.unit_price)
        .bind(input.supplier_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| reference_conflict(e, &reference))?;

        if quantity > Decimal::ZERO {
            sqlx::query(
                r#"
                INSERT INTO inventory_transactions (
                    item_id, transaction_type, quantity, unit_price, reference
                )
                VALUES ($1, 'initial', $2, $3, $4)
                "#,
            )
            .bind(item.id)
            .bind(quantity)
            .bind(input.unit_price)
            .bind(format!("INIT-{}", reference))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(item)
    }

    /// Update item metadata. Only the provided fields change; quantity is
    /// off-limits here and must flow through the ledger as an adjustment.
    pub async fn update(&self, input: UpdateItemInput) -> AppResult<StockItem> {
        if input.quantity.is_some() {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: "Quantity cannot be edited directly; record an adjustment_up or \
                          adjustment_down transaction instead"
                    .to_string(),
            });
        }

        if let Some(status) = &input.status {
            ItemStatus::from_str(status).map_err(AppError::InvalidArgument)?;
        }
        if let Some(min) = input.min_quantity {
            if min < Decimal::ZERO {
                return Err(AppError::Validation {
                    field: "min_quantity".to_string(),
                    message: "Minimum quantity cannot be negative".to_string(),
                });
            }
        }

        let mut qb = QueryBuilder::new("UPDATE inventory_items SET updated_at = NOW()");
        if let Some(name) = &input.name {
            qb.push(", name = ").push_bind(name.clone());
        }
        if let Some(reference) = &input.reference {
            qb.push(", reference = ").push_bind(reference.clone());
        }
        if let Some(description) = &input.description {
            qb.push(", description = ").push_bind(description.clone());
        }
        if let Some(unit) = &input.unit {
            qb.push(", unit = ").push_bind(unit.clone());
        }
        if let Some(min_quantity) = input.min_quantity {
            qb.push(", min_quantity = ").push_bind(min_quantity);
        }
        if let Some(max_quantity) = input.max_quantity {
            qb.push(", max_quantity = ").push_bind(max_quantity);
        }
        if let Some(category) = &input.category {
            qb.push(", category = ").push_bind(category.clone());
        }
        if let Some(status) = &input.status {
            qb.push(", status = ").push_bind(status.clone());
        }
        if let Some(unit_price) = input.unit_price {
            qb.push(", unit_price = ").push_bind(unit_price);
        }
        if let Some(supplier_id) = input.supplier_id {
            qb.push(", supplier_id = ").push_bind(supplier_id);
        }
        qb.push(" WHERE id = ").push_bind(input.id);
        qb.push(
            r#" RETURNING id, name, reference, description, quantity, unit, min_quantity,
                       max_quantity, category, status, unit_price, supplier_id,
                       created_at, updated_at"#,
        );

        qb.build_query_as::<StockItem>()
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Item".to_string()))
    }

    /// Archive an item (soft delete). The record and its ledger history
    /// remain intact.
    pub async fn archive(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE inventory_items SET status = 'archived', updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Item".to_string()));
        }

        Ok(())
    }
}

fn require_text(field: &str, value: Option<String>) -> AppResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Validation {
            field: field.to_string(),
            message: format!("{} is required", field),
        }),
    }
}

/// Duplicate business keys surface as conflicts rather than opaque
/// database errors. Reference is the unique key; the constraint is the
/// authority, so concurrent creates resolve the same way as sequential
/// ones.
fn reference_conflict(err: sqlx::Error, reference: &str) -> AppError {
    let unique = matches!(
        &err,
        sqlx::Error::Database(db) if is_unique_violation(db.code().as_deref())
    );
    if unique {
        AppError::Conflict {
            resource: "reference".to_string(),
            message: format!("An item with reference {} already exists", reference),
        }
    } else {
        err.into()
    }
}

fn is_unique_violation(code: Option<&str>) -> bool {
    // PostgreSQL SQLSTATE for unique_violation
    code == Some("23505")
}
