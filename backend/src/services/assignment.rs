//! Item-location assignment service
//!
//! Manages the (item, location) quantity assignments. Capacity and stock
//! checks, primary-flag clearing, and the upsert all run in one database
//! transaction; the item and location rows are locked for its duration so
//! concurrent assigns cannot overshoot capacity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use shared::models::{capacity_allows, primary_flags_after_upsert};
use shared::validation::strict_decimal;

use crate::error::{AppError, AppResult};

/// Assignment service for item placement across locations
#[derive(Clone)]
pub struct AssignmentService {
    db: PgPool,
}

/// An assignment row enriched with item and location names
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ItemLocationAssignment {
    pub item_id: Uuid,
    pub location_id: Uuid,
    pub quantity: Decimal,
    pub is_primary: bool,
    pub item_name: String,
    pub item_reference: String,
    pub location_name: String,
    pub updated_at: DateTime<Utc>,
}

/// Input for assigning an item to a location
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignInput {
    pub item_id: Uuid,
    pub location_id: Uuid,
    #[serde(default, deserialize_with = "strict_decimal")]
    pub quantity: Option<Decimal>,
    #[serde(default)]
    pub is_primary: bool,
}

/// Filters for listing assignments
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAssignmentsFilter {
    pub item_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
}

impl AssignmentService {
    /// Create a new AssignmentService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List assignments, optionally filtered by item and/or location
    pub async fn list(
        &self,
        filter: ListAssignmentsFilter,
    ) -> AppResult<Vec<ItemLocationAssignment>> {
        let mut qb = sqlx::QueryBuilder::new(
            r#"
            SELECT il.item_id, il.location_id, il.quantity, il.is_primary, il.updated_at,
                   i.name AS item_name, i.reference AS item_reference,
                   l.name AS location_name
            FROM inventory_item_locations il
            JOIN inventory_items i ON i.id = il.item_id
            JOIN inventory_locations l ON l.id = il.location_id
            WHERE 1 = 1
            "#,
        );
        if let Some(item_id) = filter.item_id {
            qb.push(" AND il.item_id = ").push_bind(item_id);
        }
        if let Some(location_id) = filter.location_id {
            qb.push(" AND il.location_id = ").push_bind(location_id);
        }
        qb.push(" ORDER BY i.name, l.name");

        let rows: Vec<ItemLocationAssignment> =
            qb.build_query_as().fetch_all(&self.db).await?;
        Ok(rows)
    }

    /// Assign an item to a location (upsert on the composite key)
    pub async fn assign(&self, input: AssignInput) -> AppResult<ItemLocationAssignment> {
        self.upsert(input, false).await
    }

    /// Update an existing assignment; fails if the pair does not exist
    pub async fn update(&self, input: AssignInput) -> AppResult<ItemLocationAssignment> {
        self.upsert(input, true).await
    }

    async fn upsert(
        &self,
        input: AssignInput,
        require_existing: bool,
    ) -> AppResult<ItemLocationAssignment> {
        let quantity = match input.quantity {
            Some(q) if q >= Decimal::ZERO => q,
            Some(_) => {
                return Err(AppError::Validation {
                    field: "quantity".to_string(),
                    message: "Quantity cannot be negative".to_string(),
                })
            }
            None => {
                return Err(AppError::Validation {
                    field: "quantity".to_string(),
                    message: "quantity is required".to_string(),
                })
            }
        };

        let mut tx = self.db.begin().await?;

        // Lock the item row for the duration of the assignment
        let item_quantity = sqlx::query_scalar::<_, Decimal>(
            "SELECT quantity FROM inventory_items WHERE id = $1 FOR UPDATE",
        )
        .bind(input.item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Item".to_string()))?;

        // Lock the location row before reading its occupancy
        let capacity = sqlx::query_scalar::<_, Decimal>(
            "SELECT capacity FROM inventory_locations WHERE id = $1 FOR UPDATE",
        )
        .bind(input.location_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Location".to_string()))?;

        // Lock the item's assignment rows; their primary flags are
        // replanned below
        let existing: Vec<(Uuid, bool)> = sqlx::query_as::<_, (Uuid, bool)>(
            r#"
            SELECT location_id, is_primary
            FROM inventory_item_locations
            WHERE item_id = $1
            FOR UPDATE
            "#,
        )
        .bind(input.item_id)
        .fetch_all(&mut *tx)
        .await?;

        if require_existing && !existing.iter().any(|(l, _)| *l == input.location_id) {
            return Err(AppError::NotFound("Assignment".to_string()));
        }

        // Occupancy counts every assignment in the location, including any
        // previous quantity for this item
        let current_occupancy = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(quantity), 0)
            FROM inventory_item_locations
            WHERE location_id = $1
            "#,
        )
        .bind(input.location_id)
        .fetch_one(&mut *tx)
        .await?;

        if !capacity_allows(capacity, current_occupancy, quantity) {
            return Err(AppError::CapacityExceeded(format!(
                "Location capacity is {}, current occupancy {} plus {} would exceed it",
                capacity, current_occupancy, quantity
            )));
        }

        if quantity > item_quantity {
            return Err(AppError::InsufficientStock(format!(
                "Cannot assign {}: item has only {} in stock",
                quantity, item_quantity
            )));
        }

        // At most one primary assignment per item; the target row itself is
        // written by the upsert below
        let planned = primary_flags_after_upsert(&existing, input.location_id, input.is_primary);
        for (location_id, is_primary) in planned {
            if location_id == input.location_id {
                continue;
            }
            let unchanged = existing
                .iter()
                .any(|&(l, p)| l == location_id && p == is_primary);
            if !unchanged {
                sqlx::query(
                    "UPDATE inventory_item_locations SET is_primary = $1, updated_at = NOW() \
                     WHERE item_id = $2 AND location_id = $3",
                )
                .bind(is_primary)
                .bind(input.item_id)
                .bind(location_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        sqlx::query(
            r#"
            INSERT INTO inventory_item_locations (item_id, location_id, quantity, is_primary)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (item_id, location_id)
            DO UPDATE SET quantity = EXCLUDED.quantity,
                          is_primary = EXCLUDED.is_primary,
                          updated_at = NOW()
            "#,
        )
        .bind(input.item_id)
        .bind(input.location_id)
        .bind(quantity)
        .bind(input.is_primary)
        .execute(&mut *tx)
        .await?;

        let assignment = Self::fetch_enriched(&mut tx, input.item_id, input.location_id).await?;

        tx.commit().await?;

        Ok(assignment)
    }

    /// Remove an assignment
    pub async fn unassign(&self, item_id: Uuid, location_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "DELETE FROM inventory_item_locations WHERE item_id = $1 AND location_id = $2",
        )
        .bind(item_id)
        .bind(location_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Assignment".to_string()));
        }

        Ok(())
    }

    async fn fetch_enriched(
        tx: &mut Transaction<'_, Postgres>,
        item_id: Uuid,
        location_id: Uuid,
    ) -> AppResult<ItemLocationAssignment> {
        let assignment = sqlx::query_as::<_, ItemLocationAssignment>(
            r#"
            SELECT il.item_id, il.location_id, il.quantity, il.is_primary, il.updated_at,
                   i.name AS item_name, i.reference AS item_reference,
                   l.name AS location_name
            FROM inventory_item_locations il
            JOIN inventory_items i ON i.id = il.item_id
            JOIN inventory_locations l ON l.id = il.location_id
            WHERE il.item_id = $1 AND il.location_id = $2
            "#,
        )
        .bind(item_id)
        .bind(location_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(assignment)
    }
}
