//! Location registry service
//!
//! Owns storage locations and their capacity. Per-item assignments live in
//! the assignment service; this one reports aggregate usage per location.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, QueryBuilder};
use uuid::Uuid;

use shared::models::{occupancy_rate, LocationStatus, LocationType};
use shared::validation::lenient_decimal;

use crate::error::{AppError, AppResult};

/// Location service for managing storage locations
#[derive(Clone)]
pub struct LocationService {
    db: PgPool,
}

/// A storage location record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub location_type: String,
    pub capacity: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row shape for the usage query
#[derive(Debug, FromRow)]
struct LocationUsageRow {
    #[sqlx(flatten)]
    location: Location,
    total_items: Decimal,
    unique_items: i64,
}

/// Location with computed usage figures
#[derive(Debug, Serialize)]
pub struct LocationWithUsage {
    #[serde(flatten)]
    pub location: Location,
    /// Sum of assigned quantities across all items
    pub total_items: Decimal,
    /// Number of distinct items assigned here
    pub unique_items: i64,
    /// Rounded percentage of capacity in use; 0 when capacity is unlimited
    pub occupancy_rate: i32,
}

/// A location as seen from one item's perspective
#[derive(Debug, Serialize, FromRow)]
pub struct ItemLocationView {
    pub location_id: Uuid,
    pub location_name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub location_type: String,
    pub capacity: Decimal,
    pub status: String,
    pub quantity: Decimal,
    pub is_primary: bool,
}

/// Input for creating a location
#[derive(Debug, Deserialize)]
pub struct CreateLocationInput {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub location_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub capacity: Option<Decimal>,
    pub status: Option<String>,
}

/// Input for updating a location
#[derive(Debug, Deserialize)]
pub struct UpdateLocationInput {
    pub id: Uuid,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub location_type: Option<String>,
    #[serde(default, deserialize_with = "shared::validation::strict_decimal")]
    pub capacity: Option<Decimal>,
    pub status: Option<String>,
}

impl LocationService {
    /// Create a new LocationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List locations with computed usage, optionally narrowed to one id
    pub async fn list(&self, id: Option<Uuid>) -> AppResult<Vec<LocationWithUsage>> {
        let mut qb = QueryBuilder::new(
            r#"
            SELECT l.id, l.name, l.type, l.capacity, l.status, l.created_at, l.updated_at,
                   COALESCE(SUM(il.quantity), 0) AS total_items,
                   COUNT(DISTINCT il.item_id) AS unique_items
            FROM inventory_locations l
            LEFT JOIN inventory_item_locations il ON il.location_id = l.id
            "#,
        );
        if let Some(id) = id {
            qb.push(" WHERE l.id = ").push_bind(id);
        }
        qb.push(
            r#"
            GROUP BY l.id, l.name, l.type, l.capacity, l.status, l.created_at, l.updated_at
            ORDER BY l.name
            "#,
        );

        let rows: Vec<LocationUsageRow> = qb.build_query_as().fetch_all(&self.db).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let rate = occupancy_rate(row.total_items, row.location.capacity);
                LocationWithUsage {
                    location: row.location,
                    total_items: row.total_items,
                    unique_items: row.unique_items,
                    occupancy_rate: rate,
                }
            })
            .collect())
    }

    /// Locations holding a given item, primary assignment first
    pub async fn list_for_item(&self, item_id: Uuid) -> AppResult<Vec<ItemLocationView>> {
        let rows = sqlx::query_as::<_, ItemLocationView>(
            r#"
            SELECT l.id AS location_id, l.name AS location_name, l.type, l.capacity,
                   l.status, il.quantity, il.is_primary
            FROM inventory_item_locations il
            JOIN inventory_locations l ON l.id = il.location_id
            WHERE il.item_id = $1
            ORDER BY il.is_primary DESC, l.name
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Create a location
    pub async fn create(&self, input: CreateLocationInput) -> AppResult<Location> {
        let name = match input.name {
            Some(n) if !n.trim().is_empty() => n,
            _ => {
                return Err(AppError::Validation {
                    field: "name".to_string(),
                    message: "name is required".to_string(),
                })
            }
        };

        let location_type = match &input.location_type {
            Some(t) => LocationType::from_str(t).map_err(AppError::InvalidArgument)?,
            None => LocationType::Standard,
        };
        let status = match &input.status {
            Some(s) => LocationStatus::from_str(s).map_err(AppError::InvalidArgument)?,
            None => LocationStatus::Active,
        };
        let capacity = input.capacity.unwrap_or(Decimal::ZERO);
        if capacity < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "capacity".to_string(),
                message: "Capacity cannot be negative".to_string(),
            });
        }

        let location = sqlx::query_as::<_, Location>(
            r#"
            INSERT INTO inventory_locations (name, type, capacity, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, type, capacity, status, created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(location_type.as_str())
        .bind(capacity)
        .bind(status.as_str())
        .fetch_one(&self.db)
        .await?;

        Ok(location)
    }

    /// Update a location; only the provided fields change
    pub async fn update(&self, input: UpdateLocationInput) -> AppResult<Location> {
        if let Some(t) = &input.location_type {
            LocationType::from_str(t).map_err(AppError::InvalidArgument)?;
        }
        if let Some(s) = &input.status {
            LocationStatus::from_str(s).map_err(AppError::InvalidArgument)?;
        }
        if let Some(capacity) = input.capacity {
            if capacity < Decimal::ZERO {
                return Err(AppError::Validation {
                    field: "capacity".to_string(),
                    message: "Capacity cannot be negative".to_string(),
                });
            }
        }

        let mut qb = QueryBuilder::new("UPDATE inventory_locations SET updated_at = NOW()");
        if let Some(name) = &input.name {
            qb.push(", name = ").push_bind(name.clone());
        }
        if let Some(location_type) = &input.location_type {
            qb.push(", type = ").push_bind(location_type.clone());
        }
        if let Some(capacity) = input.capacity {
            qb.push(", capacity = ").push_bind(capacity);
        }
        if let Some(status) = &input.status {
            qb.push(", status = ").push_bind(status.clone());
        }
        qb.push(" WHERE id = ").push_bind(input.id);
        qb.push(" RETURNING id, name, type, capacity, status, created_at, updated_at");

        qb.build_query_as::<Location>()
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Location".to_string()))
    }

    /// Deactivate a location. Refused while any item is still assigned,
    /// even with quantity 0; assignments must be cleared first.
    pub async fn deactivate(&self, id: Uuid) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM inventory_locations WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        if !exists {
            return Err(AppError::NotFound("Location".to_string()));
        }

        let has_assignments = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM inventory_item_locations WHERE location_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        if has_assignments {
            return Err(AppError::Conflict {
                resource: "location".to_string(),
                message: "Location still has assigned items and cannot be deactivated"
                    .to_string(),
            });
        }

        sqlx::query(
            "UPDATE inventory_locations SET status = 'inactive', updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.db)
        .await?;

        Ok(())
    }
}
