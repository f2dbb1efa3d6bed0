//! Supplier directory service

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, QueryBuilder};
use uuid::Uuid;

use shared::models::SupplierStatus;

use crate::error::{AppError, AppResult};

/// Supplier service
#[derive(Clone)]
pub struct SupplierService {
    db: PgPool,
}

/// A supplier record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub tax_id: Option<String>,
    pub payment_terms: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Filters for listing suppliers
#[derive(Debug, Default, Deserialize)]
pub struct ListSuppliersFilter {
    pub id: Option<Uuid>,
    pub status: Option<String>,
}

/// Input for creating a supplier
#[derive(Debug, Deserialize)]
pub struct CreateSupplierInput {
    pub name: Option<String>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub tax_id: Option<String>,
    pub payment_terms: Option<String>,
    pub status: Option<String>,
}

/// Input for updating a supplier
#[derive(Debug, Deserialize)]
pub struct UpdateSupplierInput {
    pub id: Uuid,
    pub name: Option<String>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub tax_id: Option<String>,
    pub payment_terms: Option<String>,
    pub status: Option<String>,
}

/// What happened on delete: suppliers with items are only deactivated
#[derive(Debug, Serialize)]
pub struct DeleteSupplierOutcome {
    pub deleted: bool,
    pub deactivated: bool,
}

const SUPPLIER_COLUMNS: &str = "id, name, contact_person, email, phone, address, tax_id, \
                                payment_terms, status, created_at, updated_at";

impl SupplierService {
    /// Create a new SupplierService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List suppliers
    pub async fn list(&self, filter: ListSuppliersFilter) -> AppResult<Vec<Supplier>> {
        if let Some(status) = &filter.status {
            SupplierStatus::from_str(status).map_err(AppError::InvalidArgument)?;
        }

        let mut qb = QueryBuilder::new(format!(
            "SELECT {} FROM suppliers WHERE 1 = 1",
            SUPPLIER_COLUMNS
        ));
        if let Some(id) = filter.id {
            qb.push(" AND id = ").push_bind(id);
        }
        if let Some(status) = &filter.status {
            qb.push(" AND status = ").push_bind(status.clone());
        }
        qb.push(" ORDER BY name");

        let suppliers: Vec<Supplier> = qb.build_query_as().fetch_all(&self.db).await?;
        Ok(suppliers)
    }

    /// Create a supplier
    pub async fn create(&self, input: CreateSupplierInput) -> AppResult<Supplier> {
        let name = match input.name {
            Some(n) if !n.trim().is_empty() => n,
            _ => {
                return Err(AppError::Validation {
                    field: "name".to_string(),
                    message: "name is required".to_string(),
                })
            }
        };
        let status = match &input.status {
            Some(s) => SupplierStatus::from_str(s).map_err(AppError::InvalidArgument)?,
            None => SupplierStatus::Active,
        };

        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            r#"
            INSERT INTO suppliers (name, contact_person, email, phone, address, tax_id,
                                   payment_terms, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            SUPPLIER_COLUMNS
        ))
        .bind(&name)
        .bind(&input.contact_person)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(&input.tax_id)
        .bind(&input.payment_terms)
        .bind(status.as_str())
        .fetch_one(&self.db)
        .await?;

        Ok(supplier)
    }

    /// Update a supplier; only the provided fields change
    pub async fn update(&self, input: UpdateSupplierInput) -> AppResult<Supplier> {
        if let Some(status) = &input.status {
            SupplierStatus::from_str(status).map_err(AppError::InvalidArgument)?;
        }

        let mut qb = QueryBuilder::new("UPDATE suppliers SET updated_at = NOW()");
        if let Some(name) = &input.name {
            qb.push(", name = ").push_bind(name.clone());
        }
        if let Some(contact_person) = &input.contact_person {
            qb.push(", contact_person = ").push_bind(contact_person.clone());
        }
        if let Some(email) = &input.email {
            qb.push(", email = ").push_bind(email.clone());
        }
        if let Some(phone) = &input.phone {
            qb.push(", phone = ").push_bind(phone.clone());
        }
        if let Some(address) = &input.address {
            qb.push(", address = ").push_bind(address.clone());
        }
        if let Some(tax_id) = &input.tax_id {
            qb.push(", tax_id = ").push_bind(tax_id.clone());
        }
        if let Some(payment_terms) = &input.payment_terms {
            qb.push(", payment_terms = ").push_bind(payment_terms.clone());
        }
        if let Some(status) = &input.status {
            qb.push(", status = ").push_bind(status.clone());
        }
        qb.push(" WHERE id = ").push_bind(input.id);
        qb.push(format!(" RETURNING {}", SUPPLIER_COLUMNS));

        qb.build_query_as::<Supplier>()
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Supplier".to_string()))
    }

    /// Delete a supplier. Hard delete when unreferenced, soft deactivate
    /// when items still point at it.
    pub async fn delete(&self, id: Uuid) -> AppResult<DeleteSupplierOutcome> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM suppliers WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        if !exists {
            return Err(AppError::NotFound("Supplier".to_string()));
        }

        let has_items = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM inventory_items WHERE supplier_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        if has_items {
            sqlx::query(
                "UPDATE suppliers SET status = 'inactive', updated_at = NOW() WHERE id = $1",
            )
            .bind(id)
            .execute(&self.db)
            .await?;
            return Ok(DeleteSupplierOutcome {
                deleted: false,
                deactivated: true,
            });
        }

        sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(DeleteSupplierOutcome {
            deleted: true,
            deactivated: false,
        })
    }
}
