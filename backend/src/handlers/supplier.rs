//! HTTP handlers for the supplier directory

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::handlers::parse_body;
use crate::services::supplier::{
    CreateSupplierInput, DeleteSupplierOutcome, ListSuppliersFilter, Supplier, SupplierService,
    UpdateSupplierInput,
};
use crate::AppState;

/// List suppliers
pub async fn list_suppliers(
    State(state): State<AppState>,
    Query(filter): Query<ListSuppliersFilter>,
) -> AppResult<Json<Vec<Supplier>>> {
    let service = SupplierService::new(state.db);
    let suppliers = service.list(filter).await?;
    Ok(Json(suppliers))
}

/// Create a supplier
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Json<Supplier>> {
    let input: CreateSupplierInput = parse_body(body)?;
    let service = SupplierService::new(state.db);
    let supplier = service.create(input).await?;
    Ok(Json(supplier))
}

/// Update a supplier (id in body)
pub async fn update_supplier(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Json<Supplier>> {
    let input: UpdateSupplierInput = parse_body(body)?;
    let service = SupplierService::new(state.db);
    let supplier = service.update(input).await?;
    Ok(Json(supplier))
}

#[derive(Debug, Deserialize)]
pub struct DeleteSupplierQuery {
    pub id: Uuid,
}

/// Delete a supplier (deactivates instead when items reference it)
pub async fn delete_supplier(
    State(state): State<AppState>,
    Query(query): Query<DeleteSupplierQuery>,
) -> AppResult<Json<DeleteSupplierOutcome>> {
    let service = SupplierService::new(state.db);
    let outcome = service.delete(query.id).await?;
    Ok(Json(outcome))
}
