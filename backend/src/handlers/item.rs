//! HTTP handlers for the item catalog

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::handlers::{parse_body, StatusMessage};
use crate::services::catalog::{
    CatalogService, CreateItemInput, ItemWithDetails, ListItemsFilter, StockItem, UpdateItemInput,
};
use crate::AppState;

/// List items with supplier summary and recent ledger activity
pub async fn list_items(
    State(state): State<AppState>,
    Query(filter): Query<ListItemsFilter>,
) -> AppResult<Json<Vec<ItemWithDetails>>> {
    let service = CatalogService::new(state.db);
    let items = service.list(filter).await?;
    Ok(Json(items))
}

/// Create an item (with an `initial` ledger entry when quantity > 0)
pub async fn create_item(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Json<StockItem>> {
    let input: CreateItemInput = parse_body(body)?;
    let service = CatalogService::new(state.db);
    let item = service.create(input).await?;
    Ok(Json(item))
}

/// Update item metadata (id in body; quantity edits are rejected)
pub async fn update_item(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Json<StockItem>> {
    let input: UpdateItemInput = parse_body(body)?;
    let service = CatalogService::new(state.db);
    let item = service.update(input).await?;
    Ok(Json(item))
}

#[derive(Debug, Deserialize)]
pub struct ArchiveItemQuery {
    pub id: Uuid,
}

/// Archive an item (soft delete)
pub async fn archive_item(
    State(state): State<AppState>,
    Query(query): Query<ArchiveItemQuery>,
) -> AppResult<Json<StatusMessage>> {
    let service = CatalogService::new(state.db);
    service.archive(query.id).await?;
    Ok(Json(StatusMessage {
        message: "Item archived".to_string(),
    }))
}
