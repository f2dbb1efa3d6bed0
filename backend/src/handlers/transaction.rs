//! HTTP handlers for the transaction ledger

use axum::{
    extract::{Query, State},
    Json,
};

use crate::error::AppResult;
use crate::handlers::parse_body;
use crate::middleware::CurrentUser;
use crate::services::ledger::{
    LedgerService, ListTransactionsFilter, RecordMovementInput, StockTransaction,
};
use crate::AppState;

/// List ledger entries, newest first
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(filter): Query<ListTransactionsFilter>,
) -> AppResult<Json<Vec<StockTransaction>>> {
    let service = LedgerService::new(state.db);
    let transactions = service.list(filter).await?;
    Ok(Json(transactions))
}

/// Record a stock movement, stamped with the calling user
pub async fn record_transaction(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Json<StockTransaction>> {
    let input: RecordMovementInput = parse_body(body)?;
    let service = LedgerService::new(state.db);
    let transaction = service
        .record_movement(Some(current_user.0.user_id), input)
        .await?;
    Ok(Json(transaction))
}
