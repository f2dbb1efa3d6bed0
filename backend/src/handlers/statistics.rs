//! HTTP handlers for the analytics engine

use axum::{extract::State, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::handlers::parse_body;
use crate::services::analytics::{AnalyticsService, GlobalStatistics, ItemAnalysis};
use crate::AppState;

/// Aggregate statistics across all non-archived items
pub async fn global_statistics(
    State(state): State<AppState>,
) -> AppResult<Json<GlobalStatistics>> {
    let service = AnalyticsService::new(state.db);
    let statistics = service.global_statistics().await?;
    Ok(Json(statistics))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub item_id: Option<Uuid>,
}

/// Per-item consumption analysis and reorder predictions
pub async fn analyze_item(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Json<ItemAnalysis>> {
    let request: AnalyzeRequest = parse_body(body)?;
    let item_id = request.item_id.ok_or_else(|| AppError::Validation {
        field: "itemId".to_string(),
        message: "itemId is required".to_string(),
    })?;
    let service = AnalyticsService::new(state.db);
    let analysis = service.analyze(item_id).await?;
    Ok(Json(analysis))
}
