//! HTTP handlers for the alert engine

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::alert::{AlertCheckSummary, AlertService, StockAlerts};
use crate::AppState;

/// Current derived alerts, grouped into critical/warning/overstock buckets
pub async fn list_alerts(State(state): State<AppState>) -> AppResult<Json<StockAlerts>> {
    let service = AlertService::new(state.db);
    let alerts = service.current_alerts().await?;
    Ok(Json(alerts))
}

/// Run the alert check pass and persist notifications
pub async fn check_alerts(State(state): State<AppState>) -> AppResult<Json<AlertCheckSummary>> {
    let service = AlertService::new(state.db);
    let summary = service.check_and_generate().await?;
    Ok(Json(summary))
}
