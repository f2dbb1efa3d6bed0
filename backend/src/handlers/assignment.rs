//! HTTP handlers for item-location assignments

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::handlers::{parse_body, StatusMessage};
use crate::services::assignment::{
    AssignInput, AssignmentService, ItemLocationAssignment, ListAssignmentsFilter,
};
use crate::AppState;

/// List assignments, optionally filtered by item and/or location
pub async fn list_assignments(
    State(state): State<AppState>,
    Query(filter): Query<ListAssignmentsFilter>,
) -> AppResult<Json<Vec<ItemLocationAssignment>>> {
    let service = AssignmentService::new(state.db);
    let assignments = service.list(filter).await?;
    Ok(Json(assignments))
}

/// Assign an item to a location (upsert on the composite key)
pub async fn assign_item(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Json<ItemLocationAssignment>> {
    let input: AssignInput = parse_body(body)?;
    let service = AssignmentService::new(state.db);
    let assignment = service.assign(input).await?;
    Ok(Json(assignment))
}

/// Update an existing assignment
pub async fn update_assignment(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Json<ItemLocationAssignment>> {
    let input: AssignInput = parse_body(body)?;
    let service = AssignmentService::new(state.db);
    let assignment = service.update(input).await?;
    Ok(Json(assignment))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnassignQuery {
    pub item_id: Uuid,
    pub location_id: Uuid,
}

/// Remove an assignment
pub async fn unassign_item(
    State(state): State<AppState>,
    Query(query): Query<UnassignQuery>,
) -> AppResult<Json<StatusMessage>> {
    let service = AssignmentService::new(state.db);
    service.unassign(query.item_id, query.location_id).await?;
    Ok(Json(StatusMessage {
        message: "Assignment removed".to_string(),
    }))
}
