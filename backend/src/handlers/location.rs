//! HTTP handlers for the location registry

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::handlers::{parse_body, StatusMessage};
use crate::services::location::{
    CreateLocationInput, Location, LocationService, UpdateLocationInput,
};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLocationsQuery {
    pub id: Option<Uuid>,
    pub item_id: Option<Uuid>,
}

/// List locations with usage figures; with `itemId`, only the locations
/// holding that item (with per-item quantity and primary flag)
pub async fn list_locations(
    State(state): State<AppState>,
    Query(query): Query<ListLocationsQuery>,
) -> AppResult<Response> {
    let service = LocationService::new(state.db);
    if let Some(item_id) = query.item_id {
        let locations = service.list_for_item(item_id).await?;
        return Ok(Json(locations).into_response());
    }
    let locations = service.list(query.id).await?;
    Ok(Json(locations).into_response())
}

/// Create a location
pub async fn create_location(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Json<Location>> {
    let input: CreateLocationInput = parse_body(body)?;
    let service = LocationService::new(state.db);
    let location = service.create(input).await?;
    Ok(Json(location))
}

/// Update a location (id in body)
pub async fn update_location(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Json<Location>> {
    let input: UpdateLocationInput = parse_body(body)?;
    let service = LocationService::new(state.db);
    let location = service.update(input).await?;
    Ok(Json(location))
}

#[derive(Debug, Deserialize)]
pub struct DeactivateLocationQuery {
    pub id: Uuid,
}

/// Deactivate a location (refused while items remain assigned)
pub async fn deactivate_location(
    State(state): State<AppState>,
    Query(query): Query<DeactivateLocationQuery>,
) -> AppResult<Json<StatusMessage>> {
    let service = LocationService::new(state.db);
    service.deactivate(query.id).await?;
    Ok(Json(StatusMessage {
        message: "Location deactivated".to_string(),
    }))
}
