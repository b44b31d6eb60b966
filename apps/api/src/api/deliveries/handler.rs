//! Delivery dashboard handlers

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use refill_core::{Delivery, DeliveryStatus, GeoPoint};

#[derive(Debug, Default, Deserialize)]
pub struct DeliveryFilter {
    pub status: Option<DeliveryStatus>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: DeliveryStatus,
}

#[derive(Debug, Deserialize)]
pub struct DestinationUpdate {
    pub destination: Option<GeoPoint>,
}

/// GET /api/deliveries?status=in-progress
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<DeliveryFilter>,
) -> ApiResult<Json<Vec<Delivery>>> {
    Ok(Json(state.db.deliveries().list(filter.status).await?))
}

/// GET /api/deliveries/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Delivery>> {
    state
        .db
        .deliveries()
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Delivery", id))
}

/// PUT /api/deliveries/{id}/status - forward only
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<StatusUpdate>,
) -> ApiResult<Json<Delivery>> {
    Ok(Json(
        state.db.deliveries().update_status(id, payload.status).await?,
    ))
}

/// PUT /api/deliveries/{id}/location - rider's last known position
pub async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(location): Json<GeoPoint>,
) -> ApiResult<Json<Delivery>> {
    Ok(Json(state.db.deliveries().update_location(id, location).await?))
}

/// PUT /api/deliveries/{id}/destination - `{ "destination": null }` clears it
pub async fn set_destination(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<DestinationUpdate>,
) -> ApiResult<Json<Delivery>> {
    Ok(Json(
        state
            .db
            .deliveries()
            .set_destination(id, payload.destination)
            .await?,
    ))
}
