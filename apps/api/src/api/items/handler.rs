//! Item catalog handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use refill_core::query::ItemQuery;
use refill_core::{Item, ItemUpdate, NewItem};

/// Body of a manual stock adjustment.
#[derive(Debug, Deserialize)]
pub struct StockAdjustment {
    pub delta: i64,
}

/// GET /api/items - catalog, filtered and sorted by the query string
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ItemQuery>,
) -> ApiResult<Json<Vec<Item>>> {
    let items = state.db.items().list().await?;
    Ok(Json(query.apply(items)))
}

/// GET /api/items/low-stock
pub async fn low_stock(State(state): State<AppState>) -> ApiResult<Json<Vec<Item>>> {
    Ok(Json(state.db.items().low_stock().await?))
}

/// GET /api/items/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Item>> {
    state
        .db
        .items()
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Item", id))
}

/// POST /api/items
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewItem>,
) -> ApiResult<(StatusCode, Json<Item>)> {
    let item = state.db.items().create(&payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/items/{id} - catalog fields only, never stock
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ItemUpdate>,
) -> ApiResult<Json<Item>> {
    Ok(Json(state.db.items().update(id, &payload).await?))
}

/// POST /api/items/{id}/stock - additive adjustment, clamped at zero
pub async fn adjust_stock(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<StockAdjustment>,
) -> ApiResult<Json<Item>> {
    Ok(Json(state.db.items().adjust_stock(id, payload.delta).await?))
}
