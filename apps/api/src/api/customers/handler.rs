//! Customer directory handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use refill_core::query::CustomerQuery;
use refill_core::{Customer, CustomerUpdate, NewCustomer};

/// GET /api/customers - archived customers only with `includeHidden=true`
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<CustomerQuery>,
) -> ApiResult<Json<Vec<Customer>>> {
    let customers = state.db.customers().list(query.include_hidden).await?;
    Ok(Json(query.apply(customers)))
}

/// GET /api/customers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Customer>> {
    state
        .db
        .customers()
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Customer", id))
}

/// POST /api/customers
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewCustomer>,
) -> ApiResult<(StatusCode, Json<Customer>)> {
    let customer = state.db.customers().create(&payload).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// PUT /api/customers/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CustomerUpdate>,
) -> ApiResult<Json<Customer>> {
    Ok(Json(state.db.customers().update(id, &payload).await?))
}

/// POST /api/customers/{id}/archive
pub async fn archive(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Customer>> {
    Ok(Json(state.db.customers().archive(id).await?))
}

/// POST /api/customers/{id}/restore
pub async fn restore(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Customer>> {
    Ok(Json(state.db.customers().restore(id).await?))
}
