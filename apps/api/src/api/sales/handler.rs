//! Sales handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::info;

use crate::actor::Actor;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use refill_core::query::SaleQuery;
use refill_core::{Sale, SaleDraft};
use refill_db::SaleOutcome;

/// GET /api/sales - ledger, newest first unless the query says otherwise
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<SaleQuery>,
) -> ApiResult<Json<Vec<Sale>>> {
    let sales = state.db.sales().list().await?;
    Ok(Json(query.apply(sales)))
}

/// GET /api/sales/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Sale>> {
    state
        .db
        .sales()
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Sale", id))
}

/// POST /api/sales - records a new sale
pub async fn create(
    State(state): State<AppState>,
    actor: Actor,
    Json(mut draft): Json<SaleDraft>,
) -> ApiResult<(StatusCode, Json<SaleOutcome>)> {
    draft.editing_sale_id = None;
    let outcome = state
        .db
        .sale_workflow()
        .save_sale(&draft, actor.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// PUT /api/sales/{id} - edits an existing sale in place
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    actor: Actor,
    Json(mut draft): Json<SaleDraft>,
) -> ApiResult<Json<SaleOutcome>> {
    draft.editing_sale_id = Some(id);
    let outcome = state
        .db
        .sale_workflow()
        .save_sale(&draft, actor.as_deref())
        .await?;
    Ok(Json(outcome))
}

/// DELETE /api/sales/{id} - 200 with restored items, 204 if it was already gone
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    actor: Actor,
) -> ApiResult<Response> {
    let outcome = state.db.sale_workflow().delete_sale(id).await?;
    if !outcome.removed {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    info!(sale_id = id, actor = ?actor.as_deref(), "Sale deleted via API");
    Ok(Json(outcome).into_response())
}
