//! Item catalog API

mod handler;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/items", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/low-stock", get(handler::low_stock))
        .route("/{id}", get(handler::get_by_id).put(handler::update))
        .route("/{id}/stock", post(handler::adjust_stock))
}
