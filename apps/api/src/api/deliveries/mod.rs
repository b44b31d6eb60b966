//! Delivery dashboard API
//!
//! Deliveries are created and removed by the sale workflow only.

mod handler;

use axum::routing::{get, put};
use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/deliveries", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", put(handler::update_status))
        .route("/{id}/location", put(handler::update_location))
        .route("/{id}/destination", put(handler::set_destination))
}
