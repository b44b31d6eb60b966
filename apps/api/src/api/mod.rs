//! Route modules, one per resource.

pub mod customers;
pub mod deliveries;
pub mod health;
pub mod items;
pub mod sales;

use axum::Router;

use crate::state::AppState;

/// Every route, without middleware.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(items::router())
        .merge(customers::router())
        .merge(sales::router())
        .merge(deliveries::router())
}
