//! # refill-api
//!
//! JSON-over-HTTP server for the Refill Station frontend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        API Server                                       │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  /api/items    │  │  /api/sales    │  │  /api/deliveries           ││
//! │  │                │  │                │  │                            ││
//! │  │ • list/create  │  │ • list/get     │  │ • list/get                 ││
//! │  │ • update       │  │ • save (POST / │  │ • status (forward only)    ││
//! │  │ • adjust stock │  │   PUT)         │  │ • location / destination   ││
//! │  │ • low stock    │  │ • delete       │  │                            ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐                                │
//! │  │/api/customers  │  │  /health       │                                │
//! │  │ • archive      │  │                │                                │
//! │  │ • restore      │  │                │                                │
//! │  └────────────────┘  └────────────────┘                                │
//! │                                                                         │
//! │  Middleware: request id → TraceLayer → CORS                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config`]. Environment variables:
//! - `REFILL_CONFIG` - Path to `refill.toml`
//! - `REFILL_BIND_ADDR` / `REFILL_PORT` - Listen address (default: 127.0.0.1:3001)
//! - `REFILL_DB_PATH` - SQLite file (default: refill.db)
//! - `REFILL_DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `REFILL_STORE_NAME` - Display name
//! - `RUST_LOG` - Log filter (default: info,refill=debug,sqlx=warn)

pub mod actor;
pub mod api;
pub mod config;
pub mod error;
pub mod state;

use axum::http::{HeaderName, HeaderValue, Request};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::AppState;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone, Default)]
struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Builds the application with all routes, middleware and state.
pub fn build_app(state: AppState) -> Router {
    api::build_router()
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            UuidRequestId,
        ))
        .with_state(state)
}

// =============================================================================
// Router Tests
// =============================================================================
