//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Handler  Result<Json<T>, ApiError>                                     │
//! │     │                                                                   │
//! │     ├── DbError::QueryFailed ─────────► 500 DATABASE_ERROR (logged)    │
//! │     ├── CoreError::Validation ────────► 400 VALIDATION_ERROR           │
//! │     ├── CoreError::InsufficientStock ─► 409 INSUFFICIENT_STOCK         │
//! │     ├── CoreError::SaleNotFound ──────► 404 NOT_FOUND                  │
//! │     └── Ok ───────────────────────────► 200 JSON body                  │
//! │                                                                         │
//! │  fetch('/api/sales', ...) → { "code": "...", "message": "..." }         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use refill_core::CoreError;
use refill_db::DbError;

/// What the frontend receives when a request fails:
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Insufficient stock for Slim 5gal refill (#2): available 2, needed 5"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Not enough units on the shelf (409)
    InsufficientStock,

    /// Request conflicts with the current state, e.g. a delivery moving backwards (409)
    Conflict,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::InsufficientStock | ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            DbError::Domain(core) => ApiError::from(core),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                tracing::error!("Database pool exhausted");
                ApiError::new(ErrorCode::DatabaseError, "Database is busy, try again")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::SaleNotFound(id) => ApiError::not_found("Sale", id),
            CoreError::DeliveryNotFound(id) => ApiError::not_found("Delivery", id),
            CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, message)
            }
            CoreError::InvalidDeliveryTransition { .. } => {
                ApiError::new(ErrorCode::Conflict, message)
            }
            // A draft pointing at a missing item or customer is bad input.
            CoreError::ItemNotFound(_)
            | CoreError::CustomerNotFound(_)
            | CoreError::CustomerArchived(_)
            | CoreError::Validation(_) => ApiError::validation(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use refill_core::ValidationError;

    #[test]
    fn test_core_error_mapping() {
        let err = ApiError::from(CoreError::InsufficientStock {
            item_id: 2,
            item_name: "Slim 5gal refill".to_string(),
            available: 2,
            needed: 5,
        });
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert!(err.message.contains("Slim 5gal refill"));

        let err = ApiError::from(CoreError::Validation(ValidationError::required("customer")));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = ApiError::from(CoreError::ItemNotFound(7));
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = ApiError::from(DbError::Domain(CoreError::SaleNotFound(3)));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Sale not found: 3");
    }

    #[test]
    fn test_db_errors_hide_details() {
        let err = ApiError::from(DbError::QueryFailed("no such column: secret".to_string()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("secret"));
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_value(ApiError::not_found("Item", 9)).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Item not found: 9");
    }
}
