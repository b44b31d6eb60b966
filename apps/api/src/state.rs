//! Shared application state.

use std::sync::Arc;

use refill_db::Database;

use crate::config::ApiConfig;

/// Cloned into every handler. The database handle is a pool clone.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        AppState {
            db,
            config: Arc::new(config),
        }
    }
}
