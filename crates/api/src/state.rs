use std::sync::Arc;

use uuid::Uuid;

use spendflix_core::cache::TtlCache;
use spendflix_db::models::onboarding::Onboarding;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; inner data is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: spendflix_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Read cache for onboarding records. Every mutation refreshes the
    /// cached entry, so reads within one process see their own writes.
    pub onboarding_cache: Arc<TtlCache<Uuid, Onboarding>>,
}
