//! Route definitions for onboarding records.
//!
//! Mounted at `/onboarding` by `api_routes()`. No session is required:
//! during onboarding the uid itself is the capability.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::onboarding;
use crate::state::AppState;

/// Onboarding routes.
///
/// ```text
/// POST   /        -> start_onboarding (create, or return existing by email)
/// GET    /{id}    -> get_onboarding
/// PATCH  /{id}    -> update_onboarding (merge semantics)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(onboarding::start_onboarding))
        .route(
            "/{id}",
            get(onboarding::get_onboarding).patch(onboarding::update_onboarding),
        )
}
