//! Route definitions for session resumption.

use axum::routing::post;
use axum::Router;

use crate::handlers::resume;
use crate::state::AppState;

/// Session routes.
///
/// ```text
/// POST   /resume    -> resume_session (two-tier fallback chain)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/resume", post(resume::resume_session))
}
