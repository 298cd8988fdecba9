//! Route definitions for session authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Auth routes.
///
/// ```text
/// POST   /onboarding-login    -> onboarding_login (requires linked record)
/// GET    /session             -> get_session (requires valid cookie)
/// POST   /logout              -> logout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/onboarding-login", post(auth::onboarding_login))
        .route("/session", get(auth::get_session))
        .route("/logout", post(auth::logout))
}
