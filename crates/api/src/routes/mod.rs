pub mod auth;
pub mod health;
pub mod onboarding;
pub mod session;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /onboarding                 begin onboarding (POST)
/// /onboarding/{id}            fetch (GET), merge-update (PATCH)
///
/// /session/resume             resume protocol for returning clients (POST)
///
/// /auth/onboarding-login      re-auth by onboarding uid, sets cookie (POST)
/// /auth/session               validate the session cookie (GET)
/// /auth/logout                clear the session cookie (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/onboarding", onboarding::router())
        .nest("/session", session::router())
        .nest("/auth", auth::router())
}
