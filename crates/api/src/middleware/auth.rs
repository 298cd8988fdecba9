//! Session-cookie authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;

use spendflix_core::error::CoreError;
use spendflix_core::types::DbId;

use crate::auth::session::{session_cookie_value, validate_session_token};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from the `session` cookie.
///
/// Use this as an extractor parameter in any handler that requires an
/// established session:
///
/// ```ignore
/// async fn my_handler(session: SessionUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = session.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SessionUser {
    /// The linked user's database id (from `claims.sub`).
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookie_header = parts
            .headers
            .get(COOKIE)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Missing session cookie".into()))
            })?;

        let token = session_cookie_value(cookie_header).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Missing session cookie".into()))
        })?;

        let claims = validate_session_token(token, &state.config.session).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired session".into()))
        })?;

        Ok(SessionUser {
            user_id: claims.sub,
        })
    }
}
