//! Handlers for the `/auth` resource.
//!
//! During onboarding the client authenticates with its onboarding uid
//! alone; a full credential login lives with the excluded auth service.
//! Only records already linked to a user can log in this way.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use spendflix_core::error::CoreError;
use spendflix_core::types::DbId;
use spendflix_db::repositories::OnboardingRepo;

use crate::auth::session::{clear_session_cookie, generate_session_token, session_cookie};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::SessionUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/onboarding-login`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingLoginRequest {
    pub onboarding_uid: Uuid,
}

/// Session payload returned by login and session checks.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub user_id: DbId,
    /// Session lifetime in seconds.
    pub expires_in: i64,
}

/// Subject of an established session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSubject {
    pub user_id: DbId,
}

// ---------------------------------------------------------------------------
// POST /auth/onboarding-login
// ---------------------------------------------------------------------------

/// Re-authenticate a client that still holds its onboarding uid but has
/// lost (or expired) its session cookie.
pub async fn onboarding_login(
    State(state): State<AppState>,
    Json(body): Json<OnboardingLoginRequest>,
) -> AppResult<impl IntoResponse> {
    let record = OnboardingRepo::find_by_id(&state.pool, body.onboarding_uid)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Onboarding",
                id: body.onboarding_uid.to_string(),
            })
        })?;

    let user_id = record.user_id.ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized(
            "Onboarding is not linked to a user".into(),
        ))
    })?;

    let token = generate_session_token(user_id, &state.config.session)
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    tracing::info!(id = %record.id, user_id, "Issued session for onboarding login");

    let headers = [(
        header::SET_COOKIE,
        session_cookie(&token, &state.config.session),
    )];
    let info = SessionInfo {
        user_id,
        expires_in: state.config.session.expiry_mins * 60,
    };

    Ok((headers, Json(DataResponse { data: info })))
}

// ---------------------------------------------------------------------------
// GET /auth/session
// ---------------------------------------------------------------------------

/// Validate the session cookie and return its subject.
pub async fn get_session(session: SessionUser) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: SessionSubject {
            user_id: session.user_id,
        },
    }))
}

// ---------------------------------------------------------------------------
// POST /auth/logout
// ---------------------------------------------------------------------------

/// Clear the session cookie.
pub async fn logout() -> impl IntoResponse {
    let headers = [(header::SET_COOKIE, clear_session_cookie())];
    (StatusCode::NO_CONTENT, headers)
}
