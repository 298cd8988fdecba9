//! Session-resume endpoint.
//!
//! The web client calls this on page load with the onboarding identifier it
//! kept in local storage; session-cookie presence is read from the request
//! itself. The decision chain lives in `spendflix_core::resume` -- this
//! module supplies the store-backed gateway and translates the outcome into
//! a navigation target, setting a fresh cookie when the recovery path
//! re-authenticated.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use spendflix_core::error::CoreError;
use spendflix_core::resume::{
    self, ClientHints, OnboardingGateway, OnboardingSnapshot, ResumeOutcome,
};
use spendflix_core::types::DbId;
use spendflix_db::repositories::OnboardingRepo;

use crate::auth::session::{generate_session_token, session_cookie, session_cookie_value, SessionConfig};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /session/resume`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRequest {
    /// The locally stored onboarding identifier, when the client has one.
    #[serde(default)]
    pub onboarding_uid: Option<Uuid>,
}

/// Navigation outcome returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeResponse {
    /// `"resume"` or `"login"`.
    pub outcome: &'static str,
    pub redirect_to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// Store-backed gateway for the resume protocol.
///
/// A token minted by a successful re-authentication is parked in
/// `issued_token` so the handler can attach the cookie afterwards.
struct PgGateway<'a> {
    pool: &'a sqlx::PgPool,
    session: &'a SessionConfig,
    issued_token: Mutex<Option<String>>,
}

#[async_trait]
impl OnboardingGateway for PgGateway<'_> {
    async fn fetch(&self, uid: Uuid) -> Result<OnboardingSnapshot, CoreError> {
        let record = OnboardingRepo::find_by_id(self.pool, uid)
            .await
            .map_err(|e| {
                tracing::error!(%uid, error = %e, "Failed to load onboarding");
                CoreError::Internal(e.to_string())
            })?
            .ok_or_else(|| CoreError::NotFound {
                entity: "Onboarding",
                id: uid.to_string(),
            })?;

        Ok(OnboardingSnapshot {
            data: record.data.0,
            user_id: record.user_id,
        })
    }

    async fn reauthenticate(&self, uid: Uuid) -> Result<OnboardingSnapshot, CoreError> {
        let snapshot = self.fetch(uid).await?;

        let user_id = snapshot.user_id.ok_or_else(|| {
            CoreError::Unauthorized("Onboarding is not linked to a user".into())
        })?;

        let token = generate_session_token(user_id, self.session)
            .map_err(|e| CoreError::Internal(e.to_string()))?;

        *self
            .issued_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(token);

        tracing::info!(%uid, user_id, "Re-authenticated onboarding session");
        Ok(snapshot)
    }
}

// ---------------------------------------------------------------------------
// POST /session/resume
// ---------------------------------------------------------------------------

/// Run the resume protocol for a returning client.
pub async fn resume_session(
    State(state): State<AppState>,
    request_headers: HeaderMap,
    Json(body): Json<ResumeRequest>,
) -> AppResult<impl IntoResponse> {
    // Presence only; validity is the recovery path's problem.
    let cookie_present = request_headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(session_cookie_value)
        .is_some();

    let hints = ClientHints {
        session_cookie_present: cookie_present,
        onboarding_uid: body.onboarding_uid,
    };

    let gateway = PgGateway {
        pool: &state.pool,
        session: &state.config.session,
        issued_token: Mutex::new(None),
    };

    let outcome = resume::resume(&gateway, &hints).await;

    let issued_token = gateway
        .issued_token
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner);

    let mut response_headers = HeaderMap::new();
    if let ResumeOutcome::Resume {
        reauthenticated: true,
        ..
    } = outcome
    {
        if let Some(token) = issued_token {
            let cookie = session_cookie(&token, &state.config.session);
            let value = HeaderValue::from_str(&cookie)
                .map_err(|e| AppError::InternalError(e.to_string()))?;
            response_headers.insert(header::SET_COOKIE, value);
        }
    }

    let response = match outcome {
        ResumeOutcome::Resume { data, user_id, .. } => ResumeResponse {
            outcome: "resume",
            redirect_to: format!("/onboarding/step{}", data.resume_step()),
            step: Some(data.resume_step()),
            user_id,
        },
        ResumeOutcome::Login => ResumeResponse {
            outcome: "login",
            redirect_to: "/login".to_string(),
            step: None,
            user_id: None,
        },
    };

    tracing::info!(
        outcome = response.outcome,
        redirect = %response.redirect_to,
        "Resume protocol completed"
    );

    Ok((response_headers, Json(DataResponse { data: response })))
}
