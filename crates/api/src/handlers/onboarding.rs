//! Handlers for onboarding records.
//!
//! The endpoints here are the sole write path for onboarding progress.
//! Updates are merges: the stored data is read, combined with the patch,
//! and written back whole. There is no concurrency token; concurrent
//! patches to the same record are last-write-wins.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use spendflix_core::error::CoreError;
use spendflix_core::onboarding::{self, OnboardingData, OnboardingPatch};
use spendflix_core::types::DbId;
use spendflix_db::models::onboarding::Onboarding;
use spendflix_db::repositories::OnboardingRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /onboarding`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct StartOnboarding {
    /// Natural key for dedup: at most one active record may hold an email.
    #[validate(email)]
    pub email: Option<String>,
}

/// Request body for `PATCH /onboarding/{id}`.
///
/// Progress fields are flattened at the top level; `userId` and `email`
/// ride alongside to link the record as later steps complete.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOnboarding {
    #[serde(flatten)]
    pub patch: OnboardingPatch,
    #[serde(default)]
    pub user_id: Option<DbId>,
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a record or produce a typed 404.
async fn find_record(pool: &sqlx::PgPool, id: Uuid) -> AppResult<Onboarding> {
    OnboardingRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Onboarding",
                id: id.to_string(),
            })
        })
}

/// RFC 7231 date for the `Last-Modified` header.
fn last_modified(record: &Onboarding) -> String {
    record
        .updated_at
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

// ---------------------------------------------------------------------------
// POST /onboarding
// ---------------------------------------------------------------------------

/// Begin onboarding.
///
/// When an email is supplied and an active record already holds it, that
/// record is returned unchanged (200). Otherwise a fresh record is created
/// (201) with the flow's creation defaults.
pub async fn start_onboarding(
    State(state): State<AppState>,
    Json(body): Json<StartOnboarding>,
) -> AppResult<impl IntoResponse> {
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if let Some(ref email) = body.email {
        if let Some(existing) = OnboardingRepo::find_by_email(&state.pool, email).await? {
            tracing::debug!(id = %existing.id, "Returning existing onboarding for email");
            state.onboarding_cache.insert(existing.id, existing.clone());
            return Ok((StatusCode::OK, Json(DataResponse { data: existing })));
        }
    }

    let data = OnboardingData::new(chrono::Utc::now());
    let record = OnboardingRepo::create(&state.pool, body.email.as_deref(), &data).await?;

    tracing::info!(id = %record.id, "Onboarding started");
    state.onboarding_cache.insert(record.id, record.clone());

    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

// ---------------------------------------------------------------------------
// GET /onboarding/{id}
// ---------------------------------------------------------------------------

/// Fetch an onboarding record by its uid.
///
/// Served from the read cache when possible; the response carries a
/// `Last-Modified` header derived from `updated_at` for client caching.
pub async fn get_onboarding(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let record = match state.onboarding_cache.get(&id) {
        Some(record) => record,
        None => {
            let record = find_record(&state.pool, id).await?;
            state.onboarding_cache.insert(id, record.clone());
            record
        }
    };

    tracing::debug!(%id, step = record.data.0.step, "Fetched onboarding");

    let headers = [(header::LAST_MODIFIED, last_modified(&record))];
    Ok((headers, Json(DataResponse { data: record })))
}

// ---------------------------------------------------------------------------
// PATCH /onboarding/{id}
// ---------------------------------------------------------------------------

/// Merge a partial update into an onboarding record.
///
/// Fields absent from the payload keep their stored value; `startedAt` is
/// never touched and a set `finishedAt` is never cleared. Step transitions
/// are not enforced -- callers are trusted -- but a regression is logged.
pub async fn update_onboarding(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateOnboarding>,
) -> AppResult<impl IntoResponse> {
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    onboarding::validate_patch(&body.patch)?;

    // Fresh read: the cache may lag a concurrent writer.
    let current = find_record(&state.pool, id).await?;

    if let Some(step) = body.patch.step {
        if step < current.data.0.step {
            tracing::warn!(%id, from = current.data.0.step, to = step, "Step moved backwards");
        }
    }

    let merged = current.data.0.merge(&body.patch);

    let updated = OnboardingRepo::update_data(
        &state.pool,
        id,
        &merged,
        body.user_id,
        body.email.as_deref(),
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Onboarding",
            id: id.to_string(),
        })
    })?;

    tracing::info!(%id, step = merged.step, "Onboarding updated");
    state.onboarding_cache.insert(id, updated.clone());

    Ok(Json(DataResponse { data: updated }))
}
