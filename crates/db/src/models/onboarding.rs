//! Onboarding record row model.

use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use spendflix_core::onboarding::OnboardingData;
use spendflix_core::types::{DbId, Timestamp};

/// A row from the `onboarding` table: one active record per signup session.
///
/// `id` is the opaque identifier handed to the client at creation; `email`
/// is a natural key for some lookup paths and unique when present;
/// `user_id` is populated once the record is linked to an authenticated
/// account. Records are never hard-deleted in this flow.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Onboarding {
    pub id: Uuid,
    pub email: Option<String>,
    pub user_id: Option<DbId>,
    /// Progress bag; see [`OnboardingData`] for the merge rules.
    pub data: Json<OnboardingData>,
    pub created_at: Timestamp,
    /// Refreshed on every mutation.
    pub updated_at: Timestamp,
}
