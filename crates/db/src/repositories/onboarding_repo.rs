//! Repository for the `onboarding` table.

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use spendflix_core::onboarding::OnboardingData;
use spendflix_core::types::DbId;

use crate::models::onboarding::Onboarding;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, user_id, data, created_at, updated_at";

/// Provides CRUD operations for onboarding records.
///
/// Updates persist pre-merged data computed by the caller; there is no
/// version token, so two concurrent read-merge-write sequences for the same
/// id are last-write-wins.
pub struct OnboardingRepo;

impl OnboardingRepo {
    /// Insert a new record, returning the created row.
    pub async fn create(
        pool: &PgPool,
        email: Option<&str>,
        data: &OnboardingData,
    ) -> Result<Onboarding, sqlx::Error> {
        let query = format!(
            "INSERT INTO onboarding (email, data) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Onboarding>(&query)
            .bind(email)
            .bind(Json(data))
            .fetch_one(pool)
            .await
    }

    /// Find a record by its uid.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Onboarding>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM onboarding WHERE id = $1");
        sqlx::query_as::<_, Onboarding>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the active record for an email address.
    ///
    /// The uid and email lookup paths are independent; callers must not
    /// assume both resolve the same record.
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<Onboarding>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM onboarding WHERE email = $1");
        sqlx::query_as::<_, Onboarding>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Persist merged data for a record, refreshing `updated_at`.
    ///
    /// `user_id` and `email` are only written when provided; an existing
    /// link is never cleared through this path.
    pub async fn update_data(
        pool: &PgPool,
        id: Uuid,
        data: &OnboardingData,
        user_id: Option<DbId>,
        email: Option<&str>,
    ) -> Result<Option<Onboarding>, sqlx::Error> {
        let query = format!(
            "UPDATE onboarding \
             SET data = $2, \
                 user_id = COALESCE($3, user_id), \
                 email = COALESCE($4, email), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Onboarding>(&query)
            .bind(id)
            .bind(Json(data))
            .bind(user_id)
            .bind(email)
            .fetch_optional(pool)
            .await
    }
}
