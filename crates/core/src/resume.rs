//! Session-resume decision logic for returning visitors.
//!
//! A returning client holds two hints: a locally stored onboarding
//! identifier and a session cookie whose presence (not validity) gates the
//! optimistic path. The protocol is a two-tier fallback chain: optimistic
//! record fetch, then exactly one re-authentication attempt, then login.
//! Store access is injected through [`OnboardingGateway`] so the chain is
//! testable without I/O.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CoreError;
use crate::onboarding::OnboardingData;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Client-held hints read before any store round trip.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientHints {
    /// Whether a session cookie was present on the request. Presence only;
    /// the cookie is never parsed for claims here.
    pub session_cookie_present: bool,
    /// The locally stored onboarding identifier, when the client still has
    /// one.
    pub onboarding_uid: Option<Uuid>,
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

/// Why the optimistic resume path was abandoned.
#[derive(Debug, thiserror::Error)]
pub enum ResumeFailure {
    /// The session cookie or local identifier was missing. Carries the
    /// attempted uid (when known) for diagnostics and recovery.
    #[error("Invalid authentication (uid: {uid:?})")]
    InvalidAuthentication { uid: Option<Uuid> },

    /// The record fetch failed after both hints were present.
    #[error("Failed to fetch onboarding {uid}: {source}")]
    Fetch { uid: Uuid, source: CoreError },
}

impl ResumeFailure {
    /// The uid available to the recovery attempt, if any.
    fn recovery_uid(&self) -> Option<Uuid> {
        match self {
            Self::InvalidAuthentication { uid } => *uid,
            Self::Fetch { uid, .. } => Some(*uid),
        }
    }
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// A view of the onboarding record as the protocol needs it.
#[derive(Debug, Clone)]
pub struct OnboardingSnapshot {
    pub data: OnboardingData,
    pub user_id: Option<DbId>,
}

/// Store-facing operations the protocol depends on.
#[async_trait]
pub trait OnboardingGateway {
    /// Fetch the onboarding record for `uid`.
    async fn fetch(&self, uid: Uuid) -> Result<OnboardingSnapshot, CoreError>;

    /// Re-authenticate using `uid` alone.
    ///
    /// Succeeds only for records already linked to a user; implementations
    /// issue a fresh session as a side effect.
    async fn reauthenticate(&self, uid: Uuid) -> Result<OnboardingSnapshot, CoreError>;
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Where the client should be sent after the protocol runs.
#[derive(Debug, Clone)]
pub enum ResumeOutcome {
    /// Continue the flow at the stored step.
    Resume {
        data: OnboardingData,
        user_id: Option<DbId>,
        /// True when the recovery path issued a fresh session.
        reauthenticated: bool,
    },
    /// Every recovery path is exhausted.
    Login,
}

impl ResumeOutcome {
    /// Redirect target for the client.
    pub fn redirect_path(&self) -> String {
        match self {
            Self::Resume { data, .. } => format!("/onboarding/step{}", data.resume_step()),
            Self::Login => "/login".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Protocol
// ---------------------------------------------------------------------------

/// Run the resume protocol against the given hints.
///
/// The optimistic path requires both the session cookie and the local uid;
/// any failure falls through to the recovery step, which makes exactly one
/// re-authentication attempt before giving up. No retries, no backoff.
pub async fn resume<G: OnboardingGateway>(gateway: &G, hints: &ClientHints) -> ResumeOutcome {
    if !hints.session_cookie_present {
        let failure = ResumeFailure::InvalidAuthentication {
            uid: hints.onboarding_uid,
        };
        return recover(gateway, failure).await;
    }

    let Some(uid) = hints.onboarding_uid else {
        return recover(gateway, ResumeFailure::InvalidAuthentication { uid: None }).await;
    };

    match gateway.fetch(uid).await {
        Ok(snapshot) => ResumeOutcome::Resume {
            data: snapshot.data,
            user_id: snapshot.user_id,
            reauthenticated: false,
        },
        Err(source) => recover(gateway, ResumeFailure::Fetch { uid, source }).await,
    }
}

/// Recovery step: one re-authentication attempt with the uid alone, then
/// login.
async fn recover<G: OnboardingGateway>(gateway: &G, failure: ResumeFailure) -> ResumeOutcome {
    tracing::warn!(error = %failure, "Resume failed, attempting recovery");

    let Some(uid) = failure.recovery_uid() else {
        return ResumeOutcome::Login;
    };

    match gateway.reauthenticate(uid).await {
        Ok(snapshot) => ResumeOutcome::Resume {
            data: snapshot.data,
            user_id: snapshot.user_id,
            reauthenticated: true,
        },
        Err(error) => {
            tracing::warn!(%uid, %error, "Re-authentication failed, sending client to login");
            ResumeOutcome::Login
        }
    }
}
