//! Onboarding progress data and merge semantics.
//!
//! The onboarding record's `data` column is a structured progress bag,
//! serialized camelCase to match the web client's wire format. Updates are
//! merges, never replacements: fields absent from a patch keep their stored
//! value, `startedAt` is fixed at creation, and `finishedAt` keeps the first
//! value ever written.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Step constants
// ---------------------------------------------------------------------------

/// First step of the flow, assigned at creation.
pub const FIRST_STEP: i32 = 1;

/// Sentinel step recorded when the flow is finished.
pub const FINISHED_STEP: i32 = 999;

/// Step a resuming client is sent to when the stored step is unusable.
pub const DEFAULT_RESUME_STEP: i32 = 1;

/// Maximum accepted length for the user's display name.
pub const MAX_NAME_LENGTH: usize = 200;

// ---------------------------------------------------------------------------
// Goal
// ---------------------------------------------------------------------------

/// The user's stated reason for signing up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    /// Saving toward something.
    Dream,
    /// Paying something off.
    Debt,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dream => "dream",
            Self::Debt => "debt",
        }
    }
}

// ---------------------------------------------------------------------------
// Onboarding data
// ---------------------------------------------------------------------------

/// Stored onboarding progress for one signup session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingData {
    /// Set once at creation; no patch can overwrite it.
    pub started_at: Timestamp,
    /// Current step. Non-decreasing in normal operation, but not enforced;
    /// callers are trusted.
    #[serde(default = "first_step")]
    pub step: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<Goal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_value: Option<f64>,
    /// Ordered list of connected bank identifiers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banks: Option<Vec<String>>,
    /// Waitlisted records are marked, never removed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waitlist: Option<bool>,
    /// Terminal marker; once set it survives every later update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<Timestamp>,
}

fn first_step() -> i32 {
    FIRST_STEP
}

impl OnboardingData {
    /// Creation defaults: the flow starts at step 1 with only `startedAt` set.
    pub fn new(now: Timestamp) -> Self {
        Self {
            started_at: now,
            step: FIRST_STEP,
            name: None,
            goal: None,
            goal_description: None,
            goal_value: None,
            banks: None,
            waitlist: None,
            finished_at: None,
        }
    }

    /// Merge a partial update into this data, returning the new value.
    ///
    /// Fields absent from the patch keep their stored value. `startedAt` is
    /// always carried over unchanged, and `finishedAt` keeps the first value
    /// ever written.
    pub fn merge(&self, patch: &OnboardingPatch) -> Self {
        Self {
            started_at: self.started_at,
            step: patch.step.unwrap_or(self.step),
            name: patch.name.clone().or_else(|| self.name.clone()),
            goal: patch.goal.or(self.goal),
            goal_description: patch
                .goal_description
                .clone()
                .or_else(|| self.goal_description.clone()),
            goal_value: patch.goal_value.or(self.goal_value),
            banks: patch.banks.clone().or_else(|| self.banks.clone()),
            waitlist: patch.waitlist.or(self.waitlist),
            finished_at: self.finished_at.or(patch.finished_at),
        }
    }

    /// Whether the terminal marker has been set.
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Step a resuming client should continue at.
    pub fn resume_step(&self) -> i32 {
        if self.step >= FIRST_STEP {
            self.step
        } else {
            DEFAULT_RESUME_STEP
        }
    }
}

// ---------------------------------------------------------------------------
// Patch
// ---------------------------------------------------------------------------

/// Partial update payload for onboarding progress.
///
/// Deliberately carries no `startedAt` field, so no payload can overwrite
/// the creation timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OnboardingPatch {
    pub step: Option<i32>,
    pub name: Option<String>,
    pub goal: Option<Goal>,
    pub goal_description: Option<String>,
    pub goal_value: Option<f64>,
    pub banks: Option<Vec<String>>,
    pub waitlist: Option<bool>,
    pub finished_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a patch before it is merged.
///
/// Step monotonicity is deliberately not checked here; a regressing step is
/// the caller's business to log or reject.
pub fn validate_patch(patch: &OnboardingPatch) -> Result<(), CoreError> {
    if let Some(step) = patch.step {
        if !(FIRST_STEP..=FINISHED_STEP).contains(&step) {
            return Err(CoreError::Validation(format!(
                "Invalid step {step}. Must be between {FIRST_STEP} and {FINISHED_STEP}"
            )));
        }
    }

    if let Some(ref name) = patch.name {
        if name.trim().is_empty() {
            return Err(CoreError::Validation("Name must not be empty".to_string()));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(CoreError::Validation(format!(
                "Name must be at most {MAX_NAME_LENGTH} characters"
            )));
        }
    }

    if let Some(value) = patch.goal_value {
        if !value.is_finite() || value < 0.0 {
            return Err(CoreError::Validation(
                "goalValue must be a non-negative number".to_string(),
            ));
        }
    }

    if let Some(ref banks) = patch.banks {
        if banks.iter().any(|b| b.trim().is_empty()) {
            return Err(CoreError::Validation(
                "Bank identifiers must not be empty".to_string(),
            ));
        }
    }

    Ok(())
}
