//! Request handlers.
//!
//! Handlers delegate to repositories in `spendflix_db`, apply domain rules
//! from `spendflix_core`, and map errors via [`crate::error::AppError`].

pub mod auth;
pub mod onboarding;
pub mod resume;
