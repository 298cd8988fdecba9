//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods that
//! accept `&PgPool` as the first argument.

pub mod onboarding_repo;

pub use onboarding_repo::OnboardingRepo;
