//! Row models and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! its database row; partial-update DTOs live in `spendflix_core` where the
//! merge semantics are defined.

pub mod onboarding;
