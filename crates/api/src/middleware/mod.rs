//! Authentication middleware extractors.
//!
//! - [`auth::SessionUser`] -- Extracts the authenticated user from the
//!   `session` cookie.

pub mod auth;
