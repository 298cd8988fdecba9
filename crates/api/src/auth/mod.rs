//! Session-token generation/validation and cookie helpers.

pub mod session;
