//! Access-token state and redacted secret wrappers.

pub mod access;
pub mod secret;
