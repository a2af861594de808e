//! Observability helpers for token refreshes and resource calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `myfox_client.call` with the `kind` and
//!   `action` fields, plus the debug events gated by [`ClientConfig::debug`] and
//!   [`ClientConfig::debug_payloads`].
//! - Enable `metrics` to increment the `myfox_client_call_total` counter for every
//!   attempt/success/failure, labeled by `kind` + `outcome`.
//!
//! [`ClientConfig::debug`]: crate::config::ClientConfig::debug
//! [`ClientConfig::debug_payloads`]: crate::config::ClientConfig::debug_payloads

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;
pub(crate) use tracing::{debug_event, error_event, warn_event};
#[cfg(not(feature = "tracing"))]
pub(crate) use tracing::consume_fields;

// self
use crate::_prelude::*;

/// Call kinds observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// Refresh-token exchange against the token endpoint.
	TokenRefresh,
	/// Authenticated call against a resource endpoint.
	Resource,
}
impl CallKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::TokenRefresh => "token_refresh",
			CallKind::Resource => "resource",
		}
	}
}
impl Display for CallKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a client helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}

	/// Maps a result onto its terminal outcome.
	pub fn of<T, E>(result: &Result<T, E>) -> Self {
		match result {
			Ok(_) => CallOutcome::Success,
			Err(_) => CallOutcome::Failure,
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
