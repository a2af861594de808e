//! Persistence hook for rotated refresh credentials.
//!
//! The token endpoint may rotate the refresh credential on every exchange. The token manager
//! keeps the current value in memory and hands each rotation to a [`CredentialStore`] so hosts can
//! survive restarts without re-pairing.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Boxed future returned by [`CredentialStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract for refresh credentials.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Persists the latest refresh credential, replacing any previous value.
	fn save_refresh_token<'a>(&'a self, secret: &'a TokenSecret) -> StoreFuture<'a, ()>;

	/// Loads the persisted refresh credential, if any.
	fn load_refresh_token(&self) -> StoreFuture<'_, Option<TokenSecret>>;
}

/// Snapshot written by stores that serialize their contents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredentials {
	/// Latest refresh credential.
	pub refresh_token: TokenSecret,
	/// Instant the credential was persisted.
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
}
impl StoredCredentials {
	/// Stamps `secret` with the current clock.
	pub fn now(secret: &TokenSecret) -> Self {
		Self { refresh_token: secret.clone(), updated_at: OffsetDateTime::now_utc() }
	}
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
