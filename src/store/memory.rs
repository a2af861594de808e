//! In-process [`CredentialStore`] used by default and in tests.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	store::{CredentialStore, StoreFuture},
};

/// Keeps the latest refresh credential in memory; rotations are lost on restart.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<RwLock<Option<TokenSecret>>>);
impl MemoryStore {
	/// Creates a store seeded with `secret`.
	pub fn with_refresh_token(secret: impl Into<TokenSecret>) -> Self {
		Self(Arc::new(RwLock::new(Some(secret.into()))))
	}

	/// Returns the current credential without going through the async contract.
	pub fn current(&self) -> Option<TokenSecret> {
		self.0.read().clone()
	}
}
impl CredentialStore for MemoryStore {
	fn save_refresh_token<'a>(&'a self, secret: &'a TokenSecret) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			*self.0.write() = Some(secret.clone());

			Ok(())
		})
	}

	fn load_refresh_token(&self) -> StoreFuture<'_, Option<TokenSecret>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.read().clone()) })
	}
}
