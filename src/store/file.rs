//! File-backed [`CredentialStore`] for hosts that must survive restarts.

// std
use std::{
	fs::{self, File},
	io::{self, ErrorKind, Write},
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	store::{CredentialStore, StoreError, StoreFuture, StoredCredentials},
};

/// Persists the latest refresh credential to a JSON file after each rotation.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<Option<StoredCredentials>>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Path of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Returns the loaded snapshot, including when it was written.
	pub fn snapshot(&self) -> Option<StoredCredentials> {
		self.inner.read().clone()
	}

	fn load_snapshot(path: &Path) -> Result<Option<StoredCredentials>, StoreError> {
		let bytes = match fs::read(path) {
			Ok(bytes) => bytes,
			Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
			Err(e) => return Err(backend("read", path, e)),
		};

		if bytes.iter().all(u8::is_ascii_whitespace) {
			return Ok(None);
		}

		serde_json::from_slice(&bytes).map(Some).map_err(|e| StoreError::Serialization {
			message: format!("Snapshot {} is not valid JSON: {e}", path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		match path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
			Some(parent) => fs::create_dir_all(parent).map_err(|e| backend("create", parent, e)),
			None => Ok(()),
		}
	}

	// Stages into a sibling `.tmp` file, then renames it over the snapshot.
	fn persist(&self, snapshot: &StoredCredentials) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized =
			serde_json::to_vec_pretty(snapshot).map_err(|e| StoreError::Serialization {
				message: format!("Credential snapshot cannot be serialized: {e}"),
			})?;
		let staging = self.path.with_extension("tmp");
		let mut file = File::create(&staging).map_err(|e| backend("create", &staging, e))?;

		file.write_all(&serialized).map_err(|e| backend("write", &staging, e))?;
		file.sync_all().map_err(|e| backend("sync", &staging, e))?;
		drop(file);

		fs::rename(&staging, &self.path).map_err(|e| backend("replace", &self.path, e))
	}
}
impl CredentialStore for FileStore {
	fn save_refresh_token<'a>(&'a self, secret: &'a TokenSecret) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			let snapshot = StoredCredentials::now(secret);
			let mut guard = self.inner.write();

			self.persist(&snapshot)?;
			*guard = Some(snapshot);

			Ok(())
		})
	}

	fn load_refresh_token(&self) -> StoreFuture<'_, Option<TokenSecret>> {
		Box::pin(async move {
			Ok(self.inner.read().as_ref().map(|snapshot| snapshot.refresh_token.clone()))
		})
	}
}

fn backend(action: &str, path: &Path, e: io::Error) -> StoreError {
	StoreError::Backend { message: format!("Failed to {action} {}: {e}", path.display()) }
}
