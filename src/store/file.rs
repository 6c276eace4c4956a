//! File-backed [`TokenStore`] so OAuth tokens survive process restarts when explicitly wired.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, AuthMethod},
	store::{StoreError, StoreFuture, TokenStore},
};

/// Persists the session token to a JSON file after each mutation.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<Option<AccessToken>>>,
}
impl FileStore {
	/// Opens (or creates) a store at `path`, eagerly loading an existing token.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		ensure_parent_exists(&path)?;

		let token = load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(token)) })
	}

	/// Opens the store used for `method` + `identity` under `cache_dir`.
	///
	/// The file name embeds a SHA-256 fingerprint of the identity so client identifiers and
	/// usernames never appear on disk in clear text.
	pub fn for_identity(
		cache_dir: &Path,
		method: AuthMethod,
		identity: &str,
	) -> Result<Self, StoreError> {
		Self::open(cache_dir.join(format!("{method}-{}.json", fingerprint(identity))))
	}

	/// Location of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn persist_locked(&self, token: Option<&AccessToken>) -> Result<(), StoreError> {
		ensure_parent_exists(&self.path)?;

		let Some(token) = token else {
			return match fs::remove_file(&self.path) {
				Ok(()) => Ok(()),
				Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
				Err(e) => Err(StoreError::Backend {
					message: format!("Failed to remove {}: {e}", self.path.display()),
				}),
			};
		};
		let serialized = serde_json::to_vec_pretty(token).map_err(|e| {
			StoreError::Serialization { message: format!("Failed to serialize token: {e}") }
		})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl TokenStore for FileStore {
	fn fetch(&self) -> StoreFuture<'_, Option<AccessToken>> {
		Box::pin(async move { Ok(self.inner.read().clone()) })
	}

	fn save(&self, token: AccessToken) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			*guard = Some(token);

			self.persist_locked(guard.as_ref())
		})
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			*guard = None;

			self.persist_locked(None)
		})
	}
}

fn load_snapshot(path: &Path) -> Result<Option<AccessToken>, StoreError> {
	if !path.exists() {
		return Ok(None);
	}

	let bytes = fs::read(path).map_err(|e| StoreError::Backend {
		message: format!("Failed to read {}: {e}", path.display()),
	})?;

	if bytes.is_empty() {
		return Ok(None);
	}

	serde_json::from_slice(&bytes).map(Some).map_err(|e| StoreError::Serialization {
		message: format!("Failed to parse {}: {e}", path.display()),
	})
}

fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
	if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
		fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
			message: format!("Failed to create store directory {}: {e}", parent.display()),
		})?;
	}

	Ok(())
}

fn fingerprint(identity: &str) -> String {
	URL_SAFE_NO_PAD.encode(Sha256::digest(identity.as_bytes()))
}
