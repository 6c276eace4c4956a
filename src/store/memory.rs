//! In-process [`TokenStore`]; the default for every session.

// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	store::{StoreFuture, TokenStore},
};

/// Thread-safe store keeping the session token in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<RwLock<Option<AccessToken>>>);
impl MemoryStore {
	/// Creates a store seeded with `token`.
	pub fn with_token(token: AccessToken) -> Self {
		Self(Arc::new(RwLock::new(Some(token))))
	}

	/// Synchronous snapshot of the held token.
	pub fn peek(&self) -> Option<AccessToken> {
		self.0.read().clone()
	}
}
impl TokenStore for MemoryStore {
	fn fetch(&self) -> StoreFuture<'_, Option<AccessToken>> {
		let token = self.0.read().clone();

		Box::pin(async move { Ok(token) })
	}

	fn save(&self, token: AccessToken) -> StoreFuture<'_, ()> {
		*self.0.write() = Some(token);

		Box::pin(async { Ok(()) })
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		self.0.write().take();

		Box::pin(async { Ok(()) })
	}
}
