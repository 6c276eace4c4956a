//! Token store contract and built-in backends.
//!
//! A store holds at most one [`AccessToken`] for the session that owns it. Only the owning
//! strategy writes to it; stores are never shared between concurrently authenticated sessions.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::AccessToken};

/// Boxed future returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// `Authorization` schemes recognized as already-authorized requests.
pub const AUTHORIZATION_SCHEMES: [&str; 3] = ["Basic", "Bearer", "Token"];

/// Storage contract for the token held by a single session.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Returns the held token, if any.
	fn fetch(&self) -> StoreFuture<'_, Option<AccessToken>>;

	/// Replaces the held token.
	fn save(&self, token: AccessToken) -> StoreFuture<'_, ()>;

	/// Drops the held token.
	fn clear(&self) -> StoreFuture<'_, ()>;

	/// Returns `true` iff the headers already carry a recognized `Authorization` header.
	fn is_authorized(&self, headers: &HeaderMap) -> bool {
		is_authorized(headers)
	}
}

/// Returns `true` iff `headers` carry an `Authorization` header using one of
/// [`AUTHORIZATION_SCHEMES`] with a non-empty credential.
pub fn is_authorized(headers: &HeaderMap) -> bool {
	headers
		.get(header::AUTHORIZATION)
		.and_then(|value| value.to_str().ok())
		.and_then(|value| value.split_once(' '))
		.is_some_and(|(scheme, credential)| {
			!credential.trim().is_empty()
				&& AUTHORIZATION_SCHEMES.iter().any(|known| known.eq_ignore_ascii_case(scheme))
		})
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failure surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn headers(authorization: &str) -> HeaderMap {
		let mut headers = HeaderMap::new();

		headers.insert(
			header::AUTHORIZATION,
			HeaderValue::from_str(authorization).expect("Fixture header should be valid."),
		);

		headers
	}

	#[test]
	fn recognizes_supported_schemes_only() {
		assert!(is_authorized(&headers("Basic dXNlcjpwYXNz")));
		assert!(is_authorized(&headers("bearer abc")));
		assert!(is_authorized(&headers("Token abc")));
		assert!(!is_authorized(&headers("Digest username=x")));
		assert!(!is_authorized(&headers("Bearer ")));
		assert!(!is_authorized(&headers("Bearer")));
		assert!(!is_authorized(&HeaderMap::new()));
	}

	#[test]
	fn store_error_converts_into_client_error_with_source() {
		let store_error = StoreError::Backend { message: "disk full".into() };
		let err: Error = store_error.clone().into();

		assert!(matches!(err, Error::Storage(_)));

		let source = StdError::source(&err).expect("Storage errors should expose their source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}
}
