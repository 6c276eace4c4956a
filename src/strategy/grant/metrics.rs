// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::oauth::GrantType;

/// Token endpoint activity of one [`GrantStrategy`](super::GrantStrategy).
///
/// Every call counts once under its grant; calls that fail also count in
/// [`failures`](Self::failures).
#[derive(Debug, Default)]
pub struct ExchangeMetrics {
	credential_grants: AtomicU64,
	refresh_grants: AtomicU64,
	failures: AtomicU64,
	refresh_fallbacks: AtomicU64,
	invalidations: AtomicU64,
}
impl ExchangeMetrics {
	/// Token endpoint calls of any grant.
	pub fn exchanges(&self) -> u64 {
		self.credential_grants() + self.refresh_grants()
	}

	/// `client_credentials` and `password` calls.
	pub fn credential_grants(&self) -> u64 {
		self.credential_grants.load(Ordering::Relaxed)
	}

	/// `refresh_token` calls.
	pub fn refresh_grants(&self) -> u64 {
		self.refresh_grants.load(Ordering::Relaxed)
	}

	/// Calls that ended in an error.
	pub fn failures(&self) -> u64 {
		self.failures.load(Ordering::Relaxed)
	}

	/// Refresh tokens rejected with `invalid_grant` and replaced by a credentials exchange.
	pub fn refresh_fallbacks(&self) -> u64 {
		self.refresh_fallbacks.load(Ordering::Relaxed)
	}

	/// Cached tokens given up after the API rejected them.
	pub fn invalidations(&self) -> u64 {
		self.invalidations.load(Ordering::Relaxed)
	}

	pub(crate) fn record_exchange(&self, grant: GrantType, succeeded: bool) {
		let counter = match grant {
			GrantType::RefreshToken => &self.refresh_grants,
			GrantType::ClientCredentials | GrantType::Password => &self.credential_grants,
		};

		counter.fetch_add(1, Ordering::Relaxed);

		if !succeeded {
			self.failures.fetch_add(1, Ordering::Relaxed);
		}
	}

	pub(crate) fn record_refresh_fallback(&self) {
		self.refresh_fallbacks.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_invalidation(&self) {
		self.invalidations.fetch_add(1, Ordering::Relaxed);
	}
}
