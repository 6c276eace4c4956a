//! OAuth 2.0 grant strategies (client credentials and resource owner password).
//!
//! A [`GrantStrategy`] caches its token in a [`TokenStore`] and reuses it until it is within the
//! early-refresh leeway of its expiry. Acquisition is a singleflight critical section: callers
//! that observe a stale or missing token queue behind one in-flight exchange and then reuse its
//! result. When the stale token carries a refresh token, the `refresh_token` grant is tried
//! first; an `invalid_grant` answer falls back to exactly one fresh credentials exchange.

mod metrics;

pub use metrics::ExchangeMetrics;

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, AuthMethod, TokenSecret},
	error::AuthError,
	oauth::{GrantType, TokenEndpoint},
	strategy::{self, AuthStrategy, AuthorizedRequest, StrategyFuture, UnauthorizedAction},
	store::TokenStore,
};

/// Grant used to obtain fresh tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Grant {
	/// `grant_type=client_credentials`.
	ClientCredentials,
	/// `grant_type=password` for the given resource owner.
	Password {
		/// Resource owner login.
		username: String,
		/// Resource owner password.
		password: TokenSecret,
	},
}
impl Grant {
	/// Method this grant authenticates with.
	pub fn method(&self) -> AuthMethod {
		match self {
			Grant::ClientCredentials => AuthMethod::OAuthClientCredentials,
			Grant::Password { .. } => AuthMethod::OAuthPasswordCredentials,
		}
	}
}

/// Token-caching strategy backed by the token endpoint.
pub struct GrantStrategy {
	grant: Grant,
	endpoint: TokenEndpoint,
	store: Arc<dyn TokenStore>,
	leeway: Duration,
	guard: AsyncMutex<()>,
	metrics: Arc<ExchangeMetrics>,
}
impl GrantStrategy {
	/// Default early-refresh window.
	pub const DEFAULT_LEEWAY: Duration = Duration::seconds(30);

	/// Creates a strategy for `grant` that keeps its token in `store`.
	pub fn new(grant: Grant, endpoint: TokenEndpoint, store: Arc<dyn TokenStore>) -> Self {
		Self {
			grant,
			endpoint,
			store,
			leeway: Self::DEFAULT_LEEWAY,
			guard: AsyncMutex::new(()),
			metrics: Default::default(),
		}
	}

	/// Overrides the early-refresh window; negative values are treated as zero.
	///
	/// Tokens living less than twice the window are refreshed at half of their lifetime instead.
	pub fn with_leeway(mut self, leeway: Duration) -> Self {
		self.leeway = if leeway.is_negative() { Duration::ZERO } else { leeway };

		self
	}

	/// Grant used for fresh exchanges.
	pub fn grant(&self) -> &Grant {
		&self.grant
	}

	/// Token endpoint this strategy talks to.
	pub fn endpoint(&self) -> &TokenEndpoint {
		&self.endpoint
	}

	/// Store holding the cached token.
	pub fn store(&self) -> &Arc<dyn TokenStore> {
		&self.store
	}

	/// Counters for token endpoint calls made by this strategy.
	pub fn metrics(&self) -> Arc<ExchangeMetrics> {
		Arc::clone(&self.metrics)
	}

	/// Returns a token that is valid beyond the leeway, exchanging one if needed.
	pub async fn access_token(&self) -> Result<AccessToken> {
		if let Some(token) = self.fresh(self.store.fetch().await?) {
			return Ok(token);
		}

		let _singleflight = self.guard.lock().await;
		let current = self.store.fetch().await?;

		if let Some(token) = self.fresh(current.clone()) {
			return Ok(token);
		}

		let token = self.exchange(current).await?;

		self.store.save(token.clone()).await?;

		Ok(token)
	}

	fn fresh(&self, token: Option<AccessToken>) -> Option<AccessToken> {
		let now = OffsetDateTime::now_utc();

		token.filter(|token| !token.expires_within(now, self.leeway_for(token)))
	}

	/// Early-refresh window for `token`, capped at half of its lifetime.
	fn leeway_for(&self, token: &AccessToken) -> Duration {
		match token.lifetime() {
			Some(lifetime) => self.leeway.min(lifetime / 2_i32).max(Duration::ZERO),
			None => self.leeway,
		}
	}

	async fn exchange(&self, current: Option<AccessToken>) -> Result<AccessToken> {
		if let Some(refresh_token) = current.and_then(|token| token.refresh_token) {
			let refreshed =
				self.tracked(GrantType::RefreshToken, self.endpoint.refresh(&refresh_token)).await;

			match refreshed {
				Err(Error::Authentication(AuthError::InvalidGrant { .. })) => {
					self.metrics.record_refresh_fallback();
					self.store.clear().await?;
				},
				result => return result,
			}
		}

		match &self.grant {
			Grant::ClientCredentials =>
				self.tracked(GrantType::ClientCredentials, self.endpoint.client_credentials()).await,
			Grant::Password { username, password } =>
				self.tracked(GrantType::Password, self.endpoint.password(username, password)).await,
		}
	}

	async fn tracked<F>(&self, grant: GrantType, call: F) -> Result<AccessToken>
	where
		F: Future<Output = Result<AccessToken>>,
	{
		let result = call.await;

		self.metrics.record_exchange(grant, result.is_ok());

		result
	}
}
impl AuthStrategy for GrantStrategy {
	fn method(&self) -> AuthMethod {
		self.grant.method()
	}

	fn prepare(&self, request: Request) -> StrategyFuture<'_, AuthorizedRequest> {
		Box::pin(async move {
			let request = match AuthorizedRequest::preauthorized(request) {
				Ok(authorized) => return Ok(authorized),
				Err(request) => request,
			};
			let token = self.access_token().await?;
			let value = strategy::authorization_value(&token.bearer())?;

			Ok(AuthorizedRequest::sign(request, self.method(), value))
		})
	}

	fn invalidate<'a>(&'a self, rejected: Option<&'a HeaderValue>) -> StrategyFuture<'a, ()> {
		Box::pin(async move {
			let _singleflight = self.guard.lock().await;
			let Some(mut current) = self.store.fetch().await? else {
				return Ok(());
			};

			if rejected.is_some_and(|value| value.as_bytes() != current.bearer().as_bytes()) {
				return Ok(());
			}

			self.metrics.record_invalidation();

			if current.refresh_token.is_none() {
				return Ok(self.store.clear().await?);
			}

			// Keep the refresh token so the next exchange can use it.
			current.expires_at = Some(OffsetDateTime::now_utc());

			Ok(self.store.save(current).await?)
		})
	}

	fn on_unauthorized(&self) -> UnauthorizedAction {
		UnauthorizedAction::Retry
	}
}
impl Debug for GrantStrategy {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GrantStrategy")
			.field("grant", &self.grant)
			.field("endpoint", &self.endpoint)
			.field("leeway", &self.leeway)
			.field("metrics", &self.metrics)
			.finish()
	}
}
