//! Authentication strategies: how each [`AuthMethod`] proves identity on a request.
//!
//! Every strategy turns a plain [`Request`] into an [`AuthorizedRequest`], acquiring or
//! refreshing a token first when the method needs one. The transport only accepts
//! [`AuthorizedRequest`]s, so a request cannot be sent unsigned once a strategy is installed.

pub mod access_token;
pub mod grant;
pub mod header;

pub use access_token::AccessTokenStrategy;
pub use grant::{ExchangeMetrics, Grant, GrantStrategy};
pub use header::HeaderStrategy;

// std
use std::path::Path;
// crates.io
use reqwest::header::AUTHORIZATION;
// self
use crate::{
	_prelude::*,
	auth::{AuthMethod, Credentials},
	error::ConfigError,
	http::ReqwestHttpClient,
	oauth::{ClientAuthMethod, TokenEndpoint},
	store::{self, FileStore, MemoryStore, TokenStore},
};

/// Boxed future returned by [`AuthStrategy`] operations.
pub type StrategyFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// What the request pipeline does when the API answers `401 Unauthorized`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnauthorizedAction {
	/// Invalidate the cached token, re-acquire, and resend once.
	Retry,
	/// Surface [`AuthError::AccessTokenRejected`](crate::error::AuthError::AccessTokenRejected).
	Fail,
	/// Return the `401` response to the caller.
	PassThrough,
}
impl UnauthorizedAction {
	/// Returns a stable label suitable for metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			UnauthorizedAction::Retry => "retry",
			UnauthorizedAction::Fail => "fail",
			UnauthorizedAction::PassThrough => "pass_through",
		}
	}
}

/// How an [`AuthorizedRequest`] was signed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signing {
	/// No strategy was installed.
	Anonymous,
	/// The request already carried an `Authorization` header before signing.
	Preauthorized,
	/// A strategy attached an `Authorization` header.
	Signed(AuthMethod),
}

/// A request that passed through the signing pipeline and may be handed to the transport.
#[derive(Debug)]
pub struct AuthorizedRequest {
	request: Request,
	signing: Signing,
}
impl AuthorizedRequest {
	/// Attaches `authorization` to `request` unless it is already authorized.
	pub fn sign(mut request: Request, method: AuthMethod, mut authorization: HeaderValue) -> Self {
		if store::is_authorized(request.headers()) {
			return Self { request, signing: Signing::Preauthorized };
		}

		authorization.set_sensitive(true);
		request.headers_mut().insert(AUTHORIZATION, authorization);

		Self { request, signing: Signing::Signed(method) }
	}

	/// Marks `request` as authorized by the header it already carries, if any.
	///
	/// Returns the request back when it carries no recognized `Authorization` header.
	pub fn preauthorized(request: Request) -> Result<Self, Request> {
		if store::is_authorized(request.headers()) {
			Ok(Self { request, signing: Signing::Preauthorized })
		} else {
			Err(request)
		}
	}

	pub(crate) fn anonymous(request: Request) -> Self {
		Self { request, signing: Signing::Anonymous }
	}

	/// How the request was signed.
	pub fn signing(&self) -> Signing {
		self.signing
	}

	/// Borrow the signed request.
	pub fn request(&self) -> &Request {
		&self.request
	}

	/// Unwraps the signed request for the transport.
	pub fn into_inner(self) -> Request {
		self.request
	}
}

/// Active algorithm for proving identity on each request.
pub trait AuthStrategy
where
	Self: Send + Sync,
{
	/// Method implemented by this strategy.
	fn method(&self) -> AuthMethod;

	/// Signs `request`, acquiring or refreshing a token first if needed.
	///
	/// A request that already carries a recognized `Authorization` header is returned
	/// untouched.
	fn prepare(&self, request: Request) -> StrategyFuture<'_, AuthorizedRequest>;

	/// Drops the cached token.
	///
	/// When `rejected` is given, the token is only dropped if it is the one that produced that
	/// `Authorization` value, so concurrent rejections cause a single re-acquisition.
	fn invalidate<'a>(&'a self, rejected: Option<&'a HeaderValue>) -> StrategyFuture<'a, ()> {
		let _ = rejected;

		Box::pin(async { Ok(()) })
	}

	/// Reaction to a `401` answer to a request this strategy signed.
	fn on_unauthorized(&self) -> UnauthorizedAction;
}

/// Collaborators needed to build a strategy from [`Credentials`].
#[derive(Clone, Debug)]
pub struct StrategyContext<'a> {
	/// API base URI; the token endpoint is resolved against it.
	pub base_uri: &'a Url,
	/// Shared reqwest client used for token exchanges.
	pub http_client: &'a ReqwestHttpClient,
	/// Client authentication method used at the token endpoint.
	pub client_auth: ClientAuthMethod,
	/// Directory for persisted OAuth tokens; `None` keeps tokens in memory.
	pub cache_dir: Option<&'a Path>,
}

/// Builds the strategy for `credentials`.
///
/// `store` overrides the token store of OAuth grant strategies; otherwise a [`FileStore`] is
/// used when [`StrategyContext::cache_dir`] is set and a [`MemoryStore`] when it is not.
pub fn from_credentials(
	credentials: Credentials,
	ctx: StrategyContext<'_>,
	store: Option<Arc<dyn TokenStore>>,
) -> Result<Arc<dyn AuthStrategy>> {
	let method = credentials.method();

	Ok(match credentials {
		Credentials::Basic { username, password } =>
			Arc::new(HeaderStrategy::basic(&username, &password)?),
		Credentials::Token { token } => Arc::new(HeaderStrategy::token(&token)?),
		Credentials::Jwt { token } => Arc::new(HeaderStrategy::jwt(&token)?),
		Credentials::AccessToken { access_token } =>
			Arc::new(AccessTokenStrategy::new(crate::auth::AccessToken::non_expiring(
				access_token.expose(),
			))),
		Credentials::ClientCredentials { client_id, client_secret } => {
			let store = resolve_store(store, &ctx, method, &client_id)?;
			let endpoint = TokenEndpoint::for_base_uri(
				ctx.base_uri,
				&client_id,
				&client_secret,
				ctx.client_auth,
				ctx.http_client.clone(),
			)?;

			Arc::new(GrantStrategy::new(Grant::ClientCredentials, endpoint, store))
		},
		Credentials::PasswordCredentials { client_id, client_secret, username, password } => {
			let store =
				resolve_store(store, &ctx, method, &format!("{client_id}:{username}"))?;
			let endpoint = TokenEndpoint::for_base_uri(
				ctx.base_uri,
				&client_id,
				&client_secret,
				ctx.client_auth,
				ctx.http_client.clone(),
			)?;

			Arc::new(GrantStrategy::new(Grant::Password { username, password }, endpoint, store))
		},
	})
}

fn resolve_store(
	store: Option<Arc<dyn TokenStore>>,
	ctx: &StrategyContext<'_>,
	method: AuthMethod,
	identity: &str,
) -> Result<Arc<dyn TokenStore>> {
	if let Some(store) = store {
		return Ok(store);
	}

	match ctx.cache_dir {
		Some(dir) => Ok(Arc::new(FileStore::for_identity(dir, method, identity)?)),
		None => Ok(Arc::new(MemoryStore::default())),
	}
}

pub(crate) fn authorization_value(value: &str) -> Result<HeaderValue, ConfigError> {
	HeaderValue::from_str(value)
		.map_err(|_| ConfigError::InvalidHeader { name: AUTHORIZATION.as_str().into() })
}
