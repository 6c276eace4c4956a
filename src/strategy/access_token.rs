//! Strategy for a pre-issued OAuth 2.0 access token.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, AuthMethod},
	error::AuthError,
	strategy::{self, AuthStrategy, AuthorizedRequest, StrategyFuture, UnauthorizedAction},
};

/// Attaches `Bearer <token>` to every request.
///
/// The token cannot be refreshed: an expired token fails signing with
/// [`AuthError::AccessTokenExpired`] and a `401` from the API surfaces as
/// [`AuthError::AccessTokenRejected`].
#[derive(Clone, Debug)]
pub struct AccessTokenStrategy {
	token: AccessToken,
}
impl AccessTokenStrategy {
	/// Wraps a pre-issued token.
	pub fn new(token: AccessToken) -> Self {
		Self { token }
	}

	/// The wrapped token.
	pub fn token(&self) -> &AccessToken {
		&self.token
	}
}
impl AuthStrategy for AccessTokenStrategy {
	fn method(&self) -> AuthMethod {
		AuthMethod::OAuthAccessToken
	}

	fn prepare(&self, request: Request) -> StrategyFuture<'_, AuthorizedRequest> {
		Box::pin(async move {
			let request = match AuthorizedRequest::preauthorized(request) {
				Ok(authorized) => return Ok(authorized),
				Err(request) => request,
			};

			if self.token.is_expired() {
				return Err(AuthError::AccessTokenExpired.into());
			}

			let value = strategy::authorization_value(&self.token.bearer())?;

			Ok(AuthorizedRequest::sign(request, self.method(), value))
		})
	}

	fn on_unauthorized(&self) -> UnauthorizedAction {
		UnauthorizedAction::Fail
	}
}
