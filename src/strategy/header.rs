//! Stateless strategies that attach a fixed `Authorization` header.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
// self
use crate::{
	_prelude::*,
	auth::{AuthMethod, TokenSecret},
	strategy::{self, AuthStrategy, AuthorizedRequest, StrategyFuture, UnauthorizedAction},
};

/// HTTP Basic, HTTP Token, or JWT authentication.
///
/// The header is computed once from the credentials; signing never touches the network.
#[derive(Clone)]
pub struct HeaderStrategy {
	method: AuthMethod,
	authorization: HeaderValue,
}
impl HeaderStrategy {
	/// `Authorization: Basic base64(username:password)`.
	pub fn basic(username: &str, password: &TokenSecret) -> Result<Self> {
		let encoded = STANDARD.encode(format!("{username}:{}", password.expose()));

		Self::with_value(AuthMethod::HttpBasic, &format!("Basic {encoded}"))
	}

	/// `Authorization: Token <token>`.
	pub fn token(token: &TokenSecret) -> Result<Self> {
		Self::with_value(AuthMethod::HttpToken, &format!("Token {}", token.expose()))
	}

	/// `Authorization: Bearer <jwt>`.
	pub fn jwt(token: &TokenSecret) -> Result<Self> {
		Self::with_value(AuthMethod::Jwt, &format!("Bearer {}", token.expose()))
	}

	fn with_value(method: AuthMethod, value: &str) -> Result<Self> {
		let mut authorization = strategy::authorization_value(value)?;

		authorization.set_sensitive(true);

		Ok(Self { method, authorization })
	}
}
impl AuthStrategy for HeaderStrategy {
	fn method(&self) -> AuthMethod {
		self.method
	}

	fn prepare(&self, request: Request) -> StrategyFuture<'_, AuthorizedRequest> {
		let signed = AuthorizedRequest::sign(request, self.method, self.authorization.clone());

		Box::pin(async move { Ok(signed) })
	}

	fn on_unauthorized(&self) -> UnauthorizedAction {
		UnauthorizedAction::PassThrough
	}
}
impl Debug for HeaderStrategy {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("HeaderStrategy")
			.field("method", &self.method)
			.field("authorization", &"<redacted>")
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	async fn authorization_of(strategy: &HeaderStrategy) -> String {
		let request = Request::new(
			Method::GET,
			Url::parse("https://ptpkg.dev/api/v1/tour").expect("Fixture URL should parse."),
		);
		let signed = strategy.prepare(request).await.expect("Header strategies never fail.");

		signed
			.request()
			.headers()
			.get(header::AUTHORIZATION)
			.and_then(|value| value.to_str().ok())
			.expect("Signed request should carry an Authorization header.")
			.to_owned()
	}

	#[tokio::test]
	async fn headers_follow_their_scheme() {
		let basic = HeaderStrategy::basic("alice", &TokenSecret::new("s3cret"))
			.expect("Basic header should build.");
		let token =
			HeaderStrategy::token(&TokenSecret::new("tok")).expect("Token header should build.");
		let jwt = HeaderStrategy::jwt(&TokenSecret::new("a.b.c")).expect("JWT header should build.");

		assert_eq!(authorization_of(&basic).await, "Basic YWxpY2U6czNjcmV0");
		assert_eq!(authorization_of(&token).await, "Token tok");
		assert_eq!(authorization_of(&jwt).await, "Bearer a.b.c");
		assert_eq!(jwt.on_unauthorized(), UnauthorizedAction::PassThrough);
	}

	#[test]
	fn debug_output_redacts_the_header() {
		let strategy = HeaderStrategy::token(&TokenSecret::new("never-logged"))
			.expect("Token header should build.");

		assert!(!format!("{strategy:?}").contains("never-logged"));
	}
}
