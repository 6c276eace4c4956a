//! Request-signing middleware sitting between the HTTP client and the transport.

// self
use crate::{
	_prelude::*,
	auth::AuthMethod,
	strategy::{AuthStrategy, AuthorizedRequest},
};

/// Holds the installed [`AuthStrategy`] and signs every outgoing request with it.
///
/// With no strategy installed, requests pass through as
/// [`Signing::Anonymous`](crate::strategy::Signing::Anonymous).
#[derive(Default)]
pub struct RequestMiddleware {
	strategy: RwLock<Option<Arc<dyn AuthStrategy>>>,
}
impl RequestMiddleware {
	/// Installs `strategy`, returning the one it replaces.
	///
	/// The replaced strategy and its cached token are dropped once in-flight requests finish.
	pub fn install(&self, strategy: Arc<dyn AuthStrategy>) -> Option<Arc<dyn AuthStrategy>> {
		self.strategy.write().replace(strategy)
	}

	/// Removes the installed strategy.
	pub fn uninstall(&self) -> Option<Arc<dyn AuthStrategy>> {
		self.strategy.write().take()
	}

	/// Currently installed strategy.
	pub fn strategy(&self) -> Option<Arc<dyn AuthStrategy>> {
		self.strategy.read().clone()
	}

	/// Method of the installed strategy.
	pub fn method(&self) -> Option<AuthMethod> {
		self.strategy.read().as_ref().map(|strategy| strategy.method())
	}

	/// Signs `request` with the installed strategy.
	///
	/// Returns the strategy used so the caller can react to a `401` with the same one, even if
	/// another strategy was installed meanwhile.
	pub async fn authorize(
		&self,
		request: Request,
	) -> Result<(AuthorizedRequest, Option<Arc<dyn AuthStrategy>>)> {
		let Some(strategy) = self.strategy() else {
			return Ok((AuthorizedRequest::anonymous(request), None));
		};
		let authorized = strategy.prepare(request).await?;

		Ok((authorized, Some(strategy)))
	}
}
impl Debug for RequestMiddleware {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestMiddleware").field("method", &self.method()).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		auth::TokenSecret,
		strategy::{HeaderStrategy, Signing},
	};

	fn request() -> Request {
		Request::new(
			Method::GET,
			Url::parse("https://ptpkg.dev/api/v1/user").expect("Fixture URL should parse."),
		)
	}

	#[tokio::test]
	async fn anonymous_without_strategy() {
		let middleware = RequestMiddleware::default();
		let (authorized, strategy) =
			middleware.authorize(request()).await.expect("Anonymous requests pass through.");

		assert_eq!(authorized.signing(), Signing::Anonymous);
		assert!(strategy.is_none());
		assert!(authorized.request().headers().get(header::AUTHORIZATION).is_none());
	}

	#[tokio::test]
	async fn install_replaces_previous_strategy() {
		let middleware = RequestMiddleware::default();
		let token = Arc::new(
			HeaderStrategy::token(&TokenSecret::new("t")).expect("Token header should build."),
		);
		let jwt =
			Arc::new(HeaderStrategy::jwt(&TokenSecret::new("j")).expect("JWT header should build."));

		assert!(middleware.install(token).is_none());

		let previous = middleware.install(jwt).expect("Previous strategy should be returned.");

		assert_eq!(previous.method(), AuthMethod::HttpToken);
		assert_eq!(middleware.method(), Some(AuthMethod::Jwt));

		let (authorized, _) = middleware.authorize(request()).await.expect("Signing succeeds.");

		assert_eq!(authorized.signing(), Signing::Signed(AuthMethod::Jwt));

		middleware.uninstall();

		assert!(middleware.strategy().is_none());
	}
}
