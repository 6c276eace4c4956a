//! Token endpoint facade over the `oauth2` crate.
//!
//! [`TokenEndpoint`] is the only component that talks to `POST {base_uri}oauth/token`. It runs
//! the `client_credentials`, `password`, and `refresh_token` grants through the shared reqwest
//! client and converts responses into [`AccessToken`] values or typed [`AuthError`]s.

pub mod classify;

pub use classify::*;
pub use oauth2;

// crates.io
use oauth2::{
	AuthType, ClientId, ClientSecret, EndpointNotSet, EndpointSet, HttpClientError, RefreshToken,
	RequestTokenError, ResourceOwnerPassword, ResourceOwnerUsername, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError, BasicTokenResponse},
};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, TokenSecret},
	error::{AuthError, ConfigError, TransportError},
	http::{ReqwestHttpClient, ResponseMetadata, ResponseMetadataSlot},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

type ConfiguredBasicClient =
	BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Path of the token endpoint relative to the API base URI.
pub const TOKEN_PATH: &str = "oauth/token";

/// OAuth grants issued against the token endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GrantType {
	/// `client_credentials`.
	ClientCredentials,
	/// `password` (resource owner password credentials).
	Password,
	/// `refresh_token`.
	RefreshToken,
}
impl GrantType {
	/// Returns the `grant_type` form value.
	pub const fn as_str(self) -> &'static str {
		match self {
			GrantType::ClientCredentials => "client_credentials",
			GrantType::Password => "password",
			GrantType::RefreshToken => "refresh_token",
		}
	}

	/// Observability label for this grant.
	pub const fn flow_kind(self) -> FlowKind {
		match self {
			GrantType::ClientCredentials => FlowKind::ClientCredentials,
			GrantType::Password => FlowKind::Password,
			GrantType::RefreshToken => FlowKind::Refresh,
		}
	}
}
impl Display for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// How the client authenticates itself to the token endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
	/// `client_id`/`client_secret` in the form body.
	#[default]
	ClientSecretPost,
	/// HTTP Basic authentication header.
	ClientSecretBasic,
}

/// Configured client for the API's token endpoint.
pub struct TokenEndpoint {
	oauth_client: ConfiguredBasicClient,
	http_client: ReqwestHttpClient,
	token_url: Url,
}
impl TokenEndpoint {
	/// Builds a token endpoint client for `base_uri` + [`TOKEN_PATH`].
	pub fn for_base_uri(
		base_uri: &Url,
		client_id: &str,
		client_secret: &TokenSecret,
		auth_method: ClientAuthMethod,
		http_client: ReqwestHttpClient,
	) -> Result<Self> {
		let token_url = base_uri
			.join(TOKEN_PATH)
			.map_err(|source| ConfigError::InvalidPath { path: TOKEN_PATH.into(), source })?;

		Ok(Self::new(token_url, client_id, client_secret, auth_method, http_client))
	}

	/// Builds a token endpoint client for an absolute `token_url`.
	pub fn new(
		token_url: Url,
		client_id: &str,
		client_secret: &TokenSecret,
		auth_method: ClientAuthMethod,
		http_client: ReqwestHttpClient,
	) -> Self {
		let mut oauth_client = BasicClient::new(ClientId::new(client_id.to_owned()))
			.set_token_uri(TokenUrl::from_url(token_url.clone()));

		if !client_secret.is_empty() {
			oauth_client =
				oauth_client.set_client_secret(ClientSecret::new(client_secret.expose().to_owned()));
		}
		if matches!(auth_method, ClientAuthMethod::ClientSecretPost) {
			oauth_client = oauth_client.set_auth_type(AuthType::RequestBody);
		}

		Self { oauth_client, http_client, token_url }
	}

	/// Absolute token endpoint URL.
	pub fn token_url(&self) -> &Url {
		&self.token_url
	}

	/// Runs the `client_credentials` grant.
	pub async fn client_credentials(&self) -> Result<AccessToken> {
		const GRANT: GrantType = GrantType::ClientCredentials;

		self.observe(GRANT, async move {
			let meta = ResponseMetadataSlot::default();
			let instrumented = self.http_client.instrumented(meta.clone());
			let response = self
				.oauth_client
				.exchange_client_credentials()
				.request_async(&instrumented)
				.await
				.map_err(|e| map_request_error(GRANT, meta.take(), e))?;

			map_token_response(response, None)
		})
		.await
	}

	/// Runs the `password` grant for the resource owner `username`.
	pub async fn password(&self, username: &str, password: &TokenSecret) -> Result<AccessToken> {
		const GRANT: GrantType = GrantType::Password;

		self.observe(GRANT, async move {
			let meta = ResponseMetadataSlot::default();
			let instrumented = self.http_client.instrumented(meta.clone());
			let username = ResourceOwnerUsername::new(username.to_owned());
			let password = ResourceOwnerPassword::new(password.expose().to_owned());
			let response = self
				.oauth_client
				.exchange_password(&username, &password)
				.request_async(&instrumented)
				.await
				.map_err(|e| map_request_error(GRANT, meta.take(), e))?;

			map_token_response(response, None)
		})
		.await
	}

	/// Runs the `refresh_token` grant.
	///
	/// When the response omits a new refresh token, the one that was presented is kept.
	pub async fn refresh(&self, refresh_token: &TokenSecret) -> Result<AccessToken> {
		const GRANT: GrantType = GrantType::RefreshToken;

		self.observe(GRANT, async move {
			let meta = ResponseMetadataSlot::default();
			let instrumented = self.http_client.instrumented(meta.clone());
			let presented = RefreshToken::new(refresh_token.expose().to_owned());
			let response = self
				.oauth_client
				.exchange_refresh_token(&presented)
				.request_async(&instrumented)
				.await
				.map_err(|e| map_request_error(GRANT, meta.take(), e))?;

			map_token_response(response, Some(refresh_token))
		})
		.await
	}

	async fn observe<F>(&self, grant: GrantType, fut: F) -> Result<AccessToken>
	where
		F: Future<Output = Result<AccessToken>>,
	{
		let kind = grant.flow_kind();
		let span = FlowSpan::new(kind, "token_endpoint");

		obs::record_flow_outcome(kind, FlowOutcome::Attempt);

		let result = span.instrument(fut).await;

		obs::record_result(kind, &span, &result);

		result
	}
}
impl Debug for TokenEndpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenEndpoint").field("token_url", &self.token_url.as_str()).finish()
	}
}

fn map_token_response(
	response: BasicTokenResponse,
	presented_refresh: Option<&TokenSecret>,
) -> Result<AccessToken> {
	let issued_at = OffsetDateTime::now_utc();
	let mut builder = AccessToken::builder()
		.value(response.access_token().secret().to_owned())
		.issued_at(issued_at);

	if let Some(expires_in) = response.expires_in() {
		let secs = i64::try_from(expires_in.as_secs())
			.ok()
			.filter(|secs| *secs > 0)
			.ok_or(AuthError::NonPositiveExpiresIn)?;

		builder = builder.expires_in(Duration::seconds(secs));
	}

	match (response.refresh_token(), presented_refresh) {
		(Some(issued), _) => builder = builder.refresh_token(issued.secret().to_owned()),
		(None, Some(presented)) => builder = builder.refresh_token(presented.expose()),
		(None, None) => {},
	}

	builder.build().map_err(|_| {
		AuthError::TokenEndpoint {
			message: "Token endpoint returned an empty access token".into(),
			status: None,
			retry_after: None,
		}
		.into()
	})
}

fn map_request_error(
	grant: GrantType,
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<ReqwestError>>,
) -> Error {
	let status = meta.as_ref().and_then(|m| m.status);
	let retry_after = meta.as_ref().and_then(|m| m.retry_after);

	match err {
		RequestTokenError::ServerResponse(response) =>
			map_server_response_error(grant, response, status, retry_after),
		RequestTokenError::Request(error) => map_transport_error(error, status, retry_after),
		RequestTokenError::Parse(_, body) if is_error_status(status) => classified_error(
			TokenErrorContext::new(grant).with_status(status).with_body_preview(&body),
			format!("Token endpoint returned HTTP {}", status.unwrap_or_default()),
			retry_after,
		),
		RequestTokenError::Parse(source, _) =>
			AuthError::TokenResponseParse { source, status }.into(),
		RequestTokenError::Other(message) => classified_error(
			TokenErrorContext::new(grant).with_status(status),
			message,
			retry_after,
		),
	}
}

fn map_server_response_error(
	grant: GrantType,
	response: BasicErrorResponse,
	status: Option<u16>,
	retry_after: Option<Duration>,
) -> Error {
	let mut ctx = TokenErrorContext::new(grant)
		.with_status(status)
		.with_oauth_error(response.error().as_ref().to_owned());

	if let Some(description) = response.error_description() {
		ctx = ctx.with_error_description(description.clone());
	}

	let message = match response.error_description() {
		Some(description) => format!("{}: {description}", response.error().as_ref()),
		None => response.error().as_ref().to_owned(),
	};

	classified_error(ctx, message, retry_after)
}

fn classified_error(
	ctx: TokenErrorContext,
	message: String,
	retry_after: Option<Duration>,
) -> Error {
	match ctx.classify() {
		TokenErrorKind::InvalidGrant => AuthError::InvalidGrant { reason: message }.into(),
		TokenErrorKind::InvalidClient => AuthError::InvalidClient { reason: message }.into(),
		TokenErrorKind::Unexpected =>
			AuthError::TokenEndpoint { message, status: ctx.status, retry_after }.into(),
	}
}

fn map_transport_error(
	err: HttpClientError<ReqwestError>,
	status: Option<u16>,
	retry_after: Option<Duration>,
) -> Error {
	match err {
		HttpClientError::Reqwest(inner) if inner.is_builder() => ConfigError::from(*inner).into(),
		HttpClientError::Reqwest(inner) => AuthError::network(*inner).into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => AuthError::network(TransportError::Io(inner)).into(),
		HttpClientError::Other(message) =>
			AuthError::TokenEndpoint { message, status, retry_after }.into(),
		_ => AuthError::TokenEndpoint {
			message: "HTTP client error occurred while calling the token endpoint".into(),
			status,
			retry_after,
		}
		.into(),
	}
}

fn is_error_status(status: Option<u16>) -> bool {
	status.is_some_and(|code| !(200..300).contains(&code))
}
