//! HTTP client used by resource wrappers: default headers, verb helpers, and the 401 policy.

// self
use crate::{
	_prelude::*,
	client::ClientOptions,
	error::{AuthError, ConfigError},
	http::{ApiResponse, HttpTransport, ReqwestHttpClient, RequestSnapshot},
	middleware::RequestMiddleware,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	strategy::{AuthStrategy, Signing, UnauthorizedAction},
};

/// Sends API requests through the [`RequestMiddleware`].
pub struct HttpClient {
	http_client: ReqwestHttpClient,
	transport: Arc<dyn HttpTransport>,
	base_url: Url,
	default_headers: HeaderMap,
	custom_headers: RwLock<HeaderMap>,
	middleware: RequestMiddleware,
	last_request: Mutex<Option<RequestSnapshot>>,
	last_response: Mutex<Option<ApiResponse>>,
}
impl HttpClient {
	/// Builds a client from `options`, creating a reqwest client with the configured timeout.
	pub fn new(options: &ClientOptions) -> Result<Self> {
		Self::with_client(options, ReqwestHttpClient::build(options.timeout())?)
	}

	/// Builds a client from `options` around an existing reqwest client.
	///
	/// The reqwest client carries both API calls and token exchanges.
	pub fn with_client(options: &ClientOptions, http_client: ReqwestHttpClient) -> Result<Self> {
		let base_url = options.base_url()?;
		let mut default_headers = HeaderMap::new();

		default_headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
		default_headers.insert(
			header::USER_AGENT,
			HeaderValue::from_str(&options.user_agent).map_err(|_| ConfigError::InvalidHeader {
				name: header::USER_AGENT.as_str().into(),
			})?,
		);

		Ok(Self {
			transport: Arc::new(http_client.clone()),
			http_client,
			base_url,
			default_headers,
			custom_headers: RwLock::new(HeaderMap::new()),
			middleware: RequestMiddleware::default(),
			last_request: Mutex::new(None),
			last_response: Mutex::new(None),
		})
	}

	/// Routes API calls through `transport` instead of the reqwest client.
	pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
		self.transport = transport;

		self
	}

	/// Reqwest client shared with the token endpoint.
	pub fn reqwest(&self) -> &ReqwestHttpClient {
		&self.http_client
	}

	/// Base URL that request paths are resolved against.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Signing middleware.
	pub fn middleware(&self) -> &RequestMiddleware {
		&self.middleware
	}

	/// Headers added to every request: `Accept`, `User-Agent`, then the caller's headers.
	pub fn headers(&self) -> HeaderMap {
		let mut headers = self.default_headers.clone();

		headers.extend(self.custom_headers());

		headers
	}

	/// Headers set through [`set_headers`](Self::set_headers).
	pub fn custom_headers(&self) -> HeaderMap {
		self.custom_headers.read().clone()
	}

	/// Merges `headers` into the per-request headers, replacing existing names.
	pub fn set_headers(&self, headers: HeaderMap) {
		self.custom_headers.write().extend(headers);
	}

	/// Resets the per-request headers to `Accept` and `User-Agent`.
	pub fn clear_headers(&self) {
		self.custom_headers.write().clear();
	}

	/// What was sent for the most recent request.
	pub fn last_request(&self) -> Option<RequestSnapshot> {
		self.last_request.lock().clone()
	}

	/// The most recent response.
	pub fn last_response(&self) -> Option<ApiResponse> {
		self.last_response.lock().clone()
	}

	/// `GET path?query`.
	pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<ApiResponse> {
		self.request(Method::GET, path, query, None, HeaderMap::new()).await
	}

	/// `POST path` with an optional JSON body.
	pub async fn post(
		&self,
		path: &str,
		body: Option<&serde_json::Value>,
		headers: HeaderMap,
	) -> Result<ApiResponse> {
		self.request(Method::POST, path, &[], body, headers).await
	}

	/// `PATCH path` with an optional JSON body.
	pub async fn patch(
		&self,
		path: &str,
		body: Option<&serde_json::Value>,
		headers: HeaderMap,
	) -> Result<ApiResponse> {
		self.request(Method::PATCH, path, &[], body, headers).await
	}

	/// `PUT path` with an optional JSON body.
	pub async fn put(
		&self,
		path: &str,
		body: Option<&serde_json::Value>,
		headers: HeaderMap,
	) -> Result<ApiResponse> {
		self.request(Method::PUT, path, &[], body, headers).await
	}

	/// `DELETE path` with an optional JSON body.
	pub async fn delete(
		&self,
		path: &str,
		body: Option<&serde_json::Value>,
		headers: HeaderMap,
	) -> Result<ApiResponse> {
		self.request(Method::DELETE, path, &[], body, headers).await
	}

	/// Builds, signs, and sends a request.
	///
	/// `headers` override the per-request headers for this call only.
	pub async fn request(
		&self,
		method: Method,
		path: &str,
		query: &[(&str, &str)],
		body: Option<&serde_json::Value>,
		headers: HeaderMap,
	) -> Result<ApiResponse> {
		let request = self.build_request(method, path, query, body, headers)?;
		let span = FlowSpan::new(FlowKind::ApiRequest, "dispatch");

		obs::record_flow_outcome(FlowKind::ApiRequest, FlowOutcome::Attempt);

		let result = span.instrument(self.dispatch(request)).await;

		obs::record_result(FlowKind::ApiRequest, &span, &result);

		result
	}

	fn build_request(
		&self,
		method: Method,
		path: &str,
		query: &[(&str, &str)],
		body: Option<&serde_json::Value>,
		headers: HeaderMap,
	) -> Result<Request> {
		let url = self.resolve(path)?;
		let mut merged = self.headers();

		merged.extend(headers);

		let mut builder = self.http_client.request(method, url).headers(merged);

		if !query.is_empty() {
			builder = builder.query(query);
		}
		if let Some(body) = body {
			builder = builder
				.header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))
				.body(serde_json::to_vec(body).map_err(ConfigError::from)?);
		}

		Ok(builder
			.build()
			.map_err(|e| ConfigError::InvalidRequest { source: Box::new(e) })?)
	}

	fn resolve(&self, path: &str) -> Result<Url, ConfigError> {
		self.base_url
			.join(path.trim_start_matches('/'))
			.map_err(|source| ConfigError::InvalidPath { path: path.to_owned(), source })
	}

	async fn dispatch(&self, request: Request) -> Result<ApiResponse> {
		let retry = request.try_clone();
		let (authorized, strategy) = self.middleware.authorize(request).await?;
		let signing = authorized.signing();
		let sent_authorization = authorized.request().headers().get(header::AUTHORIZATION).cloned();

		self.record_request(authorized.request(), signing);

		let response = self.transport.send(authorized).await?;

		if response.status() != StatusCode::UNAUTHORIZED {
			return self.finish(response).await;
		}

		let Some(strategy) = strategy.filter(|_| matches!(signing, Signing::Signed(_))) else {
			return self.finish(response).await;
		};

		let action = strategy.on_unauthorized();

		obs::record_unauthorized(action);

		match action {
			UnauthorizedAction::PassThrough => self.finish(response).await,
			UnauthorizedAction::Fail => {
				self.finish(response).await?;

				Err(AuthError::AccessTokenRejected.into())
			},
			UnauthorizedAction::Retry => match retry {
				Some(retry) => self.resend(strategy, sent_authorization, retry).await,
				None => self.finish(response).await,
			},
		}
	}

	async fn resend(
		&self,
		strategy: Arc<dyn AuthStrategy>,
		rejected: Option<HeaderValue>,
		request: Request,
	) -> Result<ApiResponse> {
		strategy.invalidate(rejected.as_ref()).await?;

		let authorized = strategy.prepare(request).await?;

		self.record_request(authorized.request(), authorized.signing());

		let response = self.transport.send(authorized).await?;

		self.finish(response).await
	}

	fn record_request(&self, request: &Request, signing: Signing) {
		*self.last_request.lock() = Some(RequestSnapshot {
			method: request.method().clone(),
			url: request.url().clone(),
			headers: request.headers().clone(),
			signing,
		});
	}

	async fn finish(&self, response: Response) -> Result<ApiResponse> {
		let response = ApiResponse::read(response).await?;

		*self.last_response.lock() = Some(response.clone());

		Ok(response)
	}
}
impl Debug for HttpClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("HttpClient")
			.field("base_url", &self.base_url.as_str())
			.field("middleware", &self.middleware)
			.finish()
	}
}
