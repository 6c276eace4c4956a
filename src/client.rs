//! Client facade: configuration, authentication, and lazily created resource wrappers.

pub mod options;
pub mod registry;

pub use options::{ClientOptions, OptionValue};
pub use registry::{EndpointConstructor, EndpointEntry, EndpointRegistry};

// self
use crate::{
	_prelude::*,
	api::{CurrentUser, Endpoint, Tours, Users},
	auth::{AuthMethod, Credentials, Identity},
	error::ConfigError,
	http::HttpClient,
	oauth::ClientAuthMethod,
	store::TokenStore,
	strategy::{self, AuthStrategy, StrategyContext},
};

/// Entry point of the API client.
///
/// The HTTP client is built on first use from the current [`ClientOptions`]. Resource wrappers
/// are created on first access and cached; later accesses return the same instance until the
/// HTTP client is replaced. Replacing the HTTP client rebuilds the session's strategy against
/// it, so token exchanges always use the current base URI and timeout.
pub struct Client {
	options: RwLock<ClientOptions>,
	http: Mutex<HttpSlot>,
	registry: EndpointRegistry,
	endpoints: Mutex<HashMap<&'static str, Arc<dyn Endpoint>>>,
	session: RwLock<Option<Session>>,
	token_store: Mutex<Option<Arc<dyn TokenStore>>>,
	client_auth: RwLock<ClientAuthMethod>,
}
impl Client {
	/// Creates a client; nothing is built until the first request or `authenticate` call.
	pub fn new(options: ClientOptions) -> Self {
		Self {
			options: RwLock::new(options),
			http: Mutex::new(HttpSlot::default()),
			registry: EndpointRegistry::default(),
			endpoints: Mutex::new(HashMap::new()),
			session: RwLock::new(None),
			token_store: Mutex::new(None),
			client_auth: RwLock::new(ClientAuthMethod::default()),
		}
	}

	/// Creates a client around a prebuilt HTTP client.
	pub fn with_http_client(options: ClientOptions, http_client: HttpClient) -> Result<Self> {
		let client = Self::new(options);

		client.set_http_client(http_client)?;

		Ok(client)
	}

	/// Replaces the endpoint registry.
	pub fn with_registry(mut self, registry: EndpointRegistry) -> Self {
		self.registry = registry;
		self.endpoints.get_mut().clear();

		self
	}

	/// Authenticates every subsequent request.
	///
	/// `identity` is a login, client id, or token depending on the method, or a
	/// [`CredentialBundle`](crate::auth::CredentialBundle). When `method` is `None` and `secret`
	/// names a method (for example `"jwt_token"`), the secret is read as the method instead.
	/// The new session replaces the previous one together with its cached token.
	pub fn authenticate(
		&self,
		identity: impl Into<Identity>,
		secret: Option<&str>,
		method: Option<AuthMethod>,
	) -> Result<()> {
		let credentials = Credentials::resolve(identity.into(), secret, method)?;
		let http = self.http_client()?;
		let store = if credentials.method().uses_token_endpoint() {
			self.token_store.lock().clone()
		} else {
			None
		};
		let consumes_store = store.is_some();
		let session = self.open_session(&http, credentials, store)?;

		if consumes_store {
			self.token_store.lock().take();
		}

		http.middleware().install(Arc::clone(&session.strategy));
		*self.session.write() = Some(session);

		Ok(())
	}

	/// Installs a custom strategy.
	///
	/// The strategy is kept as is when the HTTP client is replaced.
	pub fn set_strategy(&self, strategy: Arc<dyn AuthStrategy>) -> Result<()> {
		self.http_client()?.middleware().install(Arc::clone(&strategy));
		*self.session.write() = Some(Session { strategy, credentials: None, store: None });

		Ok(())
	}

	/// Drops the session; later requests are sent unsigned.
	pub fn logout(&self) {
		self.session.write().take();

		if let Some(http) = self.http.lock().client.as_ref() {
			http.middleware().uninstall();
		}
	}

	/// The active strategy.
	pub fn strategy(&self) -> Option<Arc<dyn AuthStrategy>> {
		self.session.read().as_ref().map(|session| Arc::clone(&session.strategy))
	}

	/// Method of the active session.
	pub fn auth_method(&self) -> Option<AuthMethod> {
		self.session.read().as_ref().map(|session| session.strategy.method())
	}

	/// Token store for the next OAuth grant session.
	///
	/// Overrides the in-memory default and the `cache_dir` file store for that one session. The
	/// session owns the store from then on; later sessions start from their own store and never
	/// see its token.
	pub fn set_token_store(&self, store: Arc<dyn TokenStore>) {
		*self.token_store.lock() = Some(store);
	}

	/// How OAuth sessions created after this call authenticate at the token endpoint.
	pub fn set_client_auth_method(&self, method: ClientAuthMethod) {
		*self.client_auth.write() = method;
	}

	/// Returns the HTTP client, building it from the options on first use.
	pub fn http_client(&self) -> Result<Arc<HttpClient>> {
		let mut slot = self.http.lock();

		if let Some(client) = slot.client.as_ref() {
			return Ok(Arc::clone(client));
		}

		let client = HttpClient::new(&self.options.read())?;

		client.set_headers(slot.carried_headers.clone());
		self.rebind_session(&client)?;

		let client = Arc::new(client);

		slot.carried_headers.clear();
		slot.client = Some(Arc::clone(&client));

		Ok(client)
	}

	/// Replaces the HTTP client, moving the session onto it and clearing cached wrappers.
	pub fn set_http_client(&self, http_client: HttpClient) -> Result<()> {
		let mut slot = self.http.lock();

		self.rebind_session(&http_client)?;
		*slot = HttpSlot {
			client: Some(Arc::new(http_client)),
			supplied: true,
			carried_headers: HeaderMap::new(),
		};
		drop(slot);
		self.endpoints.lock().clear();

		Ok(())
	}

	/// Merges `headers` into the headers sent with every request.
	pub fn set_headers(&self, headers: HeaderMap) -> Result<()> {
		self.http_client()?.set_headers(headers);

		Ok(())
	}

	/// Resets request headers to `Accept` and `User-Agent`.
	pub fn clear_headers(&self) -> Result<()> {
		self.http_client()?.clear_headers();

		Ok(())
	}

	/// Snapshot of the current options.
	pub fn options(&self) -> ClientOptions {
		self.options.read().clone()
	}

	/// Reads an option by name.
	pub fn get_option(&self, name: &str) -> Result<OptionValue> {
		Ok(self.options.read().get(name)?)
	}

	/// Sets an option by name.
	///
	/// Options take effect when the HTTP client is built. A client built from earlier options
	/// is discarded so the next request rebuilds it with the same custom headers and session; a
	/// client supplied through [`set_http_client`](Self::set_http_client) is kept.
	pub fn set_option(&self, name: &str, value: impl Into<OptionValue>) -> Result<()> {
		self.options.write().set(name, value)?;

		let mut slot = self.http.lock();

		if slot.supplied {
			return Ok(());
		}
		if let Some(previous) = slot.client.take() {
			slot.carried_headers = previous.custom_headers();
			drop(slot);
			self.endpoints.lock().clear();
		}

		Ok(())
	}

	/// Returns the wrapper registered under `name` (case-insensitive, aliases allowed).
	pub fn resolve_endpoint(&self, name: &str) -> Result<Arc<dyn Endpoint>> {
		let entry = self
			.registry
			.lookup(name)
			.ok_or_else(|| ConfigError::UnknownEndpoint { name: name.to_owned() })?;
		let http = self.http_client()?;
		let mut endpoints = self.endpoints.lock();

		Ok(Arc::clone(endpoints.entry(entry.name).or_insert_with(|| (entry.construct)(http))))
	}

	/// Typed variant of [`resolve_endpoint`](Self::resolve_endpoint).
	pub fn endpoint<T>(&self, name: &str) -> Result<Arc<T>>
	where
		T: Endpoint,
	{
		self.resolve_endpoint(name)?
			.into_any()
			.downcast::<T>()
			.map_err(|_| ConfigError::EndpointType { name: name.to_owned() }.into())
	}

	/// Users resource.
	pub fn users(&self) -> Result<Arc<Users>> {
		self.endpoint(Users::NAME)
	}

	/// Tours resource.
	pub fn tours(&self) -> Result<Arc<Tours>> {
		self.endpoint(Tours::NAME)
	}

	/// Current user resource.
	pub fn current_user(&self) -> Result<Arc<CurrentUser>> {
		self.endpoint(CurrentUser::NAME)
	}

	fn open_session(
		&self,
		http: &HttpClient,
		credentials: Credentials,
		store: Option<Arc<dyn TokenStore>>,
	) -> Result<Session> {
		let cache_dir = self.options.read().cache_dir.clone();
		let ctx = StrategyContext {
			base_uri: http.base_url(),
			http_client: http.reqwest(),
			client_auth: *self.client_auth.read(),
			cache_dir: cache_dir.as_deref(),
		};
		let strategy = strategy::from_credentials(credentials.clone(), ctx, store.clone())?;

		Ok(Session { strategy, credentials: Some(credentials), store })
	}

	/// Rebuilds the session's strategy against `http` and installs it there.
	fn rebind_session(&self, http: &HttpClient) -> Result<()> {
		let mut session = self.session.write();
		let Some(current) = session.as_mut() else {
			return Ok(());
		};

		if let Some(credentials) = current.credentials.clone() {
			let store = current.store.clone();

			*current = self.open_session(http, credentials, store)?;
		}

		http.middleware().install(Arc::clone(&current.strategy));

		Ok(())
	}
}
impl Default for Client {
	fn default() -> Self {
		Self::new(ClientOptions::default())
	}
}
impl Debug for Client {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("options", &*self.options.read())
			.field("auth_method", &self.auth_method())
			.finish()
	}
}

#[derive(Default)]
struct HttpSlot {
	client: Option<Arc<HttpClient>>,
	supplied: bool,
	// Custom headers of a discarded client, applied to its replacement.
	carried_headers: HeaderMap,
}

/// Active authentication and what is needed to rebuild it for another HTTP client.
struct Session {
	strategy: Arc<dyn AuthStrategy>,
	// `None` for strategies installed through `set_strategy`.
	credentials: Option<Credentials>,
	store: Option<Arc<dyn TokenStore>>,
}
