//! Credential shapes and the argument disambiguation used by `authenticate`.

// self
use crate::{
	_prelude::*,
	auth::{AuthMethod, TokenSecret},
	error::ConfigError,
};

/// Credentials for exactly one authentication method.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
	/// HTTP Basic username and password.
	Basic {
		/// Login name.
		username: String,
		/// Login password.
		password: TokenSecret,
	},
	/// Personal API token sent with the `Token` scheme.
	Token {
		/// Token value.
		token: TokenSecret,
	},
	/// JSON Web Token sent with the `Bearer` scheme.
	Jwt {
		/// Encoded JWT.
		token: TokenSecret,
	},
	/// OAuth 2.0 Client Credentials.
	ClientCredentials {
		/// OAuth client identifier.
		client_id: String,
		/// OAuth client secret.
		client_secret: TokenSecret,
	},
	/// OAuth 2.0 Resource Owner Password Credentials.
	PasswordCredentials {
		/// OAuth client identifier.
		client_id: String,
		/// OAuth client secret.
		client_secret: TokenSecret,
		/// Resource owner login.
		username: String,
		/// Resource owner password.
		password: TokenSecret,
	},
	/// Pre-issued OAuth 2.0 access token.
	AccessToken {
		/// Access token value.
		access_token: TokenSecret,
	},
}
impl Credentials {
	/// Returns the method these credentials authenticate with.
	pub fn method(&self) -> AuthMethod {
		match self {
			Credentials::Basic { .. } => AuthMethod::HttpBasic,
			Credentials::Token { .. } => AuthMethod::HttpToken,
			Credentials::Jwt { .. } => AuthMethod::Jwt,
			Credentials::ClientCredentials { .. } => AuthMethod::OAuthClientCredentials,
			Credentials::PasswordCredentials { .. } => AuthMethod::OAuthPasswordCredentials,
			Credentials::AccessToken { .. } => AuthMethod::OAuthAccessToken,
		}
	}

	/// Resolves `authenticate(identity, secret, method)` arguments into one credential shape.
	///
	/// Resolution order for the method: the explicit `method`, then a `secret` that names a
	/// method (the secret is then treated as absent), then the bundle's own `method`, and
	/// finally HTTP Basic. Supplying neither a secret nor any method is an error.
	pub fn resolve(
		identity: Identity,
		secret: Option<&str>,
		method: Option<AuthMethod>,
	) -> Result<Self, ConfigError> {
		let (secret, method) = match (secret, method) {
			(Some(value), None) => match AuthMethod::from_name(value) {
				Some(named) => (None, Some(named)),
				None => (Some(value), None),
			},
			pair => pair,
		};
		let bundle_method = match &identity {
			Identity::Bundle(bundle) => bundle.method,
			Identity::Login(_) => None,
		};

		if secret.is_none() && method.is_none() && bundle_method.is_none() {
			return Err(ConfigError::MissingAuthMethod);
		}

		let method = method.or(bundle_method).unwrap_or(AuthMethod::HttpBasic);

		match identity {
			Identity::Login(login) => Self::from_login(method, login, secret),
			Identity::Bundle(bundle) => bundle.into_credentials(method, secret),
		}
	}

	fn from_login(
		method: AuthMethod,
		login: String,
		secret: Option<&str>,
	) -> Result<Self, ConfigError> {
		let require_secret = |field| {
			secret
				.map(TokenSecret::new)
				.ok_or(ConfigError::IncompleteCredentials { method, field })
		};

		Ok(match method {
			AuthMethod::HttpBasic =>
				Credentials::Basic { username: login, password: require_secret("password")? },
			AuthMethod::HttpToken => Credentials::Token { token: TokenSecret::new(login) },
			AuthMethod::Jwt => Credentials::Jwt { token: TokenSecret::new(login) },
			AuthMethod::OAuthClientCredentials => Credentials::ClientCredentials {
				client_id: login,
				client_secret: require_secret("client_secret")?,
			},
			AuthMethod::OAuthPasswordCredentials =>
				return Err(ConfigError::IncompleteCredentials { method, field: "username" }),
			AuthMethod::OAuthAccessToken =>
				Credentials::AccessToken { access_token: TokenSecret::new(login) },
		})
	}
}

/// First argument of [`authenticate`](crate::Client::authenticate): a plain login/token string
/// or a structured credential bundle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Identity {
	/// Username, client identifier, or token, depending on the method.
	Login(String),
	/// Structured credentials, optionally carrying their own method.
	Bundle(CredentialBundle),
}
impl From<&str> for Identity {
	fn from(value: &str) -> Self {
		Self::Login(value.to_owned())
	}
}
impl From<String> for Identity {
	fn from(value: String) -> Self {
		Self::Login(value)
	}
}
impl From<CredentialBundle> for Identity {
	fn from(value: CredentialBundle) -> Self {
		Self::Bundle(value)
	}
}

/// Structured credential bundle, typically deserialized from configuration.
///
/// `clientId`/`clientSecret` are accepted as aliases. For the client credentials method,
/// `username`/`password` stand in for a missing `client_id`/`client_secret`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CredentialBundle {
	/// Method carried by the bundle itself.
	pub method: Option<AuthMethod>,
	/// OAuth client identifier.
	#[serde(alias = "clientId")]
	pub client_id: Option<String>,
	/// OAuth client secret.
	#[serde(alias = "clientSecret")]
	pub client_secret: Option<String>,
	/// Login name.
	pub username: Option<String>,
	/// Login password.
	pub password: Option<String>,
	/// API token or JWT.
	pub token: Option<String>,
	/// Pre-issued OAuth access token.
	#[serde(alias = "accessToken")]
	pub access_token: Option<String>,
}
impl CredentialBundle {
	/// Creates an empty bundle that carries `method`.
	pub fn with_method(method: AuthMethod) -> Self {
		Self { method: Some(method), ..Default::default() }
	}

	/// Sets the OAuth client identifier and secret.
	pub fn client(mut self, client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());
		self.client_secret = Some(client_secret.into());

		self
	}

	/// Sets the login name and password.
	pub fn login(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
		self.username = Some(username.into());
		self.password = Some(password.into());

		self
	}

	/// Sets the API token or JWT.
	pub fn token(mut self, token: impl Into<String>) -> Self {
		self.token = Some(token.into());

		self
	}

	/// Sets the pre-issued access token.
	pub fn access_token(mut self, token: impl Into<String>) -> Self {
		self.access_token = Some(token.into());

		self
	}

	fn into_credentials(
		self,
		method: AuthMethod,
		secret: Option<&str>,
	) -> Result<Credentials, ConfigError> {
		let missing = |field| ConfigError::IncompleteCredentials { method, field };

		Ok(match method {
			AuthMethod::HttpBasic => Credentials::Basic {
				username: self.username.ok_or_else(|| missing("username"))?,
				password: self
					.password
					.as_deref()
					.or(secret)
					.map(TokenSecret::new)
					.ok_or_else(|| missing("password"))?,
			},
			AuthMethod::HttpToken => Credentials::Token {
				token: self.token.map(TokenSecret::new).ok_or_else(|| missing("token"))?,
			},
			AuthMethod::Jwt => Credentials::Jwt {
				token: self.token.map(TokenSecret::new).ok_or_else(|| missing("token"))?,
			},
			AuthMethod::OAuthClientCredentials => Credentials::ClientCredentials {
				client_id: self.client_id.or(self.username).ok_or_else(|| missing("client_id"))?,
				client_secret: self
					.client_secret
					.or(self.password)
					.as_deref()
					.or(secret)
					.map(TokenSecret::new)
					.ok_or_else(|| missing("client_secret"))?,
			},
			AuthMethod::OAuthPasswordCredentials => Credentials::PasswordCredentials {
				client_id: self.client_id.ok_or_else(|| missing("client_id"))?,
				client_secret: self
					.client_secret
					.map(TokenSecret::new)
					.ok_or_else(|| missing("client_secret"))?,
				username: self.username.ok_or_else(|| missing("username"))?,
				password: self
					.password
					.as_deref()
					.or(secret)
					.map(TokenSecret::new)
					.ok_or_else(|| missing("password"))?,
			},
			AuthMethod::OAuthAccessToken => Credentials::AccessToken {
				access_token: self
					.access_token
					.or(self.token)
					.map(TokenSecret::new)
					.ok_or_else(|| missing("access_token"))?,
			},
		})
	}
}
