//! Closed set of authentication methods understood by the client.

// self
use crate::{_prelude::*, error::ConfigError};

/// Authentication method selected once per [`authenticate`](crate::Client::authenticate) call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthMethod {
	/// HTTP Basic authentication with a username and password.
	#[serde(rename = "http_basic")]
	HttpBasic,
	/// `Authorization: Token <token>` authentication.
	#[serde(rename = "http_token")]
	HttpToken,
	/// JSON Web Token sent as a bearer credential.
	#[serde(rename = "jwt_token")]
	Jwt,
	/// OAuth 2.0 Client Credentials grant.
	#[serde(rename = "oauth_client")]
	OAuthClientCredentials,
	/// OAuth 2.0 Resource Owner Password Credentials grant.
	#[serde(rename = "oauth_password")]
	OAuthPasswordCredentials,
	/// Pre-issued OAuth 2.0 access token.
	#[serde(rename = "oauth_token")]
	OAuthAccessToken,
}
impl AuthMethod {
	/// Every supported method, in declaration order.
	pub const ALL: [AuthMethod; 6] = [
		AuthMethod::HttpBasic,
		AuthMethod::HttpToken,
		AuthMethod::Jwt,
		AuthMethod::OAuthClientCredentials,
		AuthMethod::OAuthPasswordCredentials,
		AuthMethod::OAuthAccessToken,
	];

	/// Returns the stable wire name of the method.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthMethod::HttpBasic => "http_basic",
			AuthMethod::HttpToken => "http_token",
			AuthMethod::Jwt => "jwt_token",
			AuthMethod::OAuthClientCredentials => "oauth_client",
			AuthMethod::OAuthPasswordCredentials => "oauth_password",
			AuthMethod::OAuthAccessToken => "oauth_token",
		}
	}

	/// Looks up a method by its wire name.
	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|method| method.as_str() == name)
	}

	/// Returns `true` for methods that talk to the OAuth token endpoint.
	pub const fn uses_token_endpoint(self) -> bool {
		matches!(self, AuthMethod::OAuthClientCredentials | AuthMethod::OAuthPasswordCredentials)
	}
}
impl Display for AuthMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for AuthMethod {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_name(s).ok_or_else(|| ConfigError::UnknownAuthMethod { name: s.to_owned() })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn names_round_trip_through_from_str_and_serde() {
		for method in AuthMethod::ALL {
			assert_eq!(method.as_str().parse::<AuthMethod>().ok(), Some(method));

			let json = serde_json::to_string(&method).expect("Method should serialize.");

			assert_eq!(json, format!("\"{method}\""));
		}

		assert!(matches!(
			"oauth_pkce".parse::<AuthMethod>(),
			Err(ConfigError::UnknownAuthMethod { .. })
		));
	}

	#[test]
	fn only_grant_methods_use_the_token_endpoint() {
		let grant_methods: Vec<_> =
			AuthMethod::ALL.into_iter().filter(|method| method.uses_token_endpoint()).collect();

		assert_eq!(
			grant_methods,
			[AuthMethod::OAuthClientCredentials, AuthMethod::OAuthPasswordCredentials]
		);
	}
}
