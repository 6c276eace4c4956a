//! Client-level error types shared across strategies, stores, and the request pipeline.

// self
use crate::{_prelude::*, auth::AuthMethod};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem raised synchronously at call time.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Token acquisition or token use was rejected; fatal to the in-flight request.
	#[error(transparent)]
	Authentication(#[from] AuthError),
	/// Transport failure of an API call, carried through unchanged.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Token store failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),

	/// API response body could not be decoded into the requested type.
	#[error("Response body could not be decoded.")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status of the decoded response.
		status: u16,
	},
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Neither a secret nor an authentication method was supplied.
	#[error("An authentication method must be specified.")]
	MissingAuthMethod,
	/// The named authentication method is not one of the supported methods.
	#[error("Authentication method `{name}` is not supported.")]
	UnknownAuthMethod {
		/// Name that failed to parse.
		name: String,
	},
	/// The supplied credentials lack a field required by the selected method.
	#[error("The {method} method requires a `{field}` value.")]
	IncompleteCredentials {
		/// Selected authentication method.
		method: AuthMethod,
		/// Missing field name.
		field: &'static str,
	},
	/// The option key is not part of the fixed option set.
	#[error("Undefined option called: `{name}`.")]
	UnknownOption {
		/// Requested option key.
		name: String,
	},
	/// The option value does not match the option's type.
	#[error("Option `{name}` expects {expected}.")]
	InvalidOptionValue {
		/// Option key.
		name: &'static str,
		/// Human-readable description of the accepted value.
		expected: &'static str,
	},
	/// No resource wrapper is registered under the requested name.
	#[error("Endpoint `{name}` does not exist.")]
	UnknownEndpoint {
		/// Requested endpoint name.
		name: String,
	},
	/// The cached endpoint has a different concrete type than requested.
	#[error("Endpoint `{name}` has an unexpected type.")]
	EndpointType {
		/// Requested endpoint name.
		name: String,
	},
	/// Base URI cannot be parsed.
	#[error("Base URI is invalid.")]
	InvalidBaseUri {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request path cannot be resolved against the base URI.
	#[error("Path `{path}` cannot be resolved against the base URI.")]
	InvalidPath {
		/// Offending path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Header value contains characters that are not allowed in HTTP headers.
	#[error("Header `{name}` has an invalid value.")]
	InvalidHeader {
		/// Header name.
		name: String,
	},
	/// API request could not be assembled from its parts.
	#[error("Request could not be built.")]
	InvalidRequest {
		/// Underlying builder failure.
		#[source]
		source: BoxError,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	Body(#[from] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Authentication failures raised while acquiring or using a token.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Provider rejected the grant (bad credentials or refresh token).
	#[error("Provider rejected the grant: {reason}.")]
	InvalidGrant {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Client authentication failed or client credentials are malformed.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Token endpoint answered with an unexpected response.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	TokenEndpoint {
		/// Summary of the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Token endpoint responded with malformed JSON.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Network failure while calling the token endpoint.
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Token endpoint returned an `expires_in` that is zero, negative, or out of range.
	#[error("The expires_in value must be a positive number of seconds.")]
	NonPositiveExpiresIn,
	/// The API rejected a pre-issued access token, which cannot be refreshed.
	#[error("The API rejected the access token and it cannot be refreshed.")]
	AccessTokenRejected,
	/// A pre-issued access token has expired and cannot be refreshed.
	#[error("The access token expired and it cannot be refreshed.")]
	AccessTokenExpired,
}
impl AuthError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO) of API calls.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn config_errors_render_their_subject() {
		let err: Error = ConfigError::UnknownOption { name: "colour".into() }.into();

		assert!(matches!(err, Error::Config(ConfigError::UnknownOption { .. })));
		assert_eq!(err.to_string(), "Undefined option called: `colour`.");

		let err = ConfigError::IncompleteCredentials {
			method: AuthMethod::OAuthPasswordCredentials,
			field: "username",
		};

		assert_eq!(err.to_string(), "The oauth_password method requires a `username` value.");
	}

	#[test]
	fn transport_error_keeps_original_source() {
		let io = std::io::Error::other("connection reset");
		let err: Error = TransportError::network(io).into();
		let source = StdError::source(&err)
			.expect("Transport errors should expose the original error as their source.");

		assert_eq!(source.to_string(), "connection reset");
	}
}
