//! Buffered API responses and request snapshots kept for introspection.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error::TransportError, strategy::Signing};

/// Fully buffered API response.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status.
	pub status: StatusCode,
	/// Response headers.
	pub headers: HeaderMap,
	/// Raw body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Buffers the body of `response`.
	pub async fn read(response: Response) -> Result<Self, TransportError> {
		let status = response.status();
		let headers = response.headers().to_owned();
		let body = response.bytes().await?.to_vec();

		Ok(Self { status, headers, body })
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}

	/// Body as UTF-8 text, replacing invalid sequences.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Decodes the body as JSON, reporting the path of the first mismatch.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| Error::Decode { source, status: self.status.as_u16() })
	}
}

/// What was sent for the most recent request.
#[derive(Clone, Debug)]
pub struct RequestSnapshot {
	/// HTTP method.
	pub method: Method,
	/// Absolute request URL, including the query string.
	pub url: Url,
	/// Headers as sent; the `Authorization` value is marked sensitive.
	pub headers: HeaderMap,
	/// How the request was signed.
	pub signing: Signing,
}
impl RequestSnapshot {
	/// Returns the `Authorization` header value, if one was sent.
	pub fn authorization(&self) -> Option<&str> {
		self.headers.get(header::AUTHORIZATION).and_then(|value| value.to_str().ok())
	}
}
