//! Transport layer: the reqwest-backed client shared by API calls and token exchanges.
//!
//! [`ReqwestHttpClient`] is the only component that touches the network. API calls go through
//! [`HttpTransport::send`], which only accepts an [`AuthorizedRequest`], so nothing reaches
//! the wire without passing the middleware first. Token exchanges go through an
//! [`InstrumentedHandle`] that records the status code and `Retry-After` hint of each response
//! into a [`ResponseMetadataSlot`] for error classification.

pub mod client;
pub mod response;

pub use client::HttpClient;
pub use response::{ApiResponse, RequestSnapshot};

// std
use std::ops::Deref;
// crates.io
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
use reqwest::header::RETRY_AFTER;
use time::format_description::well_known::Rfc2822;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
	strategy::AuthorizedRequest,
};

/// Boxed future returned by [`HttpTransport::send`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<Response, TransportError>> + 'a + Send>>;

/// Transport that carries signed API requests to the wire.
///
/// Only [`AuthorizedRequest`]s are accepted; building one requires going through the
/// middleware or a strategy.
pub trait HttpTransport
where
	Self: Send + Sync,
{
	/// Sends the request and returns the raw response.
	fn send(&self, request: AuthorizedRequest) -> TransportFuture<'_>;
}

/// Metadata captured from the most recent token endpoint response.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadata {
	/// HTTP status code, if a response arrived.
	pub status: Option<u16>,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
}

/// Thread-safe slot for sharing [`ResponseMetadata`] between the transport and error mapping.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadataSlot(Arc<Mutex<Option<ResponseMetadata>>>);
impl ResponseMetadataSlot {
	/// Stores metadata for the current request.
	pub fn store(&self, meta: ResponseMetadata) {
		*self.0.lock() = Some(meta);
	}

	/// Returns the captured metadata, consuming it from the slot.
	pub fn take(&self) -> Option<ResponseMetadata> {
		self.0.lock().take()
	}
}

/// Thin wrapper around [`ReqwestClient`] so timeouts and TLS settings configured once apply to
/// API calls and token exchanges alike.
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client whose requests time out after `timeout`.
	pub fn build(timeout: std::time::Duration) -> Result<Self> {
		let client =
			ReqwestClient::builder().timeout(timeout).build().map_err(ConfigError::from)?;

		Ok(Self(client))
	}

	/// Builds a token endpoint handle that records outcomes in `slot`.
	pub fn instrumented(&self, slot: ResponseMetadataSlot) -> InstrumentedHandle {
		InstrumentedHandle(Arc::new(InstrumentedHttpClient { client: self.0.clone(), slot }))
	}
}
impl HttpTransport for ReqwestHttpClient {
	fn send(&self, request: AuthorizedRequest) -> TransportFuture<'_> {
		let pending = self.0.execute(request.into_inner());

		Box::pin(async move { pending.await.map_err(TransportError::from) })
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl Debug for ReqwestHttpClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ReqwestHttpClient(..)")
	}
}

struct InstrumentedHttpClient {
	client: ReqwestClient,
	slot: ResponseMetadataSlot,
}

/// [`AsyncHttpClient`] handle used for token endpoint calls.
#[derive(Clone)]
pub struct InstrumentedHandle(Arc<InstrumentedHttpClient>);
impl<'c> AsyncHttpClient<'c> for InstrumentedHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = Arc::clone(&self.0);

		Box::pin(async move {
			client.slot.take();

			let response = client
				.client
				.execute(request.try_into().map_err(Box::new)?)
				.await
				.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let retry_after = parse_retry_after(&headers);

			client.slot.store(ResponseMetadata { status: Some(status.as_u16()), retry_after });

			let mut converted =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*converted.status_mut() = status;
			*converted.headers_mut() = headers;

			Ok(converted)
		})
	}
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u32>() {
		return Some(Duration::seconds(i64::from(secs)));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn retry_after(value: &str) -> HeaderMap {
		let mut headers = HeaderMap::new();

		headers.insert(RETRY_AFTER, HeaderValue::from_str(value).expect("Valid header fixture."));

		headers
	}

	#[test]
	fn retry_after_accepts_seconds_and_dates() {
		assert_eq!(parse_retry_after(&retry_after("120")), Some(Duration::seconds(120)));
		assert_eq!(parse_retry_after(&retry_after("Mon, 01 Jan 2001 00:00:00 +0000")), None);
		assert_eq!(parse_retry_after(&retry_after("soon")), None);
		assert_eq!(parse_retry_after(&HeaderMap::new()), None);

		let future = OffsetDateTime::now_utc() + Duration::hours(1);
		let formatted = format!(
			"{}, {:02} {} {} {:02}:{:02}:{:02} +0000",
			&future.weekday().to_string()[..3],
			future.day(),
			&future.month().to_string()[..3],
			future.year(),
			future.hour(),
			future.minute(),
			future.second(),
		);
		let parsed = parse_retry_after(&retry_after(&formatted))
			.expect("Future RFC 2822 dates should produce a delay.");

		assert!(parsed > Duration::minutes(58));
	}

	#[test]
	fn metadata_slot_is_consumed_by_take() {
		let slot = ResponseMetadataSlot::default();

		slot.store(ResponseMetadata { status: Some(429), retry_after: None });

		assert_eq!(slot.take().and_then(|meta| meta.status), Some(429));
		assert!(slot.take().is_none());
	}
}
