//! Shared helpers for the integration tests.

#![allow(dead_code)]

// std
use std::{env, path::PathBuf, process};
// crates.io
use httpmock::MockServer;
use ptpkg::{
	Client, ClientOptions,
	auth::AccessToken,
	store::{MemoryStore, TokenStore},
};
use time::{Duration, OffsetDateTime};

pub const TOKEN_PATH: &str = "/oauth/token";
pub const CLIENT_ID: &str = "ptpkg-client";
pub const CLIENT_SECRET: &str = "ptpkg-secret";

/// Client pointed at the mock server.
pub fn client_for(server: &MockServer) -> Client {
	Client::new(ClientOptions { base_uri: server.base_url(), ..Default::default() })
}

/// Client pointed at the mock server whose OAuth sessions keep their token in `store`.
pub fn client_with_store(server: &MockServer, store: &MemoryStore) -> Client {
	let client = client_for(server);

	client.set_token_store(std::sync::Arc::new(store.clone()));

	client
}

/// JSON body of a successful token response.
pub fn token_body(access_token: &str, expires_in: i64) -> String {
	format!(
		"{{\"access_token\":\"{access_token}\",\"token_type\":\"bearer\",\"expires_in\":{expires_in}}}"
	)
}

/// JSON body of a successful token response carrying a refresh token.
pub fn token_body_with_refresh(access_token: &str, refresh_token: &str, expires_in: i64) -> String {
	format!(
		"{{\"access_token\":\"{access_token}\",\"refresh_token\":\"{refresh_token}\",\"token_type\":\"bearer\",\"expires_in\":{expires_in}}}"
	)
}

/// Token that expired a minute ago.
pub fn expired_token(value: &str, refresh_token: Option<&str>) -> AccessToken {
	let mut builder = AccessToken::builder()
		.value(value)
		.issued_at(OffsetDateTime::now_utc() - Duration::hours(1))
		.expires_at(OffsetDateTime::now_utc() - Duration::minutes(1));

	if let Some(refresh_token) = refresh_token {
		builder = builder.refresh_token(refresh_token);
	}

	builder.build().expect("Expired token fixture should build.")
}

/// Token valid for another hour.
pub fn live_token(value: &str) -> AccessToken {
	AccessToken::builder()
		.value(value)
		.expires_in(Duration::hours(1))
		.build()
		.expect("Live token fixture should build.")
}

/// Replaces the token held by `store`.
pub async fn seed(store: &MemoryStore, token: AccessToken) {
	store.save(token).await.expect("Seeding the memory store should succeed.");
}

/// Unique scratch directory under the system temp dir.
pub fn temp_dir(label: &str) -> PathBuf {
	env::temp_dir().join(format!(
		"ptpkg_it_{label}_{}_{}",
		process::id(),
		OffsetDateTime::now_utc().unix_timestamp_nanos(),
	))
}
