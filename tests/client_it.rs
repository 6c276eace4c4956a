mod common;

// std
use std::fs;
// crates.io
use httpmock::prelude::*;
use ptpkg::{
	Client, ClientOptions, Error,
	auth::AuthMethod,
	client::OptionValue,
	error::ConfigError,
	reqwest::header::{HeaderMap, HeaderValue},
	store::MemoryStore,
};
// self
use common::*;

#[tokio::test]
async fn cache_dir_persists_oauth_tokens_across_clients() -> color_eyre::Result<()> {
	let server = MockServer::start_async().await;
	let dir = temp_dir("cache_dir");
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("persisted", 3600));
		})
		.await;
	let api_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/user").header("authorization", "Bearer persisted");
			then.status(200).body("{}");
		})
		.await;

	for _ in 0..2 {
		let client = client_for(&server);

		client.set_option("cache_dir", dir.clone())?;
		client.authenticate(CLIENT_ID, Some(CLIENT_SECRET), Some(AuthMethod::OAuthClientCredentials))?;
		client.users()?.me().await?;
	}

	token_mock.assert_calls_async(1).await;
	api_mock.assert_calls_async(2).await;

	let files = fs::read_dir(&dir)?.count();

	assert_eq!(files, 1);

	fs::remove_dir_all(&dir)?;

	Ok(())
}

#[tokio::test]
async fn last_request_and_response_are_recorded() -> color_eyre::Result<()> {
	let server = MockServer::start_async().await;
	let client = client_for(&server);
	let _mock = server
		.mock_async(|when, then| {
			when.method(PATCH).path("/api/v1/user/3");
			then.status(200).header("content-type", "application/json").body("{\"id\":3}");
		})
		.await;

	client.authenticate("tok", None, Some(AuthMethod::HttpToken))?;
	client.users()?.update(3, &serde_json::json!({ "name": "Bea" })).await?;

	let http = client.http_client()?;
	let request = http.last_request().expect("Request snapshot is kept.");
	let response = http.last_response().expect("Response is kept.");

	assert_eq!(request.method.as_str(), "PATCH");
	assert_eq!(request.url.path(), "/api/v1/user/3");
	assert_eq!(request.authorization(), Some("Token tok"));

	#[derive(serde::Deserialize)]
	struct User {
		id: u64,
	}

	assert_eq!(response.json::<User>()?.id, 3);

	Ok(())
}

#[test]
fn options_and_endpoints_report_typed_errors() {
	let client = Client::new(ClientOptions::default());

	assert_eq!(client.get_option("api_limit").ok(), Some(OptionValue::Number(5000)));
	assert!(matches!(
		client.set_option("timeout", "soon"),
		Err(Error::Config(ConfigError::InvalidOptionValue { name: "timeout", .. }))
	));
	assert!(matches!(
		client.get_option("retries"),
		Err(Error::Config(ConfigError::UnknownOption { .. }))
	));
	assert!(matches!(
		client.resolve_endpoint("bookings"),
		Err(Error::Config(ConfigError::UnknownEndpoint { .. }))
	));

	let first = client.resolve_endpoint("tours").expect("Tours endpoint is registered.");
	let second = client.resolve_endpoint("tour").expect("Alias resolves to the same wrapper.");

	assert!(std::sync::Arc::ptr_eq(&first, &second));
}

#[test]
fn incomplete_credentials_are_rejected_before_any_request() {
	let client = Client::default();
	let err = client
		.authenticate("alice", None, Some(AuthMethod::OAuthPasswordCredentials))
		.expect_err("A plain login cannot carry password grant credentials.");

	assert!(matches!(
		err,
		Error::Config(ConfigError::IncompleteCredentials {
			method: AuthMethod::OAuthPasswordCredentials,
			..
		})
	));
	assert!(matches!(
		client.authenticate("alice", None, None),
		Err(Error::Config(ConfigError::MissingAuthMethod))
	));
}

#[tokio::test]
async fn injected_store_serves_only_the_next_session() -> color_eyre::Result<()> {
	let server = MockServer::start_async().await;
	let store = MemoryStore::default();
	let client = client_with_store(&server, &store);
	let token_a = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH).body_includes("client_id=client-a");
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("token-a", 3600));
		})
		.await;
	let token_b = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH).body_includes("client_id=client-b");
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("token-b", 3600));
		})
		.await;
	let api_a = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/user").header("authorization", "Bearer token-a");
			then.status(200).body("{}");
		})
		.await;
	let api_b = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/user").header("authorization", "Bearer token-b");
			then.status(200).body("{}");
		})
		.await;

	client.authenticate("client-a", Some("secret-a"), Some(AuthMethod::OAuthClientCredentials))?;
	client.users()?.me().await?;
	client.authenticate("client-b", Some("secret-b"), Some(AuthMethod::OAuthClientCredentials))?;
	client.users()?.me().await?;

	token_a.assert_calls_async(1).await;
	token_b.assert_calls_async(1).await;
	api_a.assert_calls_async(1).await;
	api_b.assert_calls_async(1).await;

	let held = store.peek().expect("The first session keeps its token in the injected store.");

	assert_eq!(held.value.expose(), "token-a");

	Ok(())
}

#[tokio::test]
async fn option_changes_keep_headers_and_move_the_session() -> color_eyre::Result<()> {
	let first = MockServer::start_async().await;
	let second = MockServer::start_async().await;
	let client = client_for(&first);
	let mut mocks = Vec::new();

	for (server, token) in [(&first, "first-token"), (&second, "second-token")] {
		let token_mock = server
			.mock_async(|when, then| {
				when.method(POST).path(TOKEN_PATH);
				then.status(200)
					.header("content-type", "application/json")
					.body(token_body(token, 3600));
			})
			.await;
		let api_mock = server
			.mock_async(|when, then| {
				when.method(GET)
					.path("/api/v1/user")
					.header("authorization", format!("Bearer {token}"))
					.header("x-tenant", "acme");
				then.status(200).body("{}");
			})
			.await;

		mocks.push((token_mock, api_mock));
	}

	let mut headers = HeaderMap::new();

	headers.insert("x-tenant", HeaderValue::from_static("acme"));
	client.set_headers(headers)?;
	client.authenticate(CLIENT_ID, Some(CLIENT_SECRET), Some(AuthMethod::OAuthClientCredentials))?;
	client.users()?.me().await?;
	client.set_option("timeout", 5_u64)?;
	client.set_option("base_uri", second.base_url())?;
	client.users()?.me().await?;

	for (token_mock, api_mock) in &mocks {
		token_mock.assert_calls_async(1).await;
		api_mock.assert_calls_async(1).await;
	}

	let http = client.http_client()?;

	assert_eq!(http.base_url().as_str(), format!("{}/", second.base_url()));
	assert_eq!(
		http.custom_headers().get("x-tenant").and_then(|value| value.to_str().ok()),
		Some("acme")
	);
	assert_eq!(client.auth_method(), Some(AuthMethod::OAuthClientCredentials));

	Ok(())
}
