mod common;

// crates.io
use httpmock::prelude::*;
use ptpkg::{auth::AuthMethod, strategy::Signing};
// self
use common::*;

#[tokio::test]
async fn basic_auth_signs_every_request() -> color_eyre::Result<()> {
	let server = MockServer::start_async().await;
	let client = client_for(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v1/user")
				.header("authorization", "Basic YWxpY2U6czNjcmV0")
				.header("accept", "application/json");
			then.status(200).header("content-type", "application/json").body("{\"id\":1}");
		})
		.await;

	client.authenticate("alice", Some("s3cret"), None)?;

	assert_eq!(client.auth_method(), Some(AuthMethod::HttpBasic));

	let users = client.users()?;

	users.me().await?;
	users.me().await?;

	mock.assert_calls_async(2).await;

	let last = client.http_client()?.last_request().expect("A request was sent.");

	assert_eq!(last.signing, Signing::Signed(AuthMethod::HttpBasic));
	assert_eq!(last.authorization(), Some("Basic YWxpY2U6czNjcmV0"));

	Ok(())
}

#[tokio::test]
async fn token_and_jwt_schemes_follow_the_method_name() -> color_eyre::Result<()> {
	let server = MockServer::start_async().await;
	let client = client_for(&server);
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/tour/7").header("authorization", "Token personal");
			then.status(200).body("{}");
		})
		.await;
	let jwt_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/tour/7").header("authorization", "Bearer a.b.c");
			then.status(200).body("{}");
		})
		.await;

	client.authenticate("personal", Some("http_token"), None)?;
	client.tours()?.show(7).await?;
	client.authenticate("a.b.c", Some("jwt_token"), None)?;
	client.tours()?.show(7).await?;

	token_mock.assert_calls_async(1).await;
	jwt_mock.assert_calls_async(1).await;

	Ok(())
}

#[tokio::test]
async fn unauthorized_responses_pass_through_for_header_methods() -> color_eyre::Result<()> {
	let server = MockServer::start_async().await;
	let client = client_for(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/me");
			then.status(401).body("{\"message\":\"Unauthenticated.\"}");
		})
		.await;

	client.authenticate("alice", Some("wrong"), Some(AuthMethod::HttpBasic))?;

	let response = client.current_user()?.show().await?;

	assert_eq!(response.status.as_u16(), 401);
	assert_eq!(response.text(), "{\"message\":\"Unauthenticated.\"}");

	mock.assert_calls_async(1).await;

	Ok(())
}

#[tokio::test]
async fn caller_authorization_header_is_left_untouched() -> color_eyre::Result<()> {
	let server = MockServer::start_async().await;
	let client = client_for(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/user").header("authorization", "Bearer caller");
			then.status(200).body("[]");
		})
		.await;
	let mut headers = ptpkg::reqwest::header::HeaderMap::new();

	headers.insert("authorization", "Bearer caller".parse()?);
	client.authenticate("alice", Some("s3cret"), None)?;
	client.set_headers(headers)?;
	client.users()?.me().await?;

	mock.assert_calls_async(1).await;

	let last = client.http_client()?.last_request().expect("A request was sent.");

	assert_eq!(last.signing, Signing::Preauthorized);

	Ok(())
}

#[tokio::test]
async fn anonymous_requests_carry_default_headers_only() -> color_eyre::Result<()> {
	let server = MockServer::start_async().await;
	let client = client_for(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v1/tour")
				.query_param("page", "1")
				.header("user-agent", "ptpkg-api (http://github.com/ammonkc/ptpkg-api)")
				.header_missing("authorization");
			then.status(200).body("[]");
		})
		.await;
	let response = client.tours()?.all(&[]).await?;

	assert!(response.is_success());

	mock.assert_calls_async(1).await;

	Ok(())
}
