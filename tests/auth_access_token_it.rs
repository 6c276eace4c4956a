mod common;

// crates.io
use httpmock::prelude::*;
use ptpkg::{Error, auth::AuthMethod, error::AuthError};
// self
use common::*;

#[tokio::test]
async fn access_token_is_sent_as_bearer() -> color_eyre::Result<()> {
	let server = MockServer::start_async().await;
	let client = client_for(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/me").header("authorization", "Bearer pre-issued");
			then.status(200).body("{}");
		})
		.await;

	client.authenticate("pre-issued", Some("oauth_token"), None)?;

	assert_eq!(client.auth_method(), Some(AuthMethod::OAuthAccessToken));

	client.current_user()?.show().await?;

	mock.assert_calls_async(1).await;

	Ok(())
}

#[tokio::test]
async fn rejected_access_token_is_fatal() {
	let server = MockServer::start_async().await;
	let client = client_for(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/me");
			then.status(401).body("{\"message\":\"Unauthenticated.\"}");
		})
		.await;

	client
		.authenticate("pre-issued", None, Some(AuthMethod::OAuthAccessToken))
		.expect("Access token session should start.");

	let err = client
		.current_user()
		.expect("Endpoint is registered.")
		.show()
		.await
		.expect_err("A rejected access token cannot be refreshed.");

	assert!(matches!(err, Error::Authentication(AuthError::AccessTokenRejected)));

	mock.assert_calls_async(1).await;

	let last = client
		.http_client()
		.expect("HTTP client is built.")
		.last_response()
		.expect("The 401 response is kept for inspection.");

	assert_eq!(last.status.as_u16(), 401);
}
