//! Maps token endpoint failures onto [`AuthError`](crate::error::AuthError) categories.
//!
//! Structured OAuth fields (`error`, `error_description`) win, then hints found in the raw
//! body, and finally the HTTP status code.

// self
use crate::oauth::GrantType;

/// Canonical categories for token endpoint failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenErrorKind {
	/// The grant (credentials or refresh token) was rejected.
	InvalidGrant,
	/// Client authentication failed.
	InvalidClient,
	/// Anything else; surfaced as an unexpected token endpoint response.
	Unexpected,
}

/// Primitive data describing a failed token request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenErrorContext {
	/// Grant used by the failing request.
	pub grant: GrantType,
	/// HTTP status code, when a response arrived.
	pub status: Option<u16>,
	/// OAuth `error` field.
	pub oauth_error: Option<String>,
	/// OAuth `error_description` field.
	pub error_description: Option<String>,
	/// Preview of a body that was not a valid OAuth error document.
	pub body_preview: Option<String>,
}
impl TokenErrorContext {
	const BODY_PREVIEW_LIMIT: usize = 256;

	/// Creates an empty context for `grant`.
	pub fn new(grant: GrantType) -> Self {
		Self { grant, status: None, oauth_error: None, error_description: None, body_preview: None }
	}

	/// Adds the HTTP status code.
	pub fn with_status(mut self, status: Option<u16>) -> Self {
		self.status = status;

		self
	}

	/// Adds the OAuth `error` field.
	pub fn with_oauth_error(mut self, error: impl Into<String>) -> Self {
		self.oauth_error = Some(error.into());

		self
	}

	/// Adds the OAuth `error_description` field.
	pub fn with_error_description(mut self, description: impl Into<String>) -> Self {
		self.error_description = Some(description.into());

		self
	}

	/// Adds a truncated preview of a raw response body.
	pub fn with_body_preview(mut self, body: &[u8]) -> Self {
		let text = String::from_utf8_lossy(body);

		self.body_preview = Some(truncate_preview(&text));

		self
	}

	/// Classifies the failure.
	pub fn classify(&self) -> TokenErrorKind {
		self.oauth_error
			.as_deref()
			.and_then(match_exact_value)
			.or_else(|| self.error_description.as_deref().and_then(match_body_hint))
			.or_else(|| self.body_preview.as_deref().and_then(match_body_hint))
			.unwrap_or_else(|| classify_status(self.status))
	}
}

fn truncate_preview(body: &str) -> String {
	if body.chars().count() <= TokenErrorContext::BODY_PREVIEW_LIMIT {
		return body.to_owned();
	}

	let mut buf = body.chars().take(TokenErrorContext::BODY_PREVIEW_LIMIT).collect::<String>();

	buf.push('…');

	buf
}

fn match_exact_value(value: &str) -> Option<TokenErrorKind> {
	if value.eq_ignore_ascii_case("invalid_grant") || value.eq_ignore_ascii_case("access_denied") {
		Some(TokenErrorKind::InvalidGrant)
	} else if value.eq_ignore_ascii_case("invalid_client")
		|| value.eq_ignore_ascii_case("unauthorized_client")
	{
		Some(TokenErrorKind::InvalidClient)
	} else {
		None
	}
}

fn match_body_hint(body: &str) -> Option<TokenErrorKind> {
	let lowered = body.to_ascii_lowercase();

	match lowered.as_str() {
		text if text.contains("invalid_grant") => Some(TokenErrorKind::InvalidGrant),
		text if text.contains("invalid_client") => Some(TokenErrorKind::InvalidClient),
		_ => None,
	}
}

fn classify_status(status: Option<u16>) -> TokenErrorKind {
	match status {
		Some(400) => TokenErrorKind::InvalidGrant,
		Some(401) => TokenErrorKind::InvalidClient,
		_ => TokenErrorKind::Unexpected,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn ctx() -> TokenErrorContext {
		TokenErrorContext::new(GrantType::RefreshToken)
	}

	#[test]
	fn oauth_error_field_wins_over_status() {
		let kind = ctx().with_status(Some(401)).with_oauth_error("invalid_grant").classify();

		assert_eq!(kind, TokenErrorKind::InvalidGrant);

		let kind = ctx().with_status(Some(400)).with_oauth_error("unauthorized_client").classify();

		assert_eq!(kind, TokenErrorKind::InvalidClient);
	}

	#[test]
	fn body_hints_apply_before_status() {
		let kind = ctx()
			.with_status(Some(500))
			.with_body_preview(b"<html>error: INVALID_GRANT</html>")
			.classify();

		assert_eq!(kind, TokenErrorKind::InvalidGrant);
	}

	#[test]
	fn status_fallback() {
		assert_eq!(ctx().with_status(Some(400)).classify(), TokenErrorKind::InvalidGrant);
		assert_eq!(ctx().with_status(Some(401)).classify(), TokenErrorKind::InvalidClient);
		assert_eq!(ctx().with_status(Some(503)).classify(), TokenErrorKind::Unexpected);
		assert_eq!(ctx().classify(), TokenErrorKind::Unexpected);
	}

	#[test]
	fn long_bodies_are_truncated() {
		let body = "x".repeat(1_000);
		let preview = ctx().with_body_preview(body.as_bytes()).body_preview.unwrap_or_default();

		assert_eq!(preview.chars().count(), TokenErrorContext::BODY_PREVIEW_LIMIT + 1);
		assert!(preview.ends_with('…'));
	}
}
