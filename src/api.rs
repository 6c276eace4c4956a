//! Thin resource wrappers mapping domain operations onto fixed verb/path pairs.
//!
//! Wrappers are created lazily by [`Client::resolve_endpoint`](crate::Client::resolve_endpoint)
//! and bound to the client's [`HttpClient`]; every call goes through its signing middleware.

pub mod current_user;
pub mod tours;
pub mod users;

pub use current_user::CurrentUser;
pub use tours::Tours;
pub use users::Users;

// std
use std::any::Any;
// self
use crate::{_prelude::*, http::HttpClient};

/// Path prefix shared by every resource.
pub const API_BASE: &str = "/api/v1";

/// Resource wrapper stored in the client's endpoint cache.
pub trait Endpoint
where
	Self: Any + Send + Sync,
{
	/// Canonical registry name.
	fn name(&self) -> &'static str;

	/// HTTP client the wrapper is bound to.
	fn http_client(&self) -> &Arc<HttpClient>;

	/// Upcasts for typed access through [`Client::endpoint`](crate::Client::endpoint).
	fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

fn member_path(collection: &str, id: u64) -> String {
	format!("{collection}/{id}")
}

fn page_query<'a>(params: &'a [(&'a str, &'a str)], page: &'a str) -> Vec<(&'a str, &'a str)> {
	let mut query = Vec::with_capacity(params.len() + 1);

	if !params.iter().any(|(key, _)| *key == "page") {
		query.push(("page", page));
	}

	query.extend_from_slice(params);

	query
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn page_defaults_to_one_unless_given() {
		assert_eq!(page_query(&[("q", "x")], "1"), vec![("page", "1"), ("q", "x")]);
		assert_eq!(page_query(&[("page", "3")], "1"), vec![("page", "3")]);
		assert_eq!(member_path("/api/v1/user", 42), "/api/v1/user/42");
	}
}
