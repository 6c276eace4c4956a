//! `/api/v1/user`: listing, showing, creating, and updating users.

// self
use crate::{
	_prelude::*,
	api::{self, API_BASE, Endpoint},
	http::{ApiResponse, HttpClient},
};

/// Users resource.
#[derive(Clone, Debug)]
pub struct Users {
	http_client: Arc<HttpClient>,
}
impl Users {
	/// Registry name.
	pub const NAME: &str = "users";

	/// Binds the wrapper to `http_client`.
	pub fn new(http_client: Arc<HttpClient>) -> Self {
		Self { http_client }
	}

	fn path() -> String {
		format!("{API_BASE}/user")
	}

	/// Lists users; `page` defaults to 1.
	pub async fn all(&self, params: &[(&str, &str)]) -> Result<ApiResponse> {
		self.http_client.get(&Self::path(), &api::page_query(params, "1")).await
	}

	/// The authenticated user.
	pub async fn me(&self) -> Result<ApiResponse> {
		self.http_client.get(&Self::path(), &[]).await
	}

	/// A user by id.
	pub async fn show(&self, id: u64) -> Result<ApiResponse> {
		self.http_client.get(&api::member_path(&Self::path(), id), &[]).await
	}

	/// Creates a user.
	pub async fn create(&self, params: &serde_json::Value) -> Result<ApiResponse> {
		self.http_client.post(&Self::path(), Some(params), HeaderMap::new()).await
	}

	/// Updates the given attributes of a user.
	pub async fn update(&self, id: u64, params: &serde_json::Value) -> Result<ApiResponse> {
		self.http_client
			.patch(&api::member_path(&Self::path(), id), Some(params), HeaderMap::new())
			.await
	}
}
impl Endpoint for Users {
	fn name(&self) -> &'static str {
		Self::NAME
	}

	fn http_client(&self) -> &Arc<HttpClient> {
		&self.http_client
	}

	fn into_any(self: Arc<Self>) -> Arc<dyn std::any::Any + Send + Sync> {
		self
	}
}
