//! `/api/v1/tour`: tour CRUD.

// self
use crate::{
	_prelude::*,
	api::{self, API_BASE, Endpoint},
	http::{ApiResponse, HttpClient},
};

/// Tours resource.
#[derive(Clone, Debug)]
pub struct Tours {
	http_client: Arc<HttpClient>,
}
impl Tours {
	/// Registry name.
	pub const NAME: &str = "tours";

	/// Binds the wrapper to `http_client`.
	pub fn new(http_client: Arc<HttpClient>) -> Self {
		Self { http_client }
	}

	fn path() -> String {
		format!("{API_BASE}/tour")
	}

	/// Lists tours; `page` defaults to 1.
	pub async fn all(&self, params: &[(&str, &str)]) -> Result<ApiResponse> {
		self.http_client.get(&Self::path(), &api::page_query(params, "1")).await
	}

	/// A tour by id.
	pub async fn show(&self, id: u64) -> Result<ApiResponse> {
		self.http_client.get(&api::member_path(&Self::path(), id), &[]).await
	}

	/// Creates a tour.
	pub async fn create(&self, params: &serde_json::Value) -> Result<ApiResponse> {
		self.http_client.post(&Self::path(), Some(params), HeaderMap::new()).await
	}

	/// Updates the given attributes of a tour.
	pub async fn update(&self, id: u64, params: &serde_json::Value) -> Result<ApiResponse> {
		self.http_client
			.patch(&api::member_path(&Self::path(), id), Some(params), HeaderMap::new())
			.await
	}

	/// Deletes a tour.
	pub async fn remove(&self, id: u64) -> Result<ApiResponse> {
		self.http_client.delete(&api::member_path(&Self::path(), id), None, HeaderMap::new()).await
	}
}
impl Endpoint for Tours {
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
