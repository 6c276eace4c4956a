//! `/api/v1/me`: profile of the authenticated user.

// self
use crate::{
	_prelude::*,
	api::{API_BASE, Endpoint},
	http::{ApiResponse, HttpClient},
};

/// `/api/v1/me`: the authenticated user.
#[derive(Clone, Debug)]
pub struct CurrentUser {
	http_client: Arc<HttpClient>,
}
impl CurrentUser {
	/// Registry name.
	pub const NAME: &str = "currentuser";

	/// Binds the wrapper to `http_client`.
	pub fn new(http_client: Arc<HttpClient>) -> Self {
		Self { http_client }
	}

	/// Profile of the authenticated user.
	pub async fn show(&self) -> Result<ApiResponse> {
		self.http_client.get(&format!("{API_BASE}/me"), &[]).await
	}
}
impl Endpoint for CurrentUser {
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
