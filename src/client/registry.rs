//! Explicit name-to-constructor table for resource wrappers.

// self
use crate::{
	_prelude::*,
	api::{CurrentUser, Endpoint, Tours, Users},
	http::HttpClient,
};

/// Builds a resource wrapper bound to an HTTP client.
pub type EndpointConstructor = fn(Arc<HttpClient>) -> Arc<dyn Endpoint>;

/// Registry entry resolved from a name or alias.
#[derive(Clone, Copy)]
pub struct EndpointEntry {
	/// Canonical name; also the endpoint cache key.
	pub name: &'static str,
	/// Wrapper constructor.
	pub construct: EndpointConstructor,
}
impl Debug for EndpointEntry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("EndpointEntry").field("name", &self.name).finish()
	}
}

/// Maps lower-cased resource names and aliases onto wrapper constructors.
#[derive(Clone, Debug)]
pub struct EndpointRegistry {
	entries: HashMap<String, EndpointEntry>,
}
impl EndpointRegistry {
	/// Creates a registry with no resources.
	pub fn empty() -> Self {
		Self { entries: HashMap::new() }
	}

	/// Registers `construct` under `name` and every alias.
	pub fn register(
		&mut self,
		name: &'static str,
		aliases: &[&str],
		construct: EndpointConstructor,
	) -> &mut Self {
		let entry = EndpointEntry { name, construct };

		for key in std::iter::once(&name).chain(aliases) {
			self.entries.insert(key.to_ascii_lowercase(), entry);
		}

		self
	}

	/// Finds the entry for `name`, ignoring ASCII case.
	pub fn lookup(&self, name: &str) -> Option<EndpointEntry> {
		self.entries.get(&name.to_ascii_lowercase()).copied()
	}
}
impl Default for EndpointRegistry {
	fn default() -> Self {
		let mut registry = Self::empty();

		registry
			.register(Users::NAME, &["user"], |http| Arc::new(Users::new(http)))
			.register(Tours::NAME, &["tour"], |http| Arc::new(Tours::new(http)))
			.register(CurrentUser::NAME, &["me", "current_user"], |http| {
				Arc::new(CurrentUser::new(http))
			});

		registry
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn aliases_resolve_to_canonical_names() {
		let registry = EndpointRegistry::default();

		assert_eq!(registry.lookup("Users").map(|e| e.name), Some("users"));
		assert_eq!(registry.lookup("user").map(|e| e.name), Some("users"));
		assert_eq!(registry.lookup("TOUR").map(|e| e.name), Some("tours"));
		assert_eq!(registry.lookup("me").map(|e| e.name), Some("currentuser"));
		assert_eq!(registry.lookup("CurrentUser").map(|e| e.name), Some("currentuser"));
		assert!(registry.lookup("invoices").is_none());
	}
}
