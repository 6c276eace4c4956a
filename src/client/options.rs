//! Fixed client option set with string-keyed access.

// std
use std::path::PathBuf;
// self
use crate::{_prelude::*, error::ConfigError};

/// Client configuration applied when the HTTP client is built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
	/// API base URI; resource paths and the token endpoint are resolved against it.
	pub base_uri: String,
	/// `User-Agent` sent with every request.
	pub user_agent: String,
	/// Request timeout in seconds.
	pub timeout: u64,
	/// Requests-per-hour budget advertised by the API.
	pub api_limit: u64,
	/// Directory for persisted OAuth tokens; `None` keeps tokens in memory.
	pub cache_dir: Option<PathBuf>,
}
impl ClientOptions {
	/// Names accepted by [`get`](Self::get) and [`set`](Self::set).
	pub const NAMES: [&str; 5] = ["base_uri", "user_agent", "timeout", "api_limit", "cache_dir"];

	/// Reads the option called `name`.
	pub fn get(&self, name: &str) -> Result<OptionValue, ConfigError> {
		Ok(match canonical(name)? {
			"base_uri" => OptionValue::Text(self.base_uri.clone()),
			"user_agent" => OptionValue::Text(self.user_agent.clone()),
			"timeout" => OptionValue::Number(self.timeout),
			"api_limit" => OptionValue::Number(self.api_limit),
			_ => OptionValue::Path(self.cache_dir.clone()),
		})
	}

	/// Overwrites the option called `name`.
	pub fn set(&mut self, name: &str, value: impl Into<OptionValue>) -> Result<(), ConfigError> {
		let value = value.into();

		match (canonical(name)?, value) {
			("base_uri", OptionValue::Text(uri)) => {
				Url::parse(&uri).map_err(|source| ConfigError::InvalidBaseUri { source })?;

				self.base_uri = uri;
			},
			("user_agent", OptionValue::Text(agent)) => self.user_agent = agent,
			("timeout", OptionValue::Number(secs)) if secs > 0 => self.timeout = secs,
			("timeout", _) =>
				return Err(ConfigError::InvalidOptionValue {
					name: "timeout",
					expected: "a positive number of seconds",
				}),
			("api_limit", OptionValue::Number(limit)) => self.api_limit = limit,
			("cache_dir", OptionValue::Path(dir)) => self.cache_dir = dir,
			("cache_dir", OptionValue::Text(dir)) => self.cache_dir = Some(dir.into()),
			(name @ ("base_uri" | "user_agent"), _) =>
				return Err(ConfigError::InvalidOptionValue { name, expected: "a string" }),
			(name, _) =>
				return Err(ConfigError::InvalidOptionValue {
					name,
					expected: if name == "api_limit" { "a number" } else { "a path" },
				}),
		}

		Ok(())
	}

	/// Parsed base URI, normalized to end with `/` so relative paths append to it.
	pub fn base_url(&self) -> Result<Url, ConfigError> {
		let mut url =
			Url::parse(&self.base_uri).map_err(|source| ConfigError::InvalidBaseUri { source })?;

		if !url.path().ends_with('/') {
			let path = format!("{}/", url.path());

			url.set_path(&path);
		}

		Ok(url)
	}

	/// Request timeout as a standard duration.
	pub fn timeout(&self) -> std::time::Duration {
		std::time::Duration::from_secs(self.timeout)
	}
}
impl Default for ClientOptions {
	fn default() -> Self {
		Self {
			base_uri: "https://ptpkg.dev/".into(),
			user_agent: "ptpkg-api (http://github.com/ammonkc/ptpkg-api)".into(),
			timeout: 10,
			api_limit: 5000,
			cache_dir: None,
		}
	}
}

/// Value of a single client option.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionValue {
	/// `base_uri`, `user_agent`.
	Text(String),
	/// `timeout`, `api_limit`.
	Number(u64),
	/// `cache_dir`.
	Path(Option<PathBuf>),
}
impl From<&str> for OptionValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_owned())
	}
}
impl From<String> for OptionValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}
impl From<u64> for OptionValue {
	fn from(value: u64) -> Self {
		Self::Number(value)
	}
}
impl From<PathBuf> for OptionValue {
	fn from(value: PathBuf) -> Self {
		Self::Path(Some(value))
	}
}
impl From<Option<PathBuf>> for OptionValue {
	fn from(value: Option<PathBuf>) -> Self {
		Self::Path(value)
	}
}

fn canonical(name: &str) -> Result<&'static str, ConfigError> {
	ClientOptions::NAMES
		.into_iter()
		.find(|known| known.eq_ignore_ascii_case(name))
		.ok_or_else(|| ConfigError::UnknownOption { name: name.to_owned() })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_match_the_public_api() {
		let options = ClientOptions::default();

		assert_eq!(
			options.get("base_uri").ok(),
			Some(OptionValue::Text("https://ptpkg.dev/".into()))
		);
		assert_eq!(options.get("timeout").ok(), Some(OptionValue::Number(10)));
		assert_eq!(options.get("api_limit").ok(), Some(OptionValue::Number(5000)));
		assert_eq!(options.get("cache_dir").ok(), Some(OptionValue::Path(None)));
	}

	#[test]
	fn set_validates_names_and_types() {
		let mut options = ClientOptions::default();

		options.set("timeout", 30_u64).expect("Numeric timeout should be accepted.");
		options.set("USER_AGENT", "custom/1.0").expect("Names are matched case-insensitively.");
		options.set("cache_dir", "/tmp/ptpkg").expect("Text paths should be accepted.");

		assert_eq!(options.timeout, 30);
		assert_eq!(options.user_agent, "custom/1.0");
		assert_eq!(options.cache_dir, Some(PathBuf::from("/tmp/ptpkg")));
		assert!(matches!(
			options.set("colour", "blue"),
			Err(ConfigError::UnknownOption { name }) if name == "colour"
		));
		assert!(matches!(
			options.set("timeout", "ten"),
			Err(ConfigError::InvalidOptionValue { name: "timeout", .. })
		));
		assert!(matches!(
			options.set("timeout", 0_u64),
			Err(ConfigError::InvalidOptionValue { name: "timeout", .. })
		));
		assert!(matches!(
			options.set("api_limit", "lots"),
			Err(ConfigError::InvalidOptionValue { name: "api_limit", expected: "a number" })
		));
		assert!(matches!(
			options.set("base_uri", "not a uri"),
			Err(ConfigError::InvalidBaseUri { .. })
		));
	}

	#[test]
	fn base_url_gains_a_trailing_slash() {
		let mut options = ClientOptions::default();

		options.set("base_uri", "https://example.com/v2").expect("Valid URI should be accepted.");

		let url = options.base_url().expect("Base URI should parse.");

		assert_eq!(url.as_str(), "https://example.com/v2/");
		assert_eq!(
			url.join("api/v1/user").map(String::from).ok(),
			Some("https://example.com/v2/api/v1/user".to_owned())
		);
	}

	#[test]
	fn options_deserialize_with_defaults() {
		let options: ClientOptions = serde_json::from_str("{\"timeout\":3}")
			.expect("Partial options should deserialize.");

		assert_eq!(options.timeout, 3);
		assert_eq!(options.api_limit, 5000);
	}
}
