//! Host-supplied client configuration.
//!
//! Hosts hand the client a JSON object (camelCase keys) that may omit credentials entirely;
//! credentials are validated lazily the first time a token is needed, never at construction.

// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Default base URL of the vendor REST API.
pub const DEFAULT_API_URL: &str = "https://api.myfox.me";
/// Default OAuth 2.0 token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://api.myfox.me/oauth2/token";

/// Configuration consumed by [`Client`](crate::api::Client).
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
	/// Refresh credential exchanged for access tokens.
	#[serde(default)]
	pub refresh_token: Option<TokenSecret>,
	/// OAuth 2.0 client identifier.
	#[serde(default)]
	pub client_id: Option<String>,
	/// OAuth 2.0 client secret.
	#[serde(default)]
	pub client_secret: Option<TokenSecret>,
	/// Emits general debug events (requests, refreshes, HTTP failures).
	#[serde(default)]
	pub debug: bool,
	/// Emits raw response bodies as debug events.
	#[serde(default)]
	pub debug_payloads: bool,
	/// Base URL of the REST API.
	///
	/// Resource paths are resolved below it; a path prefix is kept with or without a trailing
	/// slash.
	#[serde(default = "default_api_url")]
	pub api_url: Url,
	/// OAuth 2.0 token endpoint.
	#[serde(default = "default_token_url")]
	pub token_url: Url,
}
impl ClientConfig {
	/// Creates a configuration for the provided endpoints with no credentials set.
	pub fn new(api_url: Url, token_url: Url) -> Self {
		Self {
			refresh_token: None,
			client_id: None,
			client_secret: None,
			debug: false,
			debug_payloads: false,
			api_url,
			token_url,
		}
	}

	/// Deserializes a host-supplied JSON object, reporting the offending path on failure.
	pub fn from_value(value: serde_json::Value) -> Result<Self> {
		serde_path_to_error::deserialize(value)
			.map_err(|source| ConfigError::Parse { source }.into())
	}

	/// Sets or replaces the refresh credential.
	pub fn with_refresh_token(mut self, token: impl Into<TokenSecret>) -> Self {
		self.refresh_token = Some(token.into());

		self
	}

	/// Sets or replaces the client identifier.
	pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Sets or replaces the client secret.
	pub fn with_client_secret(mut self, secret: impl Into<TokenSecret>) -> Self {
		self.client_secret = Some(secret.into());

		self
	}

	/// Toggles general debug events.
	pub fn with_debug(mut self, enabled: bool) -> Self {
		self.debug = enabled;

		self
	}

	/// Toggles raw payload debug events.
	pub fn with_debug_payloads(mut self, enabled: bool) -> Self {
		self.debug_payloads = enabled;

		self
	}

	/// Returns the client identifier and secret, failing on the first missing field.
	pub(crate) fn client_credentials(&self) -> Result<(&str, &TokenSecret), ConfigError> {
		let client_id = self
			.client_id
			.as_deref()
			.filter(|value| !value.is_empty())
			.ok_or(ConfigError::MissingCredential { field: "clientId" })?;
		let client_secret = self
			.client_secret
			.as_ref()
			.filter(|value| !value.expose().is_empty())
			.ok_or(ConfigError::MissingCredential { field: "clientSecret" })?;

		Ok((client_id, client_secret))
	}
}
impl Default for ClientConfig {
	fn default() -> Self {
		Self::new(default_api_url(), default_token_url())
	}
}
impl Debug for ClientConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientConfig")
			.field("refresh_token_set", &self.refresh_token.is_some())
			.field("client_id", &self.client_id)
			.field("client_secret_set", &self.client_secret.is_some())
			.field("debug", &self.debug)
			.field("debug_payloads", &self.debug_payloads)
			.field("api_url", &self.api_url.as_str())
			.field("token_url", &self.token_url.as_str())
			.finish()
	}
}

fn default_api_url() -> Url {
	Url::parse(DEFAULT_API_URL).expect("Default API URL must parse.")
}

fn default_token_url() -> Url {
	Url::parse(DEFAULT_TOKEN_URL).expect("Default token URL must parse.")
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn host_json_uses_camel_case_and_defaults() {
		let config = ClientConfig::from_value(serde_json::json!({
			"refreshToken": "refresh-1",
			"clientId": "client-1",
			"clientSecret": "secret-1",
			"debugPayloads": true,
		}))
		.expect("Host configuration should deserialize.");

		assert_eq!(config.refresh_token.as_ref().map(TokenSecret::expose), Some("refresh-1"));
		assert_eq!(config.client_id.as_deref(), Some("client-1"));
		assert!(!config.debug);
		assert!(config.debug_payloads);
		assert_eq!(config.api_url.as_str(), "https://api.myfox.me/");
		assert_eq!(config.token_url.as_str(), DEFAULT_TOKEN_URL);
	}

	#[test]
	fn credentials_are_optional_until_used() {
		let config = ClientConfig::from_value(serde_json::json!({}))
			.expect("Empty configuration should deserialize.");

		assert!(matches!(
			config.client_credentials(),
			Err(ConfigError::MissingCredential { field: "clientId" })
		));

		let config = config.with_client_id("client-1");

		assert!(matches!(
			config.client_credentials(),
			Err(ConfigError::MissingCredential { field: "clientSecret" })
		));
	}

	#[test]
	fn invalid_values_report_their_path() {
		let err = ClientConfig::from_value(serde_json::json!({ "apiUrl": "not a url" }))
			.expect_err("Invalid URL should be rejected.");

		match err {
			Error::Config(ConfigError::Parse { source }) =>
				assert_eq!(source.path().to_string(), "apiUrl"),
			other => panic!("Unexpected error: {other:?}"),
		}
	}

	#[test]
	fn debug_output_redacts_secrets() {
		let rendered = format!(
			"{:?}",
			ClientConfig::default().with_refresh_token("refresh-1").with_client_secret("secret-1")
		);

		assert!(!rendered.contains("refresh-1"));
		assert!(!rendered.contains("secret-1"));
	}
}
