//! Async client for the Myfox home-automation cloud API.
//!
//! [`Client`] refreshes its OAuth 2.0 access token lazily, coalescing concurrent refreshes into a
//! single request, and exposes one typed accessor per vendor resource. Vendor envelopes are
//! unwrapped into payloads or into [`Error`](error::Error) values naming the failed call.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod oauth;
pub mod obs;
pub mod resources;
pub mod store;
pub mod token;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		api::Client,
		config::ClientConfig,
		http::ReqwestHttpClient,
		store::{CredentialStore, MemoryStore},
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = Client<ReqwestHttpClient>;

	/// Client identifier shared by test fixtures.
	pub const TEST_CLIENT_ID: &str = "client-test";
	/// Client secret shared by test fixtures.
	pub const TEST_CLIENT_SECRET: &str = "secret-test";
	/// Initial refresh token shared by test fixtures.
	pub const TEST_REFRESH_TOKEN: &str = "refresh-test";

	/// Builds a reqwest HTTP client that never follows redirects, mirroring production use.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.expect("Failed to build Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Returns a fully populated configuration pointing both the API and the token endpoint at
	/// `base` (typically an `httpmock` server URL).
	pub fn test_config(base: &str) -> ClientConfig {
		let api_url = Url::parse(base).expect("Mock server URL should parse successfully.");
		let token_url =
			api_url.join("/oauth2/token").expect("Mock token URL should join successfully.");

		ClientConfig::new(api_url, token_url)
			.with_refresh_token(TEST_REFRESH_TOKEN)
			.with_client_id(TEST_CLIENT_ID)
			.with_client_secret(TEST_CLIENT_SECRET)
	}

	/// Constructs a [`Client`] backed by an in-memory credential store and the reqwest transport
	/// used across integration tests.
	pub fn build_reqwest_test_client(config: ClientConfig) -> (ReqwestTestClient, Arc<MemoryStore>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn CredentialStore> = store_backend.clone();
		let client = Client::with_http_client(config, test_reqwest_http_client(), store);

		(client, store_backend)
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tracing_subscriber as _};

#[cfg(feature = "reqwest")] pub use api::DefaultClient;
pub use api::Client;
pub use config::ClientConfig;
