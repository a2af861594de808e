//! Authenticated client and the request executor shared by every resource accessor.

// crates.io
use oauth2::{
	AsyncHttpClient,
	http::{Method, Request, header},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	config::ClientConfig,
	error::ConfigError,
	http::{self, HttpTransport, ResponseMetadataSlot},
	obs::{self, CallKind, CallOutcome, CallSpan},
	store::CredentialStore,
	token::TokenManager,
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, store::MemoryStore};

/// Envelope status reported by successful calls.
pub const ENVELOPE_OK: &str = "OK";

const ACCESS_TOKEN_PARAM: &str = "access_token";

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type DefaultClient = Client<ReqwestHttpClient>;

/// Authenticated client for the vendor REST API.
///
/// Cloning is cheap; clones share the transport, configuration, and token state, so a refresh
/// triggered through one clone serves every other.
pub struct Client<C>
where
	C: ?Sized + HttpTransport,
{
	http_client: Arc<C>,
	config: Arc<ClientConfig>,
	tokens: TokenManager<C>,
}
impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a client that reuses the caller-provided transport and credential store.
	pub fn with_http_client(
		config: ClientConfig,
		http_client: impl Into<Arc<C>>,
		store: Arc<dyn CredentialStore>,
	) -> Self {
		let config = Arc::new(config);
		let http_client = http_client.into();
		let tokens = TokenManager::new(config.clone(), http_client.clone(), store);

		Self { http_client, config, tokens }
	}

	/// Creates a client whose refresh credential is loaded from `store` when one was persisted.
	///
	/// A stored credential takes precedence over `config.refresh_token`, since it is the latest
	/// rotation issued by the token endpoint.
	pub async fn restore(
		mut config: ClientConfig,
		http_client: impl Into<Arc<C>>,
		store: Arc<dyn CredentialStore>,
	) -> Result<Self> {
		if let Some(secret) = store.load_refresh_token().await? {
			config.refresh_token = Some(secret);
		}

		Ok(Self::with_http_client(config, http_client, store))
	}

	/// Seeds a previously issued access token.
	pub fn with_access_token(self, token: AccessToken) -> Self {
		let Self { http_client, config, tokens } = self;

		Self { http_client, config, tokens: tokens.with_access_token(token) }
	}

	/// Configuration the client was built with.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Token manager shared by this client and its clones.
	pub fn tokens(&self) -> &TokenManager<C> {
		&self.tokens
	}

	/// Returns a valid access token, refreshing it first when needed.
	pub async fn valid_token(&self) -> Result<AccessToken> {
		self.tokens.valid_token().await
	}

	/// Issues one authenticated call and returns the unwrapped envelope payload.
	///
	/// `path` is resolved against the configured API URL. `action` names the call in errors,
	/// spans, and log events.
	pub async fn execute<T>(&self, action: &'static str, method: Method, path: &str) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.execute_with_query(action, method, path, &[]).await
	}

	/// Same as [`execute`](Self::execute), appending `query` pairs ahead of the access token.
	pub async fn execute_with_query<T>(
		&self,
		action: &'static str,
		method: Method,
		path: &str,
		query: &[(&str, String)],
	) -> Result<T>
	where
		T: DeserializeOwned,
	{
		const KIND: CallKind = CallKind::Resource;

		let span = CallSpan::new(KIND, action);

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span.instrument(self.send(action, method, path, query)).await;

		obs::record_call_outcome(KIND, CallOutcome::of(&result));

		result
	}

	async fn send<T>(
		&self,
		action: &'static str,
		method: Method,
		path: &str,
		query: &[(&str, String)],
	) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let token = self.tokens.valid_token().await?;
		let url = resource_url(&self.config.api_url, path, query, &token)?;

		obs::debug_event!(self.config.debug, action, method = %method, path, "calling API");

		let request = Request::builder()
			.method(method)
			.uri(url.as_str())
			.header(header::ACCEPT, "application/json")
			.body(Vec::new())
			.map_err(ConfigError::from)?;
		let handle = self.http_client.with_metadata(ResponseMetadataSlot::default());
		let response = handle.call(request).await.map_err(http::map_transport_error)?;
		let status = response.status();
		let body = String::from_utf8_lossy(response.body()).into_owned();

		if !status.is_success() {
			obs::debug_event!(
				self.config.debug,
				action,
				status = status.as_u16(),
				body = %body,
				"API call failed"
			);

			return Err(Error::Http {
				action,
				status: status.as_u16(),
				status_text: status.canonical_reason().unwrap_or_default().to_owned(),
			});
		}

		obs::debug_event!(self.config.debug_payloads, action, body = %body, "API response");

		unwrap_envelope(action, body)
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestHttpClient> {
	/// Creates a client with the default reqwest transport and an in-memory credential store.
	pub fn new(config: ClientConfig) -> Result<Self> {
		Ok(Self::with_http_client(
			config,
			ReqwestHttpClient::try_new()?,
			Arc::new(MemoryStore::default()),
		))
	}
}
impl<C> Clone for Client<C>
where
	C: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			config: self.config.clone(),
			tokens: self.tokens.clone(),
		}
	}
}
impl<C> Debug for Client<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("api_url", &self.config.api_url.as_str())
			.field("tokens", &self.tokens)
			.finish()
	}
}

/// Resolves `path` below `api_url` and appends `query` followed by the access token.
///
/// `api_url` is treated as a directory even without a trailing slash, so a path prefix such as
/// `https://host/api` is kept.
fn resource_url(
	api_url: &Url,
	path: &str,
	query: &[(&str, String)],
	token: &AccessToken,
) -> Result<Url, ConfigError> {
	let mut base = api_url.clone();

	if !base.path().ends_with('/') {
		let directory = format!("{}/", base.path());

		base.set_path(&directory);
	}

	let mut url = base
		.join(path.trim_start_matches('/'))
		.map_err(|source| ConfigError::InvalidUrl { url: path.to_owned(), source })?;

	{
		let mut pairs = url.query_pairs_mut();

		for (key, value) in query {
			pairs.append_pair(key, value);
		}

		pairs.append_pair(ACCESS_TOKEN_PARAM, token.expose());
	}

	Ok(url)
}

#[derive(Deserialize)]
struct Envelope {
	status: String,
	#[serde(default)]
	payload: serde_json::Value,
}

/// Parses a raw body and returns its payload when the envelope reports success.
fn unwrap_envelope<T>(action: &'static str, body: String) -> Result<T>
where
	T: DeserializeOwned,
{
	let value: serde_json::Value = match parse(&body) {
		Ok(value) => value,
		Err(source) => {
			obs::error_event!(action, body = %body, "API returned an unparseable body");

			return Err(Error::Parse { action, body, source });
		},
	};
	let envelope: Envelope = match serde_path_to_error::deserialize(&value) {
		Ok(envelope) => envelope,
		Err(source) => {
			obs::error_event!(action, body = %body, "API returned a body without an envelope");

			return Err(Error::Parse { action, body, source });
		},
	};

	if envelope.status != ENVELOPE_OK {
		return Err(Error::Api { action, status: envelope.status, envelope: value });
	}

	serde_path_to_error::deserialize(&envelope.payload).map_err(|source| {
		obs::error_event!(
			action,
			payload = %envelope.payload,
			"API payload has an unexpected shape"
		);

		Error::Parse { action, body: envelope.payload.to_string(), source }
	})
}

fn parse(body: &str) -> Result<serde_json::Value, serde_path_to_error::Error<serde_json::Error>> {
	let mut deserializer = serde_json::Deserializer::from_str(body);

	serde_path_to_error::deserialize(&mut deserializer)
}
