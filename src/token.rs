//! Access-token lifecycle with lazy refresh and single-flight coalescing.
//!
//! [`TokenManager::valid_token`] returns the cached access token while it is valid and otherwise
//! performs a `grant_type=refresh_token` exchange. Concurrent callers that find the token expired
//! queue on one guard: the first performs the exchange, the rest receive that exchange's outcome
//! (the same token or the same error) instead of issuing their own request. Every settled
//! exchange bumps an epoch so a later caller, arriving after a failure, starts a fresh attempt.

mod metrics;

pub use metrics::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, TokenSecret},
	config::ClientConfig,
	error::{ConfigError, RefreshError},
	http::HttpTransport,
	oauth::{RefreshFacade, RefreshGrant},
	obs::{self, CallKind, CallOutcome, CallSpan},
	store::CredentialStore,
};

#[derive(Debug, Default)]
struct TokenState {
	access_token: Option<AccessToken>,
	refresh_token: Option<TokenSecret>,
	epoch: u64,
	last_outcome: Option<Result<AccessToken, RefreshError>>,
}
impl TokenState {
	fn valid_token_at(&self, now: OffsetDateTime) -> Option<AccessToken> {
		self.access_token.as_ref().filter(|token| token.is_valid_at(now)).cloned()
	}

	fn refresh_token(&self) -> Result<TokenSecret, ConfigError> {
		self.refresh_token
			.as_ref()
			.filter(|secret| !secret.expose().is_empty())
			.cloned()
			.ok_or(ConfigError::MissingCredential { field: "refreshToken" })
	}
}

/// Owns the access token, its expiry, and the current refresh credential.
pub struct TokenManager<C>
where
	C: ?Sized + HttpTransport,
{
	http_client: Arc<C>,
	config: Arc<ClientConfig>,
	store: Arc<dyn CredentialStore>,
	state: Arc<Mutex<TokenState>>,
	refresh_guard: Arc<AsyncMutex<()>>,
	metrics: Arc<RefreshMetrics>,
}
impl<C> TokenManager<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a manager seeded with the refresh credential from `config`.
	///
	/// Credentials are not validated here; [`valid_token`](Self::valid_token) reports missing
	/// fields the first time a token is requested.
	pub fn new(
		config: Arc<ClientConfig>,
		http_client: Arc<C>,
		store: Arc<dyn CredentialStore>,
	) -> Self {
		let state =
			TokenState { refresh_token: config.refresh_token.clone(), ..Default::default() };

		Self {
			http_client,
			config,
			store,
			state: Arc::new(Mutex::new(state)),
			refresh_guard: Default::default(),
			metrics: Default::default(),
		}
	}

	/// Seeds a previously issued access token (e.g., restored from a host cache).
	pub fn with_access_token(self, token: AccessToken) -> Self {
		self.state.lock().access_token = Some(token);

		self
	}

	/// Returns the cached access token without checking validity or refreshing.
	pub fn current_token(&self) -> Option<AccessToken> {
		self.state.lock().access_token.clone()
	}

	/// Returns the refresh credential that the next exchange will use.
	pub fn refresh_token(&self) -> Option<TokenSecret> {
		self.state.lock().refresh_token.clone()
	}

	/// Replaces the refresh credential used by the next exchange.
	pub fn replace_refresh_token(&self, secret: TokenSecret) {
		self.state.lock().refresh_token = Some(secret);
	}

	/// Refresh counters for this manager and all of its clones.
	pub fn metrics(&self) -> &RefreshMetrics {
		&self.metrics
	}

	/// Returns a valid access token, refreshing it first when the cached one has expired.
	pub async fn valid_token(&self) -> Result<AccessToken> {
		let observed_epoch = {
			let state = self.state.lock();

			state.refresh_token()?;
			self.config.client_credentials()?;

			if let Some(token) = state.valid_token_at(OffsetDateTime::now_utc()) {
				return Ok(token);
			}

			state.epoch
		};
		let _singleflight = self.refresh_guard.lock().await;

		{
			let state = self.state.lock();

			if state.epoch != observed_epoch {
				if let Some(outcome) = &state.last_outcome {
					self.metrics.record_joined();

					return outcome.clone().map_err(Error::from);
				}
			}
			if let Some(token) = state.valid_token_at(OffsetDateTime::now_utc()) {
				return Ok(token);
			}
		}

		self.refresh().await
	}

	// Callers must hold `refresh_guard`.
	async fn refresh(&self) -> Result<AccessToken> {
		const KIND: CallKind = CallKind::TokenRefresh;

		let refresh_token = self.state.lock().refresh_token()?;
		let (client_id, client_secret) = self.config.client_credentials()?;
		let facade = RefreshFacade::new(
			&self.config.token_url,
			client_id,
			client_secret,
			self.http_client.clone(),
		)?;
		let span = CallSpan::new(KIND, "refresh_token");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);
		self.metrics.record_attempt();
		obs::debug_event!(
			self.config.debug,
			token_url = %self.config.token_url,
			"refreshing access token"
		);

		let result =
			span.instrument(facade.refresh(&refresh_token, OffsetDateTime::now_utc())).await;

		obs::record_call_outcome(KIND, CallOutcome::of(&result));

		let rotated = self.settle(&result);

		match result {
			Ok(grant) => {
				self.metrics.record_success();
				obs::debug_event!(
					self.config.debug,
					expires_at = %grant.access_token.expires_at,
					rotated = rotated.is_some(),
					"access token refreshed"
				);

				if let Some(secret) = rotated {
					self.persist_refresh_token(&secret).await;
				}

				Ok(grant.access_token)
			},
			Err(err) => {
				self.metrics.record_failure();
				obs::debug_event!(self.config.debug, error = %err, "access token refresh failed");

				Err(err.into())
			},
		}
	}

	// Records the outcome for waiting callers; returns the rotated refresh credential, if any.
	fn settle(&self, result: &Result<RefreshGrant, RefreshError>) -> Option<TokenSecret> {
		let mut state = self.state.lock();
		let mut rotated = None;

		state.epoch = state.epoch.wrapping_add(1);

		match result {
			Ok(grant) => {
				state.access_token = Some(grant.access_token.clone());

				let changed = grant
					.refresh_token
					.as_ref()
					.filter(|secret| state.refresh_token.as_ref() != Some(*secret));

				if let Some(secret) = changed {
					state.refresh_token = Some(secret.clone());
					rotated = Some(secret.clone());
				}

				state.last_outcome = Some(Ok(grant.access_token.clone()));
			},
			Err(err) => state.last_outcome = Some(Err(err.clone())),
		}

		rotated
	}

	async fn persist_refresh_token(&self, secret: &TokenSecret) {
		if let Err(err) = self.store.save_refresh_token(secret).await {
			obs::warn_event!(error = %err, "failed to persist rotated refresh token");
		}
	}
}
impl<C> Clone for TokenManager<C>
where
	C: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			config: self.config.clone(),
			store: self.store.clone(),
			state: self.state.clone(),
			refresh_guard: self.refresh_guard.clone(),
			metrics: self.metrics.clone(),
		}
	}
}
impl<C> Debug for TokenManager<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let state = self.state.lock();

		f.debug_struct("TokenManager")
			.field("access_token", &state.access_token)
			.field("refresh_token_set", &state.refresh_token.is_some())
			.field("epoch", &state.epoch)
			.finish()
	}
}
