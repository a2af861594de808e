//! Refresh-token exchange built on the `oauth2` crate.

pub use oauth2;

// crates.io
use oauth2::{
	AuthType, ClientId, ClientSecret, EndpointNotSet, EndpointSet, HttpClientError, RefreshToken,
	RequestTokenError, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError, BasicTokenResponse},
};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, TokenSecret},
	error::{ConfigError, RefreshError},
	http::{self, HttpTransport, ResponseMetadata, ResponseMetadataSlot},
};

type RefreshClient =
	BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Tokens returned by a successful refresh exchange.
#[derive(Clone, Debug)]
pub struct RefreshGrant {
	/// Newly issued access token.
	pub access_token: AccessToken,
	/// Rotated refresh credential, when the provider issued one.
	pub refresh_token: Option<TokenSecret>,
}

/// Performs `grant_type=refresh_token` exchanges against the configured token endpoint.
///
/// Client credentials travel in the form body (`client_secret_post`), which is what the vendor
/// token endpoint expects.
pub(crate) struct RefreshFacade<C>
where
	C: ?Sized + HttpTransport,
{
	oauth_client: RefreshClient,
	http_client: Arc<C>,
}
impl<C> RefreshFacade<C>
where
	C: ?Sized + HttpTransport,
{
	pub(crate) fn new(
		token_url: &Url,
		client_id: &str,
		client_secret: &TokenSecret,
		http_client: Arc<C>,
	) -> Result<Self> {
		let token_url = TokenUrl::new(token_url.to_string()).map_err(|source| {
			ConfigError::InvalidUrl { url: token_url.to_string(), source }
		})?;
		let oauth_client = BasicClient::new(ClientId::new(client_id.to_owned()))
			.set_client_secret(ClientSecret::new(client_secret.expose().to_owned()))
			.set_auth_type(AuthType::RequestBody)
			.set_token_uri(token_url);

		Ok(Self { oauth_client, http_client })
	}

	/// Exchanges `refresh_token` for a new access token, stamping expiry from `issued_at`.
	pub(crate) async fn refresh(
		&self,
		refresh_token: &TokenSecret,
		issued_at: OffsetDateTime,
	) -> Result<RefreshGrant, RefreshError> {
		let meta = ResponseMetadataSlot::default();
		let instrumented = self.http_client.with_metadata(meta.clone());
		let refresh_secret = RefreshToken::new(refresh_token.expose().to_owned());
		let response = self
			.oauth_client
			.exchange_refresh_token(&refresh_secret)
			.request_async(&instrumented)
			.await
			.map_err(|err| map_request_error(meta.take(), err))?;

		map_refresh_token_response(response, issued_at)
	}
}

fn map_refresh_token_response(
	response: BasicTokenResponse,
	issued_at: OffsetDateTime,
) -> Result<RefreshGrant, RefreshError> {
	let expires_in = response.expires_in().ok_or(RefreshError::MissingExpiresIn)?.as_secs();
	let expires_in = i64::try_from(expires_in).map_err(|_| RefreshError::ExpiresInOutOfRange)?;

	if expires_in <= 0 {
		return Err(RefreshError::NonPositiveExpiresIn);
	}

	let expires_at = issued_at
		.checked_add(Duration::seconds(expires_in))
		.ok_or(RefreshError::ExpiresInOutOfRange)?;
	let access_token = AccessToken::new(response.access_token().secret().to_owned(), expires_at);
	let refresh_token =
		response.refresh_token().map(|token| TokenSecret::new(token.secret().to_owned()));

	Ok(RefreshGrant { access_token, refresh_token })
}

fn map_request_error<E>(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<E>>,
) -> RefreshError
where
	E: 'static + Send + Sync + StdError,
{
	let meta_ref = meta.as_ref();
	let status = meta_ref.and_then(|value| value.status);

	match err {
		RequestTokenError::ServerResponse(response) => map_server_response_error(response, status),
		RequestTokenError::Request(error) => http::map_refresh_transport_error(meta_ref, error),
		RequestTokenError::Parse(error, _body) =>
			RefreshError::MalformedResponse { source: Arc::new(error), status },
		RequestTokenError::Other(message) => RefreshError::Unexpected { message, status },
	}
}

fn map_server_response_error(response: BasicErrorResponse, status: Option<u16>) -> RefreshError {
	let reason = match response.error_description() {
		Some(description) => description.clone(),
		None => response.error().as_ref().to_owned(),
	};

	RefreshError::Rejected { reason, status }
}
