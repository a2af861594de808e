//! Client-level error types shared across the token manager, request executor, and stores.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;
type SharedError = Arc<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Credential persistence failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem; raised before any network activity.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Token endpoint exchange failed.
	#[error(transparent)]
	Refresh(#[from] RefreshError),
	/// Transport failure (DNS, TCP, TLS) while calling a resource endpoint.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Resource endpoint answered with a non-success HTTP status.
	#[error("{action} failed with HTTP {status} {status_text}.")]
	Http {
		/// Accessor that issued the request.
		action: &'static str,
		/// HTTP status code.
		status: u16,
		/// Canonical reason phrase for the status code.
		status_text: String,
	},
	/// Response body (or its payload) could not be parsed.
	#[error("{action} returned a body that could not be parsed.")]
	Parse {
		/// Accessor that issued the request.
		action: &'static str,
		/// Raw body kept for diagnostics.
		body: String,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Vendor envelope reported a non-`OK` status.
	#[error("{action} was rejected by the API with status `{status}`.")]
	Api {
		/// Accessor that issued the request.
		action: &'static str,
		/// Status string reported by the envelope.
		status: String,
		/// Full envelope for diagnostics.
		envelope: serde_json::Value,
	},
}
impl Error {
	/// Returns the accessor name for request-scoped failures.
	pub fn action(&self) -> Option<&'static str> {
		match self {
			Self::Http { action, .. } | Self::Parse { action, .. } | Self::Api { action, .. } =>
				Some(*action),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A credential required for token refresh is absent.
	#[error("Configuration is missing `{field}`.")]
	MissingCredential {
		/// Configuration key of the missing field.
		field: &'static str,
	},
	/// Host-supplied configuration could not be deserialized.
	#[error("Configuration is invalid.")]
	Parse {
		/// Path-aware parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// A configured or derived URL is invalid.
	#[error("URL `{url}` is invalid.")]
	InvalidUrl {
		/// Offending URL text.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A query timestamp cannot be rendered as RFC 3339.
	#[error("Timestamp cannot be rendered as RFC 3339.")]
	InvalidTimestamp {
		/// Underlying formatting failure.
		#[source]
		source: time::error::Format,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Token endpoint failures.
///
/// Cloneable so the outcome of one refresh can be handed to every caller that waited on it.
#[derive(Clone, Debug, ThisError)]
pub enum RefreshError {
	/// Provider returned an OAuth error response (e.g., `invalid_grant`).
	#[error("Token endpoint rejected the refresh: {reason}.")]
	Rejected {
		/// Provider-supplied description, or the OAuth error code when no description exists.
		reason: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint responded with a body that is not a token response.
	#[error("Token endpoint returned a malformed response.")]
	MalformedResponse {
		/// Structured parsing failure.
		#[source]
		source: Arc<serde_path_to_error::Error<serde_json::Error>>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint response omitted `expires_in`.
	#[error("Token endpoint response is missing expires_in.")]
	MissingExpiresIn,
	/// Token endpoint returned an excessively large `expires_in`.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
	/// Token endpoint returned a non-positive duration.
	#[error("The expires_in value must be positive.")]
	NonPositiveExpiresIn,
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: SharedError,
	},
	/// Token endpoint exchange failed for another reason.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	Unexpected {
		/// Client-supplied message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}
impl RefreshError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Arc::new(src) }
	}

	/// HTTP status code reported by the token endpoint, when known.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Rejected { status, .. }
			| Self::MalformedResponse { status, .. }
			| Self::Unexpected { status, .. } => *status,
			_ => None,
		}
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
	/// Transport failed without a structured error.
	#[error("HTTP client error occurred while calling the API: {message}.")]
	Other {
		/// Transport-supplied description.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
