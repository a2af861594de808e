//! Access token paired with its absolute expiry.

// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Bearer credential issued by the token endpoint.
///
/// A token is usable strictly before `expires_at`; at or past that instant it is treated as
/// expired and never attached to a request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
	/// Access token secret; callers must avoid logging it.
	pub secret: TokenSecret,
	/// Absolute expiry instant.
	#[serde(with = "time::serde::rfc3339")]
	pub expires_at: OffsetDateTime,
}
impl AccessToken {
	/// Pairs a secret with an absolute expiry instant.
	pub fn new(secret: impl Into<TokenSecret>, expires_at: OffsetDateTime) -> Self {
		Self { secret: secret.into(), expires_at }
	}

	/// Builds a token that expires `lifetime` after `issued_at`.
	pub fn issued(
		secret: impl Into<TokenSecret>,
		issued_at: OffsetDateTime,
		lifetime: Duration,
	) -> Self {
		Self::new(secret, issued_at + lifetime)
	}

	/// Returns `true` if the token may still be used at `instant`.
	pub fn is_valid_at(&self, instant: OffsetDateTime) -> bool {
		instant < self.expires_at
	}

	/// Returns `true` if the token may still be used now.
	pub fn is_valid(&self) -> bool {
		self.is_valid_at(OffsetDateTime::now_utc())
	}

	/// Returns the raw bearer value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		self.secret.expose()
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("secret", &"<redacted>")
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
