//! Strongly typed vendor identifiers (sites, devices, groups, scenarios).
//!
//! The vendor serializes identifiers as JSON strings on some endpoints and as integers on others,
//! so every identifier accepts both on input and always serializes as a string.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "RawId", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<RawId> for $name {
			type Error = IdentifierError;

			fn try_from(value: RawId) -> Result<Self, Self::Error> {
				let value = value.into_string();

				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (site, device, group, scenario).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (site, device, group, scenario).
		kind: &'static str,
	},
	/// The identifier contains a character that would change the meaning of a URL path.
	#[error("{kind} identifier contains the reserved character {character:?}.")]
	ReservedCharacter {
		/// Kind of identifier (site, device, group, scenario).
		kind: &'static str,
		/// First offending character.
		character: char,
	},
	/// The identifier is a relative path segment (`.` or `..`).
	#[error("{kind} identifier cannot be a relative path segment.")]
	RelativeSegment {
		/// Kind of identifier (site, device, group, scenario).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (site, device, group, scenario).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Wire representation accepted for identifiers.
#[doc(hidden)]
#[derive(Deserialize)]
#[serde(untagged)]
pub enum RawId {
	/// Identifier sent as a JSON string.
	Text(String),
	/// Identifier sent as a JSON integer.
	Number(u64),
}
impl RawId {
	fn into_string(self) -> String {
		match self {
			Self::Text(value) => value,
			Self::Number(value) => value.to_string(),
		}
	}
}

def_id! { SiteId, "Vendor-assigned identifier of an installation site.", "Site" }
def_id! { DeviceId, "Vendor-assigned identifier of a single device.", "Device" }
def_id! { GroupId, "Vendor-assigned identifier of a device group.", "Group" }
def_id! { ScenarioId, "Vendor-assigned identifier of a scenario.", "Scenario" }

// Scenarios are surfaced to hosts as device-shaped records, so their identifiers travel both ways.
impl From<ScenarioId> for DeviceId {
	fn from(value: ScenarioId) -> Self {
		Self(value.0)
	}
}
impl From<&DeviceId> for ScenarioId {
	fn from(value: &DeviceId) -> Self {
		Self(value.0.clone())
	}
}

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}
	// Identifiers become single path segments, so only RFC 3986 unreserved characters pass.
	if let Some(character) = view.chars().find(|c| !is_unreserved(*c)) {
		return Err(IdentifierError::ReservedCharacter { kind, character });
	}
	if view == "." || view == ".." {
		return Err(IdentifierError::RelativeSegment { kind });
	}

	Ok(())
}

fn is_unreserved(c: char) -> bool {
	c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}
