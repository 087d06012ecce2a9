use str_newtype::StrNewType;

use super::is_vschar_str;

/// An OAuth 2.0 access token (borrowed).
///
/// See: <https://datatracker.ietf.org/doc/html/rfc6749#section-1.4>
///
/// # Grammar
///
/// ```abnf
/// access-token = 1*VSCHAR
/// ```
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, StrNewType)]
#[newtype(
	serde,
	owned(AccessTokenBuf, derive(PartialEq, Eq, PartialOrd, Ord, Hash))
)]
pub struct AccessToken(str);

impl AccessToken {
	/// Validates that the given string is a well-formed access token.
	pub const fn validate_str(s: &str) -> bool {
		Self::validate_bytes(s.as_bytes())
	}

	/// Validates that the given byte slice is a well-formed access token.
	pub const fn validate_bytes(bytes: &[u8]) -> bool {
		is_vschar_str(bytes, false)
	}
}
