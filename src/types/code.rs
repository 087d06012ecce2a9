use str_newtype::StrNewType;

use super::is_vschar_str;

/// Authorization code.
///
/// Returned in the `code` parameter of the redirect URI query, then sent
/// back to the token endpoint together with the PKCE code verifier. The
/// client never interprets it.
///
/// See: <https://datatracker.ietf.org/doc/html/rfc6749#section-4.1.2>
///
/// ```abnf
/// code = 1*VSCHAR
/// ```
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, StrNewType)]
#[newtype(serde, owned(CodeBuf, derive(PartialEq, Eq, PartialOrd, Ord, Hash)))]
pub struct Code(str);

impl Code {
	pub const fn validate_str(s: &str) -> bool {
		Self::validate_bytes(s.as_bytes())
	}

	pub const fn validate_bytes(bytes: &[u8]) -> bool {
		is_vschar_str(bytes, false)
	}
}

#[macro_export]
macro_rules! code {
	($value:literal) => {{
		match $crate::Code::new($value) {
			Ok(value) => value,
			Err(_) => panic!("invalid code"),
		}
	}};
}
