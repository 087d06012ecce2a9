use str_newtype::StrNewType;

use super::is_vschar_str;

/// Client identifier issued by the authorization server at registration.
///
/// Sent as `client_id` in both the authorization request and the token
/// request of the authorization code grant. Unlike most other parameters, the
/// grammar allows it to be empty.
///
/// See: <https://datatracker.ietf.org/doc/html/rfc6749#section-2.2>
///
/// ```abnf
/// client-id = *VSCHAR
/// ```
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, StrNewType)]
#[newtype(
	serde,
	owned(ClientIdBuf, derive(PartialEq, Eq, PartialOrd, Ord, Hash))
)]
pub struct ClientId(str);

impl ClientId {
	pub const fn validate_str(s: &str) -> bool {
		Self::validate_bytes(s.as_bytes())
	}

	pub const fn validate_bytes(bytes: &[u8]) -> bool {
		is_vschar_str(bytes, true)
	}
}

#[macro_export]
macro_rules! client_id {
	($value:literal) => {{
		match $crate::ClientId::new($value) {
			Ok(value) => value,
			Err(_) => panic!("invalid client identifier"),
		}
	}};
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn registered_client_ids() {
		assert!(ClientId::new("s6BhdRkqt3").is_ok());
		assert!(ClientId::new("Iv1.8a61f9b3a7aba766").is_ok());
		assert!(ClientId::new("my app").is_ok());
	}

	#[test]
	fn empty_client_id() {
		assert!(ClientId::new("").is_ok());
	}

	#[test]
	fn control_chars() {
		assert!(ClientId::new("abc\ndef").is_err());
		assert!(ClientIdBuf::new("abc\x7f".to_owned()).is_err());
	}

	#[test]
	fn client_id_macro() {
		assert_eq!(client_id!("s6BhdRkqt3").as_str(), "s6BhdRkqt3");
	}

	#[test]
	fn client_id_from_json() {
		let id: ClientIdBuf = serde_json::from_str(r#""s6BhdRkqt3""#).unwrap();
		assert_eq!(id.as_str(), "s6BhdRkqt3");
		assert!(serde_json::from_str::<ClientIdBuf>("\"a\\u0000b\"").is_err());
	}
}
