//! Proof Key for Code Exchange by OAuth Public Clients
//!
//! See: <https://datatracker.ietf.org/doc/html/rfc7636>
use base64::{Engine, prelude::BASE64_URL_SAFE_NO_PAD};
use serde::Serialize;
use sha2::{Digest, Sha256};
use str_newtype::StrNewType;

use crate::{
	client::OAuth2ClientError,
	endpoints::{HttpRequest, RedirectRequest, RequestBuilder},
	transport::HttpClient,
};

mod flow;

pub use flow::*;

/// Smallest number of random bytes behind a verifier (43 characters).
pub const PKCE_MIN_RANDOM_BYTES: usize = 32;

/// Largest number of random bytes behind a verifier (128 characters).
pub const PKCE_MAX_RANDOM_BYTES: usize = 96;

/// Authorization request carrying `code_challenge` and
/// `code_challenge_method` next to the parameters of `T`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WithPkceChallenge<T> {
	#[serde(flatten)]
	pub pkce: PkceCodeChallengeAndMethod,

	#[serde(flatten)]
	pub value: T,
}

impl<T> WithPkceChallenge<T> {
	pub fn new(value: T, pkce: PkceCodeChallengeAndMethod) -> Self {
		Self { value, pkce }
	}
}

impl<T> RedirectRequest for WithPkceChallenge<T>
where
	T: RedirectRequest,
{
	type RequestBody<'b>
		= WithPkceChallenge<T::RequestBody<'b>>
	where
		Self: 'b;

	fn build_query(&self) -> Self::RequestBody<'_> {
		WithPkceChallenge::new(self.value.build_query(), self.pkce.clone())
	}
}

pub trait AddPkceChallenge {
	type Output;

	fn with_pkce_challenge(self, pkce: PkceCodeChallengeAndMethod) -> Self::Output;
}

impl<E, T> AddPkceChallenge for RequestBuilder<E, T> {
	type Output = RequestBuilder<E, WithPkceChallenge<T>>;

	fn with_pkce_challenge(self, pkce: PkceCodeChallengeAndMethod) -> Self::Output {
		self.map(|value| WithPkceChallenge::new(value, pkce))
	}
}

/// Token request presenting the `code_verifier` the challenge was derived
/// from.
///
/// Only the request body changes. Decoding and processing the response is
/// left to `T`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WithPkceVerifier<'a, T> {
	pub code_verifier: &'a PkceCodeVerifier,

	#[serde(flatten)]
	pub value: T,
}

impl<'a, T> WithPkceVerifier<'a, T> {
	pub fn new(value: T, code_verifier: &'a PkceCodeVerifier) -> Self {
		Self {
			value,
			code_verifier,
		}
	}
}

impl<'a, T, E> HttpRequest<E> for WithPkceVerifier<'a, T>
where
	T: HttpRequest<E>,
{
	type ContentType = T::ContentType;
	type RequestBody<'b>
		= WithPkceVerifier<'a, T::RequestBody<'b>>
	where
		Self: 'b;
	type Response = T::Response;
	type ResponsePayload = T::ResponsePayload;

	async fn build_request<'b>(
		&'b self,
		endpoint: &E,
		http_client: &impl HttpClient,
	) -> Result<http::Request<Self::RequestBody<'b>>, OAuth2ClientError> {
		let request = self.value.build_request(endpoint, http_client).await?;
		log::debug!("presenting PKCE code verifier");
		Ok(request.map(|value| WithPkceVerifier::new(value, self.code_verifier)))
	}

	fn decode_response(
		&self,
		endpoint: &E,
		response: http::Response<Vec<u8>>,
	) -> Result<http::Response<Self::ResponsePayload>, OAuth2ClientError> {
		self.value.decode_response(endpoint, response)
	}

	async fn process_response(
		&self,
		endpoint: &E,
		http_client: &impl HttpClient,
		response: http::Response<Self::ResponsePayload>,
	) -> Result<Self::Response, OAuth2ClientError> {
		self.value
			.process_response(endpoint, http_client, response)
			.await
	}
}

pub trait AddPkceVerifier<'a> {
	type Output;

	fn with_pkce_verifier(self, code_verifier: &'a PkceCodeVerifier) -> Self::Output;
}

impl<'a, E, T> AddPkceVerifier<'a> for RequestBuilder<E, T> {
	type Output = RequestBuilder<E, WithPkceVerifier<'a, T>>;

	fn with_pkce_verifier(self, code_verifier: &'a PkceCodeVerifier) -> Self::Output {
		self.map(|value| WithPkceVerifier::new(value, code_verifier))
	}
}

/// The `code_challenge` and `code_challenge_method` authorization request
/// parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PkceCodeChallengeAndMethod {
	#[serde(rename = "code_challenge")]
	pub challenge: PkceCodeChallengeBuf,

	#[serde(rename = "code_challenge_method")]
	pub method: PkceCodeChallengeMethod,
}

impl PkceCodeChallengeAndMethod {
	/// Derives the `S256` challenge of `code_verifier`:
	/// `BASE64URL(SHA256(ASCII(code_verifier)))`, without padding.
	pub fn from_code_verifier_sha256(code_verifier: &PkceCodeVerifier) -> Self {
		let digest = Sha256::digest(code_verifier.as_str().as_bytes());
		let challenge = unsafe {
			// SAFETY: a SHA-256 digest encodes to 43 base64url characters.
			PkceCodeChallengeBuf::new_unchecked(BASE64_URL_SAFE_NO_PAD.encode(digest))
		};

		Self {
			challenge,
			method: PkceCodeChallengeMethod::S256,
		}
	}

	pub fn as_str(&self) -> &str {
		self.challenge.as_str()
	}

	pub fn method(&self) -> &PkceCodeChallengeMethod {
		&self.method
	}
}

/// Code challenge method.
///
/// Only `S256` is ever sent. RFC 7636 keeps `plain` for clients unable to
/// compute SHA-256, which does not apply here.
///
/// See: <https://datatracker.ietf.org/doc/html/rfc7636#section-4.2>
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PkceCodeChallengeMethod {
	S256,
}

impl PkceCodeChallengeMethod {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::S256 => "S256",
		}
	}
}

impl Serialize for PkceCodeChallengeMethod {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_str(self.as_str())
	}
}

/// Code challenge.
///
/// ```abnf
/// code-challenge = 43*128unreserved
/// ```
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, StrNewType)]
#[newtype(
	serde,
	owned(PkceCodeChallengeBuf, derive(PartialEq, Eq, PartialOrd, Ord, Hash))
)]
pub struct PkceCodeChallenge(str);

impl PkceCodeChallenge {
	pub const fn validate_str(s: &str) -> bool {
		Self::validate_bytes(s.as_bytes())
	}

	pub const fn validate_bytes(bytes: &[u8]) -> bool {
		is_unreserved_43_to_128(bytes)
	}
}

/// Code verifier.
///
/// The high-entropy secret behind a code challenge. It never leaves the
/// client until the token request.
///
/// See: <https://datatracker.ietf.org/doc/html/rfc7636#section-4.1>
///
/// # Grammar
///
/// ```abnf
/// code-verifier = 43*128unreserved
/// unreserved = ALPHA / DIGIT / "-" / "." / "_" / "~"
/// ```
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, StrNewType)]
#[newtype(
	serde,
	owned(PkceCodeVerifierBuf, derive(PartialEq, Eq, PartialOrd, Ord, Hash))
)]
pub struct PkceCodeVerifier(str);

impl PkceCodeVerifier {
	pub const fn validate_str(s: &str) -> bool {
		Self::validate_bytes(s.as_bytes())
	}

	pub const fn validate_bytes(bytes: &[u8]) -> bool {
		is_unreserved_43_to_128(bytes)
	}
}

impl PkceCodeVerifierBuf {
	/// Draws a verifier from [`PKCE_MIN_RANDOM_BYTES`] bytes of OS entropy.
	pub fn new_random() -> Result<Self, RandomSourceError> {
		Self::new_random_len(PKCE_MIN_RANDOM_BYTES)
	}

	/// Draws a verifier from `len` bytes of OS entropy.
	///
	/// Every call reads the operating system's secure random source afresh.
	///
	/// # Panics
	///
	/// Panics if `len` is outside
	/// [`PKCE_MIN_RANDOM_BYTES`]`..=`[`PKCE_MAX_RANDOM_BYTES`].
	pub fn new_random_len(len: usize) -> Result<Self, RandomSourceError> {
		assert!((PKCE_MIN_RANDOM_BYTES..=PKCE_MAX_RANDOM_BYTES).contains(&len));
		let mut random_bytes = vec![0u8; len];
		getrandom::getrandom(&mut random_bytes).map_err(|e| {
			log::error!("secure random source failed: {e}");
			RandomSourceError(e)
		})?;
		Ok(Self::from_random_bytes(&random_bytes))
	}

	/// Encodes already drawn random bytes as a verifier.
	///
	/// # Panics
	///
	/// Panics if `random_bytes` is not
	/// [`PKCE_MIN_RANDOM_BYTES`]`..=`[`PKCE_MAX_RANDOM_BYTES`] long.
	pub fn from_random_bytes(random_bytes: &[u8]) -> Self {
		assert!((PKCE_MIN_RANDOM_BYTES..=PKCE_MAX_RANDOM_BYTES).contains(&random_bytes.len()));
		unsafe {
			// SAFETY: 32 to 96 bytes encode to 43 to 128 base64url
			//         characters, all of them unreserved.
			Self::new_unchecked(BASE64_URL_SAFE_NO_PAD.encode(random_bytes))
		}
	}
}

/// The operating system's secure random source failed.
#[derive(Debug, thiserror::Error)]
#[error("secure random source unavailable: {0}")]
pub struct RandomSourceError(getrandom::Error);

const fn is_unreserved_43_to_128(bytes: &[u8]) -> bool {
	if bytes.len() < 43 || bytes.len() > 128 {
		return false;
	}

	let mut i = 0;

	while i < bytes.len() {
		if !matches!(bytes[i], b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~') {
			return false;
		}

		i += 1
	}

	true
}

#[cfg(test)]
mod tests {
	use super::*;

	const RFC7636_RANDOM_BYTES: [u8; 32] = [
		116, 24, 223, 180, 151, 153, 224, 37, 79, 250, 96, 125, 216, 173, 187, 186, 22, 212, 37,
		77, 105, 214, 191, 240, 91, 88, 5, 88, 83, 132, 141, 121,
	];

	#[test]
	fn verifier_length_bounds() {
		assert!(PkceCodeVerifier::new(&"a".repeat(42)).is_err());
		assert!(PkceCodeVerifier::new(&"a".repeat(43)).is_ok());
		assert!(PkceCodeVerifier::new(&"a".repeat(128)).is_ok());
		assert!(PkceCodeVerifier::new(&"a".repeat(129)).is_err());
	}

	#[test]
	fn verifier_alphabet() {
		assert!(PkceCodeVerifier::new("0123456789-._~ABCDEFGHIJKLMNOPQRSTUVWXYZabcd").is_ok());
		assert!(PkceCodeVerifier::new(&format!("{}+", "a".repeat(42))).is_err());
		assert!(PkceCodeVerifier::new(&format!("{}=", "a".repeat(43))).is_err());
		assert!(PkceCodeChallenge::new(&format!("{} ", "a".repeat(43))).is_err());
	}

	#[test]
	fn random_verifiers() {
		let short = PkceCodeVerifierBuf::new_random().unwrap();
		assert_eq!(short.as_str().len(), 43);

		let long = PkceCodeVerifierBuf::new_random_len(PKCE_MAX_RANDOM_BYTES).unwrap();
		assert_eq!(long.as_str().len(), 128);

		assert_ne!(short, PkceCodeVerifierBuf::new_random().unwrap());
	}

	#[test]
	#[should_panic]
	fn random_verifier_too_short() {
		let _ = PkceCodeVerifierBuf::new_random_len(PKCE_MIN_RANDOM_BYTES - 1);
	}

	#[test]
	#[should_panic]
	fn random_bytes_too_long() {
		let _ = PkceCodeVerifierBuf::from_random_bytes(&[0; PKCE_MAX_RANDOM_BYTES + 1]);
	}

	#[test]
	fn random_source_error_message() {
		let error = RandomSourceError(getrandom::Error::UNSUPPORTED);
		assert!(
			error
				.to_string()
				.starts_with("secure random source unavailable: ")
		);
	}

	// RFC 7636 Appendix B.
	#[test]
	fn s256_reference_vector() {
		let verifier = PkceCodeVerifierBuf::from_random_bytes(&RFC7636_RANDOM_BYTES);
		assert_eq!(
			verifier.as_str(),
			"dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk"
		);

		let challenge = PkceCodeChallengeAndMethod::from_code_verifier_sha256(&verifier);
		assert_eq!(
			challenge.as_str(),
			"E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
		);
		assert_eq!(challenge.method().as_str(), "S256");
		assert!(PkceCodeChallenge::validate_str(challenge.as_str()));
	}

	#[test]
	fn verifier_decodes_back_to_random_bytes() {
		let random_bytes: Vec<u8> = (0u8..48).collect();
		let verifier = PkceCodeVerifierBuf::from_random_bytes(&random_bytes);
		assert_eq!(
			BASE64_URL_SAFE_NO_PAD.decode(verifier.as_str()).unwrap(),
			random_bytes
		);
	}

	#[test]
	fn challenge_query_parameters() {
		let verifier = PkceCodeVerifierBuf::from_random_bytes(&RFC7636_RANDOM_BYTES);
		let challenge = PkceCodeChallengeAndMethod::from_code_verifier_sha256(&verifier);

		assert_eq!(
			serde_html_form::to_string(&challenge).unwrap(),
			"code_challenge=E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM&code_challenge_method=S256"
		);
	}

	#[test]
	fn verifier_body_parameter() {
		#[derive(Serialize)]
		struct Body {
			code: &'static str,
		}

		let verifier = PkceCodeVerifierBuf::from_random_bytes(&RFC7636_RANDOM_BYTES);
		let body = WithPkceVerifier::new(Body { code: "abc" }, &verifier);

		assert_eq!(
			serde_html_form::to_string(&body).unwrap(),
			"code_verifier=dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk&code=abc"
		);
	}
}
