//! HTTP transport layer, content type encoding, and client abstraction.
use http::{HeaderMap, HeaderValue, header};
use serde::Serialize;

use crate::client::OAuth2ClientError;

mod client;

pub use client::*;

/// `Content-Type: application/json` header value.
pub const APPLICATION_JSON: HeaderValue = HeaderValue::from_static("application/json");

/// `Content-Type: application/x-www-form-urlencoded` header value.
pub const APPLICATION_X_WWW_FORM_URLENCODED: HeaderValue =
	HeaderValue::from_static("application/x-www-form-urlencoded");

/// `Content-Type: text/plain` header value.
///
/// Some authorization servers answer token requests with a form-encoded body
/// labelled as plain text.
pub const TEXT_PLAIN: HeaderValue = HeaderValue::from_static("text/plain");

/// Checks whether the response `Content-Type` header starts with the given
/// media type, ignoring parameters such as `charset`.
///
/// Returns an error if the header is missing.
pub fn has_content_type(
	headers: &HeaderMap,
	media_type: &HeaderValue,
) -> ::std::result::Result<bool, OAuth2ClientError> {
	let content_type = headers
		.get(header::CONTENT_TYPE)
		.ok_or_else(|| OAuth2ClientError::response("missing content type"))?;

	Ok(content_type.as_bytes().starts_with(media_type.as_bytes()))
}

/// Trait for encoding request bodies with a specific content type.
pub trait ContentType {
	/// The `Content-Type` header value, or `None` for requests with no body.
	const VALUE: Option<HeaderValue>;

	/// Serializes the given value into a byte vector using this content type's
	/// encoding.
	fn encode<T: Serialize>(value: &T) -> Vec<u8>;
}

/// Encodes the body of `request` with the content type `C` and sets the
/// matching `Content-Type` header.
pub fn encode_request<C: ContentType, T: Serialize>(
	request: http::Request<T>,
) -> http::Request<Vec<u8>> {
	let mut request = request.map(|body| C::encode(&body));

	if let Some(value) = C::VALUE {
		request.headers_mut().insert(header::CONTENT_TYPE, value);
	}

	request
}

/// URL-encoded form (`application/x-www-form-urlencoded`) content type
/// encoding.
pub struct WwwFormUrlEncoded;

impl ContentType for WwwFormUrlEncoded {
	const VALUE: Option<HeaderValue> = Some(APPLICATION_X_WWW_FORM_URLENCODED);

	fn encode<T: Serialize>(value: &T) -> Vec<u8> {
		log::debug!("serializing {}", std::any::type_name_of_val(value));
		serde_html_form::to_string(value)
			// UNWRAP SAFETY: request bodies are flat structs of strings.
			.unwrap()
			.into_bytes()
	}
}
