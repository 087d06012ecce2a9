//! Token endpoint.
//!
//! See: <https://datatracker.ietf.org/doc/html/rfc6749#section-3.2>
use std::{collections::BTreeMap, fmt::Display};

use iref::Uri;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_with::skip_serializing_none;

use crate::{
	AccessTokenBuf, ScopeBuf,
	client::OAuth2ClientError,
	endpoints::{Endpoint, ErrorResponse, RequestBuilder},
	transport::{APPLICATION_JSON, APPLICATION_X_WWW_FORM_URLENCODED, TEXT_PLAIN, has_content_type},
	util::NoExtension,
};

pub struct TokenEndpoint<'a, C> {
	pub client: &'a C,
	pub uri: &'a Uri,
}

impl<'a, C> Clone for TokenEndpoint<'a, C> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<'a, C> Copy for TokenEndpoint<'a, C> {}

impl<'a, C> TokenEndpoint<'a, C> {
	pub fn new(client: &'a C, uri: &'a Uri) -> Self {
		Self { client, uri }
	}

	pub fn begin<T>(self, request: T) -> RequestBuilder<Self, T> {
		RequestBuilder::new(self, request)
	}
}

impl<'a, C> Endpoint for TokenEndpoint<'a, C> {
	type Client = C;

	fn client(&self) -> &Self::Client {
		self.client
	}
}

pub trait TokenType: Serialize + DeserializeOwned + Display {}

impl TokenType for String {}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(bound(
	serialize = "T: TokenType, E: Serialize",
	deserialize = "T: TokenType, E: Deserialize<'de>"
))]
pub struct TokenResponse<T: TokenType = String, E = NoExtension> {
	/// access token issued by the authorization server.
	pub access_token: AccessTokenBuf,

	/// The type of the token issued as described in Section 7.1.  Value is case insensitive.
	pub token_type: T,

	/// Lifetime in seconds of the access token.
	///
	/// For example, the value "3600" denotes that the access token will expire
	/// in one hour from the time the response was generated.
	///
	/// Setting this value is *recommended*.
	///
	/// If omitted, the authorization server *should* provide the expiration
	/// time via other means or document the default value.
	pub expires_in: Option<u64>,

	/// The refresh token, which can be used to obtain new access tokens using the same authorization grant as described in Section 6.
	pub refresh_token: Option<String>,

	/// Scope of the access token as described by Section 3.3.
	///
	/// Optional if identical to the scope requested by the client.
	pub scope: Option<ScopeBuf>,

	/// Extension.
	#[serde(flatten)]
	pub ext: E,
}

impl<T, E> TokenResponse<T, E>
where
	T: TokenType,
{
	pub fn new(access_token: AccessTokenBuf, token_type: T, ext: E) -> Self {
		Self {
			access_token,
			token_type,
			expires_in: None,
			refresh_token: None,
			scope: None,
			ext,
		}
	}
}

/// Decodes a token endpoint response.
///
/// Successful responses are read as JSON, or as a form-encoded body for the
/// servers that still answer that way. Unsuccessful responses become
/// [`OAuth2ClientError::Rejected`] when they carry an RFC 6749 error body, and
/// [`OAuth2ClientError::ServerError`] otherwise.
pub fn decode_token_response(
	response: http::Response<Vec<u8>>,
) -> Result<http::Response<TokenResponse>, OAuth2ClientError> {
	let status = response.status();

	if !status.is_success() {
		return Err(
			match serde_json::from_slice::<ErrorResponse>(response.body()) {
				Ok(error) => OAuth2ClientError::rejected(status, error),
				Err(_) => OAuth2ClientError::server(status),
			},
		);
	}

	let body = if has_content_type(response.headers(), &APPLICATION_JSON)? {
		serde_json::from_slice(response.body()).map_err(OAuth2ClientError::response)?
	} else if has_content_type(response.headers(), &APPLICATION_X_WWW_FORM_URLENCODED)?
		|| has_content_type(response.headers(), &TEXT_PLAIN)?
	{
		token_response_from_form(response.body())?
	} else {
		return Err(OAuth2ClientError::response("unexpected content type"));
	};

	Ok(response.map(|_| body))
}

fn token_response_from_form(body: &[u8]) -> Result<TokenResponse, OAuth2ClientError> {
	let mut fields: BTreeMap<String, String> =
		serde_html_form::from_bytes(body).map_err(OAuth2ClientError::response)?;

	// Form-encoded servers send empty values for absent optional fields.
	fields.retain(|_, value| !value.is_empty());

	let access_token = fields
		.remove("access_token")
		.ok_or_else(|| OAuth2ClientError::response("server response missing access_token"))?;
	let access_token = AccessTokenBuf::new(access_token)
		.map_err(|_| OAuth2ClientError::response("invalid access_token"))?;

	let token_type = fields
		.remove("token_type")
		.ok_or_else(|| OAuth2ClientError::response("server response missing token_type"))?;

	let mut result = TokenResponse::new(access_token, token_type, NoExtension {});

	result.expires_in = fields
		.remove("expires_in")
		.map(|value| value.parse::<u64>())
		.transpose()
		.map_err(|_| OAuth2ClientError::response("invalid expires_in"))?;

	result.refresh_token = fields.remove("refresh_token");

	result.scope = fields
		.remove("scope")
		.map(ScopeBuf::new)
		.transpose()
		.map_err(|_| OAuth2ClientError::response("invalid scope"))?;

	Ok(result)
}

#[cfg(test)]
mod tests {
	use http::{StatusCode, header};

	use super::*;

	fn response(status: StatusCode, content_type: &str, body: &str) -> http::Response<Vec<u8>> {
		http::Response::builder()
			.status(status)
			.header(header::CONTENT_TYPE, content_type)
			.body(body.as_bytes().to_vec())
			.unwrap()
	}

	#[test]
	fn decode_json_token_response() {
		let token = decode_token_response(response(
			StatusCode::OK,
			"application/json;charset=UTF-8",
			r#"{"access_token":"2YotnFZFEjr1zCsicMWpAA","token_type":"Bearer","expires_in":3600,"refresh_token":"tGzv3JOkF0XG5Qx2TlKWIA"}"#,
		))
		.unwrap()
		.into_body();

		assert_eq!(token.access_token.as_str(), "2YotnFZFEjr1zCsicMWpAA");
		assert_eq!(token.token_type, "Bearer");
		assert_eq!(token.expires_in, Some(3600));
		assert_eq!(token.refresh_token.as_deref(), Some("tGzv3JOkF0XG5Qx2TlKWIA"));
		assert!(token.scope.is_none());
	}

	#[test]
	fn token_response_debug() {
		let result = decode_token_response(response(
			StatusCode::OK,
			"application/json",
			r#"{"access_token":"2YotnFZFEjr1zCsicMWpAA","token_type":"Bearer"}"#,
		));

		let debug = format!("{result:?}");
		assert!(debug.contains("2YotnFZFEjr1zCsicMWpAA"));
		assert!(debug.contains("NoExtension"));
	}

	#[test]
	fn decode_form_token_response() {
		let token = decode_token_response(response(
			StatusCode::OK,
			"application/x-www-form-urlencoded",
			"access_token=90d64460d14870c08c81352a05dedd3465940a7c&scope=&token_type=bearer&expires_in=60",
		))
		.unwrap()
		.into_body();

		assert_eq!(
			token.access_token.as_str(),
			"90d64460d14870c08c81352a05dedd3465940a7c"
		);
		assert_eq!(token.token_type, "bearer");
		assert_eq!(token.expires_in, Some(60));
		assert!(token.scope.is_none());
	}

	#[test]
	fn decode_form_response_without_access_token() {
		let result = decode_token_response(response(
			StatusCode::OK,
			"text/plain; charset=utf-8",
			"token_type=bearer",
		));

		assert!(matches!(result, Err(OAuth2ClientError::Response(_))));
	}

	#[test]
	fn decode_json_response_with_empty_access_token() {
		let result = decode_token_response(response(
			StatusCode::OK,
			"application/json",
			r#"{"access_token":"","token_type":"Bearer"}"#,
		));

		assert!(matches!(result, Err(OAuth2ClientError::Response(_))));
	}

	#[test]
	fn decode_error_response() {
		let result = decode_token_response(response(
			StatusCode::BAD_REQUEST,
			"application/json",
			r#"{"error":"invalid_grant","error_description":"code expired"}"#,
		));

		match result {
			Err(OAuth2ClientError::Rejected { status, response }) => {
				assert_eq!(status, StatusCode::BAD_REQUEST);
				assert_eq!(response.error, "invalid_grant");
				assert_eq!(response.error_description.as_deref(), Some("code expired"));
			}
			other => panic!("unexpected result: {other:?}"),
		}
	}

	#[test]
	fn decode_opaque_server_error() {
		let result = decode_token_response(response(
			StatusCode::INTERNAL_SERVER_ERROR,
			"text/html",
			"<h1>oops</h1>",
		));

		assert!(matches!(
			result,
			Err(OAuth2ClientError::ServerError(status)) if status == StatusCode::INTERNAL_SERVER_ERROR
		));
	}

	#[test]
	fn decode_unexpected_content_type() {
		let result = decode_token_response(response(StatusCode::OK, "text/html", "<html/>"));
		assert!(matches!(result, Err(OAuth2ClientError::Response(_))));
	}
}
