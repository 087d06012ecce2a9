//! Authorization Code Grant.
//!
//! See: <https://datatracker.ietf.org/doc/html/rfc6749#section-4.1>
use std::collections::BTreeMap;

use iref::UriBuf;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::{
	ClientIdBuf, CodeBuf, ScopeBuf, State, StateBuf,
	client::{OAuth2Client, OAuth2ClientError},
	endpoints::{
		Endpoint, ErrorResponse, HttpRequest, RedirectRequest, RequestBuilder,
		authorization::AuthorizationEndpoint,
		token::{TokenEndpoint, TokenResponse, decode_token_response},
	},
	transport::{APPLICATION_JSON, HttpClient, WwwFormUrlEncoded},
};

impl<'a, C> AuthorizationEndpoint<'a, C>
where
	C: OAuth2Client,
{
	/// Starts an authorization request with `response_type=code`.
	pub fn authorize_code(
		self,
		redirect_uri: Option<UriBuf>,
		scope: Option<ScopeBuf>,
	) -> RequestBuilder<Self, AuthorizationCodeAuthorizationRequest> {
		let client_id = self.client().client_id().to_owned();
		self.begin(AuthorizationCodeAuthorizationRequest::new(
			client_id,
			redirect_uri,
			scope,
		))
	}
}

impl<'a, C> TokenEndpoint<'a, C>
where
	C: OAuth2Client,
{
	/// Starts a token request exchanging the given authorization code.
	///
	/// `redirect_uri` must be identical to the one sent in the authorization
	/// request, if any.
	pub fn exchange_code(
		self,
		code: CodeBuf,
		redirect_uri: Option<UriBuf>,
	) -> RequestBuilder<Self, AuthorizationCodeTokenRequest> {
		let client = self.client();
		let request = AuthorizationCodeTokenRequest {
			code,
			redirect_uri,
			client_id: Some(client.client_id().to_owned()),
			client_secret: client.client_secret().map(ToOwned::to_owned),
		};

		self.begin(request)
	}
}

/// Authorization Request.
///
/// See: <https://datatracker.ietf.org/doc/html/rfc6749#section-4.1.1>
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "response_type", rename = "code")]
pub struct AuthorizationCodeAuthorizationRequest {
	pub client_id: ClientIdBuf,

	pub redirect_uri: Option<UriBuf>,

	pub scope: Option<ScopeBuf>,
}

impl AuthorizationCodeAuthorizationRequest {
	pub fn new(client_id: ClientIdBuf, redirect_uri: Option<UriBuf>, scope: Option<ScopeBuf>) -> Self {
		Self {
			client_id,
			redirect_uri,
			scope,
		}
	}
}

impl RedirectRequest for AuthorizationCodeAuthorizationRequest {
	type RequestBody<'b>
		= &'b Self
	where
		Self: 'b;

	fn build_query(&self) -> Self::RequestBody<'_> {
		self
	}
}

/// Authorization Response, read from the query of the redirect URI.
///
/// See: <https://datatracker.ietf.org/doc/html/rfc6749#section-4.1.2>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationCodeResponse {
	pub code: CodeBuf,

	pub state: Option<StateBuf>,
}

impl AuthorizationCodeResponse {
	/// Parses the redirect URI query sent back by the authorization server.
	///
	/// An `error` parameter is reported as [`AuthorizationError::Denied`].
	pub fn from_query(query: &str) -> Result<Self, AuthorizationError> {
		let mut params: BTreeMap<String, String> =
			serde_html_form::from_str(query).map_err(|e| AuthorizationError::Malformed(e.to_string()))?;

		if let Some(error) = params.remove("error") {
			let error_uri = params
				.remove("error_uri")
				.and_then(|uri| UriBuf::new(uri.into_bytes()).ok());

			return Err(AuthorizationError::Denied(ErrorResponse::new(
				error,
				params.remove("error_description"),
				error_uri,
			)));
		}

		let code = params
			.remove("code")
			.ok_or_else(|| AuthorizationError::Malformed("missing `code` parameter".to_owned()))?;
		let code = CodeBuf::new(code)
			.map_err(|_| AuthorizationError::Malformed("invalid `code` parameter".to_owned()))?;

		let state = params
			.remove("state")
			.map(StateBuf::new)
			.transpose()
			.map_err(|_| AuthorizationError::Malformed("invalid `state` parameter".to_owned()))?;

		Ok(Self { code, state })
	}

	/// Checks the returned state against the one sent with the authorization
	/// request and returns the authorization code.
	pub fn verify_state(&self, expected: Option<&State>) -> Result<&CodeBuf, AuthorizationError> {
		if self.state.as_deref() == expected {
			Ok(&self.code)
		} else {
			log::warn!("authorization response state mismatch");
			Err(AuthorizationError::StateMismatch)
		}
	}
}

/// Failed authorization response.
#[derive(Debug, thiserror::Error)]
pub enum AuthorizationError {
	#[error("authorization denied: {}", .0.error)]
	Denied(ErrorResponse),

	#[error("authorization response state mismatch")]
	StateMismatch,

	#[error("malformed authorization response: {0}")]
	Malformed(String),
}

/// Access Token Request.
///
/// See: <https://datatracker.ietf.org/doc/html/rfc6749#section-4.1.3>
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "grant_type", rename = "authorization_code")]
pub struct AuthorizationCodeTokenRequest {
	pub code: CodeBuf,

	pub redirect_uri: Option<UriBuf>,

	pub client_id: Option<ClientIdBuf>,

	pub client_secret: Option<String>,
}

impl<'a, C> HttpRequest<TokenEndpoint<'a, C>> for AuthorizationCodeTokenRequest {
	type ContentType = WwwFormUrlEncoded;
	type RequestBody<'b>
		= &'b Self
	where
		Self: 'b;
	type ResponsePayload = TokenResponse;
	type Response = TokenResponse;

	async fn build_request(
		&self,
		endpoint: &TokenEndpoint<'a, C>,
		_http_client: &impl HttpClient,
	) -> Result<http::Request<Self::RequestBody<'_>>, OAuth2ClientError> {
		http::Request::builder()
			.method(http::Method::POST)
			.uri(endpoint.uri.as_str())
			.header(http::header::ACCEPT, APPLICATION_JSON)
			.body(self)
			.map_err(OAuth2ClientError::request)
	}

	fn decode_response(
		&self,
		_endpoint: &TokenEndpoint<'a, C>,
		response: http::Response<Vec<u8>>,
	) -> Result<http::Response<Self::ResponsePayload>, OAuth2ClientError> {
		decode_token_response(response)
	}

	async fn process_response(
		&self,
		_endpoint: &TokenEndpoint<'a, C>,
		_http_client: &impl HttpClient,
		response: http::Response<Self::ResponsePayload>,
	) -> Result<Self::Response, OAuth2ClientError> {
		log::debug!("authorization code exchanged for an access token");
		Ok(response.into_body())
	}
}
