//! Endpoint abstractions and the generic request machinery.
//!
//! Requests are plain values wrapped in a [`RequestBuilder`] together with
//! the endpoint they target. Protocol extensions (state, PKCE) are layered on
//! top by wrapping the request value, so the final query or body is the
//! flattened serialization of every layer.
use iref::UriBuf;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::{
	client::OAuth2ClientError,
	transport::{ContentType, HttpClient, encode_request},
};

pub mod authorization;
pub mod token;

/// An OAuth 2.0 endpoint bound to a client.
pub trait Endpoint {
	type Client;

	fn client(&self) -> &Self::Client;
}

/// Request sent through the user-agent, encoded in the endpoint URI query.
pub trait RedirectRequest {
	type RequestBody<'b>: Serialize
	where
		Self: 'b;

	fn build_query(&self) -> Self::RequestBody<'_>;
}

/// Request sent directly to the endpoint `E` over HTTP.
pub trait HttpRequest<E> {
	type ContentType: ContentType;

	type RequestBody<'b>: Serialize
	where
		Self: 'b;

	type ResponsePayload;

	type Response;

	#[allow(async_fn_in_trait)]
	async fn build_request(
		&self,
		endpoint: &E,
		http_client: &impl HttpClient,
	) -> Result<http::Request<Self::RequestBody<'_>>, OAuth2ClientError>;

	fn decode_response(
		&self,
		endpoint: &E,
		response: http::Response<Vec<u8>>,
	) -> Result<http::Response<Self::ResponsePayload>, OAuth2ClientError>;

	#[allow(async_fn_in_trait)]
	async fn process_response(
		&self,
		endpoint: &E,
		http_client: &impl HttpClient,
		response: http::Response<Self::ResponsePayload>,
	) -> Result<Self::Response, OAuth2ClientError>;

	#[allow(async_fn_in_trait)]
	async fn send(
		&self,
		endpoint: &E,
		http_client: &impl HttpClient,
	) -> Result<Self::Response, OAuth2ClientError> {
		let request = self.build_request(endpoint, http_client).await?;
		let request = encode_request::<Self::ContentType, _>(request);
		let response = http_client.send(request).await?;
		let decoded_response = self.decode_response(endpoint, response)?;
		self.process_response(endpoint, http_client, decoded_response)
			.await
	}
}

/// A request value paired with the endpoint it targets.
pub struct RequestBuilder<E, T> {
	pub endpoint: E,
	pub request: T,
}

impl<E, T> RequestBuilder<E, T> {
	pub fn new(endpoint: E, request: T) -> Self {
		Self { endpoint, request }
	}

	/// Transforms the request value, typically to wrap it in an extension.
	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RequestBuilder<E, U> {
		RequestBuilder {
			endpoint: self.endpoint,
			request: f(self.request),
		}
	}

	/// Sends the request to the endpoint.
	pub async fn send(self, http_client: &impl HttpClient) -> Result<T::Response, OAuth2ClientError>
	where
		T: HttpRequest<E>,
	{
		self.request.send(&self.endpoint, http_client).await
	}
}

/// An OAuth 2.0 error response.
///
/// This is the standard error format returned by the authorization server
/// when a request fails, as defined in
/// [RFC 6749 Section 5.2](https://datatracker.ietf.org/doc/html/rfc6749#section-5.2).
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorResponse<T = String> {
	/// A single error code string.
	pub error: T,

	/// Human-readable text providing additional information about the error.
	pub error_description: Option<String>,

	/// A URI identifying a human-readable web page with information about
	/// the error.
	pub error_uri: Option<UriBuf>,
}

impl<T> ErrorResponse<T> {
	/// Creates a new error response.
	pub fn new(error: T, error_description: Option<String>, error_uri: Option<UriBuf>) -> Self {
		Self {
			error,
			error_description,
			error_uri,
		}
	}
}
