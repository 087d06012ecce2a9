use std::sync::Arc;

use crate::client::OAuth2ClientError;

#[cfg(feature = "reqwest")]
mod reqwest;

/// HTTP client used to reach the authorization server.
///
/// Implementations only move bytes: status handling and body decoding are
/// the responsibility of each request type.
pub trait HttpClient {
	#[allow(async_fn_in_trait)]
	async fn send(
		&self,
		request: http::Request<Vec<u8>>,
	) -> Result<http::Response<Vec<u8>>, OAuth2ClientError>;
}

impl<T> HttpClient for &T
where
	T: HttpClient,
{
	async fn send(
		&self,
		request: http::Request<Vec<u8>>,
	) -> Result<http::Response<Vec<u8>>, OAuth2ClientError> {
		T::send(*self, request).await
	}
}

impl<T> HttpClient for Arc<T>
where
	T: HttpClient,
{
	async fn send(
		&self,
		request: http::Request<Vec<u8>>,
	) -> Result<http::Response<Vec<u8>>, OAuth2ClientError> {
		T::send(self, request).await
	}
}
