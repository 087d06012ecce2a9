//! OAuth 2.0 client trait, configuration and error types.
use crate::{ClientId, endpoints::ErrorResponse};

mod config;

pub use config::*;

/// OAuth 2.0 client, as registered with an authorization server.
pub trait OAuth2Client {
	/// Client identifier issued by the authorization server.
	fn client_id(&self) -> &ClientId;

	/// Client secret for confidential clients.
	///
	/// Public clients (the typical PKCE use case) have none.
	fn client_secret(&self) -> Option<&str> {
		None
	}
}

impl<T: OAuth2Client> OAuth2Client for &T {
	fn client_id(&self) -> &ClientId {
		T::client_id(*self)
	}

	fn client_secret(&self) -> Option<&str> {
		T::client_secret(*self)
	}
}

#[derive(Debug, thiserror::Error)]
pub enum OAuth2ClientError {
	#[error("unable to send request: {0}")]
	Request(String),

	#[error("unable to receive response: {0}")]
	Response(String),

	#[error("server responded with status code: {0}")]
	ServerError(http::StatusCode),

	#[error("server rejected the request with status code {status}: {}", response.error)]
	Rejected {
		status: http::StatusCode,
		response: ErrorResponse,
	},

	#[error("request cancelled")]
	Cancelled,
}

impl OAuth2ClientError {
	pub fn request(e: impl ToString) -> Self {
		let msg = e.to_string();
		log::error!("request error: {msg}");
		Self::Request(msg)
	}

	pub fn response(e: impl ToString) -> Self {
		let msg = e.to_string();
		log::error!("response error: {msg}");
		Self::Response(msg)
	}

	pub fn server(status: http::StatusCode) -> Self {
		log::error!("unexpected server response status: {status}");
		Self::ServerError(status)
	}

	pub fn rejected(status: http::StatusCode, response: ErrorResponse) -> Self {
		log::error!(
			"server rejected the request ({status}): {}{}",
			response.error,
			response
				.error_description
				.as_deref()
				.map(|d| format!(" ({d})"))
				.unwrap_or_default()
		);
		Self::Rejected { status, response }
	}
}
