use iref::UriBuf;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::{
	AddState, ClientId, ClientIdBuf, Code, ScopeBuf, StateBuf,
	client::{OAuth2Client, OAuth2ClientError},
	endpoints::{
		authorization::AuthorizationEndpoint,
		token::{TokenEndpoint, TokenResponse},
	},
	transport::HttpClient,
};

/// Authorization code client configuration.
///
/// Holds everything needed to drive the authorization code grant against a
/// single authorization server. It can be built in code with the `with_*`
/// methods or deserialized from any serde format:
///
/// ```json
/// {
///   "client_id": "my-client",
///   "authorization_endpoint": "https://auth.example.com/authorize",
///   "token_endpoint": "https://auth.example.com/token",
///   "redirect_uri": "https://app.example.com/callback",
///   "scope": "openid profile"
/// }
/// ```
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth2ClientConfig {
	pub client_id: ClientIdBuf,

	#[serde(default)]
	pub client_secret: Option<String>,

	pub authorization_endpoint: UriBuf,

	pub token_endpoint: UriBuf,

	#[serde(default)]
	pub redirect_uri: Option<UriBuf>,

	#[serde(default)]
	pub scope: Option<ScopeBuf>,
}

impl OAuth2ClientConfig {
	pub fn new(client_id: ClientIdBuf, authorization_endpoint: UriBuf, token_endpoint: UriBuf) -> Self {
		Self {
			client_id,
			client_secret: None,
			authorization_endpoint,
			token_endpoint,
			redirect_uri: None,
			scope: None,
		}
	}

	pub fn with_client_secret(self, client_secret: String) -> Self {
		Self {
			client_secret: Some(client_secret),
			..self
		}
	}

	pub fn with_redirect_uri(self, redirect_uri: UriBuf) -> Self {
		Self {
			redirect_uri: Some(redirect_uri),
			..self
		}
	}

	pub fn with_scope(self, scope: ScopeBuf) -> Self {
		Self {
			scope: Some(scope),
			..self
		}
	}

	pub fn authorization_endpoint(&self) -> AuthorizationEndpoint<'_, Self> {
		AuthorizationEndpoint::new(self, &self.authorization_endpoint)
	}

	pub fn token_endpoint(&self) -> TokenEndpoint<'_, Self> {
		TokenEndpoint::new(self, &self.token_endpoint)
	}

	/// Builds the plain authorization code request URI, without PKCE.
	pub fn authorization_uri(&self, state: Option<StateBuf>) -> UriBuf {
		self.authorization_endpoint()
			.authorize_code(self.redirect_uri.clone(), self.scope.clone())
			.with_state(state)
			.into_uri()
	}

	/// Exchanges an authorization code for an access token, without PKCE.
	pub async fn exchange_code(
		&self,
		http_client: &impl HttpClient,
		code: &Code,
	) -> Result<TokenResponse, OAuth2ClientError> {
		self.token_endpoint()
			.exchange_code(code.to_owned(), self.redirect_uri.clone())
			.send(http_client)
			.await
	}
}

impl OAuth2Client for OAuth2ClientConfig {
	fn client_id(&self) -> &ClientId {
		&self.client_id
	}

	fn client_secret(&self) -> Option<&str> {
		self.client_secret.as_deref()
	}
}

#[cfg(test)]
mod tests {
	use iref::uri;

	use super::*;

	#[test]
	fn deserialize_minimal_config() {
		let config: OAuth2ClientConfig = serde_json::from_str(
			r#"{
				"client_id": "my-client",
				"authorization_endpoint": "https://auth.example.com/authorize",
				"token_endpoint": "https://auth.example.com/token"
			}"#,
		)
		.unwrap();

		assert_eq!(config.client_id.as_str(), "my-client");
		assert!(config.client_secret.is_none());
		assert!(config.redirect_uri.is_none());
		assert!(config.scope.is_none());
		assert_eq!(config.token_endpoint.as_str(), "https://auth.example.com/token");
	}

	#[test]
	fn deserialize_rejects_invalid_scope() {
		let result = serde_json::from_str::<OAuth2ClientConfig>(
			r#"{
				"client_id": "my-client",
				"authorization_endpoint": "https://auth.example.com/authorize",
				"token_endpoint": "https://auth.example.com/token",
				"scope": "openid  profile"
			}"#,
		);

		assert!(result.is_err());
	}

	#[test]
	fn plain_authorization_uri() {
		let config = OAuth2ClientConfig::new(
			ClientIdBuf::new("my-client".to_owned()).unwrap(),
			uri!("https://auth.example.com/authorize").to_owned(),
			uri!("https://auth.example.com/token").to_owned(),
		)
		.with_scope(ScopeBuf::new("openid".to_owned()).unwrap());

		let uri = config.authorization_uri(Some(StateBuf::new("xyz".to_owned()).unwrap()));
		let query: std::collections::BTreeMap<String, String> =
			serde_html_form::from_str(uri.query().unwrap().as_str()).unwrap();

		assert_eq!(query["response_type"], "code");
		assert_eq!(query["client_id"], "my-client");
		assert_eq!(query["scope"], "openid");
		assert_eq!(query["state"], "xyz");
		assert!(!query.contains_key("code_challenge"));
	}
}
