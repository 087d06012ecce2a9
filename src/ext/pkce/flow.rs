use std::{future::Future, pin::pin};

use futures::future::{Either, select};
use iref::UriBuf;

use crate::{
	AddState, Code, StateBuf,
	client::{OAuth2ClientConfig, OAuth2ClientError},
	endpoints::token::TokenResponse,
	transport::HttpClient,
};

use super::{
	AddPkceChallenge, AddPkceVerifier, PkceCodeChallengeAndMethod, PkceCodeVerifier,
	PkceCodeVerifierBuf, RandomSourceError,
};

/// Authorization code flow protected with PKCE.
///
/// The flow owns a code verifier generated once, when it is created. The
/// `S256` code challenge sent with the authorization request is derived from
/// that verifier on every call, and the same verifier is presented when the
/// authorization code is exchanged, so the two can never disagree.
///
/// ```no_run
/// # async fn example(
/// # 	config: open_auth2_pkce::client::OAuth2ClientConfig,
/// # 	http_client: impl open_auth2_pkce::transport::HttpClient,
/// # 	callback_query: &str,
/// # ) -> Result<(), Box<dyn std::error::Error>> {
/// use open_auth2_pkce::{
/// 	StateBuf, ext::pkce::PkceAuthorizationCodeFlow,
/// 	grant::authorization_code::AuthorizationCodeResponse,
/// };
///
/// let flow = PkceAuthorizationCodeFlow::new(config)?;
/// let state = StateBuf::new_random();
/// let redirect_to = flow.authorization_uri(Some(state.clone()));
///
/// // ... redirect the user-agent, then read the callback query ...
///
/// let response = AuthorizationCodeResponse::from_query(callback_query)?;
/// let code = response.verify_state(Some(&*state))?;
/// let token = flow.exchange_code(&http_client, code).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PkceAuthorizationCodeFlow {
	config: OAuth2ClientConfig,
	code_verifier: PkceCodeVerifierBuf,
}

impl PkceAuthorizationCodeFlow {
	/// Starts a new flow with a fresh random code verifier.
	///
	/// Fails if the operating system's secure random source is unavailable.
	pub fn new(config: OAuth2ClientConfig) -> Result<Self, RandomSourceError> {
		let code_verifier = PkceCodeVerifierBuf::new_random()?;
		log::debug!(
			"starting PKCE authorization code flow for client `{}`",
			config.client_id
		);
		Ok(Self {
			config,
			code_verifier,
		})
	}

	/// Resumes a flow with a verifier previously obtained from
	/// [`Self::code_verifier`].
	///
	/// Web applications typically store the verifier in the user session
	/// between the authorization redirect and the callback.
	pub fn resume(config: OAuth2ClientConfig, code_verifier: PkceCodeVerifierBuf) -> Self {
		Self {
			config,
			code_verifier,
		}
	}

	/// Builds a flow around raw verifier bytes, bypassing random generation
	/// and the RFC 7636 length rule.
	#[cfg(test)]
	pub(crate) fn with_verifier_bytes(config: OAuth2ClientConfig, bytes: &[u8]) -> Self {
		use base64::{Engine, prelude::BASE64_URL_SAFE_NO_PAD};

		let code_verifier = unsafe {
			// SAFETY: test only. The base64url alphabet is unreserved, only
			//         the length may fall outside the grammar.
			PkceCodeVerifierBuf::new_unchecked(BASE64_URL_SAFE_NO_PAD.encode(bytes))
		};

		Self {
			config,
			code_verifier,
		}
	}

	pub fn config(&self) -> &OAuth2ClientConfig {
		&self.config
	}

	/// The code verifier, as sent in the `code_verifier` token request
	/// parameter.
	pub fn code_verifier(&self) -> &PkceCodeVerifier {
		&self.code_verifier
	}

	/// The `S256` code challenge derived from the current verifier.
	pub fn code_challenge(&self) -> PkceCodeChallengeAndMethod {
		PkceCodeChallengeAndMethod::from_code_verifier_sha256(&self.code_verifier)
	}

	/// Builds the authorization request URI, carrying `code_challenge` and
	/// `code_challenge_method=S256` on top of the standard parameters.
	pub fn authorization_uri(&self, state: Option<StateBuf>) -> UriBuf {
		self.config
			.authorization_endpoint()
			.authorize_code(self.config.redirect_uri.clone(), self.config.scope.clone())
			.with_state(state)
			.with_pkce_challenge(self.code_challenge())
			.into_uri()
	}

	/// Exchanges the authorization code for an access token, presenting the
	/// code verifier.
	///
	/// Errors of the underlying token request are returned as is. The flow is
	/// left untouched, whatever the outcome.
	pub async fn exchange_code(
		&self,
		http_client: &impl HttpClient,
		code: &Code,
	) -> Result<TokenResponse, OAuth2ClientError> {
		self.config
			.token_endpoint()
			.exchange_code(code.to_owned(), self.config.redirect_uri.clone())
			.with_pkce_verifier(&self.code_verifier)
			.send(http_client)
			.await
	}

	/// Same as [`Self::exchange_code`], but gives up as soon as `cancel`
	/// completes.
	///
	/// The in-flight request is dropped and [`OAuth2ClientError::Cancelled`]
	/// is returned. Pass a timer future to bound the exchange duration.
	pub async fn exchange_code_until(
		&self,
		http_client: &impl HttpClient,
		code: &Code,
		cancel: impl Future<Output = ()>,
	) -> Result<TokenResponse, OAuth2ClientError> {
		let exchange = pin!(self.exchange_code(http_client, code));
		let cancel = pin!(cancel);

		match select(exchange, cancel).await {
			Either::Left((result, _)) => result,
			Either::Right(((), _)) => {
				log::warn!("authorization code exchange cancelled");
				Err(OAuth2ClientError::Cancelled)
			}
		}
	}
}
