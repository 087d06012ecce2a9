//! Authorization endpoint.
//!
//! See: <https://datatracker.ietf.org/doc/html/rfc6749#section-3.1>
use iref::{Uri, UriBuf};

use crate::{
	endpoints::{Endpoint, RedirectRequest, RequestBuilder},
	util::extend_uri_query,
};

pub struct AuthorizationEndpoint<'a, C> {
	pub client: &'a C,
	pub uri: &'a Uri,
}

impl<'a, C> AuthorizationEndpoint<'a, C> {
	pub fn new(client: &'a C, uri: &'a Uri) -> Self {
		Self { client, uri }
	}

	pub fn begin<T>(self, request: T) -> RequestBuilder<Self, T> {
		RequestBuilder::new(self, request)
	}
}

impl<'a, C> Clone for AuthorizationEndpoint<'a, C> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<'a, C> Copy for AuthorizationEndpoint<'a, C> {}

impl<'a, C> Endpoint for AuthorizationEndpoint<'a, C> {
	type Client = C;

	fn client(&self) -> &Self::Client {
		self.client
	}
}

impl<'a, C, T> RequestBuilder<AuthorizationEndpoint<'a, C>, T>
where
	T: RedirectRequest,
{
	/// Builds the URI the user-agent must be redirected to.
	///
	/// Query parameters already present on the endpoint URI are preserved.
	pub fn into_uri(self) -> UriBuf {
		let mut uri = self.endpoint.uri.to_owned();
		extend_uri_query(&mut uri, self.request.build_query());
		log::debug!("authorization request URI: {uri}");
		uri
	}
}
