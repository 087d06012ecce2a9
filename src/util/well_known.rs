//! Well-Known URIs.
//!
//! See: <https://www.rfc-editor.org/rfc/rfc8615.html>
use iref::{UriRef, UriRefBuf};

/// Path prefix of every well-known URI.
pub const WELL_KNOWN_PATH_PREFIX: &str = "/.well-known/";

/// OAuth 2.0 Authorization Server Metadata.
///
/// See: <https://datatracker.ietf.org/doc/html/rfc8414#section-3>
pub const OAUTH_AUTHORIZATION_SERVER: &str = "oauth-authorization-server";

/// OpenID Connect Discovery.
///
/// See: <https://openid.net/specs/openid-connect-discovery-1_0.html#ProviderConfig>
pub const OPENID_CONFIGURATION: &str = "openid-configuration";

#[derive(Debug, thiserror::Error)]
pub enum InvalidWellKnownUri {
	#[error("invalid identifier URI reference `{0}`")]
	Id(String),

	#[error("invalid well-known URI suffix `{0}`")]
	Name(String),
}

/// Builds the well-known URI `name` for the resource identified by `id`.
///
/// The well-known segment always sits at the root of the path. When `id`
/// carries a path of its own, that path is appended after `name`, the way
/// RFC 8414 inserts the issuer path:
///
/// ```
/// # use open_auth2_pkce::util::well_known_uri;
/// let uri = well_known_uri("https://example.com/tenant", "oauth-authorization-server").unwrap();
/// assert_eq!(
/// 	uri.as_str(),
/// 	"https://example.com/.well-known/oauth-authorization-server/tenant"
/// );
/// ```
///
/// An empty `id` gives a relative reference (`/.well-known/{name}`), and an
/// empty `name` gives the bare `/.well-known/` directory, followed directly
/// by the base path if any. The query and fragment of `id`, if any, are kept.
pub fn well_known_uri(id: &str, name: &str) -> Result<UriRefBuf, InvalidWellKnownUri> {
	let id_ref = UriRef::new(id).map_err(|_| InvalidWellKnownUri::Id(id.to_owned()))?;

	let mut result = String::new();

	if let Some(scheme) = id_ref.scheme() {
		result.push_str(scheme.as_str());
		result.push(':');
	}

	if let Some(authority) = id_ref.authority() {
		result.push_str("//");
		result.push_str(authority.as_str());
	}

	result.push_str(WELL_KNOWN_PATH_PREFIX);
	result.push_str(name);

	let path = id_ref.path().as_str();
	let base_path = path.strip_prefix('/').unwrap_or(path);
	if !base_path.is_empty() {
		// An empty name leaves the prefix's trailing slash as the separator.
		if !name.is_empty() {
			result.push('/');
		}

		result.push_str(base_path);
	}

	if let Some(query) = id_ref.query() {
		result.push('?');
		result.push_str(query.as_str());
	}

	if let Some(fragment) = id_ref.fragment() {
		result.push('#');
		result.push_str(fragment.as_str());
	}

	UriRefBuf::new(result.into_bytes()).map_err(|_| InvalidWellKnownUri::Name(name.to_owned()))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn check(id: &str, name: &str, expected: &str) {
		let result = well_known_uri(id, name).unwrap();
		assert_eq!(result.as_str(), expected, "id = {id:?}, name = {name:?}");
	}

	#[test]
	fn empty_id_and_name() {
		check("", "", "/.well-known/");
	}

	#[test]
	fn empty_name() {
		check("http://example.com", "", "http://example.com/.well-known/");
	}

	#[test]
	fn host_only() {
		check("http://example.com", "foo", "http://example.com/.well-known/foo");
	}

	#[test]
	fn host_with_trailing_slash() {
		check("http://example.com/", "foo", "http://example.com/.well-known/foo");
	}

	#[test]
	fn relative_root() {
		check("", "foo", "/.well-known/foo");
		check("/", "foo", "/.well-known/foo");
	}

	#[test]
	fn base_path_is_appended() {
		check("http://example.com/x", "foo", "http://example.com/.well-known/foo/x");
		check("/x", "foo", "/.well-known/foo/x");
	}

	#[test]
	fn empty_name_with_base_path() {
		check("http://example.com/x", "", "http://example.com/.well-known/x");
		check("/x", "", "/.well-known/x");
		check("https://example.com/a/b", "", "https://example.com/.well-known/a/b");

		for id in ["http://example.com/x", "/x", "/a/b", "x"] {
			let uri = well_known_uri(id, "").unwrap();
			assert!(!uri.as_str().contains("//x"), "{id:?} -> {}", uri.as_str());
			assert!(!uri.as_str().contains(".well-known//"), "{id:?} -> {}", uri.as_str());
		}
	}

	#[test]
	fn nested_base_path() {
		check(
			"https://example.com/a/b",
			"foo",
			"https://example.com/.well-known/foo/a/b",
		);
	}

	#[test]
	fn oauth_authorization_server_metadata() {
		check(
			"https://issuer.example.com/tenant",
			OAUTH_AUTHORIZATION_SERVER,
			"https://issuer.example.com/.well-known/oauth-authorization-server/tenant",
		);
		check(
			"https://issuer.example.com",
			OPENID_CONFIGURATION,
			"https://issuer.example.com/.well-known/openid-configuration",
		);
	}

	#[test]
	fn query_is_kept() {
		check(
			"https://example.com/x?a=b",
			"foo",
			"https://example.com/.well-known/foo/x?a=b",
		);
	}

	#[test]
	fn invalid_id() {
		assert!(matches!(
			well_known_uri("http://exa mple.com", "foo"),
			Err(InvalidWellKnownUri::Id(_))
		));
	}

	#[test]
	fn invalid_name() {
		assert!(matches!(
			well_known_uri("http://example.com", "foo bar"),
			Err(InvalidWellKnownUri::Name(_))
		));
	}
}
