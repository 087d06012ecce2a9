//! OAuth 2.0 [authorization code grant][rfc6749] client with [PKCE][rfc7636].
//!
//! The entry point is [`ext::pkce::PkceAuthorizationCodeFlow`]: it owns a
//! random code verifier, builds the authorization URI carrying the matching
//! `S256` code challenge, and exchanges the returned authorization code for
//! an access token while presenting the verifier.
//!
//! The crate also builds [RFC 8615][rfc8615] well-known URIs, used to locate
//! authorization server metadata (see [`util::well_known_uri`]).
//!
//! # Modules
//!
//! - [`client`]: client trait, configuration and error types.
//! - [`endpoints`]: authorization and token endpoints, request machinery.
//! - [`ext`]: protocol extensions (PKCE).
//! - [`grant`]: authorization code grant.
//! - [`transport`]: HTTP transport and content type encoding.
//! - [`util`]: URI query and well-known URI utilities.
//!
//! Core OAuth 2.0 types ([`AccessToken`], [`ClientId`], [`Code`], [`Scope`],
//! [`State`]) are re-exported at the crate root.
//!
//! [rfc6749]: https://datatracker.ietf.org/doc/html/rfc6749
//! [rfc7636]: https://datatracker.ietf.org/doc/html/rfc7636
//! [rfc8615]: https://www.rfc-editor.org/rfc/rfc8615.html
#[cfg(feature = "reqwest")]
pub use reqwest;

pub use http;

pub mod client;
pub mod endpoints;
pub mod ext;
pub mod grant;
pub mod transport;
mod types;
pub mod util;

pub use types::*;
