//! OAuth 2.0 grant types.
//!
//! - [`authorization_code`]: Authorization Code Grant
//!   ([RFC 6749 Section 4.1](https://datatracker.ietf.org/doc/html/rfc6749#section-4.1)).
pub mod authorization_code;
