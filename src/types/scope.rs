use str_newtype::StrNewType;

use super::is_nqchar;

/// Single scope token, such as `openid`.
///
/// ```abnf
/// scope-token = 1*NQCHAR
/// ```
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, StrNewType)]
#[newtype(
	serde,
	owned(ScopeTokenBuf, derive(PartialEq, Eq, PartialOrd, Ord, Hash))
)]
pub struct ScopeToken(str);

impl ScopeToken {
	pub const fn validate_str(s: &str) -> bool {
		Self::validate_bytes(s.as_bytes())
	}

	pub const fn validate_bytes(bytes: &[u8]) -> bool {
		let mut i = 0;

		while i < bytes.len() {
			if !is_nqchar(bytes[i]) {
				return false;
			}

			i += 1;
		}

		i > 0
	}
}

/// Access token scope.
///
/// Requested through the `scope` parameter of the authorization request.
/// The token endpoint echoes it back when the granted scope differs.
///
/// See: <https://datatracker.ietf.org/doc/html/rfc6749#section-3.3>
///
/// # Grammar
///
/// Tokens are separated by exactly one space, with no leading or trailing
/// space:
///
/// ```abnf
/// scope = scope-token *( SP scope-token )
/// ```
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, StrNewType)]
#[newtype(serde, owned(ScopeBuf, derive(PartialEq, Eq, PartialOrd, Ord, Hash)))]
pub struct Scope(str);

impl Scope {
	pub const fn validate_str(s: &str) -> bool {
		Self::validate_bytes(s.as_bytes())
	}

	pub const fn validate_bytes(bytes: &[u8]) -> bool {
		if bytes.is_empty() {
			return false;
		}

		let mut i = 0;
		let mut after_separator = true;

		while i < bytes.len() {
			let c = bytes[i];

			if c == b' ' {
				if after_separator {
					return false;
				}

				after_separator = true;
			} else if is_nqchar(c) {
				after_separator = false;
			} else {
				return false;
			}

			i += 1;
		}

		!after_separator
	}

	/// Checks whether `token` is one of the tokens of this scope.
	///
	/// Servers may grant less than requested: use this on the `scope` of a
	/// token response before relying on a permission.
	pub fn contains(&self, token: &ScopeToken) -> bool {
		self.iter().any(|t| t == token)
	}

	pub fn iter(&self) -> ScopeIter<'_> {
		ScopeIter(self.0.split(' '))
	}
}

impl<'a> IntoIterator for &'a Scope {
	type IntoIter = ScopeIter<'a>;
	type Item = &'a ScopeToken;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

#[macro_export]
macro_rules! scope {
	($value:literal) => {{
		match $crate::Scope::new($value) {
			Ok(value) => value,
			Err(_) => panic!("invalid scope"),
		}
	}};
}

pub struct ScopeIter<'a>(std::str::Split<'a, char>);

impl<'a> Iterator for ScopeIter<'a> {
	type Item = &'a ScopeToken;

	fn next(&mut self) -> Option<Self::Item> {
		self.0.next().map(|t| unsafe {
			// SAFETY: a valid scope splits into valid tokens.
			ScopeToken::new_unchecked(t)
		})
	}
}

impl ScopeBuf {
	/// Joins tokens into a scope, skipping duplicates.
	///
	/// Returns `None` when there is no token at all, since an empty `scope`
	/// parameter is not allowed.
	pub fn from_tokens<T>(tokens: impl IntoIterator<Item = T>) -> Option<Self>
	where
		T: AsRef<ScopeToken>,
	{
		let mut result: Option<Self> = None;

		for token in tokens {
			let token = token.as_ref();
			if let Some(scope) = &mut result {
				if !scope.contains(token) {
					scope.0.push(' ');
					scope.0.push_str(token.as_str());
				}
			} else {
				result = Some(Self(token.as_str().to_owned()));
			}
		}

		result
	}
}
