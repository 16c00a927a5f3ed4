//! URL normalization: locations and the base path.

use crate::error::RouterError;
use crate::query::{Query, parse_query};
use std::fmt;
use url::Url;

/// Origin used to resolve path-only input. Only the path and query of the
/// result are kept.
const RESOLVE_ORIGIN: &str = "http://localhost/";

/// The path and query part of a URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
	path: String,
	search: String,
}

impl Location {
	/// Creates a location from an already normalized path and search string.
	///
	/// A leading `?` on `search` is dropped; an empty path becomes `/`.
	pub fn new(path: impl Into<String>, search: impl Into<String>) -> Self {
		let mut path = path.into();
		if !path.starts_with('/') {
			path.insert(0, '/');
		}
		let search = search.into();
		let search = match search.strip_prefix('?') {
			Some(stripped) => stripped.to_string(),
			None => search,
		};
		Self { path, search }
	}

	/// Parses an absolute URL (`https://host/a?b`) or a path (`/a?b`, `a`).
	///
	/// Paths are resolved against `/`, so dot segments are collapsed and
	/// characters a browser would escape are percent-encoded. The fragment is
	/// dropped.
	pub fn parse(input: &str) -> Result<Self, RouterError> {
		let url = Url::parse(RESOLVE_ORIGIN)
			.and_then(|origin| origin.join(input))
			.map_err(|e| RouterError::invalid_url(input, e.to_string()))?;
		Ok(Self::new(url.path(), url.query().unwrap_or_default()))
	}

	/// Returns whether `input` names an origin: it carries a scheme, or it is
	/// protocol-relative (`//host/..`, with `\\` counted as `/` the way
	/// browsers read it).
	pub fn is_absolute(input: &str) -> bool {
		if Url::parse(input).is_ok() {
			return true;
		}
		let mut chars = input
			.trim_start_matches(|c: char| c <= ' ')
			.chars()
			.filter(|c| !matches!(c, '\t' | '\n' | '\r'));
		let is_slash = |c: Option<char>| matches!(c, Some('/' | '\\'));
		is_slash(chars.next()) && is_slash(chars.next())
	}

	/// Returns the path, always starting with `/`.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Returns the query string without its leading `?`.
	pub fn search(&self) -> &str {
		&self.search
	}

	/// Parses the query string.
	pub fn query(&self) -> Query {
		parse_query(&self.search)
	}

	/// Returns the location with a different query string.
	pub fn with_search(&self, search: impl Into<String>) -> Self {
		Self::new(self.path.clone(), search)
	}

	/// Returns `path?search`, or just `path` when there is no query.
	pub fn href(&self) -> String {
		if self.search.is_empty() {
			self.path.clone()
		} else {
			format!("{}?{}", self.path, self.search)
		}
	}
}

impl fmt::Display for Location {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.href())
	}
}

/// The path prefix an application is mounted under.
///
/// Trailing slashes are trimmed, so `/shop/` and `/shop` are the same base
/// and `/` is the empty base. Prefix checks are segment-aware: `/shopping`
/// does not carry the `/shop` base.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BasePath(String);

impl BasePath {
	/// Creates a base path.
	pub fn new(base: &str) -> Self {
		let trimmed = base.trim_end_matches('/');
		if trimmed.is_empty() || trimmed.starts_with('/') {
			Self(trimmed.to_string())
		} else {
			Self(format!("/{}", trimmed))
		}
	}

	/// Returns the base, empty for the root.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Returns whether `path` already starts with this base.
	pub fn is_prefix_of(&self, path: &str) -> bool {
		match path.strip_prefix(self.0.as_str()) {
			Some(rest) => rest.is_empty() || rest.starts_with('/'),
			None => false,
		}
	}

	/// Prefixes the base onto `location` unless it is already there.
	pub fn apply(&self, location: Location) -> Location {
		if self.is_prefix_of(location.path()) {
			location
		} else {
			Location::new(format!("{}{}", self.0, location.path), location.search)
		}
	}

	/// Removes the base from `location`, if present.
	pub fn strip(&self, location: Location) -> Location {
		if self.0.is_empty() || !self.is_prefix_of(location.path()) {
			return location;
		}
		let rest = &location.path[self.0.len()..];
		Location::new(rest, location.search.clone())
	}

	/// Normalizes a navigation target for the client history.
	///
	/// Absolute URLs are rejected: the client router only navigates within
	/// its own origin.
	pub fn join(&self, url: &str) -> Result<Location, RouterError> {
		if Location::is_absolute(url) {
			return Err(RouterError::invalid_url(
				url,
				"client navigation expects a path, not an absolute URL",
			));
		}
		Ok(self.apply(Location::parse(url)?))
	}
}

impl fmt::Display for BasePath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("/product/7/", "/product/7/", "")]
	#[case("/product/7/?sort=asc", "/product/7/", "sort=asc")]
	#[case("https://shop.example/product/7/?sort=asc#reviews", "/product/7/", "sort=asc")]
	#[case("product/7/", "/product/7/", "")]
	#[case("/a/../b/", "/b/", "")]
	#[case("", "/", "")]
	fn test_location_parse(#[case] input: &str, #[case] path: &str, #[case] search: &str) {
		let location = Location::parse(input).unwrap();
		assert_eq!(location.path(), path);
		assert_eq!(location.search(), search);
	}

	#[rstest]
	fn test_location_parse_encodes_spaces() {
		let location = Location::parse("/search/red shoes/").unwrap();
		assert_eq!(location.path(), "/search/red%20shoes/");
	}

	#[rstest]
	fn test_location_parse_invalid() {
		let result = Location::parse("http://[::1");
		assert!(matches!(result, Err(RouterError::InvalidUrl { .. })));
	}

	#[rstest]
	fn test_location_href() {
		assert_eq!(Location::new("/cart/", "").href(), "/cart/");
		assert_eq!(Location::new("/cart/", "?a=1").href(), "/cart/?a=1");
		assert_eq!(Location::new("cart", "a=1").href(), "/cart?a=1");
	}

	#[rstest]
	#[case("", "")]
	#[case("/", "")]
	#[case("/shop/", "/shop")]
	#[case("shop", "/shop")]
	fn test_base_path_new(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(BasePath::new(input).as_str(), expected);
	}

	#[rstest]
	#[case("/shop", true)]
	#[case("/shop/", true)]
	#[case("/shop/product/7/", true)]
	#[case("/shopping/", false)]
	#[case("/", false)]
	fn test_base_path_prefix_is_segment_aware(#[case] path: &str, #[case] expected: bool) {
		assert_eq!(BasePath::new("/shop").is_prefix_of(path), expected);
	}

	#[rstest]
	#[case("/product/7/", "/shop/product/7/")]
	#[case("product/7/", "/shop/product/7/")]
	#[case("/shop/product/7/", "/shop/product/7/")]
	#[case("/shopping/", "/shop/shopping/")]
	#[case("/?sort=asc", "/shop/?sort=asc")]
	fn test_base_path_join(#[case] url: &str, #[case] expected: &str) {
		let location = BasePath::new("/shop").join(url).unwrap();
		assert_eq!(location.href(), expected);
	}

	#[rstest]
	#[case("https://elsewhere.example/")]
	#[case("//evil.example/x")]
	#[case("\\\\evil.example/x")]
	#[case("/\\evil.example/x")]
	#[case(" //evil.example/x")]
	fn test_base_path_join_rejects_absolute_urls(#[case] url: &str) {
		let result = BasePath::new("/shop").join(url);
		assert!(matches!(result, Err(RouterError::InvalidUrl { .. })));
	}

	#[rstest]
	#[case("/cart/", false)]
	#[case("cart/", false)]
	#[case("?page=2", false)]
	#[case("//cdn.example/a.png", true)]
	#[case("mailto:shop@example.com", true)]
	fn test_is_absolute(#[case] input: &str, #[case] expected: bool) {
		assert_eq!(Location::is_absolute(input), expected);
	}

	#[rstest]
	#[case("/shop/product/7/?a=1", "/product/7/?a=1")]
	#[case("/shop", "/")]
	#[case("/shop/", "/")]
	#[case("/other/", "/other/")]
	fn test_base_path_strip(#[case] input: &str, #[case] expected: &str) {
		let location = Location::parse(input).unwrap();
		assert_eq!(BasePath::new("/shop").strip(location).href(), expected);
	}

	#[rstest]
	fn test_empty_base_is_identity() {
		let base = BasePath::new("");
		let location = Location::parse("/product/7/").unwrap();
		assert_eq!(base.join("/product/7/").unwrap(), location);
		assert_eq!(base.strip(location.clone()), location);
	}
}
