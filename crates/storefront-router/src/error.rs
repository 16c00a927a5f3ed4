//! Error types for routing.
//!
//! "No route matched" is not an error anywhere in this crate; lookups return
//! `Option`. Errors are reserved for malformed input handed to navigation and
//! for misuse of the universal router.

/// Boxed error returned by server data hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for router operations.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
	/// The URL could not be parsed or cannot be navigated to.
	#[error("Invalid URL '{url}': {reason}")]
	InvalidUrl {
		/// The rejected input.
		url: String,
		/// Why it was rejected.
		reason: String,
	},

	/// The history backend refused the navigation.
	#[error("Navigation failed: {0}")]
	NavigationFailed(String),

	/// A server-only operation was called on a router bound to the client engine.
	#[error("`{0}` is a server-only operation; this router is bound to the client engine")]
	ServerOnly(&'static str),

	/// No router has been provided to the current call site.
	#[error("Router context not found: {0}")]
	ContextNotFound(&'static str),

	/// Reverse lookup for a template that was never registered.
	#[error("Unknown route: {0}")]
	UnknownRoute(String),

	/// Reverse lookup without a value for a template parameter.
	#[error("Missing parameter: {0}")]
	MissingParameter(String),
}

impl RouterError {
	pub(crate) fn invalid_url(url: &str, reason: impl Into<String>) -> Self {
		Self::InvalidUrl {
			url: url.to_string(),
			reason: reason.into(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_router_error_display() {
		assert_eq!(
			RouterError::NavigationFailed("SecurityError".to_string()).to_string(),
			"Navigation failed: SecurityError"
		);
		assert_eq!(
			RouterError::UnknownRoute("/nope/".to_string()).to_string(),
			"Unknown route: /nope/"
		);
		assert!(
			RouterError::ServerOnly("prefetch")
				.to_string()
				.contains("`prefetch` is a server-only operation")
		);
	}

	#[rstest]
	fn test_invalid_url_display() {
		let err = RouterError::invalid_url("http://[::1", "invalid IPv6 address");
		assert_eq!(
			err.to_string(),
			"Invalid URL 'http://[::1': invalid IPv6 address"
		);
	}
}
