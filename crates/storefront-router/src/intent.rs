//! Navigation intents built by view code.
//!
//! A view that renders an in-app link also builds the matching
//! [`NavigationIntent`] and hands it to the router's `navigate` when the link
//! is activated. The router never inspects the DOM.

/// A request to navigate to another page of the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationIntent {
	href: String,
	replace: bool,
}

impl NavigationIntent {
	/// Creates an intent that pushes a new history entry.
	pub fn new(href: impl Into<String>) -> Self {
		Self {
			href: href.into(),
			replace: false,
		}
	}

	/// Sets whether to replace the current history entry.
	pub fn replace(mut self, replace: bool) -> Self {
		self.replace = replace;
		self
	}

	/// Returns the destination.
	pub fn href(&self) -> &str {
		&self.href
	}

	/// Returns whether this is a replace navigation.
	pub fn is_replace(&self) -> bool {
		self.replace
	}

	/// Attributes for the rendered anchor.
	///
	/// `data-link` marks the anchor as handled in-app; `data-replace` is
	/// present for replace navigations.
	pub fn anchor_attributes(&self) -> Vec<(&'static str, String)> {
		let mut attrs = vec![("href", self.href.clone()), ("data-link", "true".to_string())];
		if self.replace {
			attrs.push(("data-replace", "true".to_string()));
		}
		attrs
	}
}

impl From<&str> for NavigationIntent {
	fn from(href: &str) -> Self {
		Self::new(href)
	}
}

impl From<String> for NavigationIntent {
	fn from(href: String) -> Self {
		Self::new(href)
	}
}
