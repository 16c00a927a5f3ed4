//! The ordered route table.

use crate::debug_log;
use crate::error::RouterError;
use crate::hooks::RouteHooks;
use crate::location::Location;
use crate::pattern::{Params, RoutePattern};
use crate::query::Query;
use indexmap::IndexMap;
use std::fmt;

/// A registered route.
#[derive(Clone)]
pub struct RouteEntry<H> {
	pattern: RoutePattern,
	handler: H,
	hooks: RouteHooks,
}

impl<H> RouteEntry<H> {
	/// Returns the compiled pattern.
	pub fn pattern(&self) -> &RoutePattern {
		&self.pattern
	}

	/// Returns the handler.
	pub fn handler(&self) -> &H {
		&self.handler
	}

	/// Returns the server hooks.
	pub fn hooks(&self) -> &RouteHooks {
		&self.hooks
	}
}

impl<H> fmt::Debug for RouteEntry<H> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteEntry")
			.field("pattern", &self.pattern.template())
			.field("hooks", &self.hooks)
			.finish()
	}
}

/// The result of resolving a pathname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRoute<H> {
	/// The template of the matched route, e.g. `/product/:id/`.
	pub path: String,
	/// Decoded parameters, keyed by the template's parameter names.
	pub params: Params,
	/// The handler registered for the template.
	pub handler: H,
	/// The query string of the resolved location.
	pub query: Query,
}

/// Routes in registration order.
///
/// Lookup returns the first route whose pattern matches, so a catch-all must
/// be registered last. Registering a template again replaces its handler and
/// hooks but keeps its original position.
#[derive(Clone)]
pub struct RouteTable<H> {
	routes: IndexMap<String, RouteEntry<H>>,
}

impl<H> Default for RouteTable<H> {
	fn default() -> Self {
		Self {
			routes: IndexMap::new(),
		}
	}
}

impl<H> RouteTable<H> {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a route without hooks.
	pub fn add_route(&mut self, template: &str, handler: H) {
		self.add_route_with(template, handler, RouteHooks::default());
	}

	/// Registers a route with server hooks.
	pub fn add_route_with(&mut self, template: &str, handler: H, hooks: RouteHooks) {
		let entry = RouteEntry {
			pattern: RoutePattern::compile(template),
			handler,
			hooks,
		};
		if self.routes.insert(template.to_string(), entry).is_some() {
			debug_log!("route '{}' re-registered", template);
		}
	}

	/// Returns the number of registered templates.
	pub fn len(&self) -> usize {
		self.routes.len()
	}

	/// Returns whether no route is registered.
	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}

	/// Returns whether `template` is registered.
	pub fn contains(&self, template: &str) -> bool {
		self.routes.contains_key(template)
	}

	/// Iterates the templates in match order.
	pub fn templates(&self) -> impl Iterator<Item = &str> {
		self.routes.keys().map(String::as_str)
	}

	/// Returns the entry registered for `template`.
	pub fn entry(&self, template: &str) -> Option<&RouteEntry<H>> {
		self.routes.get(template)
	}

	/// Finds the first entry matching `pathname`.
	pub fn find(&self, pathname: &str) -> Option<(&RouteEntry<H>, Params)> {
		self.routes.values().find_map(|entry| {
			entry
				.pattern
				.match_path(pathname)
				.map(|params| (entry, params))
		})
	}

	/// Builds a concrete path for a registered template.
	pub fn reverse(&self, template: &str, params: &Params) -> Result<String, RouterError> {
		let entry = self
			.routes
			.get(template)
			.ok_or_else(|| RouterError::UnknownRoute(template.to_string()))?;

		if let Some(missing) = entry
			.pattern
			.param_names()
			.iter()
			.find(|name| !params.contains_key(name.as_str()))
		{
			return Err(RouterError::MissingParameter(missing.clone()));
		}

		entry
			.pattern
			.reverse(params)
			.ok_or_else(|| RouterError::UnknownRoute(template.to_string()))
	}
}

impl<H: Clone> RouteTable<H> {
	/// Resolves `pathname` to the first matching route.
	///
	/// The returned route carries an empty query; engines fill it from the
	/// location they resolved.
	pub fn lookup(&self, pathname: &str) -> Option<MatchedRoute<H>> {
		self.find(pathname).map(|(entry, params)| MatchedRoute {
			path: entry.pattern.template().to_string(),
			params,
			handler: entry.handler.clone(),
			query: Query::new(),
		})
	}

	pub(crate) fn resolve(&self, location: &Location) -> Option<MatchedRoute<H>> {
		let mut matched = self.lookup(location.path())?;
		matched.query = location.query();
		debug_log!("resolved '{}' -> '{}'", location, matched.path);
		Some(matched)
	}
}

impl<H> fmt::Debug for RouteTable<H> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteTable")
			.field("templates", &self.routes.keys().collect::<Vec<_>>())
			.finish()
	}
}
