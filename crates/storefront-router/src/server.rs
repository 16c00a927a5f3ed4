//! Server-side router engine.
//!
//! There is no ambient location on the server: every resolution starts from
//! an explicit request URL. Engines are `Send + Sync` when their handler type
//! is, and are meant to be used one per request. [`ServerRouter::for_request`]
//! forks a fresh engine that shares the registered routes.

use crate::error::RouterError;
use crate::hooks::{NavigationContext, PageMetadata, RouteHooks};
use crate::location::{BasePath, Location};
use crate::notifier::Unsubscribe;
use crate::pattern::Params;
use crate::query::Query;
use crate::table::{MatchedRoute, RouteTable};
use crate::{error_log, warn_log};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

struct ServerState<H> {
	location: Option<Location>,
	current: Option<MatchedRoute<H>>,
}

impl<H> Default for ServerState<H> {
	fn default() -> Self {
		Self {
			location: None,
			current: None,
		}
	}
}

/// The request-side router.
pub struct ServerRouter<H> {
	table: RwLock<Arc<RouteTable<H>>>,
	base: BasePath,
	state: RwLock<ServerState<H>>,
}

impl<H: Clone> ServerRouter<H> {
	/// Creates a router mounted under `base_url`.
	pub fn new(base_url: &str) -> Self {
		Self {
			table: RwLock::new(Arc::new(RouteTable::new())),
			base: BasePath::new(base_url),
			state: RwLock::new(ServerState::default()),
		}
	}

	/// Registers a route.
	///
	/// Engines forked earlier with [`for_request`](Self::for_request) keep
	/// the routes they were forked with.
	pub fn add_route(&self, template: &str, handler: H) {
		self.add_route_with(template, handler, RouteHooks::default());
	}

	/// Registers a route with server hooks.
	pub fn add_route_with(&self, template: &str, handler: H, hooks: RouteHooks) {
		let mut table = self.table.write();
		Arc::make_mut(&mut table).add_route_with(template, handler, hooks);
	}

	/// Returns a new engine with the same routes and base path and no
	/// resolved URL.
	pub fn for_request(&self) -> Self {
		Self {
			table: RwLock::new(self.routes()),
			base: self.base.clone(),
			state: RwLock::new(ServerState::default()),
		}
	}

	/// Resolves `url` and makes it the current URL.
	pub fn start(&self, url: &str) -> Result<(), RouterError> {
		self.create_context(url).map(|_| ())
	}

	/// Resolves `url`, makes it the current URL, and returns the matched
	/// route.
	///
	/// `url` may be absolute (`https://host/shop/product/7/?sort=asc`) or a
	/// path (`/shop/product/7/?sort=asc`). The base path is removed before
	/// matching. An unparsable URL is an error and leaves the state as it
	/// was.
	pub fn create_context(&self, url: &str) -> Result<Option<MatchedRoute<H>>, RouterError> {
		let location = self.app_location(url)?;
		let current = self.routes().resolve(&location);

		let mut state = self.state.write();
		state.location = Some(location);
		state.current = current.clone();
		Ok(current)
	}

	/// Same as [`start`](Self::start).
	pub fn push(&self, url: &str) -> Result<(), RouterError> {
		self.start(url)
	}

	/// Resolves `url` without touching the current state.
	pub fn match_url(&self, url: &str) -> Result<Option<MatchedRoute<H>>, RouterError> {
		let location = self.app_location(url)?;
		Ok(self.routes().resolve(&location))
	}

	/// Returns the matched route of the current URL.
	pub fn route(&self) -> Option<MatchedRoute<H>> {
		self.state.read().current.clone()
	}

	/// Returns the parameters of the current route; empty without a match.
	pub fn params(&self) -> Params {
		self.state
			.read()
			.current
			.as_ref()
			.map(|matched| matched.params.clone())
			.unwrap_or_default()
	}

	/// Returns the handler of the current route.
	pub fn target(&self) -> Option<H> {
		self.state
			.read()
			.current
			.as_ref()
			.map(|matched| matched.handler.clone())
	}

	/// Builds the app path for a registered template.
	pub fn reverse(&self, template: &str, params: &Params) -> Result<String, RouterError> {
		self.routes().reverse(template, params)
	}

	/// Returns the number of registered routes.
	pub fn route_count(&self) -> usize {
		self.table.read().len()
	}

	/// Runs the `on_server_render` hook of the route matching `url`.
	///
	/// Returns `None` when nothing matches, the route has no hook, or the
	/// hook fails. Failures are logged.
	pub async fn prefetch(&self, url: &str) -> Option<serde_json::Value> {
		let (ctx, hooks) = self.hook_context(url)?;
		let request_url = ctx.url.clone();
		match hooks.server_render(ctx)?.await {
			Ok(data) => Some(data),
			Err(e) => {
				error_log!("prefetch for '{}' failed: {}", request_url, e);
				None
			}
		}
	}

	/// Runs the `on_metadata` hook of the route matching `url`, with the
	/// same contract as [`prefetch`](Self::prefetch).
	pub async fn generate_metadata(&self, url: &str) -> Option<PageMetadata> {
		let (ctx, hooks) = self.hook_context(url)?;
		let request_url = ctx.url.clone();
		match hooks.metadata(ctx)?.await {
			Ok(metadata) => Some(metadata),
			Err(e) => {
				error_log!("metadata for '{}' failed: {}", request_url, e);
				None
			}
		}
	}

	fn routes(&self) -> Arc<RouteTable<H>> {
		Arc::clone(&self.table.read())
	}

	fn app_location(&self, url: &str) -> Result<Location, RouterError> {
		Ok(self.base.strip(Location::parse(url)?))
	}

	fn hook_context(&self, url: &str) -> Option<(NavigationContext, RouteHooks)> {
		let location = match self.app_location(url) {
			Ok(location) => location,
			Err(e) => {
				warn_log!("{}", e);
				return None;
			}
		};

		let routes = self.routes();
		let (entry, params) = routes.find(location.path())?;
		let ctx = NavigationContext {
			params,
			query: location.query(),
			url: location.href(),
		};
		Some((ctx, entry.hooks().clone()))
	}
}

impl<H> ServerRouter<H> {
	/// Returns the query of the current URL; empty when no URL is set.
	pub fn query(&self) -> Query {
		self.state
			.read()
			.location
			.as_ref()
			.map(Location::query)
			.unwrap_or_default()
	}

	/// Returns the current URL, base path removed.
	pub fn location(&self) -> Option<Location> {
		self.state.read().location.clone()
	}

	/// Does nothing: the server never navigates on its own.
	pub fn subscribe<F>(&self, _listener: F) -> Unsubscribe
	where
		F: Fn() + 'static,
	{
		Unsubscribe::noop()
	}

	/// Returns the base path, without trailing slash.
	pub fn base_url(&self) -> &str {
		self.base.as_str()
	}
}

impl<H> fmt::Debug for ServerRouter<H> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.state.read();
		f.debug_struct("ServerRouter")
			.field("base", &self.base)
			.field("table", &**self.table.read())
			.field("location", &state.location)
			.field("current", &state.current.as_ref().map(|m| m.path.as_str()))
			.finish()
	}
}
