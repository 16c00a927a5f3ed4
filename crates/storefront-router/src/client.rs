//! Client-side router engine.
//!
//! Derives the current route from a live [`History`] and notifies
//! subscribers after every navigation, including back/forward moves.
//!
//! ## Example
//!
//! ```ignore
//! use storefront_router::{ClientRouter, MemoryHistory};
//!
//! let router = ClientRouter::new(MemoryHistory::default(), "/shop");
//! router.add_route("/", Page::Home);
//! router.add_route("/product/:id/", Page::Product);
//! router.add_route(".*", Page::NotFound);
//!
//! let _sub = router.subscribe({
//!     let router = router.clone();
//!     move || render(router.target())
//! });
//! router.start();
//! router.push("/product/42/");
//! ```

use crate::error::RouterError;
use crate::history::History;
use crate::hooks::RouteHooks;
use crate::intent::NavigationIntent;
use crate::location::{BasePath, Location};
use crate::notifier::{Notifier, Unsubscribe};
use crate::pattern::Params;
use crate::query::{Query, merge_query, serialize_query};
use crate::table::{MatchedRoute, RouteTable};
use crate::{debug_log, warn_log};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavigationType {
	Push,
	Replace,
}

struct ClientState<H> {
	table: RouteTable<H>,
	current: Option<MatchedRoute<H>>,
	listening: bool,
}

struct ClientInner<H> {
	history: Box<dyn History>,
	base: BasePath,
	notifier: Notifier,
	state: RefCell<ClientState<H>>,
}

/// The browser-side router.
///
/// A cheap handle: clones share the same table, state and subscribers. No
/// internal borrow is held while listeners run, so a listener may read the
/// router or navigate again.
pub struct ClientRouter<H> {
	inner: Rc<ClientInner<H>>,
}

impl<H> Clone for ClientRouter<H> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<H: Clone + 'static> ClientRouter<H> {
	/// Creates a router over `history`, mounted under `base_url`.
	pub fn new(history: impl History + 'static, base_url: &str) -> Self {
		Self {
			inner: Rc::new(ClientInner {
				history: Box::new(history),
				base: BasePath::new(base_url),
				notifier: Notifier::new(),
				state: RefCell::new(ClientState {
					table: RouteTable::new(),
					current: None,
					listening: false,
				}),
			}),
		}
	}

	/// Registers a route.
	pub fn add_route(&self, template: &str, handler: H) {
		self.inner.state.borrow_mut().table.add_route(template, handler);
	}

	/// Registers a route with server hooks. The client keeps the hooks but
	/// never runs them.
	pub fn add_route_with(&self, template: &str, handler: H, hooks: RouteHooks) {
		self.inner
			.state
			.borrow_mut()
			.table
			.add_route_with(template, handler, hooks);
	}

	/// Resolves the current location and notifies subscribers.
	///
	/// The first call also starts listening for back/forward moves; later
	/// calls only re-resolve.
	pub fn start(&self) {
		self.listen_for_pops();
		self.refresh();
	}

	/// Navigates to `url`, adding a history entry.
	///
	/// The base path is prefixed when missing. Failures are logged and leave
	/// the router untouched, without notifying.
	pub fn push(&self, url: &str) {
		self.go(url, NavigationType::Push);
	}

	/// Navigates to `url`, replacing the current history entry.
	pub fn replace(&self, url: &str) {
		self.go(url, NavigationType::Replace);
	}

	/// Follows a navigation intent built by a view.
	pub fn navigate(&self, intent: &NavigationIntent) {
		let nav_type = if intent.is_replace() {
			NavigationType::Replace
		} else {
			NavigationType::Push
		};
		self.go(intent.href(), nav_type);
	}

	/// Returns the query of the live location.
	pub fn query(&self) -> Query {
		match self.inner.history.location() {
			Ok(location) => location.query(),
			Err(e) => {
				warn_log!("cannot read location: {}", e);
				Query::new()
			}
		}
	}

	/// Applies a partial query update and pushes the resulting URL.
	///
	/// `None` or empty values remove a key.
	pub fn set_query<I, K, V>(&self, update: I)
	where
		I: IntoIterator<Item = (K, Option<V>)>,
		K: Into<String>,
		V: Into<String>,
	{
		let result = self.inner.history.location().and_then(|location| {
			let merged = merge_query(&location.query(), update);
			let target = self
				.inner
				.base
				.apply(location.with_search(serialize_query(&merged)));
			self.commit_navigation(target, NavigationType::Push)
		});
		if let Err(e) = result {
			warn_log!("query update failed: {}", e);
		}
	}

	/// Returns the matched route, if any.
	pub fn route(&self) -> Option<MatchedRoute<H>> {
		self.inner.state.borrow().current.clone()
	}

	/// Returns the parameters of the matched route; empty without a match.
	pub fn params(&self) -> Params {
		self.inner
			.state
			.borrow()
			.current
			.as_ref()
			.map(|matched| matched.params.clone())
			.unwrap_or_default()
	}

	/// Returns the handler of the matched route.
	pub fn target(&self) -> Option<H> {
		self.inner
			.state
			.borrow()
			.current
			.as_ref()
			.map(|matched| matched.handler.clone())
	}

	/// Returns the live location, base path included.
	pub fn location(&self) -> Result<Location, RouterError> {
		self.inner.history.location()
	}

	/// Builds the app path for a registered template.
	pub fn reverse(&self, template: &str, params: &Params) -> Result<String, RouterError> {
		self.inner.state.borrow().table.reverse(template, params)
	}

	/// Returns the number of registered routes.
	pub fn route_count(&self) -> usize {
		self.inner.state.borrow().table.len()
	}

	fn listen_for_pops(&self) {
		if self.inner.state.borrow().listening {
			return;
		}

		let weak: Weak<ClientInner<H>> = Rc::downgrade(&self.inner);
		let installed = self.inner.history.listen(Box::new(move || {
			if let Some(inner) = weak.upgrade() {
				debug_log!("history pop");
				ClientRouter { inner }.refresh();
			}
		}));

		match installed {
			Ok(()) => self.inner.state.borrow_mut().listening = true,
			Err(e) => warn_log!("cannot listen for history changes: {}", e),
		}
	}

	fn refresh(&self) {
		match self.inner.history.location() {
			Ok(location) => {
				self.resolve(location);
				self.inner.notifier.notify();
			}
			Err(e) => warn_log!("cannot read location: {}", e),
		}
	}

	fn go(&self, url: &str, nav_type: NavigationType) {
		let result = self
			.inner
			.base
			.join(url)
			.and_then(|target| self.commit_navigation(target, nav_type));
		if let Err(e) = result {
			warn_log!("navigation to '{}' failed: {}", url, e);
		}
	}

	fn commit_navigation(&self, target: Location, nav_type: NavigationType) -> Result<(), RouterError> {
		let history = &self.inner.history;
		if history.location()? != target {
			match nav_type {
				NavigationType::Push => history.push(&target)?,
				NavigationType::Replace => history.replace(&target)?,
			}
		}
		debug_log!("{:?} '{}'", nav_type, target);

		self.resolve(history.location()?);
		self.inner.notifier.notify();
		Ok(())
	}

	fn resolve(&self, location: Location) {
		let app_location = self.inner.base.strip(location);
		let current = self.inner.state.borrow().table.resolve(&app_location);
		self.inner.state.borrow_mut().current = current;
	}
}

impl<H> ClientRouter<H> {
	/// Registers a change listener, called after every navigation.
	pub fn subscribe<F>(&self, listener: F) -> Unsubscribe
	where
		F: Fn() + 'static,
	{
		self.inner.notifier.subscribe(listener)
	}

	/// Returns the base path, without trailing slash.
	pub fn base_url(&self) -> &str {
		self.inner.base.as_str()
	}
}

impl<H> fmt::Debug for ClientRouter<H> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.inner.state.borrow();
		f.debug_struct("ClientRouter")
			.field("base", &self.inner.base)
			.field("table", &state.table)
			.field("current", &state.current.as_ref().map(|m| m.path.as_str()))
			.field("notifier", &self.inner.notifier)
			.finish()
	}
}
