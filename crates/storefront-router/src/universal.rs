//! The universal router: one API over the client and server engines.
//!
//! View code is shared between the browser bundle and the server renderer,
//! so it talks to a [`UniversalRouter`] and never needs to know which engine
//! sits behind it:
//!
//! - Read accessors (`route`, `params`, `target`, `query`, `base_url`) work
//!   on both engines.
//! - Client mutators (`start`, `push`, `replace`, `navigate`, `set_query`,
//!   `subscribe`) do nothing on the server.
//! - Server operations (`start_with`, `match_url`, `create_context`,
//!   `prefetch`, `generate_metadata`) return [`RouterError::ServerOnly`] on
//!   the client. Calling them from browser code is an integration bug.
//!
//! Prefer choosing the engine at the composition root with
//! [`UniversalRouter::client`] or [`UniversalRouter::server`].
//! [`UniversalRouter::lazy`] defers the choice to the first call and decides
//! with [`RouterMode::detect`].

use crate::client::ClientRouter;
use crate::error::RouterError;
use crate::history::History;
use crate::hooks::{PageMetadata, RouteHooks};
use crate::intent::NavigationIntent;
use crate::notifier::Unsubscribe;
use crate::pattern::Params;
use crate::query::Query;
use crate::server::ServerRouter;
use crate::table::MatchedRoute;
use crate::{info_log, warn_log};
use std::cell::OnceCell;
use std::fmt;
use storefront_conf::{ENV_PREFIX, Env, RouterSettings};

/// Which engine a router is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterMode {
	/// Browser engine: live history, subscribers.
	Client,
	/// Request engine: explicit URLs, data hooks.
	Server,
}

impl RouterMode {
	/// Decides the mode for the current process.
	///
	/// Off `wasm32` there is no browser `window`, so this is always
	/// [`RouterMode::Server`].
	pub fn detect(settings: &RouterSettings) -> Self {
		Self::resolve(window_present(), settings)
	}

	/// The decision rule behind [`detect`](Self::detect).
	///
	/// Server when no window is present, or when server rendering is
	/// requested by `settings.ssr` or the `STOREFRONT_SSR` environment
	/// variable. An unreadable or unparsable variable counts as a request
	/// for server rendering.
	pub fn resolve(window_present: bool, settings: &RouterSettings) -> Self {
		if !window_present || settings.ssr == Some(true) {
			return Self::Server;
		}

		match Env::new().with_prefix(ENV_PREFIX).optional_bool("SSR") {
			Ok(Some(true)) => Self::Server,
			Ok(Some(false)) | Ok(None) => Self::Client,
			Err(e) => {
				warn_log!("cannot read SSR flag, assuming server: {}", e);
				Self::Server
			}
		}
	}
}

#[cfg(target_arch = "wasm32")]
fn window_present() -> bool {
	web_sys::window().is_some()
}

#[cfg(not(target_arch = "wasm32"))]
fn window_present() -> bool {
	false
}

#[cfg(target_arch = "wasm32")]
fn page_history() -> crate::history::BrowserHistory {
	crate::history::BrowserHistory::new()
}

#[cfg(not(target_arch = "wasm32"))]
fn page_history() -> crate::history::MemoryHistory {
	crate::history::MemoryHistory::default()
}

enum Engine<H> {
	Client(ClientRouter<H>),
	Server(ServerRouter<H>),
}

/// A router bound to either engine.
pub struct UniversalRouter<H> {
	engine: OnceCell<Engine<H>>,
	settings: RouterSettings,
}

impl<H: Clone + 'static> UniversalRouter<H> {
	/// Binds to a client engine over `history`.
	pub fn client(history: impl History + 'static, base_url: &str) -> Self {
		Self::bound(Engine::Client(ClientRouter::new(history, base_url)), base_url)
	}

	/// Binds to a server engine.
	pub fn server(base_url: &str) -> Self {
		Self::bound(Engine::Server(ServerRouter::new(base_url)), base_url)
	}

	/// Wraps an existing client engine.
	pub fn from_client(router: ClientRouter<H>) -> Self {
		let base_url = router.base_url().to_string();
		Self::bound(Engine::Client(router), &base_url)
	}

	/// Wraps an existing server engine.
	pub fn from_server(router: ServerRouter<H>) -> Self {
		let base_url = router.base_url().to_string();
		Self::bound(Engine::Server(router), &base_url)
	}

	/// Defers the engine choice to the first call.
	///
	/// The client engine uses the page history on `wasm32`.
	pub fn lazy(settings: RouterSettings) -> Self {
		Self {
			engine: OnceCell::new(),
			settings,
		}
	}

	fn bound(engine: Engine<H>, base_url: &str) -> Self {
		Self {
			engine: OnceCell::from(engine),
			settings: RouterSettings::new().with_base_url(base_url),
		}
	}

	fn engine(&self) -> &Engine<H> {
		self.engine.get_or_init(|| {
			let base = self.settings.base_path();
			match RouterMode::detect(&self.settings) {
				RouterMode::Client => {
					info_log!("binding client engine under '{}'", base);
					Engine::Client(ClientRouter::new(page_history(), base))
				}
				RouterMode::Server => {
					info_log!("binding server engine under '{}'", base);
					Engine::Server(ServerRouter::new(base))
				}
			}
		})
	}

	/// Returns the engine kind, binding a lazy router.
	pub fn mode(&self) -> RouterMode {
		match self.engine() {
			Engine::Client(_) => RouterMode::Client,
			Engine::Server(_) => RouterMode::Server,
		}
	}

	/// Returns the client engine, if bound to it.
	pub fn as_client(&self) -> Option<&ClientRouter<H>> {
		match self.engine() {
			Engine::Client(router) => Some(router),
			Engine::Server(_) => None,
		}
	}

	/// Returns the server engine, if bound to it.
	pub fn as_server(&self) -> Option<&ServerRouter<H>> {
		match self.engine() {
			Engine::Client(_) => None,
			Engine::Server(router) => Some(router),
		}
	}

	fn server_only(&self, operation: &'static str) -> Result<&ServerRouter<H>, RouterError> {
		self.as_server().ok_or(RouterError::ServerOnly(operation))
	}

	/// Registers a route.
	pub fn add_route(&self, template: &str, handler: H) {
		match self.engine() {
			Engine::Client(router) => router.add_route(template, handler),
			Engine::Server(router) => router.add_route(template, handler),
		}
	}

	/// Registers a route with server hooks.
	pub fn add_route_with(&self, template: &str, handler: H, hooks: RouteHooks) {
		match self.engine() {
			Engine::Client(router) => router.add_route_with(template, handler, hooks),
			Engine::Server(router) => router.add_route_with(template, handler, hooks),
		}
	}

	/// Returns the matched route.
	pub fn route(&self) -> Option<MatchedRoute<H>> {
		match self.engine() {
			Engine::Client(router) => router.route(),
			Engine::Server(router) => router.route(),
		}
	}

	/// Returns the parameters of the matched route.
	pub fn params(&self) -> Params {
		match self.engine() {
			Engine::Client(router) => router.params(),
			Engine::Server(router) => router.params(),
		}
	}

	/// Returns the handler of the matched route.
	pub fn target(&self) -> Option<H> {
		match self.engine() {
			Engine::Client(router) => router.target(),
			Engine::Server(router) => router.target(),
		}
	}

	/// Returns the current query.
	pub fn query(&self) -> Query {
		match self.engine() {
			Engine::Client(router) => router.query(),
			Engine::Server(router) => router.query(),
		}
	}

	/// Returns the base path.
	pub fn base_url(&self) -> &str {
		match self.engine() {
			Engine::Client(router) => router.base_url(),
			Engine::Server(router) => router.base_url(),
		}
	}

	/// Builds the app path for a registered template.
	pub fn reverse(&self, template: &str, params: &Params) -> Result<String, RouterError> {
		match self.engine() {
			Engine::Client(router) => router.reverse(template, params),
			Engine::Server(router) => router.reverse(template, params),
		}
	}

	/// Starts the client engine. No-op on the server; see
	/// [`start_with`](Self::start_with).
	pub fn start(&self) {
		if let Engine::Client(router) = self.engine() {
			router.start();
		}
	}

	/// Client navigation. No-op on the server.
	pub fn push(&self, url: &str) {
		if let Engine::Client(router) = self.engine() {
			router.push(url);
		}
	}

	/// Client navigation replacing the current entry. No-op on the server.
	pub fn replace(&self, url: &str) {
		if let Engine::Client(router) = self.engine() {
			router.replace(url);
		}
	}

	/// Follows a view's navigation intent. No-op on the server.
	pub fn navigate(&self, intent: &NavigationIntent) {
		if let Engine::Client(router) = self.engine() {
			router.navigate(intent);
		}
	}

	/// Updates the query of the live location. No-op on the server.
	pub fn set_query<I, K, V>(&self, update: I)
	where
		I: IntoIterator<Item = (K, Option<V>)>,
		K: Into<String>,
		V: Into<String>,
	{
		if let Engine::Client(router) = self.engine() {
			router.set_query(update);
		}
	}

	/// Registers a change listener. On the server the listener is dropped and
	/// a no-op handle is returned.
	pub fn subscribe<F>(&self, listener: F) -> Unsubscribe
	where
		F: Fn() + 'static,
	{
		match self.engine() {
			Engine::Client(router) => router.subscribe(listener),
			Engine::Server(router) => router.subscribe(listener),
		}
	}

	/// Resolves a request URL and makes it current.
	pub fn start_with(&self, url: &str) -> Result<(), RouterError> {
		self.server_only("start_with")?.start(url)
	}

	/// Resolves a request URL without changing state.
	pub fn match_url(&self, url: &str) -> Result<Option<MatchedRoute<H>>, RouterError> {
		self.server_only("match_url")?.match_url(url)
	}

	/// Resolves a request URL, makes it current and returns the match.
	pub fn create_context(&self, url: &str) -> Result<Option<MatchedRoute<H>>, RouterError> {
		self.server_only("create_context")?.create_context(url)
	}

	/// Runs the data loader of the route matching `url`.
	pub async fn prefetch(&self, url: &str) -> Result<Option<serde_json::Value>, RouterError> {
		Ok(self.server_only("prefetch")?.prefetch(url).await)
	}

	/// Runs the metadata generator of the route matching `url`.
	pub async fn generate_metadata(&self, url: &str) -> Result<Option<PageMetadata>, RouterError> {
		Ok(self
			.server_only("generate_metadata")?
			.generate_metadata(url)
			.await)
	}
}

impl<H> fmt::Debug for UniversalRouter<H> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let engine = match self.engine.get() {
			None => "unbound",
			Some(Engine::Client(_)) => "client",
			Some(Engine::Server(_)) => "server",
		};
		f.debug_struct("UniversalRouter")
			.field("engine", &engine)
			.field("settings", &self.settings)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::BoxError;
	use crate::history::MemoryHistory;
	use crate::hooks::NavigationContext;
	use rstest::rstest;
	use serial_test::serial;
	use std::cell::Cell;
	use std::rc::Rc;

	fn set_ssr(value: Option<&str>) {
		// SAFETY: serialized by #[serial(env)]
		unsafe {
			match value {
				Some(value) => std::env::set_var("STOREFRONT_SSR", value),
				None => std::env::remove_var("STOREFRONT_SSR"),
			}
		}
	}

	#[rstest]
	#[serial(env)]
	fn test_detect_without_window_is_server() {
		set_ssr(None);
		assert_eq!(RouterMode::detect(&RouterSettings::new()), RouterMode::Server);
		assert_eq!(
			RouterMode::resolve(false, &RouterSettings::new()),
			RouterMode::Server
		);
	}

	#[rstest]
	#[serial(env)]
	fn test_resolve_with_window() {
		set_ssr(None);
		assert_eq!(
			RouterMode::resolve(true, &RouterSettings::new()),
			RouterMode::Client
		);
		assert_eq!(
			RouterMode::resolve(true, &RouterSettings::new().with_ssr(true)),
			RouterMode::Server
		);
	}

	#[rstest]
	#[case(Some("1"), RouterMode::Server)]
	#[case(Some("true"), RouterMode::Server)]
	#[case(Some("off"), RouterMode::Client)]
	#[case(Some("definitely"), RouterMode::Server)]
	#[serial(env)]
	fn test_resolve_reads_ssr_env(#[case] value: Option<&str>, #[case] expected: RouterMode) {
		set_ssr(value);
		let mode = RouterMode::resolve(true, &RouterSettings::new());
		set_ssr(None);
		assert_eq!(mode, expected);
	}

	#[rstest]
	#[serial(env)]
	fn test_lazy_binds_once() {
		set_ssr(None);
		let router: UniversalRouter<&str> =
			UniversalRouter::lazy(RouterSettings::new().with_base_url("/shop/"));
		assert!(format!("{:?}", router).contains("unbound"));

		router.add_route("/product/:id/", "product");

		assert_eq!(router.mode(), RouterMode::Server);
		assert_eq!(router.base_url(), "/shop");
		let matched = router.create_context("/shop/product/3/").unwrap().unwrap();
		assert_eq!(matched.handler, "product");
	}

	#[rstest]
	fn test_server_ignores_client_mutators() {
		let router = UniversalRouter::server("");
		router.add_route("/", "home");
		router.add_route("/cart/", "cart");
		router.start_with("/").unwrap();

		let calls = Rc::new(Cell::new(0));
		let handle = router.subscribe({
			let calls = Rc::clone(&calls);
			move || calls.set(calls.get() + 1)
		});
		router.start();
		router.push("/cart/");
		router.replace("/cart/");
		router.navigate(&NavigationIntent::new("/cart/"));
		router.set_query([("page", Some("2"))]);
		handle.unsubscribe();

		assert_eq!(router.target(), Some("home"));
		assert!(router.query().is_empty());
		assert_eq!(calls.get(), 0);
	}

	#[rstest]
	fn test_client_rejects_server_operations() {
		let router: UniversalRouter<&str> = UniversalRouter::client(MemoryHistory::default(), "");

		assert_eq!(
			router.start_with("/"),
			Err(RouterError::ServerOnly("start_with"))
		);
		assert_eq!(
			router.match_url("/"),
			Err(RouterError::ServerOnly("match_url"))
		);
		assert_eq!(
			router.create_context("/"),
			Err(RouterError::ServerOnly("create_context"))
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_client_rejects_server_hooks() {
		let router: UniversalRouter<&str> = UniversalRouter::client(MemoryHistory::default(), "");
		assert_eq!(
			router.prefetch("/").await,
			Err(RouterError::ServerOnly("prefetch"))
		);
		assert_eq!(
			router.generate_metadata("/").await,
			Err(RouterError::ServerOnly("generate_metadata"))
		);
	}

	#[rstest]
	fn test_client_forwards_reads_and_mutators() {
		let history = MemoryHistory::default();
		let router = UniversalRouter::client(history.clone(), "/shop");
		router.add_route("/", "home");
		router.add_route("/product/:id/", "product");

		let calls = Rc::new(Cell::new(0));
		let _sub = router.subscribe({
			let calls = Rc::clone(&calls);
			move || calls.set(calls.get() + 1)
		});
		router.start();
		router.push("/product/11/?color=red");

		assert_eq!(router.mode(), RouterMode::Client);
		assert_eq!(router.params()["id"], "11");
		assert_eq!(router.query()["color"], "red");
		assert_eq!(router.target(), Some("product"));
		assert_eq!(router.route().unwrap().path, "/product/:id/");
		assert_eq!(history.location().unwrap().path(), "/shop/product/11/");
		assert_eq!(calls.get(), 2);
		assert!(router.as_client().is_some());
		assert!(router.as_server().is_none());
	}

	#[rstest]
	#[tokio::test]
	async fn test_server_forwards_hooks() {
		let router = UniversalRouter::server("/shop");
		router.add_route_with(
			"/product/:id/",
			"product",
			RouteHooks::new()
				.on_server_render(|ctx: NavigationContext| async move {
					Ok::<_, BoxError>(ctx.params["id"].clone())
				})
				.on_metadata(|_ctx| async { Ok::<_, BoxError>(PageMetadata::new("Mug")) }),
		);

		assert_eq!(
			router.prefetch("/shop/product/4/").await,
			Ok(Some(serde_json::json!("4")))
		);
		assert_eq!(
			router.generate_metadata("/shop/product/4/").await,
			Ok(Some(PageMetadata::new("Mug")))
		);
		assert_eq!(router.prefetch("/shop/nothing/").await, Ok(None));
	}

	#[rstest]
	fn test_from_engines() {
		let server = ServerRouter::new("/shop");
		server.add_route("/", "home");
		let router = UniversalRouter::from_server(server);
		assert_eq!(router.base_url(), "/shop");
		assert_eq!(router.mode(), RouterMode::Server);

		let client = ClientRouter::new(MemoryHistory::default(), "");
		client.add_route("/", "home");
		let router = UniversalRouter::from_client(client.clone());
		router.start();
		assert_eq!(client.target(), Some("home"));
	}
}
