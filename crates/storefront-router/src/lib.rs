//! Storefront Router - universal (browser/server) routing
//!
//! One routing API for code that renders in both the browser and the server:
//! routes are registered once, and the same view code reads the matched
//! route, its parameters and the query string whichever engine is active.
//!
//! ## Features
//!
//! - **Segment patterns**: `/product/:id/`, catch-all `*` / `.*`, compiled
//!   once at registration, first match wins
//! - **Client engine**: history-driven, change notification, back/forward
//! - **Server engine**: explicit request URLs, per-request isolation, async
//!   data and metadata hooks
//! - **Universal facade**: forwards to either engine, with no-op client
//!   mutators on the server and errors for server-only calls on the client
//!
//! ## Architecture
//!
//! - [`pattern`]: template compilation and matching
//! - [`table`]: the ordered route table
//! - [`query`]: query string parsing and merging
//! - [`location`]: URL normalization and the base path
//! - [`notifier`]: change listeners
//! - [`history`]: history backends (browser, in-memory)
//! - [`hooks`]: server data hooks
//! - [`client`] / [`server`]: the two engines
//! - [`universal`]: the facade
//! - [`context`]: providing the router to views
//! - [`logging`]: logging macros
//!
//! ## Example
//!
//! ```ignore
//! use storefront_router::{NavigationContext, RouteHooks, UniversalRouter};
//!
//! let router = UniversalRouter::server("/shop");
//! router.add_route("/", Page::Home);
//! router.add_route_with(
//!     "/product/:id/",
//!     Page::Product,
//!     RouteHooks::new().on_server_render(|ctx: NavigationContext| async move {
//!         catalog::product(&ctx.params["id"]).await
//!     }),
//! );
//! router.add_route(".*", Page::NotFound);
//!
//! let page = router.create_context("/shop/product/7/?sort=asc")?;
//! let props = router.prefetch("/shop/product/7/?sort=asc").await?;
//! ```

pub mod client;
pub mod context;
pub mod error;
pub mod history;
pub mod hooks;
pub mod intent;
pub mod location;
pub mod logging;
pub mod notifier;
pub mod pattern;
pub mod query;
pub mod server;
pub mod table;
pub mod universal;

pub use client::ClientRouter;
pub use context::{RouterProvider, provide_router, try_with_router, use_router, with_router};
pub use error::{BoxError, RouterError};
#[cfg(target_arch = "wasm32")]
pub use history::BrowserHistory;
pub use history::{History, MemoryHistory, PopListener};
pub use hooks::{NavigationContext, PageMetadata, RouteHooks};
pub use intent::NavigationIntent;
pub use location::{BasePath, Location};
pub use notifier::{Notifier, Unsubscribe};
pub use pattern::{Params, RoutePattern};
pub use query::{Query, decode_query, merge_query, parse_query, serialize_query};
pub use server::ServerRouter;
pub use table::{MatchedRoute, RouteEntry, RouteTable};
pub use universal::{RouterMode, UniversalRouter};

pub use storefront_conf::RouterSettings;

#[doc(hidden)]
pub mod __private {
	pub use tracing;
	pub use web_sys;
}
