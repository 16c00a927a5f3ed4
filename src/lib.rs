//! # Storefront
//!
//! The universal routing layer of the storefront demo: one router API for
//! views that render both in the browser and on the server.
//!
//! ## Crates
//!
//! - [`router`]: pattern matching, the route table, the client and server
//!   engines and the universal facade
//! - [`conf`]: router settings from TOML and `STOREFRONT_` environment
//!   variables (feature `conf`, on by default)
//!
//! ## Feature Flags
//!
//! - `conf` (default) - settings loading and [`load_router`]
//!
//! ## Example
//!
//! ```ignore
//! use storefront::prelude::*;
//!
//! let router: UniversalRouter<Page> = storefront::load_router(Some(Path::new("storefront.toml")))?;
//! router.add_route("/", Page::Home);
//! router.add_route("/product/:id/", Page::Product);
//! router.add_route(".*", Page::NotFound);
//!
//! let _provider = provide_router(Rc::new(router));
//! ```

pub use storefront_router as router;

#[cfg(feature = "conf")]
pub use storefront_conf as conf;

pub use storefront_router::{
	ClientRouter, History, MatchedRoute, MemoryHistory, NavigationContext, NavigationIntent,
	PageMetadata, Params, Query, RouteHooks, RouteTable, RouterError, RouterMode,
	RouterSettings, ServerRouter, UniversalRouter,
};

#[cfg(target_arch = "wasm32")]
pub use storefront_router::BrowserHistory;

/// Loads settings (file, then environment) and builds a lazily bound
/// router from them.
#[cfg(feature = "conf")]
pub fn load_router<H: Clone + 'static>(
	path: Option<&std::path::Path>,
) -> Result<UniversalRouter<H>, storefront_conf::SettingsError> {
	let settings = RouterSettings::load(path)?;
	Ok(UniversalRouter::lazy(settings))
}

pub mod prelude {
	pub use crate::{
		ClientRouter, History, MatchedRoute, MemoryHistory, NavigationContext, NavigationIntent,
		PageMetadata, Params, Query, RouteHooks, RouterError, RouterMode, RouterSettings,
		ServerRouter, UniversalRouter,
	};
	pub use storefront_router::{
		BoxError, Unsubscribe, provide_router, try_with_router, use_router, with_router,
	};

	#[cfg(feature = "conf")]
	pub use crate::load_router;
}
