//! Router context: hands the router to view code without threading it
//! through every function.
//!
//! The composition root provides a router for the current thread; views
//! read it back with [`use_router`] or [`with_router`]. There is no default
//! router: reading without a provider is an error.
//!
//! ```ignore
//! let router = Rc::new(UniversalRouter::server("/shop"));
//! let _provider = provide_router(Rc::clone(&router));
//!
//! // deep inside a view
//! let id = with_router(|router: &UniversalRouter<Page>| router.params()["id"].clone())?;
//! ```

use crate::error::RouterError;
use crate::universal::UniversalRouter;
use std::any::Any;
use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

const NOT_PROVIDED: &str =
	"no router provided on this thread; call provide_router before rendering views";

// Provided routers, innermost last.
thread_local! {
	static ROUTERS: RefCell<Vec<Rc<dyn Any>>> = const { RefCell::new(Vec::new()) };
}

/// Keeps a router provided until dropped.
///
/// Providers nest: dropping one also withdraws every router provided after
/// it on the same thread.
#[must_use = "the router is withdrawn when the provider is dropped"]
#[derive(Debug)]
pub struct RouterProvider {
	depth: usize,
	// Tied to the thread that owns the stack.
	_local: PhantomData<Rc<()>>,
}

impl Drop for RouterProvider {
	fn drop(&mut self) {
		ROUTERS.with(|routers| routers.borrow_mut().truncate(self.depth));
	}
}

/// Provides `router` to views on this thread until the returned guard drops.
pub fn provide_router<H: 'static>(router: Rc<UniversalRouter<H>>) -> RouterProvider {
	ROUTERS.with(|routers| {
		let mut routers = routers.borrow_mut();
		let depth = routers.len();
		routers.push(router);
		RouterProvider {
			depth,
			_local: PhantomData,
		}
	})
}

/// Returns the innermost provided router with handler type `H`.
pub fn use_router<H: 'static>() -> Result<Rc<UniversalRouter<H>>, RouterError> {
	ROUTERS
		.with(|routers| {
			routers
				.borrow()
				.iter()
				.rev()
				.find_map(|router| Rc::clone(router).downcast::<UniversalRouter<H>>().ok())
		})
		.ok_or(RouterError::ContextNotFound(NOT_PROVIDED))
}

/// Calls `f` with the innermost provided router.
///
/// No borrow of the context is held while `f` runs, so `f` may provide
/// another router or navigate.
pub fn with_router<H, F, R>(f: F) -> Result<R, RouterError>
where
	H: 'static,
	F: FnOnce(&UniversalRouter<H>) -> R,
{
	let router = use_router::<H>()?;
	Ok(f(&router))
}

/// Like [`with_router`], returning `None` when no router is provided.
pub fn try_with_router<H, F, R>(f: F) -> Option<R>
where
	H: 'static,
	F: FnOnce(&UniversalRouter<H>) -> R,
{
	with_router(f).ok()
}
