//! History backends for the client router.
//!
//! The client engine never talks to the browser directly. It reads and
//! writes the location through a [`History`]: [`BrowserHistory`] on `wasm32`,
//! [`MemoryHistory`] everywhere else (native apps, tests, SSR shims).

use crate::error::RouterError;
use crate::location::Location;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Callback fired when the user moves through history (back/forward).
pub type PopListener = Box<dyn Fn()>;

/// Access to a session history.
pub trait History {
	/// Returns the current location.
	fn location(&self) -> Result<Location, RouterError>;

	/// Adds a new entry and makes it current.
	fn push(&self, location: &Location) -> Result<(), RouterError>;

	/// Replaces the current entry.
	fn replace(&self, location: &Location) -> Result<(), RouterError>;

	/// Installs a listener for back/forward moves, kept for the lifetime of
	/// the history. Programmatic `push`/`replace` do not fire it.
	fn listen(&self, on_pop: PopListener) -> Result<(), RouterError>;
}

impl<T: History + ?Sized> History for Rc<T> {
	fn location(&self) -> Result<Location, RouterError> {
		(**self).location()
	}

	fn push(&self, location: &Location) -> Result<(), RouterError> {
		(**self).push(location)
	}

	fn replace(&self, location: &Location) -> Result<(), RouterError> {
		(**self).replace(location)
	}

	fn listen(&self, on_pop: PopListener) -> Result<(), RouterError> {
		(**self).listen(on_pop)
	}
}

struct MemoryState {
	entries: Vec<Location>,
	index: usize,
	listeners: Vec<Rc<dyn Fn()>>,
}

/// An in-memory history stack.
///
/// Cloning yields another handle to the same stack, so a test can keep one
/// handle to drive `back`/`forward` while the router owns another.
#[derive(Clone)]
pub struct MemoryHistory {
	state: Rc<RefCell<MemoryState>>,
}

impl MemoryHistory {
	/// Creates a history whose only entry is `initial`.
	pub fn new(initial: Location) -> Self {
		Self {
			state: Rc::new(RefCell::new(MemoryState {
				entries: vec![initial],
				index: 0,
				listeners: Vec::new(),
			})),
		}
	}

	/// Creates a history starting at `url` (a path, optionally with a query).
	pub fn at(url: &str) -> Result<Self, RouterError> {
		Ok(Self::new(Location::parse(url)?))
	}

	/// Number of entries in the stack.
	pub fn len(&self) -> usize {
		self.state.borrow().entries.len()
	}

	/// Always false: a history has at least its initial entry.
	pub fn is_empty(&self) -> bool {
		false
	}

	/// Every entry, oldest first.
	pub fn entries(&self) -> Vec<Location> {
		self.state.borrow().entries.clone()
	}

	/// Moves one entry back and fires the pop listeners. Returns false at the
	/// start of the stack.
	pub fn back(&self) -> bool {
		self.go(-1)
	}

	/// Moves one entry forward and fires the pop listeners. Returns false at
	/// the end of the stack.
	pub fn forward(&self) -> bool {
		self.go(1)
	}

	fn go(&self, delta: isize) -> bool {
		let listeners = {
			let mut state = self.state.borrow_mut();
			let Some(target) = state.index.checked_add_signed(delta) else {
				return false;
			};
			if target >= state.entries.len() {
				return false;
			}
			state.index = target;
			state.listeners.clone()
		};

		for listener in listeners {
			listener();
		}
		true
	}
}

impl Default for MemoryHistory {
	fn default() -> Self {
		Self::new(Location::new("/", ""))
	}
}

impl History for MemoryHistory {
	fn location(&self) -> Result<Location, RouterError> {
		let state = self.state.borrow();
		Ok(state.entries[state.index].clone())
	}

	fn push(&self, location: &Location) -> Result<(), RouterError> {
		let mut state = self.state.borrow_mut();
		let next = state.index + 1;
		state.entries.truncate(next);
		state.entries.push(location.clone());
		state.index = next;
		Ok(())
	}

	fn replace(&self, location: &Location) -> Result<(), RouterError> {
		let mut state = self.state.borrow_mut();
		let index = state.index;
		state.entries[index] = location.clone();
		Ok(())
	}

	fn listen(&self, on_pop: PopListener) -> Result<(), RouterError> {
		self.state.borrow_mut().listeners.push(Rc::from(on_pop));
		Ok(())
	}
}

impl fmt::Debug for MemoryHistory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.state.borrow();
		f.debug_struct("MemoryHistory")
			.field("entries", &state.entries)
			.field("index", &state.index)
			.field("listeners", &state.listeners.len())
			.finish()
	}
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserHistory;

#[cfg(target_arch = "wasm32")]
mod browser {
	use super::{History, PopListener};
	use crate::error::RouterError;
	use crate::location::Location;
	use wasm_bindgen::JsCast;
	use wasm_bindgen::JsValue;
	use wasm_bindgen::closure::Closure;
	use web_sys::Event;

	fn js_error(value: JsValue) -> RouterError {
		RouterError::NavigationFailed(format!("{:?}", value))
	}

	fn window() -> Result<web_sys::Window, RouterError> {
		web_sys::window().ok_or_else(|| RouterError::NavigationFailed("no window".to_string()))
	}

	/// The browser's session history (`window.history` / `window.location`).
	#[derive(Debug, Clone, Copy, Default)]
	pub struct BrowserHistory;

	impl BrowserHistory {
		/// Creates a handle to the page's history.
		pub fn new() -> Self {
			Self
		}
	}

	impl History for BrowserHistory {
		fn location(&self) -> Result<Location, RouterError> {
			let location = window()?.location();
			let path = location.pathname().map_err(js_error)?;
			let search = location.search().map_err(js_error)?;
			Ok(Location::new(path, search))
		}

		fn push(&self, location: &Location) -> Result<(), RouterError> {
			window()?
				.history()
				.map_err(js_error)?
				.push_state_with_url(&JsValue::NULL, "", Some(&location.href()))
				.map_err(js_error)
		}

		fn replace(&self, location: &Location) -> Result<(), RouterError> {
			window()?
				.history()
				.map_err(js_error)?
				.replace_state_with_url(&JsValue::NULL, "", Some(&location.href()))
				.map_err(js_error)
		}

		fn listen(&self, on_pop: PopListener) -> Result<(), RouterError> {
			let handler = Closure::wrap(Box::new(move |_event: Event| {
				on_pop();
			}) as Box<dyn FnMut(_)>);

			window()?
				.add_event_listener_with_callback("popstate", handler.as_ref().unchecked_ref())
				.map_err(js_error)?;
			// Lives as long as the page.
			handler.forget();
			Ok(())
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::cell::Cell;

	fn paths(history: &MemoryHistory) -> Vec<String> {
		history
			.entries()
			.iter()
			.map(|location| location.href())
			.collect()
	}

	#[rstest]
	fn test_memory_history_starts_at_initial_entry() {
		let history = MemoryHistory::at("/shop/?sort=asc").unwrap();
		assert_eq!(history.len(), 1);
		assert_eq!(history.location().unwrap().href(), "/shop/?sort=asc");
		assert_eq!(MemoryHistory::default().location().unwrap().path(), "/");
	}

	#[rstest]
	fn test_push_and_replace() {
		let history = MemoryHistory::default();
		history.push(&Location::new("/a/", "")).unwrap();
		history.push(&Location::new("/b/", "")).unwrap();
		history.replace(&Location::new("/c/", "")).unwrap();

		assert_eq!(paths(&history), vec!["/", "/a/", "/c/"]);
		assert_eq!(history.location().unwrap().path(), "/c/");
	}

	#[rstest]
	fn test_back_forward_fire_listeners() {
		let history = MemoryHistory::default();
		let pops = Rc::new(Cell::new(0));
		history
			.listen(Box::new({
				let pops = Rc::clone(&pops);
				move || pops.set(pops.get() + 1)
			}))
			.unwrap();

		history.push(&Location::new("/a/", "")).unwrap();
		assert_eq!(pops.get(), 0);

		assert!(history.back());
		assert_eq!(history.location().unwrap().path(), "/");
		assert!(!history.back());

		assert!(history.forward());
		assert_eq!(history.location().unwrap().path(), "/a/");
		assert!(!history.forward());

		assert_eq!(pops.get(), 2);
	}

	#[rstest]
	fn test_push_after_back_drops_forward_entries() {
		let history = MemoryHistory::default();
		history.push(&Location::new("/a/", "")).unwrap();
		history.push(&Location::new("/b/", "")).unwrap();
		history.back();
		history.push(&Location::new("/c/", "")).unwrap();

		assert_eq!(paths(&history), vec!["/", "/a/", "/c/"]);
		assert!(!history.forward());
	}

	#[rstest]
	fn test_listener_may_read_history() {
		let history = MemoryHistory::default();
		let seen = Rc::new(RefCell::new(String::new()));
		history
			.listen(Box::new({
				let history = history.clone();
				let seen = Rc::clone(&seen);
				move || *seen.borrow_mut() = history.location().unwrap().href()
			}))
			.unwrap();

		history.push(&Location::new("/a/", "q=1")).unwrap();
		history.back();
		history.forward();

		assert_eq!(*seen.borrow(), "/a/?q=1");
	}
}
