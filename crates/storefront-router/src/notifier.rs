//! Change notification for the client router.
//!
//! Listeners are zero-argument callbacks. Each notification pass iterates a
//! snapshot of the registrations taken when the pass starts, so a listener
//! may subscribe or unsubscribe (itself or others) while being called.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type Listener = Rc<dyn Fn()>;

#[derive(Default)]
struct Registry {
	next_id: Cell<u64>,
	listeners: RefCell<Vec<(u64, Listener)>>,
}

/// An ordered set of change listeners.
///
/// Cloning a `Notifier` yields another handle to the same set.
#[derive(Clone, Default)]
pub struct Notifier {
	registry: Rc<Registry>,
}

impl Notifier {
	/// Creates an empty notifier.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a listener and returns the handle that removes it.
	///
	/// Registering the same closure twice yields two registrations, each
	/// called once per pass.
	pub fn subscribe<F>(&self, listener: F) -> Unsubscribe
	where
		F: Fn() + 'static,
	{
		let id = self.registry.next_id.get();
		self.registry.next_id.set(id + 1);
		self.registry
			.listeners
			.borrow_mut()
			.push((id, Rc::new(listener)));

		Unsubscribe {
			registry: Rc::downgrade(&self.registry),
			id: Some(id),
		}
	}

	/// Calls every listener registered when the pass starts, in
	/// registration order.
	///
	/// A listener removed during the pass is still called in that pass. A
	/// panicking listener aborts the pass and the panic propagates.
	pub fn notify(&self) {
		let snapshot: Vec<Listener> = self
			.registry
			.listeners
			.borrow()
			.iter()
			.map(|(_, listener)| Rc::clone(listener))
			.collect();

		for listener in snapshot {
			listener();
		}
	}

	/// Returns the number of live registrations.
	pub fn listener_count(&self) -> usize {
		self.registry.listeners.borrow().len()
	}
}

impl fmt::Debug for Notifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Notifier")
			.field("listener_count", &self.listener_count())
			.finish()
	}
}

/// Removes one listener registration.
///
/// Dropping the handle does not unsubscribe; call
/// [`unsubscribe`](Self::unsubscribe). The handle holds the notifier weakly.
#[must_use = "keep the handle to be able to unsubscribe"]
pub struct Unsubscribe {
	registry: Weak<Registry>,
	id: Option<u64>,
}

impl Unsubscribe {
	/// A handle that removes nothing.
	///
	/// Returned where subscribing has no effect, such as on the server.
	pub fn noop() -> Self {
		Self {
			registry: Weak::new(),
			id: None,
		}
	}

	/// Removes the registration. Calling this after the notifier is gone, or
	/// on a no-op handle, does nothing.
	pub fn unsubscribe(self) {
		let (Some(registry), Some(id)) = (self.registry.upgrade(), self.id) else {
			return;
		};
		registry
			.listeners
			.borrow_mut()
			.retain(|(listener_id, _)| *listener_id != id);
	}
}

impl fmt::Debug for Unsubscribe {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Unsubscribe").field("id", &self.id).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Box<dyn Fn()>) {
		let log = Rc::new(RefCell::new(Vec::new()));
		let make = {
			let log = Rc::clone(&log);
			move |name: &'static str| -> Box<dyn Fn()> {
				let log = Rc::clone(&log);
				Box::new(move || log.borrow_mut().push(name))
			}
		};
		(log, make)
	}

	#[rstest]
	fn test_notify_in_registration_order() {
		let notifier = Notifier::new();
		let (log, make) = recorder();
		let _a = notifier.subscribe(make("a"));
		let _b = notifier.subscribe(make("b"));
		let _c = notifier.subscribe(make("c"));

		notifier.notify();

		assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
	}

	#[rstest]
	fn test_unsubscribe_removes_only_that_registration() {
		let notifier = Notifier::new();
		let (log, make) = recorder();
		let a = notifier.subscribe(make("a"));
		let _b = notifier.subscribe(make("b"));

		a.unsubscribe();
		notifier.notify();

		assert_eq!(*log.borrow(), vec!["b"]);
		assert_eq!(notifier.listener_count(), 1);
	}

	#[rstest]
	fn test_duplicate_registrations_fire_twice() {
		let notifier = Notifier::new();
		let count = Rc::new(Cell::new(0));
		let listener = {
			let count = Rc::clone(&count);
			move || count.set(count.get() + 1)
		};
		let first = notifier.subscribe(listener.clone());
		let _second = notifier.subscribe(listener);

		notifier.notify();
		assert_eq!(count.get(), 2);

		first.unsubscribe();
		notifier.notify();
		assert_eq!(count.get(), 3);
	}

	#[rstest]
	fn test_unsubscribe_during_pass_still_fires_this_pass() {
		let notifier = Notifier::new();
		let (log, make) = recorder();
		let handle_b: Rc<RefCell<Option<Unsubscribe>>> = Rc::new(RefCell::new(None));

		let _a = notifier.subscribe({
			let handle_b = Rc::clone(&handle_b);
			let log = Rc::clone(&log);
			move || {
				log.borrow_mut().push("a");
				if let Some(handle) = handle_b.borrow_mut().take() {
					handle.unsubscribe();
				}
			}
		});
		*handle_b.borrow_mut() = Some(notifier.subscribe(make("b")));

		notifier.notify();
		assert_eq!(*log.borrow(), vec!["a", "b"]);

		notifier.notify();
		assert_eq!(*log.borrow(), vec!["a", "b", "a"]);
	}

	#[rstest]
	fn test_subscribe_during_pass_waits_for_next_pass() {
		let notifier = Notifier::new();
		let (log, make) = recorder();
		let added = Rc::new(Cell::new(false));

		let _a = notifier.subscribe({
			let notifier = notifier.clone();
			let added = Rc::clone(&added);
			let late = Rc::new(make("late"));
			move || {
				if !added.replace(true) {
					let late = Rc::clone(&late);
					let _handle = notifier.subscribe(move || late());
				}
			}
		});

		notifier.notify();
		assert!(log.borrow().is_empty());

		notifier.notify();
		assert_eq!(*log.borrow(), vec!["late"]);
	}

	#[rstest]
	#[should_panic(expected = "listener failed")]
	fn test_listener_panic_propagates() {
		let notifier = Notifier::new();
		let _a = notifier.subscribe(|| panic!("listener failed"));
		notifier.notify();
	}

	#[rstest]
	fn test_noop_and_stale_handles() {
		Unsubscribe::noop().unsubscribe();

		let handle = {
			let notifier = Notifier::new();
			notifier.subscribe(|| {})
		};
		handle.unsubscribe();
	}

	#[rstest]
	fn test_notify_without_listeners() {
		let notifier = Notifier::new();
		notifier.notify();
		assert_eq!(notifier.listener_count(), 0);
	}
}
