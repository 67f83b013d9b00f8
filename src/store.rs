//! A minimal publish/subscribe primitive that the shared stores ([`FocusRegistry`](`crate::focus::FocusRegistry`),
//! [`Announcer`](`crate::announce::Announcer`)) are built on.
//!
//! Subscribers are notified synchronously, in subscription order, and always with the store **unborrowed**,
//! so a subscriber may call back into the store that notified it.

use core::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Callback<T> = Rc<dyn Fn(&T)>;

struct Slots<T: ?Sized> {
	next_key: Cell<u64>,
	callbacks: RefCell<Vec<(u64, Callback<T>)>>,
}

/// A list of change callbacks receiving `&T`.
pub struct Subscribers<T: ?Sized + 'static>(Rc<Slots<T>>);
impl<T: ?Sized + 'static> Default for Subscribers<T> {
	fn default() -> Self {
		Self::new()
	}
}
impl<T: ?Sized + 'static> Subscribers<T> {
	#[must_use]
	pub fn new() -> Self {
		Self(Rc::new(Slots {
			next_key: Cell::new(0),
			callbacks: RefCell::new(Vec::new()),
		}))
	}

	/// Adds `callback`. It stays subscribed until the returned [`Subscription`] is dropped.
	#[must_use = "Dropping the `Subscription` unsubscribes immediately."]
	pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
		let key = self.0.next_key.get();
		self.0.next_key.set(key + 1);
		let callback: Callback<T> = Rc::new(callback);
		self.0.callbacks.borrow_mut().push((key, callback));

		let slots: Weak<Slots<T>> = Rc::downgrade(&self.0);
		Subscription(Some(Box::new(move || {
			if let Some(slots) = slots.upgrade() {
				slots.callbacks.borrow_mut().retain(|(k, _)| *k != key);
			}
		})))
	}

	/// Calls each current subscriber once.
	///
	/// Subscriptions added or dropped during notification take effect for the next call.
	pub fn notify(&self, value: &T) {
		let callbacks: Vec<Callback<T>> = self.0.callbacks.borrow().iter().map(|(_, c)| Rc::clone(c)).collect();
		for callback in callbacks {
			callback(value);
		}
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.callbacks.borrow().len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// Keeps a callback subscribed. Unsubscribes on drop.
pub struct Subscription(Option<Box<dyn FnOnce()>>);
impl Subscription {
	/// Keeps the callback subscribed for as long as the store exists.
	pub fn forget(mut self) {
		self.0 = None;
	}
}
impl Drop for Subscription {
	fn drop(&mut self) {
		if let Some(unsubscribe) = self.0.take() {
			unsubscribe()
		}
	}
}
impl core::fmt::Debug for Subscription {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_tuple("Subscription").field(&self.0.is_some()).finish()
	}
}
