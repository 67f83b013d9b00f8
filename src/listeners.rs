//! Ownership of JavaScript-facing event handler closures.
//!
//! Every [`Closure`] handed to `addEventListener` must outlive its registration and must be removed before it is freed,
//! otherwise the browser throws into JavaScript on the next event. [`EventListeners`] keeps both halves together.

use tracing::{error, trace};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Event, EventTarget};

struct Listener {
	target: EventTarget,
	name: &'static str,
	closure: Closure<dyn FnMut(Event)>,
}

/// A set of event listeners that are all removed on drop.
#[derive(Default)]
pub struct EventListeners(Vec<Listener>);
impl core::fmt::Debug for EventListeners {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_list().entries(self.0.iter().map(|listener| listener.name)).finish()
	}
}
impl EventListeners {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Attaches `handler` for `name` events on `target`.
	///
	/// Events that aren't an `E` are logged and dropped.
	pub fn listen<E: JsCast + 'static>(&mut self, target: &EventTarget, name: &'static str, mut handler: impl FnMut(E) + 'static) -> Result<(), JsValue> {
		let closure = Closure::wrap(Box::new(move |event: Event| match event.dyn_into::<E>() {
			Ok(event) => handler(event),
			Err(event) => error!("Unexpected event type for `{}` listener: {:?}", name, event),
		}) as Box<dyn FnMut(Event)>);
		target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
		trace!("Added `{}` listener.", name);
		self.0.push(Listener {
			target: target.clone(),
			name,
			closure,
		});
		Ok(())
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl Drop for EventListeners {
	fn drop(&mut self) {
		for listener in self.0.drain(..) {
			if let Err(error) = listener.target.remove_event_listener_with_callback(listener.name, listener.closure.as_ref().unchecked_ref()) {
				error!("Failed to remove `{}` listener: {:?}", listener.name, error);
			}
		}
		trace!("Removed event listeners.");
	}
}
