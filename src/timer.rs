//! Deferred execution for the clear/re-announce pattern.

use core::{convert::TryFrom, time::Duration};
use tracing::error;
use wasm_bindgen::{closure::Closure, JsCast};

/// Runs a task once after a delay, fire-and-forget.
///
/// Implementations must not run `task` synchronously from within [`defer`](`Timer::defer`).
pub trait Timer {
	fn defer(&self, delay: Duration, task: Box<dyn FnOnce()>);
}

/// [`Timer`] backed by [***setTimeout***](https://developer.mozilla.org/en-US/docs/Web/API/setTimeout).
#[derive(Debug, Clone)]
pub struct WindowTimer {
	window: web_sys::Window,
}
impl WindowTimer {
	#[must_use]
	pub fn new(window: web_sys::Window) -> Self {
		Self { window }
	}
}
impl Timer for WindowTimer {
	fn defer(&self, delay: Duration, task: Box<dyn FnOnce()>) {
		// Freed by wasm-bindgen after the single invocation.
		let callback = Closure::once_into_js(move || task());
		let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
		if let Err(error) = self.window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref::<js_sys::Function>(), millis) {
			error!("`setTimeout` rejected a deferred task: {:?}", error);
		}
	}
}

#[cfg(test)]
pub(crate) use manual::ManualTimer;

#[cfg(test)]
mod manual {
	use super::Timer;
	use core::{cell::RefCell, time::Duration};

	/// Queues tasks until [`ManualTimer::flush`] is called.
	#[derive(Default)]
	pub struct ManualTimer {
		pending: RefCell<Vec<(Duration, Box<dyn FnOnce()>)>>,
	}
	impl ManualTimer {
		pub fn pending(&self) -> usize {
			self.pending.borrow().len()
		}

		/// Runs every queued task, including ones queued while flushing.
		pub fn flush(&self) {
			loop {
				let batch = self.pending.replace(Vec::new());
				if batch.is_empty() {
					break;
				}
				for (_, task) in batch {
					task()
				}
			}
		}

		pub fn delays(&self) -> Vec<Duration> {
			self.pending.borrow().iter().map(|(delay, _)| *delay).collect()
		}
	}
	impl Timer for ManualTimer {
		fn defer(&self, delay: Duration, task: Box<dyn FnOnce()>) {
			self.pending.borrow_mut().push((delay, task));
		}
	}
}
