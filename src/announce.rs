//! The single-slot screen reader announcement channel.

use crate::{
	store::{Subscribers, Subscription},
	timer::Timer,
	UserText,
};
use core::{cell::RefCell, fmt, time::Duration};
use std::rc::Rc;
use tracing::{instrument, trace};

/// How a [`LiveRegion`](`crate::dom::LiveRegion`) asks assistive technology to speak changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Politeness {
	/// Queued after whatever is currently being spoken.
	Polite,
	/// Interrupts current speech.
	Assertive,
}
impl Politeness {
	#[must_use]
	pub fn aria_live(self) -> &'static str {
		match self {
			Politeness::Polite => "polite",
			Politeness::Assertive => "assertive",
		}
	}
}

#[derive(Debug, Clone)]
pub struct AnnouncerConfig {
	pub politeness: Politeness,
	/// Gap between the clearing publish and the real one in [`Announcer::reannounce`].
	pub reannounce_delay: Duration,
}
impl Default for AnnouncerConfig {
	fn default() -> Self {
		Self {
			politeness: Politeness::Assertive,
			reannounce_delay: Duration::from_millis(100),
		}
	}
}

struct Inner {
	message: RefCell<String>,
	subscribers: Subscribers<str>,
	timer: Rc<dyn Timer>,
	config: AnnouncerConfig,
}

/// Shared handle to the current announcement.
///
/// There is no queue: every publish overwrites the message and notifies all subscribers, even if the text is unchanged.
#[derive(Clone)]
pub struct Announcer(Rc<Inner>);
impl fmt::Debug for Announcer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Announcer")
			.field("message", &UserText(&self.0.message.borrow()))
			.field("subscribers", &self.0.subscribers.len())
			.field("config", &self.0.config)
			.finish()
	}
}
impl Announcer {
	#[must_use]
	pub fn new(timer: Rc<dyn Timer>, config: AnnouncerConfig) -> Self {
		Self(Rc::new(Inner {
			message: RefCell::new(String::new()),
			subscribers: Subscribers::new(),
			timer,
			config,
		}))
	}

	#[must_use]
	pub fn config(&self) -> &AnnouncerConfig {
		&self.0.config
	}

	#[must_use]
	pub fn message(&self) -> String {
		self.0.message.borrow().clone()
	}

	/// Overwrites the message and notifies subscribers synchronously.
	#[instrument(skip(self, message), fields(message = ?UserText(message)))]
	pub fn announce(&self, message: &str) {
		{
			let mut current = self.0.message.borrow_mut();
			current.clear();
			current.push_str(message);
		}
		self.0.subscribers.notify(message);
	}

	/// Publishes `""` now and `message` after [`AnnouncerConfig::reannounce_delay`],
	/// so that a live region re-speaks text identical to the previous announcement.
	pub fn reannounce(&self, message: &str) {
		self.reannounce_while(message, || true)
	}

	/// Like [`reannounce`](`Announcer::reannounce`), but the delayed publish is dropped if `alive` returns `false` by then.
	pub fn reannounce_while(&self, message: &str, alive: impl Fn() -> bool + 'static) {
		self.announce("");
		let announcer = self.clone();
		let message = message.to_owned();
		self.0.timer.defer(
			self.0.config.reannounce_delay,
			Box::new(move || {
				if alive() {
					announcer.announce(&message)
				} else {
					trace!("Dropped a deferred announcement of a stale owner.");
				}
			}),
		);
	}

	/// `callback` receives each published message.
	#[must_use = "Dropping the `Subscription` unsubscribes immediately."]
	pub fn subscribe(&self, callback: impl Fn(&str) + 'static) -> Subscription {
		self.0.subscribers.subscribe(callback)
	}
}
