//! User presentation preferences from CSS media queries.

use crate::{
	error::Result,
	listeners::EventListeners,
	store::{Subscribers, Subscription},
};
use core::cell::Cell;
use std::rc::Rc;
use tracing::{debug, instrument, trace};
use web_sys::{EventTarget, MediaQueryListEvent, Window};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
	ReducedMotion,
	DarkScheme,
}
impl Preference {
	pub const ALL: [Preference; 2] = [Preference::ReducedMotion, Preference::DarkScheme];

	#[must_use]
	pub fn media_query(self) -> &'static str {
		match self {
			Preference::ReducedMotion => "(prefers-reduced-motion: reduce)",
			Preference::DarkScheme => "(prefers-color-scheme: dark)",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserPreferences {
	pub reduced_motion: bool,
	pub dark_scheme: bool,
}
impl UserPreferences {
	#[must_use]
	pub fn get(self, preference: Preference) -> bool {
		match preference {
			Preference::ReducedMotion => self.reduced_motion,
			Preference::DarkScheme => self.dark_scheme,
		}
	}

	/// Returns whether this changed anything.
	pub fn set(&mut self, preference: Preference, value: bool) -> bool {
		let slot = match preference {
			Preference::ReducedMotion => &mut self.reduced_motion,
			Preference::DarkScheme => &mut self.dark_scheme,
		};
		core::mem::replace(slot, value) != value
	}
}

/// Tracks [`UserPreferences`] through `matchMedia` change events until dropped.
///
/// Media queries the browser doesn't support read as `false` and are not tracked.
pub struct PreferenceWatcher {
	current: Rc<Cell<UserPreferences>>,
	subscribers: Rc<Subscribers<UserPreferences>>,
	_listeners: EventListeners,
}
impl core::fmt::Debug for PreferenceWatcher {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("PreferenceWatcher").field("current", &self.current.get()).finish_non_exhaustive()
	}
}
impl PreferenceWatcher {
	/// # Errors
	///
	/// Iff `matchMedia` throws or a listener can't be attached.
	#[instrument(skip(window))]
	pub fn new(window: &Window) -> Result<Self> {
		let current = Rc::new(Cell::new(UserPreferences::default()));
		let subscribers = Rc::new(Subscribers::new());
		let mut listeners = EventListeners::new();

		for &preference in &Preference::ALL {
			let list = match window.match_media(preference.media_query())? {
				Some(list) => list,
				None => {
					debug!(?preference, "Media query not supported.");
					continue;
				}
			};
			let mut initial = current.get();
			initial.set(preference, list.matches());
			current.set(initial);

			let target: &EventTarget = &list;
			listeners.listen(target, "change", {
				let current = Rc::clone(&current);
				let subscribers = Rc::clone(&subscribers);
				move |event: MediaQueryListEvent| {
					let mut preferences = current.get();
					if preferences.set(preference, event.matches()) {
						trace!(?preference, matches = event.matches(), "Preference changed.");
						current.set(preferences);
						subscribers.notify(&preferences);
					}
				}
			})?;
		}

		Ok(Self {
			current,
			subscribers,
			_listeners: listeners,
		})
	}

	#[must_use]
	pub fn current(&self) -> UserPreferences {
		self.current.get()
	}

	#[must_use = "Dropping the `Subscription` unsubscribes immediately."]
	pub fn subscribe(&self, callback: impl Fn(&UserPreferences) + 'static) -> Subscription {
		self.subscribers.subscribe(callback)
	}
}
