//! Keyboard navigation through the focus ring.
//!
//! Browsers can't tab into a canvas, so two natively focusable sentinels bracket the ring:
//! `[before] [item proxies…] [after]`.
//! Tab presses that land on ring-owned elements are redirected into [`FocusRegistry::advance`],
//! and only the step that leaves the ring is handed back to native tab order.
//!
//! This module only decides. Applying the decisions to the DOM is [`KeyboardRing`](`crate::dom::KeyboardRing`)'s job.

use crate::focus::{Advance, Direction, FocusRegistry, ItemId};
use core::cell::Cell;
use tracing::{instrument, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
	Before,
	After,
}
impl Sentinel {
	#[must_use]
	pub fn name(self) -> &'static str {
		match self {
			Sentinel::Before => "before",
			Sentinel::After => "after",
		}
	}
}

/// Where a keyboard event originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingElement {
	Sentinel(Sentinel),
	/// The proxy element of a registered item.
	Item(ItemId),
}

/// The parts of a keydown event the ring cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput<'a> {
	pub key: &'a str,
	pub shift: bool,
	pub alt: bool,
}
impl<'a> KeyInput<'a> {
	#[must_use]
	pub fn new(key: &'a str) -> Self {
		Self { key, shift: false, alt: false }
	}

	#[must_use]
	pub fn shifted(mut self) -> Self {
		self.shift = true;
		self
	}
}

/// What the DOM side must do after a keydown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyOutcome {
	pub prevent_default: bool,
	/// Move native focus here before the browser runs its default action.
	///
	/// Set when leaving the ring (so that native Tab continues from the far end of the ring)
	/// and when ring navigation starts from an item proxy (so native focus returns to the ring).
	pub park_on: Option<Sentinel>,
}

/// The keyboard ring state machine.
#[derive(Debug)]
pub struct RingController {
	registry: FocusRegistry,
	/// A sentinel that is about to receive focus programmatically. Its next focus event must not re-enter the ring.
	parking: Cell<Option<Sentinel>>,
}
impl RingController {
	#[must_use]
	pub fn new(registry: FocusRegistry) -> Self {
		Self {
			registry,
			parking: Cell::new(None),
		}
	}

	#[must_use]
	pub fn registry(&self) -> &FocusRegistry {
		&self.registry
	}

	/// Native focus landed on a sentinel.
	///
	/// Tabbing forward into the app lands on [`Sentinel::Before`] and enters at the first item,
	/// shift-tabbing backward lands on [`Sentinel::After`] and enters at the last one.
	#[instrument(skip(self))]
	pub fn sentinel_focused(&self, sentinel: Sentinel) -> Option<Advance> {
		self.registry.set_has_focus_control(true);
		if self.parking.get() == Some(sentinel) {
			self.parking.set(None);
			trace!("Focus parked on sentinel; not entering the ring.");
			return None;
		}
		if self.registry.current_index().is_some() {
			return None;
		}
		if self.registry.is_empty() {
			warn!("A ring sentinel was focused, but no items are registered.");
		}
		Some(self.registry.advance(match sentinel {
			Sentinel::Before => Direction::Forward,
			Sentinel::After => Direction::Backward,
		}))
	}

	/// Native focus left a sentinel.
	///
	/// `into_ring` is whether the element receiving focus is ring-owned.
	/// Only a blur that leaves the ring drops virtual focus.
	#[instrument(skip(self))]
	pub fn sentinel_blurred(&self, into_ring: bool) {
		if into_ring {
			return;
		}
		self.parking.set(None);
		self.registry.remove_focus();
		self.registry.set_has_focus_control(false);
	}

	/// Native focus landed on an item's own proxy element, which is part of the ring.
	#[instrument(skip(self))]
	pub fn item_focused(&self) {
		self.registry.set_has_focus_control(true);
	}

	/// Native focus left an item's proxy element.
	///
	/// As with [`sentinel_blurred`](`RingController::sentinel_blurred`), `into_ring` is whether the new focus target
	/// is ring-owned, and only leaving the ring drops virtual focus.
	#[instrument(skip(self))]
	pub fn item_blurred(&self, into_ring: bool) {
		self.sentinel_blurred(into_ring)
	}

	/// A pointer click on a sentinel. `keyboard` is `true` for synthetic clicks (`detail == 0`) caused by Enter or Space.
	pub fn sentinel_clicked(&self, keyboard: bool) -> bool {
		if keyboard {
			self.registry.trigger_focused_click()
		} else {
			self.registry.remove_focus();
			false
		}
	}

	#[instrument(skip(self))]
	pub fn key_down(&self, origin: RingElement, key: KeyInput<'_>) -> KeyOutcome {
		match key.key {
			"Tab" if !key.alt => {
				let direction = if key.shift { Direction::Backward } else { Direction::Forward };
				match self.registry.advance(direction) {
					Advance::Moved(_) => KeyOutcome {
						prevent_default: true,
						park_on: match origin {
							RingElement::Item(_) => self.park(Sentinel::Before),
							RingElement::Sentinel(_) => None,
						},
					},
					Advance::Exited => {
						let far_end = match direction {
							Direction::Forward => Sentinel::After,
							Direction::Backward => Sentinel::Before,
						};
						KeyOutcome {
							prevent_default: false,
							park_on: if origin == RingElement::Sentinel(far_end) { None } else { self.park(far_end) },
						}
					}
				}
			}
			"Enter" => {
				self.registry.trigger_focused_click();
				KeyOutcome {
					prevent_default: true,
					park_on: None,
				}
			}
			_ => KeyOutcome::default(),
		}
	}

	fn park(&self, sentinel: Sentinel) -> Option<Sentinel> {
		self.parking.set(Some(sentinel));
		Some(sentinel)
	}

	/// Forgets a pending park, e.g. when moving native focus failed.
	pub fn cancel_park(&self) {
		self.parking.set(None)
	}
}

#[cfg(test)]
mod tests {
	use super::{KeyInput, KeyOutcome, RingController, RingElement, Sentinel};
	use crate::focus::{Advance, FocusRegistry, NewItem, Role};
	use std::{cell::RefCell, rc::Rc};

	fn ring_with(n: usize) -> (RingController, Vec<crate::focus::ItemId>) {
		let registry = FocusRegistry::new();
		let ids = (0..n).map(|i| registry.register(NewItem::new(Role::Button, format!("{}", i)))).collect();
		(RingController::new(registry), ids)
	}

	const BEFORE: RingElement = RingElement::Sentinel(Sentinel::Before);
	const AFTER: RingElement = RingElement::Sentinel(Sentinel::After);

	#[test]
	fn tabbing_in_enters_at_the_top() {
		let (ring, ids) = ring_with(3);
		assert_eq!(ring.sentinel_focused(Sentinel::Before), Some(Advance::Moved(ids[0])));
		assert!(ring.registry().has_focus_control());

		let outcome = ring.key_down(BEFORE, KeyInput::new("Tab"));
		assert_eq!(outcome, KeyOutcome { prevent_default: true, park_on: None });
		assert_eq!(ring.registry().focused(), Some(ids[1]));
	}

	#[test]
	fn shift_tabbing_in_enters_at_the_bottom() {
		let (ring, ids) = ring_with(3);
		assert_eq!(ring.sentinel_focused(Sentinel::After), Some(Advance::Moved(ids[2])));
		ring.key_down(AFTER, KeyInput::new("Tab").shifted());
		assert_eq!(ring.registry().focused(), Some(ids[1]));
	}

	#[test]
	fn sentinel_focus_keeps_existing_focus() {
		let (ring, ids) = ring_with(2);
		ring.registry().focus_by_id(ids[1]);
		assert_eq!(ring.sentinel_focused(Sentinel::Before), None);
		assert_eq!(ring.registry().focused(), Some(ids[1]));
	}

	#[test]
	fn leaving_forward_parks_on_the_far_sentinel_without_reentry() {
		let (ring, ids) = ring_with(2);
		ring.sentinel_focused(Sentinel::Before);
		ring.key_down(BEFORE, KeyInput::new("Tab"));
		assert_eq!(ring.registry().focused(), Some(ids[1]));

		let outcome = ring.key_down(BEFORE, KeyInput::new("Tab"));
		assert_eq!(outcome, KeyOutcome { prevent_default: false, park_on: Some(Sentinel::After) });
		assert_eq!(ring.registry().current_index(), None);

		// The DOM side now focuses the after-sentinel; that must not pull focus back in.
		ring.sentinel_blurred(true);
		assert_eq!(ring.sentinel_focused(Sentinel::After), None);
		assert_eq!(ring.registry().current_index(), None);

		// Then native Tab leaves the app.
		ring.sentinel_blurred(false);
		assert!(!ring.registry().has_focus_control());
	}

	#[test]
	fn leaving_from_the_far_sentinel_needs_no_park() {
		let (ring, _) = ring_with(1);
		ring.sentinel_focused(Sentinel::After);
		let outcome = ring.key_down(AFTER, KeyInput::new("Tab"));
		assert_eq!(outcome, KeyOutcome { prevent_default: false, park_on: None });
	}

	#[test]
	fn leaving_backward_parks_on_before() {
		let (ring, _) = ring_with(2);
		ring.sentinel_focused(Sentinel::After);
		ring.key_down(AFTER, KeyInput::new("Tab").shifted());
		let outcome = ring.key_down(AFTER, KeyInput::new("Tab").shifted());
		assert_eq!(outcome.park_on, Some(Sentinel::Before));
		assert!(!outcome.prevent_default);
	}

	#[test]
	fn alt_tab_and_other_keys_are_ignored() {
		let (ring, _) = ring_with(2);
		ring.sentinel_focused(Sentinel::Before);
		let before = ring.registry().snapshot();
		let alt_tab = KeyInput { key: "Tab", shift: false, alt: true };
		assert_eq!(ring.key_down(BEFORE, alt_tab), KeyOutcome::default());
		assert_eq!(ring.key_down(BEFORE, KeyInput::new("a")), KeyOutcome::default());
		assert_eq!(ring.registry().snapshot(), before);
	}

	#[test]
	fn enter_activates_focused_item() {
		let registry = FocusRegistry::new();
		let clicks = Rc::new(RefCell::new(0));
		registry.register(NewItem::new(Role::Button, "Go").with_action({
			let clicks = Rc::clone(&clicks);
			move || *clicks.borrow_mut() += 1
		}));
		let ring = RingController::new(registry);

		assert!(ring.key_down(BEFORE, KeyInput::new("Enter")).prevent_default);
		assert_eq!(*clicks.borrow(), 0);

		ring.sentinel_focused(Sentinel::Before);
		assert!(ring.key_down(BEFORE, KeyInput::new("Enter")).prevent_default);
		assert!(ring.sentinel_clicked(true));
		assert_eq!(*clicks.borrow(), 2);
	}

	#[test]
	fn tab_from_item_proxy_returns_native_focus_to_ring() {
		let (ring, ids) = ring_with(3);
		ring.registry().focus_by_id(ids[0]);
		let outcome = ring.key_down(RingElement::Item(ids[0]), KeyInput::new("Tab"));
		assert_eq!(outcome, KeyOutcome { prevent_default: true, park_on: Some(Sentinel::Before) });
		assert_eq!(ring.sentinel_focused(Sentinel::Before), None);
		assert_eq!(ring.registry().focused(), Some(ids[1]));
	}

	#[test]
	fn blur_out_of_ring_drops_focus() {
		let (ring, _) = ring_with(2);
		ring.sentinel_focused(Sentinel::Before);
		ring.sentinel_blurred(false);
		assert_eq!(ring.registry().current_index(), None);
		assert!(!ring.registry().has_focus_control());
	}

	#[test]
	fn sentinel_to_proxy_keeps_focus_control() {
		let (ring, ids) = ring_with(2);
		ring.sentinel_focused(Sentinel::Before);
		ring.sentinel_blurred(true);
		ring.registry().focus_by_id(ids[1]);
		ring.item_focused();
		assert_eq!(ring.registry().focused(), Some(ids[1]));
		assert!(ring.registry().has_focus_control());
	}

	#[test]
	fn proxy_focus_takes_focus_control() {
		let (ring, ids) = ring_with(1);
		ring.registry().focus_by_id(ids[0]);
		ring.item_focused();
		assert!(ring.registry().has_focus_control());

		ring.item_blurred(true);
		assert!(ring.registry().has_focus_control());
		assert_eq!(ring.registry().focused(), Some(ids[0]));

		ring.item_blurred(false);
		assert!(!ring.registry().has_focus_control());
		assert_eq!(ring.registry().current_index(), None);
	}

	#[test]
	fn pointer_click_on_sentinel_drops_focus() {
		let (ring, _) = ring_with(2);
		ring.sentinel_focused(Sentinel::Before);
		assert!(!ring.sentinel_clicked(false));
		assert_eq!(ring.registry().focused(), None);
	}
}
