//! The process-wide focus ring: an insertion-ordered list of focusable items plus the virtual focus state.
//!
//! The registry never fails on unknown [`ItemId`]s. Items may unregister while a reference to their id is still in flight,
//! so every lookup miss is a logged no-op.

use crate::{
	store::{Subscribers, Subscription},
	UserText,
};
use core::{
	cell::RefCell,
	fmt::{self, Display, Formatter},
};
use std::rc::Rc;
use tracing::{debug, instrument, trace, warn};

/// Identity of a registered item. Never reused within one [`FocusRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);
impl Display for ItemId {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "_{}", self.0)
	}
}

/// The semantic role of an accessible node. Selects the proxy element type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
	Button,
	/// A button with a pressed state, exposed via `aria-pressed`.
	ToggleButton,
	Link {
		href: String,
	},
	Content,
	Image,
}
impl Role {
	#[must_use]
	pub fn href(&self) -> Option<&str> {
		match self {
			Role::Link { href } => Some(href),
			_ => None,
		}
	}

	/// Whether hovering the node should show a pointer cursor.
	#[must_use]
	pub fn is_interactive(&self) -> bool {
		!matches!(self, Role::Content | Role::Image)
	}

	#[must_use]
	pub fn name(&self) -> &'static str {
		match self {
			Role::Button => "button",
			Role::ToggleButton => "toggle-button",
			Role::Link { .. } => "link",
			Role::Content => "content",
			Role::Image => "image",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	Forward,
	Backward,
}

/// Result of [`FocusRegistry::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
	/// Virtual focus moved to this item. The caller must suppress the browser's default Tab handling.
	Moved(ItemId),
	/// Focus left the ring (or the ring is empty). The browser's default Tab handling must proceed.
	Exited,
}
impl Advance {
	#[must_use]
	pub fn prevents_default(self) -> bool {
		matches!(self, Advance::Moved(_))
	}
}

/// How an item gained focus, passed to its focus hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusOrigin {
	/// Keyboard navigation through the ring. Native DOM focus stays on a sentinel.
	Ring,
	/// Native DOM focus landed on the item's own proxy element (or a deep-link requested it).
	Direct,
}

/// Focus transitions delivered to an item's hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusChange {
	Focused(FocusOrigin),
	Blurred,
}

/// Registration data for [`FocusRegistry::register`]; the registry assigns the id.
#[derive(Clone)]
pub struct NewItem {
	pub role: Role,
	pub title: String,
	pub anchor_id: Option<String>,
	/// Invoked by [`FocusRegistry::trigger_click`].
	pub action_call: Option<Rc<dyn Fn()>>,
	/// Invoked after each focus transition of this item, with the registry unborrowed.
	pub focus_hook: Option<Rc<dyn Fn(FocusChange)>>,
}
impl NewItem {
	#[must_use]
	pub fn new(role: Role, title: impl Into<String>) -> Self {
		Self {
			role,
			title: title.into(),
			anchor_id: None,
			action_call: None,
			focus_hook: None,
		}
	}

	#[must_use]
	pub fn with_action(mut self, action_call: impl Fn() + 'static) -> Self {
		self.action_call = Some(Rc::new(action_call));
		self
	}

	#[must_use]
	pub fn with_anchor_id(mut self, anchor_id: impl Into<String>) -> Self {
		self.anchor_id = Some(anchor_id.into());
		self
	}

	#[must_use]
	pub fn with_focus_hook(mut self, focus_hook: impl Fn(FocusChange) + 'static) -> Self {
		self.focus_hook = Some(Rc::new(focus_hook));
		self
	}
}

/// A registered item, owned by the registry.
#[derive(Clone)]
pub struct FocusableItem {
	id: ItemId,
	item: NewItem,
}
impl FocusableItem {
	#[must_use]
	pub fn id(&self) -> ItemId {
		self.id
	}
	#[must_use]
	pub fn role(&self) -> &Role {
		&self.item.role
	}
	#[must_use]
	pub fn title(&self) -> &str {
		&self.item.title
	}
	/// Present iff the role is [`Role::Link`].
	#[must_use]
	pub fn href(&self) -> Option<&str> {
		self.item.role.href()
	}
	#[must_use]
	pub fn anchor_id(&self) -> Option<&str> {
		self.item.anchor_id.as_deref()
	}
}
impl fmt::Debug for FocusableItem {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("FocusableItem")
			.field("id", &self.id)
			.field("role", &self.item.role.name())
			.field("title", &UserText(&self.item.title))
			.field("action_call", &self.item.action_call.is_some())
			.finish()
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSummary {
	pub id: ItemId,
	pub role: Role,
	pub title: String,
}

/// A copy of the ring state, for inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusSnapshot {
	pub items: Vec<ItemSummary>,
	pub current_index: Option<usize>,
	pub focused: Option<ItemId>,
	pub clicked: Option<ItemId>,
	pub has_focus_control: bool,
	pub requested_anchor_id: Option<String>,
}

#[derive(Default)]
struct RingState {
	next_id: u64,
	items: Vec<FocusableItem>,
	/// The focused item by identity. The current index is derived from it.
	focused: Option<ItemId>,
	clicked: Option<ItemId>,
	has_focus_control: bool,
	requested_anchor_id: Option<String>,
}
impl RingState {
	fn index_of(&self, id: ItemId) -> Option<usize> {
		self.items.iter().position(|item| item.id == id)
	}

	fn hook_of(&self, id: ItemId) -> Option<Rc<dyn Fn(FocusChange)>> {
		self.items.iter().find(|item| item.id == id).and_then(|item| item.item.focus_hook.clone())
	}

	fn current_index(&self) -> Option<usize> {
		self.focused.and_then(|id| self.index_of(id))
	}

	/// Moves focus to `next`, returning the hooks to call once the state is released.
	fn refocus(&mut self, next: Option<ItemId>, origin: FocusOrigin) -> Vec<(Rc<dyn Fn(FocusChange)>, FocusChange)> {
		let previous = core::mem::replace(&mut self.focused, next);
		let mut hooks = Vec::new();
		if previous == next {
			return hooks;
		}
		if let Some(hook) = previous.and_then(|id| self.hook_of(id)) {
			hooks.push((hook, FocusChange::Blurred));
		}
		if let Some(hook) = next.and_then(|id| self.hook_of(id)) {
			hooks.push((hook, FocusChange::Focused(origin)));
		}
		hooks
	}
}

struct Inner {
	state: RefCell<RingState>,
	subscribers: Subscribers<()>,
}

/// Shared handle to the focus ring. Cloning is cheap and yields a handle to the same ring.
///
/// Construct one per application root and pass it to every binding.
#[derive(Clone)]
pub struct FocusRegistry(Rc<Inner>);
impl Default for FocusRegistry {
	fn default() -> Self {
		Self::new()
	}
}
impl fmt::Debug for FocusRegistry {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let state = self.0.state.borrow();
		f.debug_struct("FocusRegistry")
			.field("items", &state.items)
			.field("focused", &state.focused)
			.field("has_focus_control", &state.has_focus_control)
			.finish()
	}
}
impl FocusRegistry {
	#[must_use]
	pub fn new() -> Self {
		Self(Rc::new(Inner {
			state: RefCell::new(RingState::default()),
			subscribers: Subscribers::new(),
		}))
	}

	/// Runs the deferred focus hooks and then the change subscribers, with the state unborrowed.
	fn settle(&self, hooks: Vec<(Rc<dyn Fn(FocusChange)>, FocusChange)>) {
		for (hook, change) in hooks {
			hook(change)
		}
		self.0.subscribers.notify(&());
	}

	/// Appends an item to the end of the ring and returns its new id. The item starts unfocused.
	#[instrument(skip(self, item), fields(role = item.role.name()))]
	pub fn register(&self, item: NewItem) -> ItemId {
		let id = {
			let mut state = self.0.state.borrow_mut();
			let id = ItemId(state.next_id);
			state.next_id += 1;
			state.items.push(FocusableItem { id, item });
			id
		};
		debug!(%id, "Registered focusable item.");
		self.settle(Vec::new());
		id
	}

	/// Removes the item. If it held focus, focus falls out of the ring.
	///
	/// Returns `false` (and changes nothing) if the id is unknown.
	#[instrument(skip(self))]
	pub fn unregister(&self, id: ItemId) -> bool {
		{
			let mut state = self.0.state.borrow_mut();
			let index = match state.index_of(id) {
				Some(index) => index,
				None => {
					warn!(%id, "Unregistering an unknown item. Ignored.");
					return false;
				}
			};
			state.items.remove(index);
			if state.focused == Some(id) {
				state.focused = None;
			}
			if state.clicked == Some(id) {
				state.clicked = None;
			}
		}
		debug!(%id, "Unregistered focusable item.");
		self.settle(Vec::new());
		true
	}

	/// Focuses the item directly, e.g. because native focus landed on its proxy element.
	#[instrument(skip(self))]
	pub fn focus_by_id(&self, id: ItemId) -> bool {
		let hooks = {
			let mut state = self.0.state.borrow_mut();
			if state.index_of(id).is_none() {
				trace!(%id, "Focus requested for an unknown item. Ignored.");
				return false;
			}
			state.refocus(Some(id), FocusOrigin::Direct)
		};
		self.settle(hooks);
		true
	}

	/// Clears focus if (and only if) `id` holds it.
	#[instrument(skip(self))]
	pub fn blur_by_id(&self, id: ItemId) -> bool {
		let hooks = {
			let mut state = self.0.state.borrow_mut();
			if state.focused != Some(id) {
				return false;
			}
			state.refocus(None, FocusOrigin::Direct)
		};
		self.settle(hooks);
		true
	}

	/// Drops virtual focus, wherever it is.
	#[instrument(skip(self))]
	pub fn remove_focus(&self) {
		let hooks = self.0.state.borrow_mut().refocus(None, FocusOrigin::Ring);
		self.settle(hooks);
	}

	/// Moves virtual focus one step.
	///
	/// The ring does not wrap: stepping past either end leaves it, and the only way back in is through a sentinel.
	/// From outside the ring, [`Direction::Forward`] enters at the first item and [`Direction::Backward`] at the last one.
	#[instrument(skip(self))]
	pub fn advance(&self, direction: Direction) -> Advance {
		let (advance, hooks) = {
			let mut state = self.0.state.borrow_mut();
			let len = state.items.len();
			if len == 0 {
				return Advance::Exited;
			}
			let next_index = match (direction, state.current_index()) {
				(Direction::Forward, None) => Some(0),
				(Direction::Forward, Some(i)) if i + 1 >= len => None,
				(Direction::Forward, Some(i)) => Some(i + 1),
				(Direction::Backward, None) => Some(len - 1),
				(Direction::Backward, Some(0)) => None,
				(Direction::Backward, Some(i)) => Some(i - 1),
			};
			let next = next_index.map(|i| state.items[i].id);
			let hooks = state.refocus(next, FocusOrigin::Ring);
			(next.map_or(Advance::Exited, Advance::Moved), hooks)
		};
		trace!(?advance);
		self.settle(hooks);
		advance
	}

	/// Invokes the item's action, if it has one. Unknown ids are ignored.
	#[instrument(skip(self))]
	pub fn trigger_click(&self, id: ItemId) -> bool {
		let action = {
			let mut state = self.0.state.borrow_mut();
			let action = match state.items.iter().find(|item| item.id == id) {
				Some(item) => item.item.action_call.clone(),
				None => {
					trace!(%id, "Click triggered for an unknown item. Ignored.");
					return false;
				}
			};
			state.clicked = Some(id);
			action
		};
		if let Some(action) = action {
			action()
		}
		self.settle(Vec::new());
		true
	}

	/// [`trigger_click`](`FocusRegistry::trigger_click`) on the focused item, if any.
	pub fn trigger_focused_click(&self) -> bool {
		match self.focused() {
			Some(id) => self.trigger_click(id),
			None => false,
		}
	}

	pub fn set_has_focus_control(&self, has_focus_control: bool) {
		let changed = {
			let mut state = self.0.state.borrow_mut();
			core::mem::replace(&mut state.has_focus_control, has_focus_control) != has_focus_control
		};
		if changed {
			self.settle(Vec::new())
		}
	}

	#[must_use]
	pub fn has_focus_control(&self) -> bool {
		self.0.state.borrow().has_focus_control
	}

	/// `None` while the ring doesn't hold focus.
	#[must_use]
	pub fn current_index(&self) -> Option<usize> {
		self.0.state.borrow().current_index()
	}

	#[must_use]
	pub fn focused(&self) -> Option<ItemId> {
		self.0.state.borrow().focused
	}

	#[must_use]
	pub fn clicked(&self) -> Option<ItemId> {
		self.0.state.borrow().clicked
	}

	#[must_use]
	pub fn is_focused(&self, id: ItemId) -> bool {
		self.focused() == Some(id)
	}

	#[must_use]
	pub fn item(&self, id: ItemId) -> Option<FocusableItem> {
		self.0.state.borrow().items.iter().find(|item| item.id == id).cloned()
	}

	/// Item ids in navigation order.
	#[must_use]
	pub fn ids(&self) -> Vec<ItemId> {
		self.0.state.borrow().items.iter().map(|item| item.id).collect()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.state.borrow().items.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	#[must_use]
	pub fn requested_anchor_id(&self) -> Option<String> {
		self.0.state.borrow().requested_anchor_id.clone()
	}

	/// Requests initial focus for the item whose anchor id matches, e.g. from the URL fragment.
	pub fn set_requested_anchor_id(&self, anchor_id: Option<String>) {
		let anchor_id = anchor_id.filter(|anchor_id| !anchor_id.is_empty());
		if anchor_id.is_some() && !self.is_empty() {
			warn!("An anchor was requested after items were registered. Only items registered later can consume it.");
		}
		self.0.state.borrow_mut().requested_anchor_id = anchor_id;
	}

	/// Clears the requested anchor and returns `true` if it equals `anchor_id`. The directive is one-time.
	pub fn take_requested_anchor(&self, anchor_id: &str) -> bool {
		let mut state = self.0.state.borrow_mut();
		if state.requested_anchor_id.as_deref() == Some(anchor_id) {
			state.requested_anchor_id = None;
			true
		} else {
			false
		}
	}

	#[must_use]
	pub fn snapshot(&self) -> FocusSnapshot {
		let state = self.0.state.borrow();
		FocusSnapshot {
			items: state
				.items
				.iter()
				.map(|item| ItemSummary {
					id: item.id,
					role: item.item.role.clone(),
					title: item.item.title.clone(),
				})
				.collect(),
			current_index: state.current_index(),
			focused: state.focused,
			clicked: state.clicked,
			has_focus_control: state.has_focus_control,
			requested_anchor_id: state.requested_anchor_id.clone(),
		}
	}

	/// `callback` runs after every state change.
	#[must_use = "Dropping the `Subscription` unsubscribes immediately."]
	pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
		self.0.subscribers.subscribe(move |_| callback())
	}
}

#[cfg(test)]
mod tests {
	use super::{Advance, Direction, FocusChange, FocusOrigin, FocusRegistry, ItemId, NewItem, Role};
	use std::{cell::RefCell, rc::Rc};

	fn register_n(registry: &FocusRegistry, n: usize) -> Vec<ItemId> {
		(0..n).map(|i| registry.register(NewItem::new(Role::Button, format!("item {}", i)))).collect()
	}

	#[test]
	fn insertion_order_survives_removals() {
		let registry = FocusRegistry::new();
		let ids = register_n(&registry, 6);

		assert!(registry.unregister(ids[1]));
		assert!(registry.unregister(ids[4]));
		let late = registry.register(NewItem::new(Role::Content, "late"));

		assert_eq!(registry.ids(), [ids[0], ids[2], ids[3], ids[5], late]);
	}

	#[test]
	fn ids_are_not_reused() {
		let registry = FocusRegistry::new();
		let first = registry.register(NewItem::new(Role::Button, "a"));
		registry.unregister(first);
		let second = registry.register(NewItem::new(Role::Button, "b"));
		assert_ne!(first, second);
	}

	#[test]
	fn forward_passes_every_item_once_then_exits() {
		let registry = FocusRegistry::new();
		let ids = register_n(&registry, 3);

		let mut visited = Vec::new();
		loop {
			match registry.advance(Direction::Forward) {
				Advance::Moved(id) => visited.push(id),
				Advance::Exited => break,
			}
		}
		assert_eq!(visited, ids);
		assert_eq!(registry.current_index(), None);
		assert_eq!(registry.focused(), None);
	}

	#[test]
	fn backward_passes_every_item_once_then_exits() {
		let registry = FocusRegistry::new();
		let ids = register_n(&registry, 4);

		let mut visited = Vec::new();
		while let Advance::Moved(id) = registry.advance(Direction::Backward) {
			visited.push(id);
		}
		visited.reverse();
		assert_eq!(visited, ids);
		assert_eq!(registry.current_index(), None);
	}

	#[test]
	fn empty_ring_exits_without_state_change() {
		let registry = FocusRegistry::new();
		assert_eq!(registry.advance(Direction::Forward), Advance::Exited);
		assert!(!registry.advance(Direction::Backward).prevents_default());
		assert_eq!(registry.current_index(), None);
	}

	#[test]
	fn link_button_content_scenario() {
		let registry = FocusRegistry::new();
		let link = registry.register(NewItem::new(Role::Link { href: "/knot".into() }, "Knot"));
		let button = registry.register(NewItem::new(Role::Button, "Bomb"));
		let content = registry.register(NewItem::new(Role::Content, "A torus"));

		assert_eq!(registry.advance(Direction::Forward), Advance::Moved(link));
		assert_eq!(registry.advance(Direction::Forward), Advance::Moved(button));
		assert_eq!(registry.advance(Direction::Forward), Advance::Moved(content));
		assert_eq!(registry.current_index(), Some(2));
		assert_eq!(registry.advance(Direction::Forward), Advance::Exited);
		assert_eq!(registry.current_index(), None);
		assert_eq!(registry.item(link).unwrap().href(), Some("/knot"));
		assert_eq!(registry.item(button).unwrap().href(), None);
	}

	#[test]
	fn removing_focused_item_drops_focus() {
		let registry = FocusRegistry::new();
		let ids = register_n(&registry, 3);
		registry.advance(Direction::Forward);
		registry.advance(Direction::Forward);
		assert_eq!(registry.focused(), Some(ids[1]));

		registry.unregister(ids[1]);
		assert_eq!(registry.current_index(), None);
		assert_eq!(registry.focused(), None);
	}

	#[test]
	fn removing_other_item_keeps_focus_by_identity() {
		let registry = FocusRegistry::new();
		let ids = register_n(&registry, 3);
		registry.focus_by_id(ids[2]);
		assert_eq!(registry.current_index(), Some(2));

		registry.unregister(ids[0]);
		assert_eq!(registry.focused(), Some(ids[2]));
		assert_eq!(registry.current_index(), Some(1));

		assert_eq!(registry.advance(Direction::Backward), Advance::Moved(ids[1]));
	}

	#[test]
	fn unregister_is_idempotent() {
		let registry = FocusRegistry::new();
		let ids = register_n(&registry, 2);
		registry.focus_by_id(ids[1]);

		assert!(registry.unregister(ids[0]));
		let after_once = registry.snapshot();
		assert!(!registry.unregister(ids[0]));
		assert_eq!(registry.snapshot(), after_once);
	}

	#[test]
	fn unknown_ids_are_no_ops() {
		let registry = FocusRegistry::new();
		let id = registry.register(NewItem::new(Role::Button, "x"));
		registry.unregister(id);

		assert!(!registry.focus_by_id(id));
		assert!(!registry.blur_by_id(id));
		assert!(!registry.trigger_click(id));
		assert_eq!(registry.focused(), None);
	}

	#[test]
	fn blur_only_affects_the_focused_item() {
		let registry = FocusRegistry::new();
		let ids = register_n(&registry, 2);
		registry.focus_by_id(ids[0]);

		assert!(!registry.blur_by_id(ids[1]));
		assert_eq!(registry.focused(), Some(ids[0]));
		assert!(registry.blur_by_id(ids[0]));
		assert_eq!(registry.current_index(), None);
	}

	#[test]
	fn trigger_click_runs_action_and_records_click() {
		let registry = FocusRegistry::new();
		let clicks = Rc::new(RefCell::new(0));
		let id = registry.register(NewItem::new(Role::Button, "Go").with_action({
			let clicks = Rc::clone(&clicks);
			move || *clicks.borrow_mut() += 1
		}));
		let passive = registry.register(NewItem::new(Role::Image, "Logo"));

		assert!(registry.trigger_click(id));
		assert!(registry.trigger_click(passive));
		assert_eq!(*clicks.borrow(), 1);
		assert_eq!(registry.clicked(), Some(passive));
	}

	#[test]
	fn action_may_reenter_the_registry() {
		let registry = FocusRegistry::new();
		let id = registry.register(NewItem::new(Role::Button, "Remove me").with_action({
			let registry = registry.clone();
			move || {
				let ids = registry.ids();
				registry.unregister(ids[0]);
			}
		}));
		registry.focus_by_id(id);
		assert!(registry.trigger_focused_click());
		assert!(registry.is_empty());
		assert_eq!(registry.focused(), None);
	}

	#[test]
	fn hooks_see_transitions_in_order() {
		let registry = FocusRegistry::new();
		let log = Rc::new(RefCell::new(Vec::new()));
		let hook = |name: &'static str| {
			let log = Rc::clone(&log);
			move |change: FocusChange| log.borrow_mut().push((name, change))
		};
		let a = registry.register(NewItem::new(Role::Button, "a").with_focus_hook(hook("a")));
		registry.register(NewItem::new(Role::Button, "b").with_focus_hook(hook("b")));

		registry.advance(Direction::Forward);
		registry.advance(Direction::Forward);
		registry.focus_by_id(a);
		registry.remove_focus();

		assert_eq!(
			*log.borrow(),
			[
				("a", FocusChange::Focused(FocusOrigin::Ring)),
				("a", FocusChange::Blurred),
				("b", FocusChange::Focused(FocusOrigin::Ring)),
				("b", FocusChange::Blurred),
				("a", FocusChange::Focused(FocusOrigin::Direct)),
				("a", FocusChange::Blurred),
			]
		);
	}

	#[test]
	fn refocusing_the_same_item_is_silent() {
		let registry = FocusRegistry::new();
		let calls = Rc::new(RefCell::new(0));
		let id = registry.register(NewItem::new(Role::Button, "a").with_focus_hook({
			let calls = Rc::clone(&calls);
			move |_| *calls.borrow_mut() += 1
		}));
		registry.focus_by_id(id);
		registry.focus_by_id(id);
		assert_eq!(*calls.borrow(), 1);
	}

	#[test]
	fn anchor_request_is_consumed_once() {
		let registry = FocusRegistry::new();
		registry.set_requested_anchor_id(Some("knot".to_owned()));
		assert!(!registry.take_requested_anchor("torus"));
		assert!(registry.take_requested_anchor("knot"));
		assert!(!registry.take_requested_anchor("knot"));
		assert_eq!(registry.requested_anchor_id(), None);

		registry.set_requested_anchor_id(Some(String::new()));
		assert_eq!(registry.requested_anchor_id(), None);
	}

	#[test]
	fn subscribers_observe_changes() {
		let registry = FocusRegistry::new();
		let changes = Rc::new(RefCell::new(0));
		let _subscription = registry.subscribe({
			let changes = Rc::clone(&changes);
			move || *changes.borrow_mut() += 1
		});
		let id = registry.register(NewItem::new(Role::Button, "a"));
		registry.set_has_focus_control(true);
		registry.set_has_focus_control(true);
		registry.advance(Direction::Forward);
		registry.unregister(id);
		assert_eq!(*changes.borrow(), 4);
	}
}
