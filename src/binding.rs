//! The per-node accessibility contract, independent of the DOM.
//!
//! [`BindingCore`] turns pointer, click and focus input (from the scene's hit-testing or from the proxy element)
//! into registry and announcer calls, and reports its visible consequences through a [`BindingView`].

use crate::{
	announce::Announcer,
	focus::{FocusChange, FocusOrigin, FocusRegistry, ItemId, NewItem, Role},
	UserText,
};
use core::{cell::Cell, fmt};
use std::rc::{Rc, Weak};
use tracing::{debug, instrument, trace};

/// The state exposed to the wrapped node for visual feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeState {
	pub hovered: bool,
	pub focused: bool,
	/// Only meaningful for [`Role::ToggleButton`].
	pub pressed: bool,
}

/// Which of the two hit regions reported a pointer transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverSource {
	/// The renderer's hit-test on the scene node.
	Scene,
	/// The hidden proxy element.
	Proxy,
}

/// Visible side effects of a binding.
pub trait BindingView {
	/// Show or reset the pointer cursor on the canvas host.
	fn set_pointer_cursor(&self, pointer: bool);
	/// Reflect the toggle state, e.g. as `aria-pressed`.
	fn set_pressed(&self, pressed: bool);
}

/// Everything a binding needs besides its collaborators.
#[derive(Clone, Default)]
pub struct BindingConfig {
	pub role: Option<Role>,
	pub description: String,
	pub activation_msg: Option<String>,
	pub deactivation_msg: Option<String>,
	pub action: Option<Rc<dyn Fn()>>,
	/// Fires once per transition into focus.
	pub focus_call: Option<Rc<dyn Fn()>>,
	/// Receives every [`NodeState`] change.
	pub on_state: Option<Rc<dyn Fn(NodeState)>>,
	pub disabled: bool,
	pub starts_pressed: bool,
	pub anchor_id: Option<String>,
}
impl fmt::Debug for BindingConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BindingConfig")
			.field("role", &self.role.as_ref().map(Role::name))
			.field("description", &UserText(&self.description))
			.field("action", &self.action.is_some())
			.field("focus_call", &self.focus_call.is_some())
			.field("disabled", &self.disabled)
			.field("starts_pressed", &self.starts_pressed)
			.field("anchor_id", &self.anchor_id)
			.finish()
	}
}

/// One mounted accessible node.
///
/// Every input method checks the mounted flag first, so late callbacks (a pending re-announce, a pointer-leave
/// delivered after teardown) are no-ops once [`unmount`](`BindingCore::unmount`) ran.
pub struct BindingCore {
	this: Weak<BindingCore>,
	id: ItemId,
	role: Role,
	config: BindingConfig,
	state: Cell<NodeState>,
	over_scene: Cell<bool>,
	over_proxy: Cell<bool>,
	mounted: Cell<bool>,
	registry: FocusRegistry,
	announcer: Announcer,
	view: Box<dyn BindingView>,
}
impl fmt::Debug for BindingCore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BindingCore")
			.field("id", &self.id)
			.field("role", &self.role.name())
			.field("state", &self.state.get())
			.field("mounted", &self.mounted.get())
			.finish()
	}
}
impl BindingCore {
	/// Registers the node at the end of the focus ring.
	///
	/// If its anchor id matches the registry's requested anchor, the request is consumed and the node takes focus.
	#[instrument(skip(registry, announcer, view))]
	pub fn mount(registry: &FocusRegistry, announcer: &Announcer, config: BindingConfig, view: Box<dyn BindingView>) -> Rc<Self> {
		let role = config.role.clone().unwrap_or(Role::Content);
		let pressed = role == Role::ToggleButton && config.starts_pressed;

		let core = Rc::new_cyclic(|weak: &Weak<BindingCore>| {
			let mut item = NewItem::new(role.clone(), config.description.clone());
			item.anchor_id = config.anchor_id.clone();
			item.action_call = Some(Rc::new({
				let weak = weak.clone();
				move || {
					if let Some(core) = weak.upgrade() {
						core.activate()
					}
				}
			}));
			item.focus_hook = Some(Rc::new({
				let weak = weak.clone();
				move |change| {
					if let Some(core) = weak.upgrade() {
						core.focus_changed(change)
					}
				}
			}));
			let id = registry.register(item);

			BindingCore {
				this: weak.clone(),
				id,
				role,
				config,
				state: Cell::new(NodeState { pressed, ..NodeState::default() }),
				over_scene: Cell::new(false),
				over_proxy: Cell::new(false),
				mounted: Cell::new(true),
				registry: registry.clone(),
				announcer: announcer.clone(),
				view,
			}
		});
		if pressed {
			core.view.set_pressed(true);
		}

		if let Some(anchor_id) = &core.config.anchor_id {
			if registry.take_requested_anchor(anchor_id) {
				debug!(id = %core.id, "Focusing deep-linked node.");
				registry.focus_by_id(core.id);
			}
		}
		core
	}

	#[must_use]
	pub fn id(&self) -> ItemId {
		self.id
	}

	#[must_use]
	pub fn role(&self) -> &Role {
		&self.role
	}

	#[must_use]
	pub fn config(&self) -> &BindingConfig {
		&self.config
	}

	#[must_use]
	pub fn state(&self) -> NodeState {
		self.state.get()
	}

	#[must_use]
	pub fn is_mounted(&self) -> bool {
		self.mounted.get()
	}

	fn update(&self, f: impl FnOnce(&mut NodeState)) {
		let mut state = self.state.get();
		f(&mut state);
		if state != self.state.replace(state) {
			trace!(id = %self.id, ?state, "State changed.");
			if let Some(on_state) = &self.config.on_state {
				on_state(state)
			}
		}
	}

	fn shows_pointer(&self) -> bool {
		self.role.is_interactive() && !self.config.disabled
	}

	pub fn pointer_enter(&self, source: HoverSource) {
		if !self.is_mounted() {
			return;
		}
		match source {
			HoverSource::Scene => self.over_scene.set(true),
			HoverSource::Proxy => self.over_proxy.set(true),
		}
		if self.shows_pointer() {
			self.view.set_pointer_cursor(true);
		}
		self.update(|state| state.hovered = true);
	}

	/// Hover only clears once neither hit region reports the pointer.
	pub fn pointer_leave(&self, source: HoverSource) {
		if !self.is_mounted() {
			return;
		}
		match source {
			HoverSource::Scene => self.over_scene.set(false),
			HoverSource::Proxy => self.over_proxy.set(false),
		}
		if self.over_scene.get() || self.over_proxy.get() {
			return;
		}
		if self.shows_pointer() {
			self.view.set_pointer_cursor(false);
		}
		self.update(|state| state.hovered = false);
	}

	/// A click on the scene node or the proxy element. Goes through the registry, so the click is recorded there.
	pub fn click(&self) {
		if !self.is_mounted() {
			return;
		}
		self.registry.trigger_click(self.id);
	}

	/// Performs the role's activation. Reached through [`FocusRegistry::trigger_click`].
	#[instrument]
	fn activate(&self) {
		if !self.is_mounted() {
			return;
		}
		if self.config.disabled {
			trace!("Ignored activation of a disabled node.");
			return;
		}
		match self.role {
			Role::Button => {
				self.call_action();
				if let Some(message) = &self.config.activation_msg {
					self.reannounce(message);
				}
			}
			Role::ToggleButton => {
				let pressed = !self.state.get().pressed;
				self.update(|state| state.pressed = pressed);
				self.view.set_pressed(pressed);
				let message = if pressed { &self.config.activation_msg } else { &self.config.deactivation_msg };
				if let Some(message) = message {
					self.announcer.announce(message);
				}
				self.call_action();
			}
			Role::Link { .. } | Role::Content | Role::Image => self.call_action(),
		}
	}

	fn call_action(&self) {
		if let Some(action) = &self.config.action {
			action()
		}
	}

	/// Announces through the clear/re-announce pattern, dropping the second half if this node unmounts meanwhile.
	fn reannounce(&self, message: &str) {
		let this = self.this.clone();
		self.announcer.reannounce_while(message, move || this.upgrade().map_or(false, |core| core.is_mounted()));
	}

	/// Native focus landed on the proxy element.
	pub fn native_focus(&self) {
		if !self.is_mounted() {
			return;
		}
		self.registry.focus_by_id(self.id);
		self.set_focused(true);
	}

	/// Native focus left the proxy element.
	pub fn native_blur(&self) {
		if !self.is_mounted() {
			return;
		}
		self.registry.blur_by_id(self.id);
		self.set_focused(false);
	}

	fn focus_changed(&self, change: FocusChange) {
		if !self.is_mounted() {
			return;
		}
		match change {
			FocusChange::Focused(origin) => {
				let was_focused = self.state.get().focused;
				self.set_focused(true);
				if origin == FocusOrigin::Ring && !was_focused {
					self.reannounce(&self.config.description);
				}
			}
			FocusChange::Blurred => self.set_focused(false),
		}
	}

	fn set_focused(&self, focused: bool) {
		let was_focused = self.state.get().focused;
		self.update(|state| state.focused = focused);
		if focused && !was_focused {
			if let Some(focus_call) = &self.config.focus_call {
				focus_call()
			}
		}
	}

	/// Leaves the ring and turns every later input into a no-op. Idempotent.
	#[instrument]
	pub fn unmount(&self) {
		if !self.mounted.replace(false) {
			return;
		}
		if self.state.get().hovered && self.shows_pointer() {
			self.view.set_pointer_cursor(false);
		}
		self.registry.unregister(self.id);
		debug!("Unmounted binding.");
	}
}
