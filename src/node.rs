//! Accessible nodes as mounted into an [`A11yRoot`].

use crate::{
	binding::{BindingConfig, BindingCore, HoverSource, NodeState},
	dom::{create_semantic_element, ProxyContent, ProxyElement, WebBindingView},
	engine::{ProxyId, ProxyStyle, SceneNode, SpatialProxyEngine, UpdatePolicy},
	error::{Error, Result},
	focus::{ItemId, Role},
	listeners::EventListeners,
	ring::RingElement,
	root::A11yRoot,
	style::ElementOverrides,
};
use core::{cell::RefCell, fmt};
use std::rc::{Rc, Weak};
use tracing::{debug, instrument, warn};
use wasm_bindgen::JsValue;
use web_sys::{Element, Event, EventTarget, FocusEvent, HtmlElement, KeyboardEvent, Node};

/// Builder for everything an [`AccessibleNode`] can be configured with.
#[derive(Clone, Default)]
pub struct NodeOptions {
	binding: BindingConfig,
	tab_index: Option<i32>,
	debug: bool,
	portal: Option<Element>,
	overrides: ElementOverrides,
	update_policy: UpdatePolicy,
}
impl fmt::Debug for NodeOptions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NodeOptions")
			.field("binding", &self.binding)
			.field("tab_index", &self.tab_index)
			.field("debug", &self.debug)
			.field("portal", &self.portal.is_some())
			.field("update_policy", &self.update_policy)
			.finish()
	}
}
impl NodeOptions {
	#[must_use]
	pub fn new(role: Role, description: impl Into<String>) -> Self {
		let mut options = Self::default();
		options.binding.role = Some(role);
		options.binding.description = description.into();
		options
	}

	/// Announced when a button is activated, or when a toggle button becomes pressed.
	#[must_use]
	pub fn activation_msg(mut self, message: impl Into<String>) -> Self {
		self.binding.activation_msg = Some(message.into());
		self
	}

	/// Announced when a toggle button becomes unpressed.
	#[must_use]
	pub fn deactivation_msg(mut self, message: impl Into<String>) -> Self {
		self.binding.deactivation_msg = Some(message.into());
		self
	}

	#[must_use]
	pub fn action(mut self, action: impl Fn() + 'static) -> Self {
		self.binding.action = Some(Rc::new(action));
		self
	}

	#[must_use]
	pub fn focus_call(mut self, focus_call: impl Fn() + 'static) -> Self {
		self.binding.focus_call = Some(Rc::new(focus_call));
		self
	}

	/// Receives hover, focus and pressed changes, for visual feedback on the wrapped node.
	#[must_use]
	pub fn on_state(mut self, on_state: impl Fn(NodeState) + 'static) -> Self {
		self.binding.on_state = Some(Rc::new(on_state));
		self
	}

	#[must_use]
	pub fn disabled(mut self, disabled: bool) -> Self {
		self.binding.disabled = disabled;
		self
	}

	#[must_use]
	pub fn starts_pressed(mut self, starts_pressed: bool) -> Self {
		self.binding.starts_pressed = starts_pressed;
		self
	}

	#[must_use]
	pub fn tab_index(mut self, tab_index: i32) -> Self {
		self.tab_index = Some(tab_index);
		self
	}

	/// Renders the proxy visibly.
	#[must_use]
	pub fn debug(mut self, debug: bool) -> Self {
		self.debug = debug;
		self
	}

	#[must_use]
	pub fn anchor_id(mut self, anchor_id: impl Into<String>) -> Self {
		self.binding.anchor_id = Some(anchor_id.into());
		self
	}

	/// Mount the proxy into `portal` instead of the root's host element.
	#[must_use]
	pub fn portal(mut self, portal: impl Into<Element>) -> Self {
		self.portal = Some(portal.into());
		self
	}

	#[must_use]
	pub fn overrides(mut self, overrides: ElementOverrides) -> Self {
		self.overrides = overrides;
		self
	}

	#[must_use]
	pub fn update_policy(mut self, update_policy: UpdatePolicy) -> Self {
		self.update_policy = update_policy;
		self
	}
}

/// One scene node made accessible: a registered ring item, a positioned proxy element and its event listeners.
///
/// Dropping it unmounts synchronously.
pub struct AccessibleNode {
	core: Rc<BindingCore>,
	element: HtmlElement,
	engine: Weak<RefCell<SpatialProxyEngine>>,
	proxy_id: ProxyId,
	// Dropped after `Drop::drop` unmounted the core, so no listener sees a half torn down node.
	_listeners: EventListeners,
	_proxy: Rc<ProxyElement>,
}
impl fmt::Debug for AccessibleNode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AccessibleNode")
			.field("core", &self.core)
			.field("proxy_id", &self.proxy_id)
			.finish_non_exhaustive()
	}
}
impl AccessibleNode {
	/// Wraps the one scene node in `children`.
	///
	/// # Errors
	///
	/// [`Error::ChildCount`] unless `children` yields exactly one node. DOM failures are returned as [`Error::Dom`].
	#[instrument(skip(root, children))]
	pub fn mount(root: &A11yRoot, children: impl IntoIterator<Item = Rc<dyn SceneNode>>, options: NodeOptions) -> Result<Self> {
		let scene_node = single_child(children)?;
		let NodeOptions {
			binding,
			tab_index,
			debug,
			portal,
			overrides,
			update_policy,
		} = options;
		let role = binding.role.clone().unwrap_or(Role::Content);

		let parent: Node = portal.map_or_else(|| root.host().clone(), Into::into);
		let before = root.insertion_point(&parent);
		let proxy = Rc::new(ProxyElement::attach(root.document(), &parent, before.as_ref())?);
		let element = create_semantic_element(
			root.document(),
			&ProxyContent {
				role: &role,
				description: &binding.description,
				disabled: binding.disabled,
				pressed: binding.starts_pressed,
				tab_index,
				debug,
				overrides: &overrides,
			},
		)?;
		proxy.container().append_child(&element)?;

		let core = BindingCore::mount(
			root.registry(),
			root.announcer(),
			binding,
			Box::new(WebBindingView {
				proxy: element.clone(),
				cursor_target: root.canvas().clone(),
			}),
		);
		let listeners = match wire(root, &core, &element) {
			Ok(listeners) => listeners,
			Err(error) => {
				core.unmount();
				return Err(error.into());
			}
		};

		let proxy_style: Rc<dyn ProxyStyle> = proxy.clone();
		let proxy_id = root.engine().borrow_mut().track(scene_node, proxy_style, update_policy);

		debug!(id = %core.id(), ?proxy_id, "Mounted accessible node.");
		Ok(Self {
			core,
			element,
			engine: Rc::downgrade(root.engine()),
			proxy_id,
			_listeners: listeners,
			_proxy: proxy,
		})
	}

	#[must_use]
	pub fn id(&self) -> ItemId {
		self.core.id()
	}

	#[must_use]
	pub fn proxy_id(&self) -> ProxyId {
		self.proxy_id
	}

	#[must_use]
	pub fn state(&self) -> NodeState {
		self.core.state()
	}

	/// The semantic proxy element (`<button>`, `<a>`, `<p>` or `<img>`).
	#[must_use]
	pub fn element(&self) -> &HtmlElement {
		&self.element
	}

	/// A handle for the renderer's hit-testing, which may outlive the node.
	#[must_use]
	pub fn handle(&self) -> NodeHandle {
		NodeHandle(Rc::downgrade(&self.core))
	}

	/// Recompute an [`UpdatePolicy::OnDemand`] proxy's placement on the next tick.
	pub fn request_update(&self) -> bool {
		self.engine.upgrade().map_or(false, |engine| engine.borrow_mut().request_update(self.proxy_id))
	}
}
impl Drop for AccessibleNode {
	fn drop(&mut self) {
		if let Some(engine) = self.engine.upgrade() {
			match engine.try_borrow_mut() {
				Ok(mut engine) => {
					engine.untrack(self.proxy_id);
				}
				Err(_) => warn!(proxy_id = ?self.proxy_id, "Couldn't untrack proxy during a tick. It is forgotten on the next one."),
			}
		}
		self.core.unmount();
	}
}

fn single_child(children: impl IntoIterator<Item = Rc<dyn SceneNode>>) -> Result<Rc<dyn SceneNode>> {
	let mut children = children.into_iter();
	match (children.next(), children.next()) {
		(Some(child), None) => Ok(child),
		(None, _) => Err(Error::ChildCount(0)),
		(Some(_), Some(_)) => Err(Error::ChildCount(2 + children.count())),
	}
}

fn wire(root: &A11yRoot, core: &Rc<BindingCore>, element: &HtmlElement) -> core::result::Result<EventListeners, JsValue> {
	let target: &EventTarget = element;
	let mut listeners = EventListeners::new();
	listeners.listen(target, "pointerenter", {
		let core = Rc::clone(core);
		move |_: Event| core.pointer_enter(HoverSource::Proxy)
	})?;
	listeners.listen(target, "pointerleave", {
		let core = Rc::clone(core);
		move |_: Event| core.pointer_leave(HoverSource::Proxy)
	})?;
	listeners.listen(target, "click", {
		let core = Rc::clone(core);
		move |event: Event| {
			// Link proxies never navigate on their own. Following `href` is left to the action.
			if core.role().href().is_some() {
				event.prevent_default();
			}
			core.click()
		}
	})?;
	listeners.listen(target, "focus", {
		let core = Rc::clone(core);
		let ring = root.ring().clone();
		move |_: Event| {
			core.native_focus();
			ring.controller().item_focused();
		}
	})?;
	listeners.listen(target, "blur", {
		let core = Rc::clone(core);
		let ring = root.ring().clone();
		move |event: FocusEvent| {
			core.native_blur();
			ring.controller().item_blurred(ring.is_ring_owned(event.related_target().as_ref()));
		}
	})?;
	listeners.listen(target, "keydown", {
		let ring = root.ring().clone();
		let id = core.id();
		move |event: KeyboardEvent| ring.key_down(RingElement::Item(id), &event)
	})?;
	Ok(listeners)
}

/// A weak reference to a mounted node, for input from the scene side. Every method is a no-op once the node is gone.
#[derive(Debug, Clone)]
pub struct NodeHandle(Weak<BindingCore>);
impl NodeHandle {
	/// The renderer's hit-test started reporting the node.
	pub fn pointer_enter(&self) {
		if let Some(core) = self.0.upgrade() {
			core.pointer_enter(HoverSource::Scene)
		}
	}

	/// The renderer's hit-test stopped reporting the node.
	pub fn pointer_leave(&self) {
		if let Some(core) = self.0.upgrade() {
			core.pointer_leave(HoverSource::Scene)
		}
	}

	/// The node was clicked in the scene.
	pub fn click(&self) {
		if let Some(core) = self.0.upgrade() {
			core.click()
		}
	}

	/// The current hover, focus and pressed state, or `None` after unmount.
	#[must_use]
	pub fn state(&self) -> Option<NodeState> {
		self.0.upgrade().filter(|core| core.is_mounted()).map(|core| core.state())
	}
}

#[cfg(test)]
mod tests {
	use super::{single_child, NodeOptions};
	use crate::{engine::SceneNode, error::Error, focus::Role};
	use glam::Mat4;
	use std::rc::Rc;

	struct Fixed;
	impl SceneNode for Fixed {
		fn world_matrix(&self) -> Mat4 {
			Mat4::IDENTITY
		}
	}

	fn nodes(n: usize) -> Vec<Rc<dyn SceneNode>> {
		(0..n).map(|_| Rc::new(Fixed) as Rc<dyn SceneNode>).collect()
	}

	#[test]
	fn exactly_one_child() {
		assert!(single_child(nodes(1)).is_ok());
		assert!(matches!(single_child(nodes(0)), Err(Error::ChildCount(0))));
		assert!(matches!(single_child(nodes(4)), Err(Error::ChildCount(4))));
	}

	#[test]
	fn builder_fills_binding_config() {
		let options = NodeOptions::new(Role::ToggleButton, "Lamp")
			.activation_msg("Lamp on")
			.deactivation_msg("Lamp off")
			.starts_pressed(true)
			.tab_index(0)
			.anchor_id("lamp");
		assert_eq!(options.binding.role, Some(Role::ToggleButton));
		assert_eq!(options.binding.description, "Lamp");
		assert_eq!(options.binding.activation_msg.as_deref(), Some("Lamp on"));
		assert_eq!(options.binding.deactivation_msg.as_deref(), Some("Lamp off"));
		assert!(options.binding.starts_pressed);
		assert_eq!(options.tab_index, Some(0));
		assert_eq!(options.binding.anchor_id.as_deref(), Some("lamp"));
		assert!(options.binding.action.is_none());
	}
}
