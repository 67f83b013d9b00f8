//! Everything that creates or writes DOM nodes.
//!
//! No other module touches proxy element styles or attributes.

use crate::{
	announce::Announcer,
	binding::BindingView,
	engine::ProxyStyle,
	focus::{FocusRegistry, Role},
	listeners::EventListeners,
	ring::{KeyInput, RingController, RingElement, Sentinel},
	store::Subscription,
	style::{apply_attributes, apply_styles, ElementOverrides, HIDDEN_BUT_SCREEN_READABLE, OFF_SCREEN},
	UserText,
};
use glam::Vec2;
use std::rc::Rc;
use tracing::{debug, error, instrument, trace};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, EventTarget, FocusEvent, HtmlElement, KeyboardEvent, MouseEvent, Node};

const PROXY_MARKER: &str = "data-a11y-proxy";

/// An empty SVG, so that image proxies never show a broken-image icon.
const EMPTY_IMAGE_SRC: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg'/%3E";

pub(crate) fn create_html_element(document: &Document, tag: &str) -> Result<HtmlElement, JsValue> {
	document.create_element(tag)?.dyn_into::<HtmlElement>().map_err(JsValue::from)
}

/// The absolutely positioned container that [`SpatialProxyEngine`](`crate::engine::SpatialProxyEngine`) moves around.
///
/// Removed from the DOM on drop.
#[derive(Debug)]
pub struct ProxyElement {
	container: HtmlElement,
}
impl ProxyElement {
	/// Creates the container and inserts it into `parent`, before `before` if given.
	#[instrument(skip(document, parent, before))]
	pub fn attach(document: &Document, parent: &Node, before: Option<&Node>) -> Result<Self, JsValue> {
		let container = create_html_element(document, "div")?;
		container.style().set_css_text("position:absolute;top:0;left:0;transform-origin:0 0;");
		container.set_attribute(PROXY_MARKER, "true")?;
		parent.insert_before(&container, before)?;
		Ok(Self { container })
	}

	#[must_use]
	pub fn container(&self) -> &HtmlElement {
		&self.container
	}

	fn set_style(&self, property: &str, value: &str) {
		if let Err(error) = self.container.style().set_property(property, value) {
			error!("Failed to set proxy `{}`: {:?}", property, error);
		}
	}
}
impl ProxyStyle for ProxyElement {
	fn set_visible(&self, visible: bool) {
		self.set_style("display", if visible { "block" } else { "none" })
	}

	fn set_stack_order(&self, z_index: i32) {
		self.set_style("z-index", &z_index.to_string())
	}

	fn set_position(&self, position: Vec2) {
		self.set_style("transform", &format!("translate3d({}px,{}px,0) scale(1)", position.x, position.y))
	}
}
impl Drop for ProxyElement {
	fn drop(&mut self) {
		self.container.remove();
		trace!("Removed proxy element.");
	}
}

/// What the semantic element inside a proxy looks like.
#[derive(Debug, Clone, Copy)]
pub struct ProxyContent<'a> {
	pub role: &'a Role,
	pub description: &'a str,
	pub disabled: bool,
	pub pressed: bool,
	/// Defaults to `-1`: reachable by assistive technology and programmatic focus,
	/// while sequential keyboard navigation goes through the ring.
	pub tab_index: Option<i32>,
	/// Render at full opacity.
	pub debug: bool,
	pub overrides: &'a ElementOverrides,
}

/// Creates the one semantic element matching `content.role`.
#[instrument(skip(document, content), fields(role = content.role.name(), description = ?UserText(content.description)))]
pub fn create_semantic_element(document: &Document, content: &ProxyContent<'_>) -> Result<HtmlElement, JsValue> {
	let element = match content.role {
		Role::Button => button_element(document, content)?,
		Role::ToggleButton => toggle_button_element(document, content)?,
		Role::Link { href } => link_element(document, content, href)?,
		Role::Content => content_element(document, content)?,
		Role::Image => image_element(document, content)?,
	};

	element.set_tab_index(content.tab_index.unwrap_or(-1));
	if content.disabled {
		// Not the `disabled` attribute: disabled proxies stay focusable and discoverable.
		element.set_attribute("aria-disabled", "true")?;
	}
	apply_styles(&element, HIDDEN_BUT_SCREEN_READABLE)?;
	if content.debug {
		element.style().set_property("opacity", "1")?;
	}
	content.overrides.apply(&element)?;
	Ok(element)
}

fn button_element(document: &Document, content: &ProxyContent<'_>) -> Result<HtmlElement, JsValue> {
	let button = create_html_element(document, "button")?;
	button.set_attribute("type", "button")?;
	button.set_text_content(Some(content.description));
	Ok(button)
}

fn toggle_button_element(document: &Document, content: &ProxyContent<'_>) -> Result<HtmlElement, JsValue> {
	let button = button_element(document, content)?;
	button.set_attribute("aria-pressed", if content.pressed { "true" } else { "false" })?;
	Ok(button)
}

fn link_element(document: &Document, content: &ProxyContent<'_>, href: &str) -> Result<HtmlElement, JsValue> {
	let anchor = create_html_element(document, "a")?;
	anchor.set_attribute("href", href)?;
	anchor.set_text_content(Some(content.description));
	Ok(anchor)
}

fn content_element(document: &Document, content: &ProxyContent<'_>) -> Result<HtmlElement, JsValue> {
	let paragraph = create_html_element(document, "p")?;
	paragraph.set_text_content(Some(content.description));
	Ok(paragraph)
}

fn image_element(document: &Document, content: &ProxyContent<'_>) -> Result<HtmlElement, JsValue> {
	let image = create_html_element(document, "img")?;
	apply_attributes(&image, vec![("src", EMPTY_IMAGE_SRC), ("alt", content.description), ("role", "img")])?;
	Ok(image)
}

/// [`BindingView`] over a semantic proxy element and the canvas host.
#[derive(Debug)]
pub struct WebBindingView {
	pub proxy: HtmlElement,
	pub cursor_target: HtmlElement,
}
impl BindingView for WebBindingView {
	fn set_pointer_cursor(&self, pointer: bool) {
		if let Err(error) = self.cursor_target.style().set_property("cursor", if pointer { "pointer" } else { "default" }) {
			error!("Failed to set cursor: {:?}", error);
		}
	}

	fn set_pressed(&self, pressed: bool) {
		if let Err(error) = self.proxy.set_attribute("aria-pressed", if pressed { "true" } else { "false" }) {
			error!("Failed to set `aria-pressed`: {:?}", error);
		}
	}
}

/// The off-screen `aria-live` region mirroring an [`Announcer`]. Removed on drop.
#[derive(Debug)]
pub struct LiveRegion {
	element: HtmlElement,
	_subscription: Subscription,
}
impl LiveRegion {
	#[instrument(skip(document, parent))]
	pub fn mount(document: &Document, parent: &Node, announcer: &Announcer) -> Result<Self, JsValue> {
		let element = create_html_element(document, "div")?;
		apply_styles(&element, OFF_SCREEN)?;
		apply_attributes(&element, vec![("aria-atomic", "true"), ("aria-live", announcer.config().politeness.aria_live()), ("data-a11y-announcer", "true")])?;
		element.set_text_content(Some(&announcer.message()));
		parent.append_child(&element)?;

		let subscription = announcer.subscribe({
			let element = element.clone();
			move |message| element.set_text_content(Some(message))
		});
		debug!("Mounted live region.");
		Ok(Self {
			element,
			_subscription: subscription,
		})
	}

	#[must_use]
	pub fn element(&self) -> &HtmlElement {
		&self.element
	}
}
impl Drop for LiveRegion {
	fn drop(&mut self) {
		self.element.remove()
	}
}

/// Cloneable access to the ring for listeners on item proxies.
#[derive(Debug, Clone)]
pub struct RingHandle {
	controller: Rc<RingController>,
	before: HtmlElement,
	after: HtmlElement,
}
impl RingHandle {
	#[must_use]
	pub fn controller(&self) -> &RingController {
		&self.controller
	}

	#[must_use]
	pub fn sentinel(&self, sentinel: Sentinel) -> &HtmlElement {
		match sentinel {
			Sentinel::Before => &self.before,
			Sentinel::After => &self.after,
		}
	}

	/// Whether `target` is one of the sentinels or sits inside an item proxy.
	///
	/// Focus moving between such elements stays within the ring.
	#[must_use]
	pub fn is_ring_owned(&self, target: Option<&EventTarget>) -> bool {
		let node = match target.and_then(|target| target.dyn_ref::<Node>()) {
			Some(node) => node,
			None => return false,
		};
		let before: &Node = &self.before;
		let after: &Node = &self.after;
		if before.is_same_node(Some(node)) || after.is_same_node(Some(node)) {
			return true;
		}
		node.dyn_ref::<Element>()
			.map_or(false, |element| matches!(element.closest(&format!("[{}]", PROXY_MARKER)), Ok(Some(_))))
	}

	/// Feeds a keydown on a ring-owned element through the [`RingController`] and applies the outcome.
	pub fn key_down(&self, origin: RingElement, event: &KeyboardEvent) {
		let key = event.key();
		let outcome = self.controller.key_down(
			origin,
			KeyInput {
				key: &key,
				shift: event.shift_key(),
				alt: event.alt_key(),
			},
		);
		if let Some(sentinel) = outcome.park_on {
			if let Err(error) = self.sentinel(sentinel).focus() {
				error!("Failed to park focus on the {} sentinel: {:?}", sentinel.name(), error);
				self.controller.cancel_park();
			}
		}
		if outcome.prevent_default {
			event.prevent_default();
		}
	}
}

/// The pair of sentinels bracketing the ring in native tab order. Removed on drop.
#[derive(Debug)]
pub struct KeyboardRing {
	handle: RingHandle,
	_listeners: EventListeners,
}
impl KeyboardRing {
	/// Inserts the before-sentinel as `parent`'s first child and the after-sentinel as its last.
	#[instrument(skip(document, parent, registry))]
	pub fn mount(document: &Document, parent: &Node, registry: FocusRegistry, label: &str) -> Result<Self, JsValue> {
		let sentinel_element = |sentinel: Sentinel| -> Result<HtmlElement, JsValue> {
			let element = create_html_element(document, "button")?;
			apply_styles(&element, OFF_SCREEN)?;
			apply_attributes(&element, vec![("type", "button"), ("aria-label", label), ("data-a11y-sentinel", sentinel.name())])?;
			Ok(element)
		};
		let before = sentinel_element(Sentinel::Before)?;
		let after = sentinel_element(Sentinel::After)?;
		parent.insert_before(&before, parent.first_child().as_ref())?;
		parent.append_child(&after)?;

		let handle = RingHandle {
			controller: Rc::new(RingController::new(registry)),
			before,
			after,
		};

		let mut listeners = EventListeners::new();
		for &sentinel in &[Sentinel::Before, Sentinel::After] {
			let target: &EventTarget = handle.sentinel(sentinel);
			listeners.listen(target, "focus", {
				let handle = handle.clone();
				move |_: Event| {
					handle.controller.sentinel_focused(sentinel);
				}
			})?;
			listeners.listen(target, "blur", {
				let handle = handle.clone();
				move |event: FocusEvent| handle.controller.sentinel_blurred(handle.is_ring_owned(event.related_target().as_ref()))
			})?;
			listeners.listen(target, "keydown", {
				let handle = handle.clone();
				move |event: KeyboardEvent| handle.key_down(RingElement::Sentinel(sentinel), &event)
			})?;
			listeners.listen(target, "click", {
				let handle = handle.clone();
				move |event: MouseEvent| {
					// `detail` is 0 for clicks synthesized from the keyboard.
					let keyboard = event.detail() == 0;
					if keyboard {
						event.prevent_default();
					}
					handle.controller.sentinel_clicked(keyboard);
				}
			})?;
		}

		debug!("Mounted keyboard ring.");
		Ok(Self {
			handle,
			_listeners: listeners,
		})
	}

	#[must_use]
	pub fn handle(&self) -> &RingHandle {
		&self.handle
	}

	/// Where to insert a proxy into `parent` so that it stays between the sentinels.
	#[must_use]
	pub fn insertion_point(&self, parent: &Node) -> Option<Node> {
		let after: &Node = &self.handle.after;
		match after.parent_node() {
			Some(after_parent) if after_parent.is_same_node(Some(parent)) => Some(after.clone()),
			_ => None,
		}
	}
}
impl Drop for KeyboardRing {
	fn drop(&mut self) {
		self.handle.before.remove();
		self.handle.after.remove();
	}
}
