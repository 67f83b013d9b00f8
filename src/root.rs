//! The per-application root: one focus ring, one announcer and one proxy engine, shared by every [`AccessibleNode`](`crate::node::AccessibleNode`).

use crate::{
	announce::{Announcer, AnnouncerConfig},
	dom::{KeyboardRing, LiveRegion, RingHandle},
	engine::{EngineConfig, SpatialProxyEngine},
	error::{Error, Result},
	focus::FocusRegistry,
	renderer::{FrameSubscription, Renderer},
	timer::WindowTimer,
};
use core::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, instrument, trace_span, warn};
use web_sys::{Document, Element, HtmlElement, Node};

#[derive(Debug, Clone)]
pub struct RootConfig {
	pub engine: EngineConfig,
	pub announcer: AnnouncerConfig,
	/// Request initial focus for the node whose anchor id matches `location.hash`.
	pub read_location_hash: bool,
	/// Hosts the live region, the ring sentinels and proxies without their own portal.
	/// Defaults to the parent of the renderer's canvas element.
	pub portal: Option<Element>,
	/// The accessible name of the ring sentinels.
	pub ring_label: String,
}
impl Default for RootConfig {
	fn default() -> Self {
		Self {
			engine: EngineConfig::default(),
			announcer: AnnouncerConfig::default(),
			read_location_hash: true,
			portal: None,
			ring_label: "Interactive 3D scene".to_owned(),
		}
	}
}

/// Everything that exists once per canvas.
///
/// Dropping the root stops proxy updates and removes the live region and the ring sentinels.
/// [`AccessibleNode`](`crate::node::AccessibleNode`)s should be dropped first.
pub struct A11yRoot {
	// Field order is drop order: stop ticking before anything else goes away.
	_frame: FrameSubscription,
	ring: KeyboardRing,
	live_region: LiveRegion,
	registry: FocusRegistry,
	announcer: Announcer,
	engine: Rc<RefCell<SpatialProxyEngine>>,
	renderer: Rc<dyn Renderer>,
	document: Document,
	host: Node,
	canvas: HtmlElement,
}
impl core::fmt::Debug for A11yRoot {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("A11yRoot")
			.field("registry", &self.registry)
			.field("announcer", &self.announcer)
			.field("engine", &self.engine)
			.finish_non_exhaustive()
	}
}
impl A11yRoot {
	/// # Errors
	///
	/// If the browser globals are missing, the canvas has no parent (and no portal was configured),
	/// or a DOM call fails.
	#[instrument(skip(renderer))]
	pub fn mount(renderer: Rc<dyn Renderer>, config: RootConfig) -> Result<Self> {
		let window = web_sys::window().ok_or(Error::NoWindow)?;
		let document = window.document().ok_or(Error::NoDocument)?;
		let canvas = renderer.dom_element();
		let host: Node = match config.portal {
			Some(portal) => portal.into(),
			None => canvas.parent_node().ok_or(Error::NoParent)?,
		};

		let registry = FocusRegistry::new();
		if config.read_location_hash {
			registry.set_requested_anchor_id(requested_anchor(&window.location().hash()?));
		}

		let announcer = Announcer::new(Rc::new(WindowTimer::new(window)), config.announcer);
		let live_region = LiveRegion::mount(&document, &host, &announcer)?;
		let ring = KeyboardRing::mount(&document, &host, registry.clone(), &config.ring_label)?;

		let engine = Rc::new(RefCell::new(SpatialProxyEngine::new(config.engine)));
		let frame = renderer.subscribe_frame(Box::new({
			let renderer = Rc::downgrade(&renderer);
			let engine = Rc::downgrade(&engine);
			move || tick(&renderer, &engine)
		}));

		debug!("Mounted accessibility root.");
		Ok(Self {
			_frame: frame,
			ring,
			live_region,
			registry,
			announcer,
			engine,
			renderer,
			document,
			host,
			canvas,
		})
	}

	#[must_use]
	pub fn registry(&self) -> &FocusRegistry {
		&self.registry
	}

	#[must_use]
	pub fn announcer(&self) -> &Announcer {
		&self.announcer
	}

	#[must_use]
	pub fn engine(&self) -> &Rc<RefCell<SpatialProxyEngine>> {
		&self.engine
	}

	#[must_use]
	pub fn ring(&self) -> &RingHandle {
		self.ring.handle()
	}

	#[must_use]
	pub fn live_region(&self) -> &HtmlElement {
		self.live_region.element()
	}

	#[must_use]
	pub fn document(&self) -> &Document {
		&self.document
	}

	/// The default parent of proxy elements.
	#[must_use]
	pub fn host(&self) -> &Node {
		&self.host
	}

	/// The renderer's canvas element, which receives the pointer cursor.
	#[must_use]
	pub fn canvas(&self) -> &HtmlElement {
		&self.canvas
	}

	/// Where a new child of `parent` must be inserted to stay inside the ring's tab order.
	#[must_use]
	pub fn insertion_point(&self, parent: &Node) -> Option<Node> {
		self.ring.insertion_point(parent)
	}

	/// Runs one engine tick outside the renderer's frame loop.
	pub fn tick(&self) {
		tick(&Rc::downgrade(&self.renderer), &Rc::downgrade(&self.engine))
	}
}

fn tick(renderer: &Weak<dyn Renderer>, engine: &Weak<RefCell<SpatialProxyEngine>>) {
	let (renderer, engine) = match (renderer.upgrade(), engine.upgrade()) {
		(Some(renderer), Some(engine)) => (renderer, engine),
		_ => return,
	};
	let _span = trace_span!("frame").entered();
	let camera = renderer.camera();
	let viewport = renderer.viewport();
	match engine.try_borrow_mut() {
		Ok(mut engine) => engine.tick(&camera, viewport),
		Err(_) => warn!("Skipped a proxy update: the engine is already ticking."),
	};
}

/// The anchor id named by a `location.hash` value.
fn requested_anchor(hash: &str) -> Option<String> {
	let raw = hash.strip_prefix('#').unwrap_or(hash);
	if raw.is_empty() {
		return None;
	}
	Some(js_sys::decode_uri_component(raw).map_or_else(|_| raw.to_owned(), String::from))
}
