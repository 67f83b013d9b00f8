//! Per-frame repositioning of proxy elements over their scene nodes.

use crate::projection::{is_behind_camera, screen_position, stack_order, CameraState, Viewport, ZIndexRange};
use glam::{Mat4, Vec2};
use hashbrown::HashMap;
use std::rc::{Rc, Weak};
use tracing::{debug, instrument, trace, trace_span};

/// A node in the renderer's scene graph, as far as placement is concerned.
pub trait SceneNode {
	/// The node's current local-to-world transform. Read once per frame.
	fn world_matrix(&self) -> Mat4;
}

/// The style writes the engine performs on a proxy.
///
/// Implemented by [`ProxyElement`](`crate::dom::ProxyElement`) for the DOM.
pub trait ProxyStyle {
	fn set_visible(&self, visible: bool);
	fn set_stack_order(&self, z_index: i32);
	/// Translate the proxy so that its origin sits at `position` (CSS pixels from the viewport's top left).
	fn set_position(&self, position: Vec2);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProxyId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePolicy {
	/// Recompute on every tick.
	EveryFrame,
	/// Recompute only on ticks following [`SpatialProxyEngine::request_update`].
	OnDemand,
}
impl Default for UpdatePolicy {
	fn default() -> Self {
		UpdatePolicy::EveryFrame
	}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
	/// Changes of zoom and pixel position at or below this are not written to the DOM.
	pub eps: f32,
	pub z_index_range: ZIndexRange,
}
impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			eps: 0.001,
			z_index_range: ZIndexRange::default(),
		}
	}
}

/// The last placement written for a proxy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProxyPlacement {
	pub screen_position: Vec2,
	pub visible: bool,
	/// `None` if the camera kind has no stacking order, or while the node is behind the camera.
	pub stack_order: Option<i32>,
	zoom: f32,
}

struct Tracked {
	node: Rc<dyn SceneNode>,
	style: Weak<dyn ProxyStyle>,
	policy: UpdatePolicy,
	needs_update: bool,
	placement: Option<ProxyPlacement>,
}

/// Owns the placement state of every tracked proxy.
///
/// The engine never drives itself: its owner calls [`tick`](`SpatialProxyEngine::tick`) from the renderer's frame callback.
pub struct SpatialProxyEngine {
	config: EngineConfig,
	next_id: u64,
	tracked: HashMap<ProxyId, Tracked>,
}
impl core::fmt::Debug for SpatialProxyEngine {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("SpatialProxyEngine")
			.field("config", &self.config)
			.field("tracked", &self.tracked.len())
			.finish()
	}
}
impl Default for SpatialProxyEngine {
	fn default() -> Self {
		Self::new(EngineConfig::default())
	}
}
impl SpatialProxyEngine {
	#[must_use]
	pub fn new(config: EngineConfig) -> Self {
		Self {
			config,
			next_id: 0,
			tracked: HashMap::new(),
		}
	}

	#[must_use]
	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	/// Starts placing `style` over `node`. The first tick afterwards always writes.
	///
	/// Only a weak reference to `style` is kept. Once it is dropped, the proxy is forgotten on the next tick.
	#[instrument(skip(self, node, style))]
	pub fn track(&mut self, node: Rc<dyn SceneNode>, style: Rc<dyn ProxyStyle>, policy: UpdatePolicy) -> ProxyId {
		let id = ProxyId(self.next_id);
		self.next_id += 1;
		self.tracked.insert(
			id,
			Tracked {
				node,
				style: Rc::downgrade(&style),
				policy,
				needs_update: true,
				placement: None,
			},
		);
		debug!(?id, "Tracking proxy.");
		id
	}

	/// Stops tracking. Returns `false` if `id` wasn't tracked.
	#[instrument(skip(self))]
	pub fn untrack(&mut self, id: ProxyId) -> bool {
		let removed = self.tracked.remove(&id).is_some();
		if removed {
			debug!("Untracked proxy.");
		}
		removed
	}

	/// Makes an [`UpdatePolicy::OnDemand`] proxy recompute on the next tick.
	pub fn request_update(&mut self, id: ProxyId) -> bool {
		match self.tracked.get_mut(&id) {
			Some(tracked) => {
				tracked.needs_update = true;
				true
			}
			None => false,
		}
	}

	#[must_use]
	pub fn placement(&self, id: ProxyId) -> Option<ProxyPlacement> {
		self.tracked.get(&id).and_then(|tracked| tracked.placement)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.tracked.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.tracked.is_empty()
	}

	/// Recomputes every due proxy against this frame's camera and writes what changed by more than `eps`.
	pub fn tick(&mut self, camera: &CameraState, viewport: Viewport) {
		let span = trace_span!("SpatialProxyEngine::tick", tracked = self.tracked.len());
		let _enter = span.enter();

		let config = self.config;
		let mut gone = Vec::new();
		for (id, tracked) in &mut self.tracked {
			let style = match tracked.style.upgrade() {
				Some(style) => style,
				None => {
					gone.push(*id);
					continue;
				}
			};
			if tracked.policy == UpdatePolicy::OnDemand && !tracked.needs_update {
				continue;
			}
			tracked.needs_update = false;

			let world = tracked.node.world_matrix();
			let position = screen_position(&world, camera, viewport);
			let visible = !is_behind_camera(&world, camera);
			let dirty = match tracked.placement {
				None => true,
				Some(previous) => {
					previous.visible != visible
						|| (previous.zoom - camera.zoom).abs() > config.eps
						|| (previous.screen_position.x - position.x).abs() > config.eps
						|| (previous.screen_position.y - position.y).abs() > config.eps
				}
			};
			if !dirty {
				continue;
			}

			style.set_visible(visible);
			let stack = if visible {
				let stack = stack_order(&world, camera, config.z_index_range);
				if let Some(z_index) = stack {
					style.set_stack_order(z_index);
				}
				style.set_position(position);
				stack
			} else {
				None
			};
			trace!(?id, ?position, visible, ?stack, "Placed proxy.");

			tracked.placement = Some(ProxyPlacement {
				screen_position: position,
				visible,
				stack_order: stack,
				zoom: camera.zoom,
			});
		}

		for id in gone {
			self.tracked.remove(&id);
			debug!(?id, "Forgot proxy whose element is gone.");
		}
	}
}
