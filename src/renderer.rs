//! The interface consumed from the scene renderer.

use crate::projection::{CameraState, Viewport};

/// The retained-mode renderer drawing the scene.
///
/// The renderer owns the frame loop. This crate only subscribes to it.
pub trait Renderer {
	/// The active camera, with its world matrix already updated for the current frame.
	fn camera(&self) -> CameraState;
	fn viewport(&self) -> Viewport;
	/// The element hosting the canvas. Its parent is the default container for proxy elements,
	/// and it receives the pointer cursor.
	fn dom_element(&self) -> web_sys::HtmlElement;
	/// Calls `callback` once per rendered frame, before the frame is presented, until the subscription is dropped.
	fn subscribe_frame(&self, callback: Box<dyn FnMut()>) -> FrameSubscription;
}

/// Keeps a frame callback registered. Unregisters it on drop.
#[must_use = "Dropping the `FrameSubscription` unsubscribes immediately."]
pub struct FrameSubscription(Option<Box<dyn FnOnce()>>);
impl FrameSubscription {
	pub fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
		Self(Some(Box::new(unsubscribe)))
	}
}
impl Drop for FrameSubscription {
	fn drop(&mut self) {
		if let Some(unsubscribe) = self.0.take() {
			unsubscribe()
		}
	}
}
impl core::fmt::Debug for FrameSubscription {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_tuple("FrameSubscription").finish()
	}
}
