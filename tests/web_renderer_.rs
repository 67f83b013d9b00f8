#![cfg(target_arch = "wasm32")]
#![allow(dead_code)]

use a11y_scene_dom::{CameraState, FrameSubscription, Renderer, SceneNode, Viewport};
use glam::{Mat4, Vec3};
use std::{
	cell::{Cell, RefCell},
	rc::Rc,
};
use wasm_bindgen::JsCast;
use web_sys::{window, HtmlElement};

static mut LOG_INITIALIZED: bool = false;

pub fn init_logging() {
	unsafe {
		if !LOG_INITIALIZED {
			tracing_wasm::set_as_global_default();
			LOG_INITIALIZED = true;
		}
	}
}

type FrameCallback = Rc<RefCell<Option<Box<dyn FnMut()>>>>;

/// A 200×200 "canvas" in its own host `<div>`, looking at the origin from `z = 10`.
pub struct TestRenderer {
	host: HtmlElement,
	canvas: HtmlElement,
	camera: Cell<CameraState>,
	frame: FrameCallback,
}
impl TestRenderer {
	pub fn new() -> Rc<Self> {
		let document = window().unwrap().document().unwrap();
		let host: HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
		let canvas: HtmlElement = document.create_element("canvas").unwrap().dyn_into().unwrap();
		host.append_child(&canvas).unwrap();
		document.body().unwrap().append_child(&host).unwrap();

		Rc::new(Self {
			host,
			canvas,
			camera: Cell::new(CameraState::perspective(Vec3::new(0., 0., 10.), Vec3::ZERO, core::f32::consts::FRAC_PI_2, 1., 0.1, 100.)),
			frame: Rc::default(),
		})
	}

	pub fn host(&self) -> &HtmlElement {
		&self.host
	}

	pub fn set_camera(&self, camera: CameraState) {
		self.camera.set(camera)
	}

	/// Renders one frame.
	pub fn frame(&self) {
		let callback = self.frame.borrow_mut().take();
		if let Some(mut callback) = callback {
			callback();
			let mut slot = self.frame.borrow_mut();
			if slot.is_none() {
				*slot = Some(callback);
			}
		}
	}

	pub fn is_subscribed(&self) -> bool {
		self.frame.borrow().is_some()
	}
}
impl Renderer for TestRenderer {
	fn camera(&self) -> CameraState {
		self.camera.get()
	}

	fn viewport(&self) -> Viewport {
		Viewport::new(200., 200.)
	}

	fn dom_element(&self) -> HtmlElement {
		self.canvas.clone()
	}

	fn subscribe_frame(&self, callback: Box<dyn FnMut()>) -> FrameSubscription {
		*self.frame.borrow_mut() = Some(callback);
		let frame = Rc::downgrade(&self.frame);
		FrameSubscription::new(move || {
			if let Some(frame) = frame.upgrade() {
				frame.borrow_mut().take();
			}
		})
	}
}
impl Drop for TestRenderer {
	fn drop(&mut self) {
		self.host.remove()
	}
}

/// A scene node at a movable world position.
pub struct Point(Cell<Vec3>);
impl Point {
	pub fn new(position: Vec3) -> Rc<Self> {
		Rc::new(Self(Cell::new(position)))
	}

	pub fn move_to(&self, position: Vec3) {
		self.0.set(position)
	}
}
impl SceneNode for Point {
	fn world_matrix(&self) -> Mat4 {
		Mat4::from_translation(self.0.get())
	}
}
