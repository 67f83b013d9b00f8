//! Screen-space placement of scene nodes: the only 3D math this crate does.

use glam::{Mat4, Vec2, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraKind {
	Perspective,
	Orthographic,
	/// Any other projection. Such cameras get no stacking index.
	Other,
}

/// What the renderer reports about its active camera for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
	/// Camera-to-world transform. The camera looks down its local -Z axis.
	pub world: Mat4,
	/// View-to-clip transform, OpenGL depth convention.
	pub projection: Mat4,
	pub near: f32,
	pub far: f32,
	pub zoom: f32,
	pub kind: CameraKind,
}
impl CameraState {
	/// A perspective camera at `eye` looking at `target`, +Y up.
	#[must_use]
	pub fn perspective(eye: Vec3, target: Vec3, fov_y_radians: f32, aspect: f32, near: f32, far: f32) -> Self {
		Self {
			world: Mat4::look_at_rh(eye, target, Vec3::Y).inverse(),
			projection: Mat4::perspective_rh_gl(fov_y_radians, aspect, near, far),
			near,
			far,
			zoom: 1.,
			kind: CameraKind::Perspective,
		}
	}

	#[must_use]
	pub fn position(&self) -> Vec3 {
		self.world.w_axis.truncate()
	}

	#[must_use]
	pub fn forward(&self) -> Vec3 {
		-self.world.z_axis.truncate().normalize_or_zero()
	}

	#[must_use]
	pub fn view_projection(&self) -> Mat4 {
		self.projection * self.world.inverse()
	}
}

/// Size of the rendering surface in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
	pub width: f32,
	pub height: f32,
}
impl Viewport {
	#[must_use]
	pub fn new(width: f32, height: f32) -> Self {
		Self { width, height }
	}
}

/// Stacking indices assigned at the camera's far and near planes. Distances in between map linearly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZIndexRange {
	pub near: i32,
	pub far: i32,
}
impl Default for ZIndexRange {
	fn default() -> Self {
		Self { near: 16_777_271, far: 0 }
	}
}

fn origin(node_world: &Mat4) -> Vec3 {
	node_world.w_axis.truncate()
}

/// Pixel position of the node's origin, measured from the viewport's top left corner.
#[must_use]
pub fn screen_position(node_world: &Mat4, camera: &CameraState, viewport: Viewport) -> Vec2 {
	let ndc = camera.view_projection().project_point3(origin(node_world));
	let half_width = viewport.width / 2.;
	let half_height = viewport.height / 2.;
	Vec2::new(ndc.x * half_width + half_width, -(ndc.y * half_height) + half_height)
}

/// Whether the angle between the camera's forward direction and the direction to the node exceeds 90°.
#[must_use]
pub fn is_behind_camera(node_world: &Mat4, camera: &CameraState) -> bool {
	let to_node = origin(node_world) - camera.position();
	to_node.dot(camera.forward()) < 0.
}

/// Maps camera distance into `range`, so that nearer nodes stack above farther ones.
///
/// `None` for [`CameraKind::Other`] or a degenerate near/far pair.
#[must_use]
pub fn stack_order(node_world: &Mat4, camera: &CameraState, range: ZIndexRange) -> Option<i32> {
	if camera.kind == CameraKind::Other || (camera.far - camera.near).abs() <= f32::EPSILON {
		return None;
	}
	// f64: the default near index is beyond f32's exact integer range.
	let distance = f64::from(origin(node_world).distance(camera.position()));
	let a = (f64::from(range.near) - f64::from(range.far)) / (f64::from(camera.near) - f64::from(camera.far));
	let b = f64::from(range.near) - a * f64::from(camera.near);
	#[allow(clippy::cast_possible_truncation)]
	Some((a * distance + b).round() as i32)
}
