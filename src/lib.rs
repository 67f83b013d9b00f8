#![doc(html_root_url = "https://docs.rs/a11y-scene-dom/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod announce;
pub mod binding;
pub mod dom;
pub mod engine;
pub mod error;
pub mod focus;
pub mod listeners;
pub mod node;
pub mod preferences;
pub mod projection;
pub mod renderer;
pub mod ring;
pub mod root;
pub mod section;
pub mod store;
pub mod style;
pub mod timer;

pub use announce::{Announcer, AnnouncerConfig, Politeness};
pub use engine::{EngineConfig, SceneNode, UpdatePolicy};
pub use error::{Error, Result};
pub use focus::{FocusRegistry, ItemId, Role};
pub use node::{AccessibleNode, NodeHandle, NodeOptions};
pub use projection::{CameraKind, CameraState, Viewport};
pub use renderer::{FrameSubscription, Renderer};
pub use root::{A11yRoot, RootConfig};

/// User-facing text in log records.
///
/// Only printed verbatim with the `"dangerous-logging"` feature, since descriptions and announcements may contain personal data.
pub(crate) struct UserText<'a>(pub &'a str);
impl core::fmt::Debug for UserText<'_> {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		if cfg!(feature = "dangerous-logging") {
			core::fmt::Debug::fmt(self.0, f)
		} else {
			write!(f, "<{} bytes>", self.0.len())
		}
	}
}
