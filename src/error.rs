use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum Error {
	/// An accessible node binding must wrap exactly one scene node.
	#[error("an accessible node wraps exactly one child, but {0} were given")]
	ChildCount(usize),
	#[error("DOM operation failed: {0}")]
	Dom(String),
	#[error("no global `window` available")]
	NoWindow,
	#[error("the window has no document")]
	NoDocument,
	#[error("the renderer's canvas element has no parent to host proxy elements, and no portal was given")]
	NoParent,
}

impl From<JsValue> for Error {
	fn from(value: JsValue) -> Self {
		Error::Dom(format!("{:?}", value))
	}
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
