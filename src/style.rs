//! Typed inline style and attribute maps for generated elements.

use wasm_bindgen::JsValue;
use web_sys::{Element, HtmlElement};

/// CSS property/value pairs, applied in order. Property names are written as in CSS (`user-select`, not `userSelect`).
pub type Styles = [(&'static str, &'static str)];

/// Invisible, but kept in the accessibility tree and focusable. Never `display: none`.
pub const HIDDEN_BUT_SCREEN_READABLE: &Styles = &[
	("opacity", "0"),
	("border-radius", "50%"),
	("width", "50px"),
	("height", "50px"),
	("overflow", "hidden"),
	("display", "inline-block"),
	("user-select", "none"),
	("-webkit-user-select", "none"),
	("-webkit-touch-callout", "none"),
	("cursor", "unset"),
	("margin", "0"),
	("transform", "translate(-50%, -50%)"),
];

/// Clipped to a single pixel off to the side. Used for the live region and the ring sentinels.
pub const OFF_SCREEN: &Styles = &[
	("border", "0"),
	("clip", "rect(0 0 0 0)"),
	("clip-path", "inset(50%)"),
	("height", "1px"),
	("margin", "-1px"),
	("overflow", "hidden"),
	("white-space", "nowrap"),
	("padding", "0"),
	("width", "1px"),
	("position", "absolute"),
];

/// Caller-supplied styles and attributes for a generated proxy element, applied after the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementOverrides {
	pub styles: Vec<(String, String)>,
	pub attributes: Vec<(String, String)>,
}
impl ElementOverrides {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
		self.styles.push((property.into(), value.into()));
		self
	}

	#[must_use]
	pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attributes.push((name.into(), value.into()));
		self
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.styles.is_empty() && self.attributes.is_empty()
	}

	pub fn apply(&self, element: &HtmlElement) -> Result<(), JsValue> {
		let style = element.style();
		for (property, value) in &self.styles {
			style.set_property(property, value)?;
		}
		apply_attributes(element, self.attributes.iter().map(|(name, value)| (name.as_str(), value.as_str())))
	}
}

pub fn apply_styles(element: &HtmlElement, styles: &Styles) -> Result<(), JsValue> {
	let style = element.style();
	for (property, value) in styles {
		style.set_property(property, value)?;
	}
	Ok(())
}

pub fn apply_attributes<'a>(element: &Element, attributes: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<(), JsValue> {
	for (name, value) in attributes {
		element.set_attribute(name, value)?;
	}
	Ok(())
}
