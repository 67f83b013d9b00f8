//! Landmark sections grouping related proxies.

use crate::{
	dom::create_html_element,
	error::Result,
	root::A11yRoot,
	style::{apply_styles, OFF_SCREEN},
	UserText,
};
use tracing::instrument;
use web_sys::HtmlElement;

/// A labelled `<section>` landmark, with an optional visually hidden description as its first child.
///
/// Give [`element`](`Section::element`) to [`NodeOptions::portal`](`crate::node::NodeOptions::portal`)
/// to place proxies inside it. Removed on drop.
#[derive(Debug)]
pub struct Section {
	element: HtmlElement,
}
impl Section {
	/// # Errors
	///
	/// Iff a DOM call fails.
	#[instrument(skip(root, label, description), fields(label = ?UserText(label)))]
	pub fn mount(root: &A11yRoot, label: &str, description: Option<&str>) -> Result<Self> {
		let document = root.document();
		let element = create_html_element(document, "section")?;
		element.set_attribute("aria-label", label)?;
		element.set_attribute("data-a11y-section", "true")?;

		if let Some(description) = description {
			let paragraph = create_html_element(document, "p")?;
			apply_styles(&paragraph, OFF_SCREEN)?;
			paragraph.set_text_content(Some(description));
			element.append_child(&paragraph)?;
		}

		let host = root.host();
		host.insert_before(&element, root.insertion_point(host).as_ref())?;
		Ok(Self { element })
	}

	#[must_use]
	pub fn element(&self) -> &HtmlElement {
		&self.element
	}
}
impl Drop for Section {
	fn drop(&mut self) {
		self.element.remove()
	}
}
