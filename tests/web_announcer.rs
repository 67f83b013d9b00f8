#![cfg(target_arch = "wasm32")]

use a11y_scene_dom::{A11yRoot, AnnouncerConfig, Politeness, RootConfig};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

mod web_renderer_;
use web_renderer_::{init_logging, TestRenderer};

wasm_bindgen_test_configure!(run_in_browser);

fn mount_root(politeness: Politeness) -> (std::rc::Rc<TestRenderer>, A11yRoot) {
	init_logging();
	let renderer = TestRenderer::new();
	let root = A11yRoot::mount(
		renderer.clone(),
		RootConfig {
			read_location_hash: false,
			announcer: AnnouncerConfig {
				politeness,
				..AnnouncerConfig::default()
			},
			..RootConfig::default()
		},
	)
	.unwrap();
	(renderer, root)
}

#[wasm_bindgen_test]
fn live_region_attributes() {
	let (_renderer, root) = mount_root(Politeness::Polite);
	let region = root.live_region();
	assert_eq!(region.get_attribute("aria-live").as_deref(), Some("polite"));
	assert_eq!(region.get_attribute("aria-atomic").as_deref(), Some("true"));
	assert_eq!(region.style().get_property_value("position").unwrap(), "absolute");
	assert!(root.host().contains(Some(region.as_ref())));

	let (_renderer, root) = mount_root(Politeness::Assertive);
	assert_eq!(root.live_region().get_attribute("aria-live").as_deref(), Some("assertive"));
}

#[wasm_bindgen_test]
fn announcements_reach_the_region() {
	let (_renderer, root) = mount_root(Politeness::Polite);
	root.announcer().announce("Door opened");
	assert_eq!(root.live_region().text_content().as_deref(), Some("Door opened"));

	root.announcer().reannounce("Door opened");
	assert_eq!(root.live_region().text_content().as_deref(), Some(""));
}

#[wasm_bindgen_test]
fn region_is_removed_with_the_root() {
	let (_renderer, root) = mount_root(Politeness::Polite);
	let region = root.live_region().clone();
	let announcer = root.announcer().clone();
	drop(root);
	assert!(!region.is_connected());

	announcer.announce("Nobody listens");
	assert_eq!(region.text_content().as_deref(), Some(""));
}
