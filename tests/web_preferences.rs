#![cfg(target_arch = "wasm32")]

use a11y_scene_dom::preferences::{Preference, PreferenceWatcher};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::window;

mod web_renderer_;
use web_renderer_::init_logging;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn reads_media_queries() {
	init_logging();
	let window = window().unwrap();
	let watcher = PreferenceWatcher::new(&window).unwrap();

	for &preference in &Preference::ALL {
		let matches = window.match_media(preference.media_query()).unwrap().map_or(false, |list| list.matches());
		assert_eq!(watcher.current().get(preference), matches);
	}

	let _subscription = watcher.subscribe(|_| ());
}
