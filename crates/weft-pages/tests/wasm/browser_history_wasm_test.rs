//! Browser tests for the History API backend
//!
//! Run with `wasm-pack test --headless --chrome`.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;
use weft_pages::router::{BrowserHistory, History, LocationStore, NavigateOptions};
use weft_pages::{ElementView, document, render};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_push_updates_window_location() {
	let history = BrowserHistory::new().unwrap();

	history.push("/weft-test/pushed").unwrap();

	assert_eq!(history.current_path(), "/weft-test/pushed");
}

#[wasm_bindgen_test]
fn test_store_replace_keeps_length() {
	let window = web_sys::window().unwrap();
	let length = window.history().unwrap().length().unwrap();
	let store = LocationStore::new(BrowserHistory::new().unwrap());

	store
		.navigate("/weft-test/replaced", NavigateOptions::replace())
		.unwrap();

	assert_eq!(window.history().unwrap().length().unwrap(), length);
	assert_eq!(store.current_path(), "/weft-test/replaced");
}

#[wasm_bindgen_test]
fn test_projection_into_live_document() {
	let body = document().unwrap().create_element("section").unwrap();

	render(ElementView::new("p").attr("id", "weft").child("live"), &body).unwrap();

	assert_eq!(body.text_content(), "live");
	assert_eq!(body.first_child().unwrap().get_attribute("id").as_deref(), Some("weft"));
}
