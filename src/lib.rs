//! # Weft
//!
//! A minimal reactive DOM rendering engine with a client-side router.
//!
//! Views are plain descriptions projected once into document nodes. Reactive
//! values are bound directly to the node, attribute or style property that
//! shows them, so an update touches exactly that binding and nothing else.
//!
//! ## Feature Flags
//!
//! - `pages` (default) - Document projection, directives and router
//! - `debug-hooks` - Verbose development logging
//! - `console_error_panic_hook` - Readable panics in the browser console
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use weft::prelude::*;
//!
//! let app = BrowserRouter::new(
//!     RouterStack::new("/").rules(vec![
//!         Route::on("/").render(|_| View::text("Home")),
//!         Route::on("/users/:id").render(|props| {
//!             View::text(format!("User {}", props.param("id").unwrap_or("?")))
//!         }),
//!         Route::not_found().render(|_| View::text("Not found")),
//!     ]),
//! );
//!
//! render(app, &body)?;
//! ```

pub mod core;
#[cfg(feature = "pages")]
pub mod pages;

// Re-export reactive primitives
pub use weft_core::{
	Disposer, Effect, Owner, State, WeakState, create_state, on_cleanup, run_effect,
};

// Re-export projection and routing
#[cfg(feature = "pages")]
pub use weft_pages::{
	BrowserRouter, ElementView, ForEach, IntoView, Link, LocationStore, Route, RouterStack, View,
	render, show,
};

/// Unified prelude for simplified imports.
pub mod prelude {
	pub use weft_core::{Effect, Owner, State, create_state, on_cleanup, run_effect};

	#[cfg(feature = "pages")]
	pub use weft_pages::prelude::*;
}

#[cfg(all(test, feature = "pages", not(target_arch = "wasm32")))]
mod tests {
	use super::prelude::*;
	use rstest::rstest;

	#[rstest]
	fn test_prelude_projects_reactive_text() {
		let name = State::new("weft".to_string());
		let node = project(ElementView::new("p").child(&name)).unwrap();

		name.set("loom".to_string());

		assert_eq!(node.to_html(), "<p>loom</p>");
	}
}
