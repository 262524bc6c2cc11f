//! Weft Pages - document projection and client-side routing
//!
//! Builds on the reactive containers of `weft-core` to turn declarative
//! [`View`] descriptions into live document nodes that update themselves.
//!
//! ## Features
//!
//! - **Direct bindings**: reactive text, attributes and inline style update
//!   their own node only, with no tree diffing
//! - **Structural directives**: [`show`] for conditional content and
//!   [`ForEach`] for keyed lists that keep node identity across reorders
//! - **Routing**: path patterns with parameters, nested router stacks with
//!   persistent layouts, and a History API-backed location store
//! - **Low-level Only**: built on wasm-bindgen, web-sys and js-sys; the same
//!   API runs natively against an in-memory document
//!
//! ## Architecture
//!
//! - [`dom`]: host document abstraction
//! - [`component`]: node descriptions, components and directives
//! - [`projector`]: description to document node projection
//! - [`router`]: location store, path matching, router stacks, links
//! - [`logging`]: development-only diagnostics
//!
//! ## Example
//!
//! ```ignore
//! use weft_pages::prelude::*;
//!
//! let count = State::new(0);
//! let increment = count.clone();
//!
//! let counter = ElementView::new("div")
//!     .child(ElementView::new("p").child("Count: ").child(&count))
//!     .child(
//!         ElementView::new("button")
//!             .on("click", move |_| increment.update(|n| *n += 1))
//!             .child("Increment"),
//!     );
//!
//! render(counter, &body)?;
//! ```

#![warn(missing_docs)]

pub mod component;
pub mod dom;
pub mod logging;
pub mod projector;
pub mod router;

/// Unified prelude for simplified imports.
pub mod prelude {
	pub use crate::component::{
		AttrValue, Component, ElementView, ForEach, IntoView, NodeRef, View, show,
	};
	pub use crate::dom::{Event, Node, document};
	pub use crate::projector::{project, render};
	pub use crate::router::{
		BrowserRouter, LayoutProps, Link, LocationStore, Navigation, Route, RouteProps,
		RouterStack,
	};
	pub use weft_core::{Effect, Owner, State, create_state, on_cleanup, run_effect};
}

pub use component::{
	AttrValue, Binding, Component, Directive, ElementView, ForEach, IntoView, NodeRef,
	ReactiveValue, ResolvedKey, View, show,
};
pub use dom::{Document, DomError, Event, EventHandler, Node, NodeType, document};
pub use projector::{project, render};
pub use router::{
	BrowserRouter, History, LayoutProps, Link, Location, LocationStore, MemoryHistory,
	NavigateOptions, Navigation, PathMatch, Route, RouteCondition, RouteProps, RouteRule,
	RouterError, RouterStack, match_path,
};

/// Installs a panic hook that forwards Rust panics to the browser console.
///
/// Requires the `console_error_panic_hook` feature; without it (or outside
/// the browser) this does nothing. Calling it more than once is harmless.
pub fn install_panic_hook() {
	#[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))]
	console_error_panic_hook::set_once();
}
