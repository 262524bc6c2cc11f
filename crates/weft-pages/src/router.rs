//! Client-side routing for weft-pages
//!
//! A [`LocationStore`] holds the current path and keeps it in sync with a
//! [`History`] backend. [`RouterStack`]s observe the store, pick the first
//! [`RouteRule`] whose pattern matches, and render it into an outlet that
//! optionally sits inside a persistent layout.
//!
//! ## Example
//!
//! ```ignore
//! use weft_pages::router::{BrowserRouter, Link, Route, RouterStack};
//!
//! let app = BrowserRouter::new(
//!     RouterStack::new("/")
//!         .rules(vec![
//!             Route::on("/").render(|_| View::text("Home")),
//!             Route::on("/users/:id").render(|props| {
//!                 View::text(format!("User {}", props.param("id").unwrap_or_default()))
//!             }),
//!             Route::on("/old").then(|navigation, _| {
//!                 let _ = navigation.replace("/");
//!             }),
//!             Route::not_found().render(|_| View::text("Not found")),
//!         ])
//!         .layout(|props| {
//!             ElementView::new("main")
//!                 .child(Link::new("/", "Home").navigation(props.navigation.clone()))
//!                 .child(props.outlet)
//!                 .into_view()
//!         }),
//! );
//! ```
//!
//! ## Stores
//!
//! Every router component resolves its store at projection time:
//! an explicitly injected store wins, otherwise the innermost store provided
//! by an enclosing [`BrowserRouter`] or [`RouterStack`], otherwise the
//! thread's default store ([`LocationStore::global`]).

mod components;
mod history;
mod location;
mod navigation;
mod pattern;
mod route;
mod stack;

pub use components::{BrowserRouter, Link};
#[cfg(target_arch = "wasm32")]
pub use history::BrowserHistory;
pub use history::{History, MemoryHistory, PopListener};
pub use location::{Location, LocationStore, NavigateOptions};
pub use navigation::Navigation;
pub use pattern::{PathMatch, RouteCondition, match_path};
pub use route::{Route, RouteAction, RouteProps, RouteRule};
pub use stack::{LayoutProps, RouterStack};

/// Error type for router operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
	/// Window object not available.
	#[error("Window object not available")]
	NoWindow,
	/// The host refused a history operation.
	#[error("Navigation failed: {0}")]
	NavigationFailed(String),
}
