//! Reactive document projection and client-side routing
//!
//! This module provides access to weft-pages.
//!
//! ## Architecture
//!
//! - **Projection**: view descriptions become live nodes with direct,
//!   per-node reactive bindings
//! - **Directives**: `show` for conditional content, `ForEach` for keyed lists
//! - **Routing**: History API-based location store and router stacks
//!
//! ## Example
//!
//! ```rust,ignore
//! use weft::pages::prelude::*;
//!
//! pub fn todo_list(items: State<Vec<Rc<Todo>>>) -> View {
//!     ElementView::new("ul")
//!         .child(
//!             ForEach::new(items, |todo, _| ElementView::new("li").child(todo.title.clone()).into_view())
//!                 .key(|todo| Some(todo.id)),
//!         )
//!         .into_view()
//! }
//! ```

// Re-export all weft-pages functionality
pub use weft_pages::*;
