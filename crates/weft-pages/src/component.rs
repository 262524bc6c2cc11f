//! Component System for weft-pages
//!
//! Node descriptions ([`View`]), the [`Component`] trait, and the two
//! structural directives built on top of them.
//!
//! ## Features
//!
//! - **View enum**: elements, components, realized nodes, static and reactive
//!   text, fragments and directives
//! - **ElementView builder**: static and reactive attributes, inline style,
//!   event handlers, node refs
//! - **show**: mount/unmount a subtree from a boolean container
//! - **ForEach**: keyed list reconciliation preserving node identity
//!
//! ## Usage
//!
//! ```ignore
//! use weft_pages::component::{ElementView, View, show};
//! use weft_core::State;
//!
//! let open = State::new(false);
//! let panel = ElementView::new("section")
//!     .attr("class", "panel")
//!     .child(show(open.clone(), || ElementView::new("p").child("Hello").into_view()));
//! ```

mod for_each;
mod into_view;
mod node_ref;
mod show;
mod r#trait;

pub use for_each::{ForEach, ItemsSource, ResolvedKey};
pub use into_view::{AttrValue, Binding, ElementView, IntoView, ReactiveValue, View};
pub use node_ref::NodeRef;
pub use show::show;
pub use r#trait::{Component, Directive};
