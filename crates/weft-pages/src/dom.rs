//! DOM abstraction layer.
//!
//! [`Node`] is the single handle type the projector and the directives work
//! with. Its API is identical on both targets:
//!
//! - on `wasm32` it wraps a live `web_sys::Node`
//! - elsewhere it is backed by an in-memory document tree, which is what the
//!   native test suites exercise
//!
//! `==` on nodes is node identity, never structural equality.

#[cfg(not(target_arch = "wasm32"))]
mod memory;
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(not(target_arch = "wasm32"))]
pub use memory::{Document, Event, Node};
#[cfg(target_arch = "wasm32")]
pub use web::{Document, Event, Node};

use std::rc::Rc;

/// Namespace used for `<svg>` and every element created beneath it.
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Namespace of the `xlink:href` attribute inside SVG content.
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

/// Shared event callback registered with [`Node::add_event_listener`].
pub type EventHandler = Rc<dyn Fn(&Event) + 'static>;

/// Error type for host document operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
	/// Window object not available.
	#[error("Window object not available")]
	NoWindow,
	/// Document object not available.
	#[error("Document object not available")]
	NoDocument,
	/// Failed to create an element.
	#[error("Failed to create element <{0}>")]
	CreateElementFailed(String),
	/// The node cannot be inserted at the requested position.
	#[error("Node cannot be inserted at this position")]
	HierarchyRequest,
	/// The reference node is not a child of the target.
	#[error("Reference node is not a child of this node")]
	NotFound,
	/// The operation does not apply to this kind of node.
	#[error("Operation `{0}` is not supported on this node")]
	Unsupported(&'static str),
	/// Any other failure reported by the host.
	#[error("Host error: {0}")]
	Host(String),
}

/// Coarse node classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
	/// An element (HTML or SVG).
	Element,
	/// A text node.
	Text,
	/// A comment, used as a boundary marker by the directives.
	Comment,
	/// A document fragment.
	Fragment,
	/// Anything else the host may hand back.
	Other,
}

/// Returns the document new nodes are created in.
pub fn document() -> Result<Document, DomError> {
	Document::current()
}
