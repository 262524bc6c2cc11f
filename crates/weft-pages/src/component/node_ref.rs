//! Handles receiving the node created for an element.

use std::cell::RefCell;
use std::rc::Rc;

use crate::dom::Node;

/// Shared slot that receives the node projected for an element.
///
/// ```ignore
/// let input = NodeRef::new();
/// let view = ElementView::new("input").node_ref(&input);
/// project(view)?;
/// assert!(input.get().is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct NodeRef(Rc<RefCell<Option<Node>>>);

impl NodeRef {
	/// Creates an empty ref.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the node, once the owning element was projected.
	pub fn get(&self) -> Option<Node> {
		self.0.borrow().clone()
	}

	pub(crate) fn set(&self, node: Node) {
		*self.0.borrow_mut() = Some(node);
	}
}
