//! In-memory document used on non-browser targets.
//!
//! Mirrors the subset of DOM semantics weft relies on: parent/child links,
//! ordered children, fragment insertion moving the fragment's children,
//! attributes, inline style, a few live properties, and event listeners.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use super::{DomError, EventHandler, NodeType, SVG_NAMESPACE};

/// Properties that exist as live, non-reflected element properties on HTML
/// elements. Anything else falls back to an attribute.
const ASSIGNABLE_PROPERTIES: &[&str] = &["value", "checked", "selected", "indeterminate"];

enum Kind {
	Element {
		tag: String,
		namespace: Option<String>,
	},
	Text,
	Comment,
	Fragment,
}

struct Attribute {
	namespace: Option<String>,
	name: String,
	value: String,
}

struct NodeData {
	kind: Kind,
	parent: RefCell<Weak<NodeData>>,
	children: RefCell<Vec<Node>>,
	data: RefCell<String>,
	attributes: RefCell<Vec<Attribute>>,
	style: RefCell<Vec<(String, String)>>,
	properties: RefCell<Vec<(String, String)>>,
	listeners: RefCell<Vec<(String, EventHandler)>>,
}

/// Handle to a node of the in-memory document.
#[derive(Clone)]
pub struct Node(Rc<NodeData>);

impl PartialEq for Node {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

impl Eq for Node {}

impl fmt::Debug for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.0.kind {
			Kind::Element { tag, .. } => f
				.debug_struct("Node")
				.field("element", tag)
				.field("children", &self.0.children.borrow().len())
				.finish(),
			Kind::Text => f.debug_tuple("Text").field(&*self.0.data.borrow()).finish(),
			Kind::Comment => f.debug_tuple("Comment").field(&*self.0.data.borrow()).finish(),
			Kind::Fragment => f
				.debug_struct("Fragment")
				.field("children", &self.0.children.borrow().len())
				.finish(),
		}
	}
}

impl Node {
	fn from_kind(kind: Kind, data: &str) -> Self {
		Self(Rc::new(NodeData {
			kind,
			parent: RefCell::new(Weak::new()),
			children: RefCell::new(Vec::new()),
			data: RefCell::new(data.to_string()),
			attributes: RefCell::new(Vec::new()),
			style: RefCell::new(Vec::new()),
			properties: RefCell::new(Vec::new()),
			listeners: RefCell::new(Vec::new()),
		}))
	}

	/// Returns the node classification.
	pub fn node_type(&self) -> NodeType {
		match self.0.kind {
			Kind::Element { .. } => NodeType::Element,
			Kind::Text => NodeType::Text,
			Kind::Comment => NodeType::Comment,
			Kind::Fragment => NodeType::Fragment,
		}
	}

	/// Returns the tag name of an element.
	pub fn tag_name(&self) -> Option<String> {
		match &self.0.kind {
			Kind::Element { tag, .. } => Some(tag.clone()),
			_ => None,
		}
	}

	/// Returns the namespace of an element created with one.
	pub fn namespace_uri(&self) -> Option<String> {
		match &self.0.kind {
			Kind::Element { namespace, .. } => namespace.clone(),
			_ => None,
		}
	}

	/// Returns the parent node, if attached.
	pub fn parent(&self) -> Option<Node> {
		self.0.parent.borrow().upgrade().map(Node)
	}

	/// Returns the following sibling.
	pub fn next_sibling(&self) -> Option<Node> {
		let parent = self.parent()?;
		let children = parent.0.children.borrow();
		let index = children.iter().position(|c| c == self)?;
		children.get(index + 1).cloned()
	}

	/// Returns the first child.
	pub fn first_child(&self) -> Option<Node> {
		self.0.children.borrow().first().cloned()
	}

	/// Returns a snapshot of the child list.
	pub fn child_nodes(&self) -> Vec<Node> {
		self.0.children.borrow().clone()
	}

	/// Appends `child`, moving it from its previous parent if needed.
	pub fn append_child(&self, child: &Node) -> Result<(), DomError> {
		self.insert_before(child, None)
	}

	/// Inserts `child` before `reference` (or at the end when `None`).
	///
	/// Inserting a fragment moves its children and leaves it empty.
	pub fn insert_before(&self, child: &Node, reference: Option<&Node>) -> Result<(), DomError> {
		if !matches!(self.0.kind, Kind::Element { .. } | Kind::Fragment) {
			return Err(DomError::HierarchyRequest);
		}
		if child.is_inclusive_ancestor_of(self) {
			return Err(DomError::HierarchyRequest);
		}
		if let Some(reference) = reference
			&& reference.parent().as_ref() != Some(self)
		{
			return Err(DomError::NotFound);
		}

		// Inserting a node before itself means "before its next sibling".
		let reference = match reference {
			Some(r) if r == child => child.next_sibling(),
			other => other.cloned(),
		};

		let incoming = if matches!(child.0.kind, Kind::Fragment) {
			let moved = std::mem::take(&mut *child.0.children.borrow_mut());
			for node in &moved {
				*node.0.parent.borrow_mut() = Weak::new();
			}
			moved
		} else {
			child.detach();
			vec![child.clone()]
		};

		let mut children = self.0.children.borrow_mut();
		let index = match &reference {
			Some(r) => children
				.iter()
				.position(|c| c == r)
				.ok_or(DomError::NotFound)?,
			None => children.len(),
		};
		for (offset, node) in incoming.into_iter().enumerate() {
			*node.0.parent.borrow_mut() = Rc::downgrade(&self.0);
			children.insert(index + offset, node);
		}
		Ok(())
	}

	/// Detaches the node from its parent. Detached nodes are left untouched.
	pub fn remove(&self) {
		self.detach();
	}

	fn detach(&self) {
		let parent = self.0.parent.replace(Weak::new()).upgrade();
		if let Some(parent) = parent {
			parent.children.borrow_mut().retain(|c| c != self);
		}
	}

	fn is_inclusive_ancestor_of(&self, other: &Node) -> bool {
		let mut current = Some(other.clone());
		while let Some(node) = current {
			if &node == self {
				return true;
			}
			current = node.parent();
		}
		false
	}

	/// Concatenated text of the node and its descendants (comments excluded).
	pub fn text_content(&self) -> String {
		match self.0.kind {
			Kind::Text | Kind::Comment => self.0.data.borrow().clone(),
			Kind::Element { .. } | Kind::Fragment => {
				let mut out = String::new();
				self.collect_text(&mut out);
				out
			}
		}
	}

	fn collect_text(&self, out: &mut String) {
		for child in self.0.children.borrow().iter() {
			match child.0.kind {
				Kind::Text => out.push_str(&child.0.data.borrow()),
				Kind::Comment => {}
				Kind::Element { .. } | Kind::Fragment => child.collect_text(out),
			}
		}
	}

	/// Replaces the text of a text/comment node, or every child of an element.
	pub fn set_text_content(&self, text: &str) {
		match self.0.kind {
			Kind::Text | Kind::Comment => *self.0.data.borrow_mut() = text.to_string(),
			Kind::Element { .. } | Kind::Fragment => {
				for child in self.child_nodes() {
					child.detach();
				}
				if !text.is_empty() {
					let node = Node::from_kind(Kind::Text, text);
					*node.0.parent.borrow_mut() = Rc::downgrade(&self.0);
					self.0.children.borrow_mut().push(node);
				}
			}
		}
	}

	fn require_element(&self, operation: &'static str) -> Result<(), DomError> {
		match self.0.kind {
			Kind::Element { .. } => Ok(()),
			_ => Err(DomError::Unsupported(operation)),
		}
	}

	/// Sets (or overwrites) an attribute.
	pub fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomError> {
		self.set_attribute_inner(None, name, value, "set_attribute")
	}

	/// Sets a namespaced attribute such as `xlink:href`.
	pub fn set_attribute_ns(&self, namespace: &str, name: &str, value: &str) -> Result<(), DomError> {
		self.set_attribute_inner(Some(namespace), name, value, "set_attribute_ns")
	}

	fn set_attribute_inner(
		&self,
		namespace: Option<&str>,
		name: &str,
		value: &str,
		operation: &'static str,
	) -> Result<(), DomError> {
		self.require_element(operation)?;
		let mut attributes = self.0.attributes.borrow_mut();
		match attributes.iter_mut().find(|a| a.name == name) {
			Some(existing) => {
				existing.value = value.to_string();
				existing.namespace = namespace.map(str::to_string);
			}
			None => attributes.push(Attribute {
				namespace: namespace.map(str::to_string),
				name: name.to_string(),
				value: value.to_string(),
			}),
		}
		Ok(())
	}

	/// Removes an attribute. Removing a missing attribute is a no-op.
	pub fn remove_attribute(&self, name: &str) -> Result<(), DomError> {
		self.require_element("remove_attribute")?;
		self.0.attributes.borrow_mut().retain(|a| a.name != name);
		Ok(())
	}

	/// Reads an attribute value.
	pub fn get_attribute(&self, name: &str) -> Option<String> {
		self.0
			.attributes
			.borrow()
			.iter()
			.find(|a| a.name == name)
			.map(|a| a.value.clone())
	}

	/// Returns the namespace an attribute was set with.
	pub fn get_attribute_namespace(&self, name: &str) -> Option<String> {
		self.0
			.attributes
			.borrow()
			.iter()
			.find(|a| a.name == name)
			.and_then(|a| a.namespace.clone())
	}

	/// Returns `true` if the attribute is present.
	pub fn has_attribute(&self, name: &str) -> bool {
		self.get_attribute(name).is_some()
	}

	/// Assigns one inline style property.
	pub fn set_style(&self, property: &str, value: &str) -> Result<(), DomError> {
		self.require_element("set_style")?;
		let mut style = self.0.style.borrow_mut();
		match style.iter_mut().find(|(k, _)| k == property) {
			Some((_, existing)) => *existing = value.to_string(),
			None => style.push((property.to_string(), value.to_string())),
		}
		Ok(())
	}

	/// Reads one inline style property.
	pub fn style(&self, property: &str) -> Option<String> {
		self.0
			.style
			.borrow()
			.iter()
			.find(|(k, _)| k == property)
			.map(|(_, v)| v.clone())
	}

	/// Tries to assign a native element property.
	///
	/// Returns `false` when the element has no assignable property of that
	/// name (SVG elements have none), in which case the caller should fall
	/// back to [`Node::set_attribute`].
	pub fn assign_property(&self, name: &str, value: &str) -> bool {
		let Kind::Element { namespace, .. } = &self.0.kind else {
			return false;
		};
		if namespace.as_deref() == Some(SVG_NAMESPACE) || !ASSIGNABLE_PROPERTIES.contains(&name) {
			return false;
		}
		let mut properties = self.0.properties.borrow_mut();
		match properties.iter_mut().find(|(k, _)| k == name) {
			Some((_, existing)) => *existing = value.to_string(),
			None => properties.push((name.to_string(), value.to_string())),
		}
		true
	}

	/// Reads a native element property previously assigned.
	pub fn property(&self, name: &str) -> Option<String> {
		self.0
			.properties
			.borrow()
			.iter()
			.find(|(k, _)| k == name)
			.map(|(_, v)| v.clone())
	}

	/// Registers a listener for `event_type`.
	pub fn add_event_listener(&self, event_type: &str, handler: EventHandler) -> Result<(), DomError> {
		self.0
			.listeners
			.borrow_mut()
			.push((event_type.to_string(), handler));
		Ok(())
	}

	/// Invokes every listener registered for the event's type on this node.
	///
	/// Events do not bubble in the in-memory document. Returns `false` if a
	/// listener called [`Event::prevent_default`].
	pub fn dispatch_event(&self, event: &Event) -> bool {
		let handlers: Vec<EventHandler> = self
			.0
			.listeners
			.borrow()
			.iter()
			.filter(|(name, _)| name == event.event_type())
			.map(|(_, handler)| Rc::clone(handler))
			.collect();
		for handler in handlers {
			handler(event);
		}
		!event.default_prevented()
	}

	/// Serializes the subtree, including comment markers.
	pub fn to_html(&self) -> String {
		let mut out = String::new();
		self.write_html(&mut out);
		out
	}

	fn write_html(&self, out: &mut String) {
		match &self.0.kind {
			Kind::Text => out.push_str(&escape(&self.0.data.borrow())),
			Kind::Comment => {
				out.push_str("<!--");
				out.push_str(&self.0.data.borrow());
				out.push_str("-->");
			}
			Kind::Fragment => {
				for child in self.0.children.borrow().iter() {
					child.write_html(out);
				}
			}
			Kind::Element { tag, .. } => {
				out.push('<');
				out.push_str(tag);
				for attribute in self.0.attributes.borrow().iter() {
					out.push(' ');
					out.push_str(&attribute.name);
					if !attribute.value.is_empty() {
						out.push_str("=\"");
						out.push_str(&escape(&attribute.value));
						out.push('"');
					}
				}
				let style = self.0.style.borrow();
				if !style.is_empty() {
					out.push_str(" style=\"");
					for (property, value) in style.iter() {
						out.push_str(property);
						out.push_str(": ");
						out.push_str(&escape(value));
						out.push(';');
					}
					out.push('"');
				}
				out.push('>');
				for child in self.0.children.borrow().iter() {
					child.write_html(out);
				}
				out.push_str("</");
				out.push_str(tag);
				out.push('>');
			}
		}
	}
}

fn escape(text: &str) -> String {
	text.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
}

/// Factory for in-memory nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Document;

impl Document {
	pub(super) fn current() -> Result<Self, DomError> {
		Ok(Self)
	}

	/// Creates an HTML element.
	pub fn create_element(&self, tag: &str) -> Result<Node, DomError> {
		if tag.is_empty() {
			return Err(DomError::CreateElementFailed(tag.to_string()));
		}
		Ok(Node::from_kind(
			Kind::Element {
				tag: tag.to_string(),
				namespace: None,
			},
			"",
		))
	}

	/// Creates an element in `namespace`.
	pub fn create_element_ns(&self, namespace: &str, tag: &str) -> Result<Node, DomError> {
		if tag.is_empty() {
			return Err(DomError::CreateElementFailed(tag.to_string()));
		}
		Ok(Node::from_kind(
			Kind::Element {
				tag: tag.to_string(),
				namespace: Some(namespace.to_string()),
			},
			"",
		))
	}

	/// Creates a text node.
	pub fn create_text_node(&self, text: &str) -> Node {
		Node::from_kind(Kind::Text, text)
	}

	/// Creates a comment node.
	pub fn create_comment(&self, text: &str) -> Node {
		Node::from_kind(Kind::Comment, text)
	}

	/// Creates an empty document fragment.
	pub fn create_fragment(&self) -> Node {
		Node::from_kind(Kind::Fragment, "")
	}
}

/// A dispatched event.
#[derive(Debug)]
pub struct Event {
	event_type: String,
	default_prevented: Cell<bool>,
}

impl Event {
	/// Creates a cancelable event of the given type.
	pub fn new(event_type: impl Into<String>) -> Self {
		Self {
			event_type: event_type.into(),
			default_prevented: Cell::new(false),
		}
	}

	/// Returns the event type, e.g. `"click"`.
	pub fn event_type(&self) -> &str {
		&self.event_type
	}

	/// Cancels the host's default action.
	pub fn prevent_default(&self) {
		self.default_prevented.set(true);
	}

	/// Returns `true` once a listener called [`Event::prevent_default`].
	pub fn default_prevented(&self) -> bool {
		self.default_prevented.get()
	}
}
