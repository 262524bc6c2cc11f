//! Browser document backend built on `web-sys`.

use std::fmt;

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;

use super::{DomError, EventHandler, NodeType, SVG_NAMESPACE};

fn host_error(value: JsValue) -> DomError {
	DomError::Host(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

/// Handle to a live browser node.
#[derive(Clone, PartialEq, Eq)]
pub struct Node(web_sys::Node);

impl fmt::Debug for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Node").field(&self.0.node_name()).finish()
	}
}

impl From<web_sys::Node> for Node {
	fn from(node: web_sys::Node) -> Self {
		Self(node)
	}
}

impl Node {
	/// Returns the wrapped `web_sys::Node`.
	pub fn as_web_sys(&self) -> &web_sys::Node {
		&self.0
	}

	fn element(&self) -> Option<&web_sys::Element> {
		self.0.dyn_ref::<web_sys::Element>()
	}

	fn require_element(&self, operation: &'static str) -> Result<&web_sys::Element, DomError> {
		self.element().ok_or(DomError::Unsupported(operation))
	}

	/// Returns the node classification.
	pub fn node_type(&self) -> NodeType {
		match self.0.node_type() {
			web_sys::Node::ELEMENT_NODE => NodeType::Element,
			web_sys::Node::TEXT_NODE => NodeType::Text,
			web_sys::Node::COMMENT_NODE => NodeType::Comment,
			web_sys::Node::DOCUMENT_FRAGMENT_NODE => NodeType::Fragment,
			_ => NodeType::Other,
		}
	}

	/// Returns the tag name of an element.
	pub fn tag_name(&self) -> Option<String> {
		self.element().map(|el| el.tag_name().to_lowercase())
	}

	/// Returns the namespace of an element.
	pub fn namespace_uri(&self) -> Option<String> {
		self.element().and_then(|el| el.namespace_uri())
	}

	/// Returns the parent node, if attached.
	pub fn parent(&self) -> Option<Node> {
		self.0.parent_node().map(Node)
	}

	/// Returns the following sibling.
	pub fn next_sibling(&self) -> Option<Node> {
		self.0.next_sibling().map(Node)
	}

	/// Returns the first child.
	pub fn first_child(&self) -> Option<Node> {
		self.0.first_child().map(Node)
	}

	/// Returns a snapshot of the child list.
	pub fn child_nodes(&self) -> Vec<Node> {
		let list = self.0.child_nodes();
		(0..list.length()).filter_map(|i| list.item(i)).map(Node).collect()
	}

	/// Appends `child`, moving it from its previous parent if needed.
	pub fn append_child(&self, child: &Node) -> Result<(), DomError> {
		self.0.append_child(&child.0).map(|_| ()).map_err(host_error)
	}

	/// Inserts `child` before `reference` (or at the end when `None`).
	pub fn insert_before(&self, child: &Node, reference: Option<&Node>) -> Result<(), DomError> {
		self.0
			.insert_before(&child.0, reference.map(|r| &r.0))
			.map(|_| ())
			.map_err(host_error)
	}

	/// Detaches the node from its parent. Detached nodes are left untouched.
	pub fn remove(&self) {
		if let Some(parent) = self.0.parent_node() {
			let _ = parent.remove_child(&self.0);
		}
	}

	/// Concatenated text of the node and its descendants.
	pub fn text_content(&self) -> String {
		self.0.text_content().unwrap_or_default()
	}

	/// Replaces the node's text.
	pub fn set_text_content(&self, text: &str) {
		self.0.set_text_content(Some(text));
	}

	/// Sets (or overwrites) an attribute.
	pub fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomError> {
		self.require_element("set_attribute")?
			.set_attribute(name, value)
			.map_err(host_error)
	}

	/// Sets a namespaced attribute such as `xlink:href`.
	pub fn set_attribute_ns(&self, namespace: &str, name: &str, value: &str) -> Result<(), DomError> {
		self.require_element("set_attribute_ns")?
			.set_attribute_ns(Some(namespace), name, value)
			.map_err(host_error)
	}

	/// Removes an attribute. Removing a missing attribute is a no-op.
	pub fn remove_attribute(&self, name: &str) -> Result<(), DomError> {
		self.require_element("remove_attribute")?
			.remove_attribute(name)
			.map_err(host_error)
	}

	/// Reads an attribute value.
	pub fn get_attribute(&self, name: &str) -> Option<String> {
		self.element().and_then(|el| el.get_attribute(name))
	}

	/// Returns `true` if the attribute is present.
	pub fn has_attribute(&self, name: &str) -> bool {
		self.element().is_some_and(|el| el.has_attribute(name))
	}

	// HTML and SVG elements both expose `style`, but only HtmlElement has a
	// typed accessor for it.
	fn style_object(&self, operation: &'static str) -> Result<JsValue, DomError> {
		let element = self.require_element(operation)?;
		js_sys::Reflect::get(element, &JsValue::from_str("style")).map_err(host_error)
	}

	/// Assigns one inline style property (kebab-case or camelCase).
	pub fn set_style(&self, property: &str, value: &str) -> Result<(), DomError> {
		let style = self.style_object("set_style")?;
		if property.contains('-') {
			let declaration: web_sys::CssStyleDeclaration = style.unchecked_into();
			return declaration.set_property(property, value).map_err(host_error);
		}
		js_sys::Reflect::set(&style, &JsValue::from_str(property), &JsValue::from_str(value))
			.map(|_| ())
			.map_err(host_error)
	}

	/// Reads one inline style property.
	pub fn style(&self, property: &str) -> Option<String> {
		let style = self.style_object("style").ok()?;
		js_sys::Reflect::get(&style, &JsValue::from_str(property))
			.ok()
			.and_then(|v| v.as_string())
			.filter(|v| !v.is_empty())
	}

	/// Tries to assign a native element property.
	///
	/// Returns `false` when the element has no such property, or when the
	/// assignment throws, so the caller can fall back to an attribute.
	pub fn assign_property(&self, name: &str, value: &str) -> bool {
		let Some(element) = self.element() else {
			return false;
		};
		if element.namespace_uri().as_deref() == Some(SVG_NAMESPACE) {
			return false;
		}
		let key = JsValue::from_str(name);
		if !js_sys::Reflect::has(element, &key).unwrap_or(false) {
			return false;
		}
		js_sys::Reflect::set(element, &key, &JsValue::from_str(value)).unwrap_or(false)
	}

	/// Reads a native element property as a string.
	pub fn property(&self, name: &str) -> Option<String> {
		js_sys::Reflect::get(&self.0, &JsValue::from_str(name))
			.ok()
			.and_then(|v| v.as_string())
	}

	/// Registers a listener for `event_type`.
	///
	/// The underlying closure is leaked so it lives as long as the page.
	pub fn add_event_listener(&self, event_type: &str, handler: EventHandler) -> Result<(), DomError> {
		let name = event_type.to_string();
		let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |raw: web_sys::Event| {
			handler(&Event::from_raw(raw, name.clone()));
		});
		self.0
			.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())
			.map_err(host_error)?;
		closure.forget();
		Ok(())
	}
}

/// Factory for browser nodes, bound to `window.document`.
#[derive(Debug, Clone)]
pub struct Document(web_sys::Document);

impl Document {
	pub(super) fn current() -> Result<Self, DomError> {
		let window = web_sys::window().ok_or(DomError::NoWindow)?;
		window.document().map(Self).ok_or(DomError::NoDocument)
	}

	/// Creates an HTML element.
	pub fn create_element(&self, tag: &str) -> Result<Node, DomError> {
		self.0
			.create_element(tag)
			.map(|el| Node(el.into()))
			.map_err(|_| DomError::CreateElementFailed(tag.to_string()))
	}

	/// Creates an element in `namespace`.
	pub fn create_element_ns(&self, namespace: &str, tag: &str) -> Result<Node, DomError> {
		self.0
			.create_element_ns(Some(namespace), tag)
			.map(|el| Node(el.into()))
			.map_err(|_| DomError::CreateElementFailed(tag.to_string()))
	}

	/// Creates a text node.
	pub fn create_text_node(&self, text: &str) -> Node {
		Node(self.0.create_text_node(text).into())
	}

	/// Creates a comment node.
	pub fn create_comment(&self, text: &str) -> Node {
		Node(self.0.create_comment(text).into())
	}

	/// Creates an empty document fragment.
	pub fn create_fragment(&self) -> Node {
		Node(self.0.create_document_fragment().into())
	}
}

/// A browser event delivered to an [`EventHandler`].
#[derive(Debug)]
pub struct Event {
	raw: web_sys::Event,
	event_type: String,
}

impl Event {
	fn from_raw(raw: web_sys::Event, event_type: String) -> Self {
		Self { raw, event_type }
	}

	/// Returns the event type, e.g. `"click"`.
	pub fn event_type(&self) -> &str {
		&self.event_type
	}

	/// Cancels the host's default action.
	pub fn prevent_default(&self) {
		self.raw.prevent_default();
	}

	/// Returns `true` once the default action was cancelled.
	pub fn default_prevented(&self) -> bool {
		self.raw.default_prevented()
	}

	/// Returns the wrapped `web_sys::Event`.
	pub fn as_web_sys(&self) -> &web_sys::Event {
		&self.raw
	}
}
