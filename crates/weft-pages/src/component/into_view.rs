//! IntoView trait and View enum for component rendering.

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use weft_core::{Disposer, State};

use super::node_ref::NodeRef;
use super::r#trait::{Component, Directive};
use crate::dom::{Event, EventHandler, Node};

/// Value of an element attribute.
///
/// `Bool(true)` renders a valueless attribute, `Bool(false)` and `None`
/// remove it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
	/// A string value, assigned as a native property when one exists.
	Text(String),
	/// Presence flag.
	Bool(bool),
	/// Absent.
	None,
}

impl From<&str> for AttrValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for AttrValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<bool> for AttrValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::None, Into::into)
	}
}

/// A container read through a conversion.
///
/// Nothing is subscribed until the projector calls
/// [`ReactiveValue::subscribe`], so a view that is never projected leaves
/// its source untouched.
pub struct ReactiveValue<R: 'static> {
	current: Rc<dyn Fn() -> R>,
	watch: Rc<dyn Fn(Box<dyn Fn(R)>) -> Disposer>,
}

impl<R: 'static> ReactiveValue<R> {
	/// Reads `state` through `convert`.
	pub fn new<T, F>(state: &State<T>, convert: F) -> Self
	where
		T: 'static,
		F: Fn(&T) -> R + 'static,
	{
		let convert = Rc::new(convert);
		let (source, read) = (state.clone(), Rc::clone(&convert));
		let current = Rc::new(move || source.with(|value| (*read)(value)));
		let source = state.clone();
		let watch = Rc::new(move |callback: Box<dyn Fn(R)>| {
			let convert = Rc::clone(&convert);
			source.subscribe(move |value| callback((*convert)(value)))
		});
		Self { current, watch }
	}

	/// The converted current value.
	pub fn get(&self) -> R {
		(self.current)()
	}

	/// Calls `callback` with the converted value after every change.
	pub fn subscribe(&self, callback: impl Fn(R) + 'static) -> Disposer {
		(self.watch)(Box::new(callback))
	}
}

impl<R: 'static> Clone for ReactiveValue<R> {
	fn clone(&self) -> Self {
		Self {
			current: Rc::clone(&self.current),
			watch: Rc::clone(&self.watch),
		}
	}
}

impl<R: fmt::Debug + 'static> fmt::Debug for ReactiveValue<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ReactiveValue").field(&self.get()).finish()
	}
}

/// A prop that is either fixed or follows a state container.
#[derive(Debug, Clone)]
pub enum Binding<T: 'static> {
	/// Applied once.
	Static(T),
	/// Applied once, then re-applied on every change.
	Reactive(ReactiveValue<T>),
}

/// A unified representation of renderable content.
///
/// View is the node description the projector consumes. It can represent
/// elements, components, already realized nodes, static or reactive text,
/// fragments and directives.
#[derive(Clone)]
pub enum View {
	/// An element.
	Element(ElementView),
	/// A component, rendered on every projection.
	Component(Rc<dyn Component>),
	/// A realized document node, passed through unchanged.
	Node(Node),
	/// A text node.
	Text(Cow<'static, str>),
	/// A text node kept in sync with a container.
	Reactive(ReactiveValue<String>),
	/// Several views without a wrapper element.
	Fragment(Vec<View>),
	/// A directive that manages its own nodes.
	Directive(Rc<dyn Directive>),
	/// Renders as an empty text node.
	Empty,
}

impl fmt::Debug for View {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Element(el) => f.debug_tuple("Element").field(el).finish(),
			Self::Component(_) => f.write_str("Component(..)"),
			Self::Node(node) => f.debug_tuple("Node").field(node).finish(),
			Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
			Self::Reactive(value) => f.debug_tuple("Reactive").field(value).finish(),
			Self::Fragment(children) => f.debug_tuple("Fragment").field(children).finish(),
			Self::Directive(_) => f.write_str("Directive(..)"),
			Self::Empty => f.write_str("Empty"),
		}
	}
}

impl View {
	/// Creates an element view.
	pub fn element(tag: impl Into<Cow<'static, str>>) -> ElementView {
		ElementView::new(tag)
	}

	/// Creates a text view.
	pub fn text(text: impl Into<Cow<'static, str>>) -> Self {
		Self::Text(text.into())
	}

	/// Wraps a component (or any `Fn() -> View` closure).
	pub fn component(component: impl Component) -> Self {
		Self::Component(Rc::new(component))
	}

	/// Wraps a directive.
	pub fn directive(directive: impl Directive) -> Self {
		Self::Directive(Rc::new(directive))
	}

	/// Creates a fragment from anything that converts to views.
	pub fn fragment<I, V>(children: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: IntoView,
	{
		Self::Fragment(children.into_iter().map(IntoView::into_view).collect())
	}

	/// Returns `true` for [`View::Empty`].
	pub fn is_empty(&self) -> bool {
		matches!(self, Self::Empty)
	}
}

/// Description of one element.
#[derive(Clone)]
pub struct ElementView {
	pub(crate) tag: Cow<'static, str>,
	pub(crate) attrs: Vec<(Cow<'static, str>, Binding<AttrValue>)>,
	pub(crate) styles: Vec<(Cow<'static, str>, Binding<String>)>,
	pub(crate) node_ref: Option<NodeRef>,
	pub(crate) handlers: Vec<(Cow<'static, str>, EventHandler)>,
	pub(crate) children: Vec<View>,
}

impl fmt::Debug for ElementView {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ElementView")
			.field("tag", &self.tag)
			.field("attrs", &self.attrs)
			.field("styles", &self.styles)
			.field("children", &self.children)
			.field("event_handlers_count", &self.handlers.len())
			.finish()
	}
}

impl ElementView {
	/// Creates a new element view.
	pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
		Self {
			tag: tag.into(),
			attrs: Vec::new(),
			styles: Vec::new(),
			node_ref: None,
			handlers: Vec::new(),
			children: Vec::new(),
		}
	}

	/// Returns the tag name.
	pub fn tag(&self) -> &str {
		&self.tag
	}

	/// Adds an attribute.
	pub fn attr(mut self, name: impl Into<Cow<'static, str>>, value: impl Into<AttrValue>) -> Self {
		self.attrs.push((name.into(), Binding::Static(value.into())));
		self
	}

	/// Adds a boolean attribute (present when `value` is true).
	pub fn bool_attr(self, name: impl Into<Cow<'static, str>>, value: bool) -> Self {
		self.attr(name, AttrValue::Bool(value))
	}

	/// Binds an attribute to a container.
	pub fn bind<V>(mut self, name: impl Into<Cow<'static, str>>, state: &State<V>) -> Self
	where
		V: Clone + Into<AttrValue> + 'static,
	{
		let bound = ReactiveValue::new(state, |value: &V| value.clone().into());
		self.attrs.push((name.into(), Binding::Reactive(bound)));
		self
	}

	/// Sets one inline style property.
	pub fn style(mut self, property: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
		self.styles.push((property.into(), Binding::Static(value.into())));
		self
	}

	/// Binds one inline style property to a container.
	pub fn bind_style<V>(mut self, property: impl Into<Cow<'static, str>>, state: &State<V>) -> Self
	where
		V: fmt::Display + 'static,
	{
		let bound = ReactiveValue::new(state, |value: &V| value.to_string());
		self.styles.push((property.into(), Binding::Reactive(bound)));
		self
	}

	/// Stores the created node in `node_ref`.
	pub fn node_ref(mut self, node_ref: &NodeRef) -> Self {
		self.node_ref = Some(node_ref.clone());
		self
	}

	/// Registers an event listener.
	pub fn on<F>(mut self, event: impl Into<Cow<'static, str>>, handler: F) -> Self
	where
		F: Fn(&Event) + 'static,
	{
		self.handlers.push((event.into(), Rc::new(handler)));
		self
	}

	/// Adds a child view.
	pub fn child(mut self, child: impl IntoView) -> Self {
		self.children.push(child.into_view());
		self
	}

	/// Adds multiple child views.
	pub fn children<I, V>(mut self, children: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: IntoView,
	{
		self.children
			.extend(children.into_iter().map(IntoView::into_view));
		self
	}
}

/// Trait for types that can be converted into a View.
pub trait IntoView {
	/// Converts this type into a View.
	fn into_view(self) -> View;
}

impl IntoView for View {
	fn into_view(self) -> View {
		self
	}
}

impl IntoView for ElementView {
	fn into_view(self) -> View {
		View::Element(self)
	}
}

impl From<ElementView> for View {
	fn from(element: ElementView) -> Self {
		Self::Element(element)
	}
}

impl IntoView for Node {
	fn into_view(self) -> View {
		View::Node(self)
	}
}

impl IntoView for &'static str {
	fn into_view(self) -> View {
		View::Text(Cow::Borrowed(self))
	}
}

impl IntoView for String {
	fn into_view(self) -> View {
		View::Text(Cow::Owned(self))
	}
}

impl IntoView for Cow<'static, str> {
	fn into_view(self) -> View {
		View::Text(self)
	}
}

impl<T: fmt::Display + 'static> IntoView for State<T> {
	fn into_view(self) -> View {
		(&self).into_view()
	}
}

impl<T: fmt::Display + 'static> IntoView for &State<T> {
	fn into_view(self) -> View {
		View::Reactive(ReactiveValue::new(self, |value: &T| value.to_string()))
	}
}

impl<V: IntoView> IntoView for Vec<V> {
	fn into_view(self) -> View {
		View::fragment(self)
	}
}

impl<V: IntoView> IntoView for Option<V> {
	fn into_view(self) -> View {
		self.map_or(View::Empty, IntoView::into_view)
	}
}

impl IntoView for () {
	fn into_view(self) -> View {
		View::Empty
	}
}
