//! Projection of [`View`] descriptions onto document nodes.
//!
//! [`project`] walks a description once and returns the node it produced.
//! Reactive text, reactive attributes and reactive style properties are
//! applied once and then kept current by subscriptions on their containers.
//! Nothing else is re-evaluated: subtrees change only through directives.
//!
//! ## Teardown
//!
//! Every subscription made while projecting is registered with the current
//! [`Owner`](weft_core::Owner). Directives give each range they mount its
//! own child owner and dispose it when the range is cleared. To release a
//! whole tree, project it inside [`Owner::with`](weft_core::Owner::with)
//! and dispose that owner.
//!
//! ## SVG
//!
//! An `<svg>` element and everything below it is created in the SVG
//! namespace. The context is inherited by children and by directives, and
//! `xlink:href` is set as a namespaced attribute inside it.

use weft_core::on_cleanup;

use crate::component::{AttrValue, Binding, ElementView, IntoView, ReactiveValue, View};
use crate::dom::{self, DomError, Node, SVG_NAMESPACE, XLINK_NAMESPACE};
use crate::error_log;

/// Projects a view into a detached document node.
///
/// Fragments and directives project to document fragments; inserting the
/// result into a parent moves their children.
pub fn project(view: impl IntoView) -> Result<Node, DomError> {
	project_in(view.into_view(), false)
}

/// Projects `view` and appends the result to `container`.
pub fn render(view: impl IntoView, container: &Node) -> Result<Node, DomError> {
	let node = project(view)?;
	container.append_child(&node)?;
	Ok(node)
}

/// Projects `view` with an explicit SVG context.
pub(crate) fn project_in(view: View, svg: bool) -> Result<Node, DomError> {
	let document = dom::document()?;
	match view {
		View::Component(component) => project_in(component.render(), svg),
		View::Node(node) => Ok(node),
		View::Reactive(value) => Ok(reactive_text(&document, &value)),
		View::Text(text) => Ok(document.create_text_node(&text)),
		View::Empty => Ok(document.create_text_node("")),
		View::Fragment(children) => {
			let fragment = document.create_fragment();
			for child in children {
				fragment.append_child(&project_in(child, svg)?)?;
			}
			Ok(fragment)
		}
		View::Directive(directive) => directive.mount(svg),
		View::Element(element) => project_element(&document, element, svg),
	}
}

fn reactive_text(document: &dom::Document, value: &ReactiveValue<String>) -> Node {
	let node = document.create_text_node(&value.get());
	let target = node.clone();
	let subscription = value.subscribe(move |text| target.set_text_content(&text));
	on_cleanup(move || subscription.dispose());
	node
}

fn project_element(document: &dom::Document, element: ElementView, svg: bool) -> Result<Node, DomError> {
	let ElementView {
		tag,
		attrs,
		styles,
		node_ref,
		handlers,
		children,
	} = element;

	let svg = svg || tag == "svg";
	let node = if svg {
		document.create_element_ns(SVG_NAMESPACE, &tag)?
	} else {
		document.create_element(&tag)?
	};

	if let Some(node_ref) = node_ref {
		node_ref.set(node.clone());
	}

	for (property, value) in styles {
		match value {
			Binding::Static(value) => node.set_style(&property, &value)?,
			Binding::Reactive(bound) => {
				node.set_style(&property, &bound.get())?;
				let target = node.clone();
				let subscription = bound.subscribe(move |value| {
					if let Err(err) = target.set_style(&property, &value) {
						error_log!("style `{}` update failed: {}", property, err);
					}
				});
				on_cleanup(move || subscription.dispose());
			}
		}
	}

	for (name, value) in attrs {
		match value {
			Binding::Static(value) => apply_attribute(&node, &name, &value, svg)?,
			Binding::Reactive(bound) => {
				apply_attribute(&node, &name, &bound.get(), svg)?;
				let target = node.clone();
				let subscription = bound.subscribe(move |value| {
					if let Err(err) = apply_attribute(&target, &name, &value, svg) {
						error_log!("attribute `{}` update failed: {}", name, err);
					}
				});
				on_cleanup(move || subscription.dispose());
			}
		}
	}

	for (event, handler) in handlers {
		node.add_event_listener(&event, handler)?;
	}

	for child in children {
		node.append_child(&project_in(child, svg)?)?;
	}

	Ok(node)
}

/// Applies one attribute value.
///
/// Strings are assigned as native properties when the element has one by
/// that name, and set as attributes otherwise.
fn apply_attribute(node: &Node, name: &str, value: &AttrValue, svg: bool) -> Result<(), DomError> {
	match value {
		AttrValue::Bool(true) => node.set_attribute(name, ""),
		AttrValue::Bool(false) | AttrValue::None => node.remove_attribute(name),
		AttrValue::Text(text) if svg && name == "xlink:href" => {
			node.set_attribute_ns(XLINK_NAMESPACE, name, text)
		}
		AttrValue::Text(text) => {
			if node.assign_property(name, text) {
				Ok(())
			} else {
				node.set_attribute(name, text)
			}
		}
	}
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
	use super::*;
	use crate::component::NodeRef;
	use crate::dom::NodeType;
	use rstest::rstest;
	use weft_core::{Owner, State};

	#[rstest]
	fn test_text_and_empty() {
		let text = project("hello").unwrap();
		let empty = project(View::Empty).unwrap();

		assert_eq!(text.node_type(), NodeType::Text);
		assert_eq!(text.text_content(), "hello");
		assert_eq!(empty.node_type(), NodeType::Text);
		assert_eq!(empty.text_content(), "");
	}

	#[rstest]
	fn test_node_passes_through() {
		let existing = dom::document().unwrap().create_comment("keep");
		let projected = project(existing.clone()).unwrap();
		assert_eq!(projected, existing);
	}

	#[rstest]
	fn test_bool_attributes() {
		let node = project(
			ElementView::new("button")
				.bool_attr("disabled", true)
				.bool_attr("hidden", false)
				.attr("title", AttrValue::None),
		)
		.unwrap();

		assert_eq!(node.get_attribute("disabled").as_deref(), Some(""));
		assert!(!node.has_attribute("hidden"));
		assert!(!node.has_attribute("title"));
	}

	#[rstest]
	fn test_native_property_preferred() {
		let node = project(ElementView::new("input").attr("value", "typed")).unwrap();

		assert_eq!(node.property("value").as_deref(), Some("typed"));
		assert!(!node.has_attribute("value"));
	}

	#[rstest]
	fn test_svg_context_is_inherited() {
		let node = project(
			ElementView::new("svg").child(
				ElementView::new("use").attr("xlink:href", "#icon"),
			),
		)
		.unwrap();
		let child = node.first_child().unwrap();

		assert_eq!(node.namespace_uri().as_deref(), Some(SVG_NAMESPACE));
		assert_eq!(child.namespace_uri().as_deref(), Some(SVG_NAMESPACE));
		assert_eq!(
			child.get_attribute_namespace("xlink:href").as_deref(),
			Some(XLINK_NAMESPACE)
		);
	}

	#[rstest]
	fn test_node_ref_receives_element() {
		let node_ref = NodeRef::new();
		let node = project(ElementView::new("div").node_ref(&node_ref)).unwrap();
		assert_eq!(node_ref.get(), Some(node));
	}

	#[rstest]
	fn test_component_expanded_on_each_projection() {
		let calls = std::rc::Rc::new(std::cell::Cell::new(0));
		let counter = calls.clone();
		let view = View::component(move || {
			counter.set(counter.get() + 1);
			View::text("c")
		});

		project(view.clone()).unwrap();
		project(view).unwrap();

		assert_eq!(calls.get(), 2);
	}

	#[rstest]
	fn test_reactive_bindings_follow_state() {
		let label = State::new("one".to_string());
		let width = State::new(10);
		let disabled = State::new(false);

		let node = project(
			ElementView::new("button")
				.bind("disabled", &disabled)
				.bind_style("width", &width)
				.child(&label),
		)
		.unwrap();
		label.set("two".into());
		width.set(20);
		disabled.set(true);

		assert_eq!(node.text_content(), "two");
		assert_eq!(node.get_attribute("disabled").as_deref(), Some(""));
		assert_eq!(node.style("width").as_deref(), Some("20"));
	}

	#[rstest]
	fn test_owner_disposal_releases_bindings() {
		let label = State::new("one".to_string());
		let disabled = State::new(false);
		let owner = Owner::new();

		let node = owner
			.with(|| {
				project(
					ElementView::new("button")
						.bind("disabled", &disabled)
						.child(&label),
				)
			})
			.unwrap();
		assert_eq!(label.subscriber_count(), 1);
		assert_eq!(disabled.subscriber_count(), 1);

		owner.dispose();
		label.set("two".into());
		disabled.set(true);

		assert_eq!(label.subscriber_count(), 0);
		assert_eq!(disabled.subscriber_count(), 0);
		assert_eq!(node.text_content(), "one");
		assert!(!node.has_attribute("disabled"));
	}

	#[rstest]
	fn test_render_appends() {
		let container = dom::document().unwrap().create_element("main").unwrap();
		render(vec!["a", "b"], &container).unwrap();
		assert_eq!(container.to_html(), "<main>ab</main>");
	}
}
