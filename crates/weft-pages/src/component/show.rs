//! Conditional rendering directive.
//!
//! The directive owns a range delimited by two comment markers. Whenever the
//! condition is set, everything between the markers is removed; when the new
//! value is `true` a fresh instance is projected and inserted right before
//! the end marker. Nodes that nested directives insert later belong to the
//! range as well, so they go with it.
//!
//! Each instance is projected under its own child [`Owner`]. Clearing the
//! range disposes it, which stops the effects and subscriptions of the
//! instance, nested directives included.

use std::cell::RefCell;
use std::rc::Rc;

use weft_core::{Owner, State, on_cleanup};

use super::into_view::View;
use super::r#trait::Directive;
use crate::dom::{self, DomError, Node};
use crate::projector::project_in;
use crate::{debug_log, error_log};

/// Mounts `content` while `condition` is `true`.
///
/// `content` is called again on every transition to `true`; instances are
/// never cached.
///
/// ```ignore
/// let open = State::new(false);
/// let view = show(open.clone(), || View::text("now you see me"));
/// ```
pub fn show<F>(condition: State<bool>, content: F) -> View
where
	F: Fn() -> View + 'static,
{
	View::directive(Show {
		condition,
		content: Rc::new(content),
	})
}

struct Show {
	condition: State<bool>,
	content: Rc<dyn Fn() -> View>,
}

impl Directive for Show {
	fn mount(&self, svg: bool) -> Result<Node, DomError> {
		let document = dom::document()?;
		let start = document.create_comment("weft-show");
		let end = document.create_comment("/weft-show");
		let fragment = document.create_fragment();

		let parent = Owner::current();
		let instance: Rc<RefCell<Option<Owner>>> = Rc::new(RefCell::new(None));

		fragment.append_child(&start)?;
		if self.condition.get() {
			let owner = Owner::child_of(parent.as_ref());
			let projected = owner.with(|| project_in((self.content)(), svg));
			match projected {
				Ok(node) => {
					fragment.append_child(&node)?;
					*instance.borrow_mut() = Some(owner);
				}
				Err(err) => {
					owner.dispose();
					return Err(err);
				}
			}
		}
		fragment.append_child(&end)?;

		let content = Rc::clone(&self.content);
		let current = Rc::clone(&instance);
		let subscription = self.condition.subscribe(move |visible| {
			release(&current);
			if end.parent().is_none() {
				debug_log!("show: end marker detached, skipping update");
				return;
			}
			clear_between(&start, &end);
			if !*visible {
				return;
			}

			debug_log!("show: mounting content");
			let owner = Owner::child_of(parent.as_ref());
			let mounted = owner.with(|| project_in(content(), svg)).and_then(|node| {
				// A nested toggle may have mounted an instance meanwhile.
				release(&current);
				clear_between(&start, &end);
				let host = end.parent().ok_or(DomError::NotFound)?;
				host.insert_before(&node, Some(&end))
			});
			match mounted {
				Ok(()) => *current.borrow_mut() = Some(owner),
				Err(err) => {
					owner.dispose();
					error_log!("show: failed to mount content: {}", err);
				}
			}
		});

		on_cleanup(move || {
			subscription.dispose();
			release(&instance);
		});

		Ok(fragment)
	}
}

/// Disposes the owner of the mounted instance, if any.
fn release(instance: &RefCell<Option<Owner>>) {
	let owner = instance.borrow_mut().take();
	if let Some(owner) = owner {
		owner.dispose();
	}
}

/// Removes every sibling strictly between `start` and `end`.
fn clear_between(start: &Node, end: &Node) {
	let mut cursor = start.next_sibling();
	while let Some(node) = cursor {
		if &node == end {
			break;
		}
		cursor = node.next_sibling();
		node.remove();
	}
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
	use super::*;
	use crate::component::{ElementView, IntoView};
	use crate::projector::render;
	use rstest::{fixture, rstest};
	use std::cell::Cell;

	#[fixture]
	fn container() -> Node {
		dom::document().unwrap().create_element("div").unwrap()
	}

	#[rstest]
	fn test_initially_hidden(container: Node) {
		let open = State::new(false);
		render(show(open, || View::text("x")), &container).unwrap();
		assert_eq!(container.to_html(), "<div><!--weft-show--><!--/weft-show--></div>");
	}

	#[rstest]
	fn test_initially_visible(container: Node) {
		let open = State::new(true);
		render(show(open, || ElementView::new("p").child("x").into()), &container).unwrap();
		assert_eq!(container.to_html(), "<div><!--weft-show--><p>x</p><!--/weft-show--></div>");
	}

	#[rstest]
	fn test_toggle_mounts_and_unmounts(container: Node) {
		let open = State::new(false);
		render(show(open.clone(), || View::text("x")), &container).unwrap();

		open.set(true);
		assert_eq!(container.text_content(), "x");

		open.set(false);
		assert_eq!(container.text_content(), "");
	}

	#[rstest]
	fn test_repeated_true_replaces_instance(container: Node) {
		let open = State::new(true);
		let renders = Rc::new(Cell::new(0));
		let counter = renders.clone();
		render(
			show(open.clone(), move || {
				counter.set(counter.get() + 1);
				View::text("x")
			}),
			&container,
		)
		.unwrap();

		open.set(true);
		open.set(true);

		assert_eq!(renders.get(), 3);
		assert_eq!(container.text_content(), "x");
	}

	#[rstest]
	fn test_fragment_content_removed_exactly(container: Node) {
		let open = State::new(true);
		render(ElementView::new("h1").child("title"), &container).unwrap();
		render(
			show(open.clone(), || View::fragment(["a", "b", "c"])),
			&container,
		)
		.unwrap();
		render(ElementView::new("footer"), &container).unwrap();

		open.set(false);

		assert_eq!(
			container.to_html(),
			"<div><h1>title</h1><!--weft-show--><!--/weft-show--><footer></footer></div>"
		);
	}

	#[rstest]
	fn test_hidden_instance_is_released(container: Node) {
		let open = State::new(true);
		let label = State::new("a".to_string());
		let source = label.clone();
		render(
			show(open.clone(), move || ElementView::new("p").child(&source).into()),
			&container,
		)
		.unwrap();
		assert_eq!(label.subscriber_count(), 1);

		open.set(false);
		label.set("b".into());

		assert_eq!(label.subscriber_count(), 0);
		assert_eq!(container.text_content(), "");
	}

	#[rstest]
	fn test_replaced_instance_is_released(container: Node) {
		let open = State::new(true);
		let label = State::new("a".to_string());
		let source = label.clone();
		render(show(open.clone(), move || (&source).into_view()), &container).unwrap();

		for _ in 0..4 {
			open.set(true);
		}

		assert_eq!(label.subscriber_count(), 1);
	}

	#[rstest]
	fn test_disposing_owner_stops_show(container: Node) {
		let open = State::new(false);
		let renders = Rc::new(Cell::new(0));
		let counter = renders.clone();
		let owner = Owner::new();
		owner
			.with(|| {
				render(
					show(open.clone(), move || {
						counter.set(counter.get() + 1);
						View::text("x")
					}),
					&container,
				)
			})
			.unwrap();

		owner.dispose();
		open.set(true);

		assert_eq!(renders.get(), 0);
		assert_eq!(open.subscriber_count(), 0);
	}

	#[rstest]
	fn test_detached_end_marker_skips_projection(container: Node) {
		let open = State::new(false);
		let renders = Rc::new(Cell::new(0));
		let counter = renders.clone();
		render(
			show(open.clone(), move || {
				counter.set(counter.get() + 1);
				View::text("x")
			}),
			&container,
		)
		.unwrap();
		let end = container.child_nodes().last().cloned().unwrap();
		end.remove();

		open.set(true);

		assert_eq!(renders.get(), 0);
		assert_eq!(container.to_html(), "<div><!--weft-show--></div>");
	}

	#[rstest]
	#[case(vec![true, false, true, true, false])]
	#[case(vec![false, false, true])]
	#[case(vec![true, true, false, false])]
	fn test_instances_match_latest_value(container: Node, #[case] toggles: Vec<bool>) {
		let open = State::new(false);
		render(show(open.clone(), || ElementView::new("i").into()), &container).unwrap();

		for value in toggles {
			open.set(value);
			let instances = container
				.child_nodes()
				.iter()
				.filter(|n| n.tag_name().as_deref() == Some("i"))
				.count();
			assert_eq!(instances, usize::from(value));
		}
	}
}
