//! Component and directive trait definitions.

use super::into_view::View;
use crate::dom::{DomError, Node};

/// Trait for reusable UI components.
///
/// Components are re-rendered every time an ancestor is projected; nothing is
/// memoized.
///
/// # Example
///
/// ```ignore
/// use weft_pages::component::{Component, ElementView, IntoView, View};
///
/// struct Greeting {
///     name: String,
/// }
///
/// impl Component for Greeting {
///     fn render(&self) -> View {
///         ElementView::new("p")
///             .attr("class", "greeting")
///             .child(format!("Hello, {}!", self.name))
///             .into_view()
///     }
///
///     fn name() -> &'static str {
///         "Greeting"
///     }
/// }
/// ```
pub trait Component: 'static {
	/// Renders the component to a View.
	fn render(&self) -> View;

	/// Returns the component's name for diagnostics.
	fn name() -> &'static str
	where
		Self: Sized;
}

impl<F> Component for F
where
	F: Fn() -> View + 'static,
{
	fn render(&self) -> View {
		self()
	}

	fn name() -> &'static str {
		"anonymous"
	}
}

/// A view that owns its own piece of the document.
///
/// Directives are mounted lazily by the projector and typically return a
/// fragment holding a boundary marker plus whatever they currently render.
/// They keep themselves current through subscriptions set up in `mount`.
pub trait Directive: 'static {
	/// Creates the directive's nodes. `svg` is true inside SVG content.
	fn mount(&self, svg: bool) -> Result<Node, DomError>;
}
