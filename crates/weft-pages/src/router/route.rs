//! Route rule builders.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::navigation::Navigation;
use super::pattern::RouteCondition;
use crate::component::View;

/// Input handed to a matched route's render function.
#[derive(Debug, Clone)]
pub struct RouteProps {
	/// Parameters bound by the route pattern.
	pub params: HashMap<String, String>,
	/// Navigation context of the owning stack.
	pub navigation: Navigation,
}

impl RouteProps {
	/// Returns the value bound to `:name`.
	pub fn param(&self, name: &str) -> Option<&str> {
		self.params.get(name).map(String::as_str)
	}
}

type RenderFn = Rc<dyn Fn(RouteProps) -> View>;
type ThenFn = Rc<dyn Fn(&Navigation, &HashMap<String, String>)>;

/// What happens when a rule is selected.
#[derive(Clone)]
pub enum RouteAction {
	/// Render a view into the stack's outlet.
	Render(RenderFn),
	/// Run a callback on the next tick (redirects, logging). The outlet is
	/// left as it was.
	Then(ThenFn),
}

impl fmt::Debug for RouteAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Render(_) => f.write_str("Render(..)"),
			Self::Then(_) => f.write_str("Then(..)"),
		}
	}
}

/// A condition paired with exactly one terminal action.
#[derive(Debug, Clone)]
pub struct RouteRule {
	condition: RouteCondition,
	action: RouteAction,
}

impl RouteRule {
	/// The condition this rule is selected on.
	pub fn condition(&self) -> &RouteCondition {
		&self.condition
	}

	/// The terminal action.
	pub fn action(&self) -> &RouteAction {
		&self.action
	}
}

/// Fluent builder for [`RouteRule`]s.
///
/// # Example
///
/// ```ignore
/// use weft_pages::router::Route;
///
/// let rules = vec![
///     Route::on("/").render(|_| View::text("Home")),
///     Route::on("/legacy").then(|navigation, _| {
///         let _ = navigation.replace("/");
///     }),
///     Route::not_found().render(|_| View::text("404")),
/// ];
/// ```
#[derive(Debug, Clone)]
pub struct Route {
	condition: RouteCondition,
}

impl Route {
	/// Starts a rule for a path pattern such as `/users/:id`.
	pub fn on(pattern: impl Into<String>) -> Self {
		Self {
			condition: RouteCondition::Path(pattern.into()),
		}
	}

	/// Starts the rule used when no path rule matches.
	pub fn not_found() -> Self {
		Self {
			condition: RouteCondition::NotFound,
		}
	}

	/// Renders `view` when selected.
	pub fn render<F>(self, view: F) -> RouteRule
	where
		F: Fn(RouteProps) -> View + 'static,
	{
		RouteRule {
			condition: self.condition,
			action: RouteAction::Render(Rc::new(view)),
		}
	}

	/// Runs `callback` on the next tick when selected.
	pub fn then<F>(self, callback: F) -> RouteRule
	where
		F: Fn(&Navigation, &HashMap<String, String>) + 'static,
	{
		RouteRule {
			condition: self.condition,
			action: RouteAction::Then(Rc::new(callback)),
		}
	}
}
