//! Router stack: selects one rule per location and renders it.
//!
//! Each mounted stack keeps two containers, the matched rule and its
//! params, updated by an effect on the store's location:
//!
//! 1. the first rule whose pattern matches wins
//! 2. otherwise the first not-found rule, if any
//! 3. otherwise both containers are cleared
//!
//! The outlet is a [`show`] on "is a rule matched", so a route change
//! re-projects only the outlet content. The layout is called once, when the
//! stack is projected.
//!
//! A stack mounted inside another directive's range belongs to that range's
//! owner: once the range is cleared, the effect stops, pending `then`
//! callbacks are dropped and the navigation context detaches.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use weft_core::{Owner, State, on_cleanup, queue_microtask, run_effect};

use super::location::LocationStore;
use super::navigation::Navigation;
use super::route::{RouteAction, RouteProps, RouteRule};
use crate::component::{Directive, IntoView, View, show};
use crate::debug_log;
use crate::dom::{DomError, Node};
use crate::projector::project_in;

/// Input handed to a stack's layout function.
#[derive(Debug, Clone)]
pub struct LayoutProps {
	/// Where the matched route renders.
	pub outlet: View,
	/// Navigation context of the stack.
	pub navigation: Navigation,
}

type LayoutFn = Rc<dyn Fn(LayoutProps) -> View>;

/// Renders the rule matching the current location.
///
/// ```ignore
/// RouterStack::new("/")
///     .rules(vec![
///         Route::on("/").render(|_| View::text("Home")),
///         Route::on("/about").render(|_| View::text("About")),
///     ])
///     .layout(|props| ElementView::new("main").child(props.outlet).into_view());
/// ```
#[derive(Clone)]
pub struct RouterStack {
	root_path: Rc<str>,
	rules: Rc<[RouteRule]>,
	layout: Option<LayoutFn>,
	store: Option<LocationStore>,
}

impl fmt::Debug for RouterStack {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouterStack")
			.field("root_path", &self.root_path)
			.field("rules", &self.rules)
			.field("has_layout", &self.layout.is_some())
			.finish()
	}
}

impl RouterStack {
	/// Creates a stack without rules. `root_path` is the default `back`
	/// fallback of its navigation context.
	pub fn new(root_path: impl Into<Rc<str>>) -> Self {
		Self {
			root_path: root_path.into(),
			rules: Rc::from(Vec::new()),
			layout: None,
			store: None,
		}
	}

	/// Sets the rules, in priority order.
	pub fn rules(mut self, rules: impl IntoIterator<Item = RouteRule>) -> Self {
		self.rules = rules.into_iter().collect();
		self
	}

	/// Wraps the outlet in a layout rendered once per mount.
	pub fn layout<F>(mut self, layout: F) -> Self
	where
		F: Fn(LayoutProps) -> View + 'static,
	{
		self.layout = Some(Rc::new(layout));
		self
	}

	/// Uses `store` instead of the ambient one.
	pub fn store(mut self, store: LocationStore) -> Self {
		self.store = Some(store);
		self
	}
}

impl IntoView for RouterStack {
	fn into_view(self) -> View {
		View::directive(self)
	}
}

impl Directive for RouterStack {
	fn mount(&self, svg: bool) -> Result<Node, DomError> {
		let store = self.store.clone().unwrap_or_else(LocationStore::ambient);
		store.register_stack();

		let navigation = Navigation::new(store.clone(), Rc::clone(&self.root_path));
		let matched: State<Option<RouteRule>> = State::new(None);
		let params: State<HashMap<String, String>> = State::new(HashMap::new());

		let location = store.location();
		{
			let rules = Rc::clone(&self.rules);
			let current = location.clone();
			let navigation = navigation.clone();
			let matched = matched.clone();
			let params = params.clone();
			let owner = Owner::current();
			// Disposed with the current owner, if any.
			let _effect = run_effect(&[&location], move || {
				let path = current.with(|l| l.path.clone());
				apply_rules(&rules, &path, &navigation, &matched, &params, owner.as_ref());
			});
		}

		let visible = matched.map(Option::is_some);
		{
			let visible = visible.clone();
			on_cleanup(move || visible.detach());
		}

		let outlet = {
			let navigation = navigation.clone();
			let store = store.clone();
			let matched_rule = matched.clone();
			show(visible, move || {
				let Some(rule) = matched_rule.get() else {
					return View::Empty;
				};
				let RouteAction::Render(render) = rule.action() else {
					return View::Empty;
				};
				let content = render(RouteProps {
					params: params.get(),
					navigation: navigation.clone(),
				});
				View::directive(StoreScope {
					store: store.clone(),
					content,
				})
			})
		};

		let view = match &self.layout {
			Some(layout) => layout(LayoutProps {
				outlet,
				navigation,
			}),
			None => outlet,
		};

		let _scope = store.provide();
		project_in(view, svg)
	}
}

fn apply_rules(
	rules: &[RouteRule],
	path: &str,
	navigation: &Navigation,
	matched: &State<Option<RouteRule>>,
	params: &State<HashMap<String, String>>,
	owner: Option<&Owner>,
) {
	let selected = rules
		.iter()
		.find_map(|rule| {
			let result = rule.condition().matches(path);
			result.matches.then(|| (rule, result.params))
		})
		.or_else(|| {
			rules
				.iter()
				.find(|rule| rule.condition().is_not_found())
				.map(|rule| (rule, HashMap::new()))
		});

	let Some((rule, bound)) = selected else {
		debug_log!("router: no rule for {}", path);
		matched.set(None);
		params.set(HashMap::new());
		return;
	};

	params.set(bound.clone());

	match rule.action() {
		RouteAction::Then(callback) => {
			let callback = Rc::clone(callback);
			let navigation = navigation.clone();
			let owner = owner.cloned();
			queue_microtask(move || {
				if owner.as_ref().is_some_and(Owner::is_disposed) {
					debug_log!("router: stack unmounted before its callback ran");
					return;
				}
				callback(&navigation, &bound);
			});
		}
		RouteAction::Render(_) => matched.set(Some(rule.clone())),
	}
}

/// Projects `content` with `store` as the ambient store, so router
/// components inside it attach to the same store.
pub(crate) struct StoreScope {
	pub(crate) store: LocationStore,
	pub(crate) content: View,
}

impl Directive for StoreScope {
	fn mount(&self, svg: bool) -> Result<Node, DomError> {
		let _scope = self.store.provide();
		project_in(self.content.clone(), svg)
	}
}
