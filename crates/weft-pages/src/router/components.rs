//! Router Components for navigation.
//!
//! This module provides the Link and BrowserRouter components.

use std::borrow::Cow;

use weft_core::when_ready;

use super::location::{LocationStore, NavigateOptions};
use super::navigation::Navigation;
use super::stack::StoreScope;
use crate::component::{AttrValue, Component, Directive, ElementView, IntoView, View};
use crate::dom::{DomError, Node};
use crate::error_log;

/// A link component that navigates without full page reload.
///
/// Similar to HTML `<a>` but intercepts clicks: the browser's own navigation
/// is suppressed and the path is pushed through the stack's [`Navigation`]
/// when one is given, or through the ambient store otherwise.
///
/// # Example
///
/// ```ignore
/// use weft_pages::router::Link;
///
/// let link = Link::new("/users/42", "View User").class("nav-link");
/// ```
#[derive(Debug, Clone)]
pub struct Link {
	/// The destination path.
	to: String,
	/// Scoped navigation, if any.
	navigation: Option<Navigation>,
	/// Whether to replace the current history entry.
	replace: bool,
	/// Whether to open in a new tab (disables client-side navigation).
	external: bool,
	/// Additional attributes.
	attrs: Vec<(Cow<'static, str>, AttrValue)>,
	/// Link content.
	children: Vec<View>,
}

impl Link {
	/// Creates a new link.
	pub fn new(to: impl Into<String>, content: impl IntoView) -> Self {
		Self {
			to: to.into(),
			navigation: None,
			replace: false,
			external: false,
			attrs: Vec::new(),
			children: vec![content.into_view()],
		}
	}

	/// Navigates through `navigation` instead of the ambient store.
	pub fn navigation(mut self, navigation: Navigation) -> Self {
		self.navigation = Some(navigation);
		self
	}

	/// Sets the CSS class.
	pub fn class(self, class: impl Into<String>) -> Self {
		self.attr("class", class.into())
	}

	/// Sets whether to replace the current history entry.
	pub fn replace(mut self, replace: bool) -> Self {
		self.replace = replace;
		self
	}

	/// Sets whether this is an external link.
	pub fn external(mut self, external: bool) -> Self {
		self.external = external;
		self
	}

	/// Adds a custom attribute.
	pub fn attr(mut self, name: impl Into<Cow<'static, str>>, value: impl Into<AttrValue>) -> Self {
		self.attrs.push((name.into(), value.into()));
		self
	}

	/// Adds more content.
	pub fn child(mut self, child: impl IntoView) -> Self {
		self.children.push(child.into_view());
		self
	}

	/// Returns the destination path.
	pub fn to(&self) -> &str {
		&self.to
	}

	/// Returns whether this is a replace navigation.
	pub fn is_replace(&self) -> bool {
		self.replace
	}

	/// Returns whether this is an external link.
	pub fn is_external(&self) -> bool {
		self.external
	}
}

impl Component for Link {
	fn render(&self) -> View {
		let mut el = ElementView::new("a").attr("href", self.to.clone());

		if self.external {
			el = el.attr("target", "_blank").attr("rel", "noopener noreferrer");
		} else {
			let to = self.to.clone();
			let replace = self.replace;
			let navigation = self.navigation.clone();
			// Resolved now, while the enclosing router is still projecting.
			let store = LocationStore::ambient();
			el = el.on("click", move |event| {
				event.prevent_default();
				let result = match (&navigation, replace) {
					(Some(navigation), false) => navigation.push(&to),
					(Some(navigation), true) => navigation.replace(&to),
					(None, replace) => store.navigate(&to, NavigateOptions { replace }),
				};
				if let Err(err) = result {
					error_log!("Link: navigation to {} failed: {}", to, err);
				}
			});
		}

		for (name, value) in &self.attrs {
			el = el.attr(name.clone(), value.clone());
		}

		el.children(self.children.clone()).into_view()
	}

	fn name() -> &'static str {
		"Link"
	}
}

impl IntoView for Link {
	fn into_view(self) -> View {
		View::component(self)
	}
}

/// Root of a routed application.
///
/// Provides its store to everything projected inside it and, once the
/// projection pass is over, reports through `error_log!` when no
/// [`RouterStack`](super::RouterStack) was mounted below it. The content is
/// rendered either way.
///
/// ```ignore
/// let app = BrowserRouter::new(RouterStack::new("/").rules(rules));
/// render(app, &body)?;
/// ```
#[derive(Debug, Clone)]
pub struct BrowserRouter {
	content: View,
	store: Option<LocationStore>,
}

impl BrowserRouter {
	/// Creates a router around `content`. Several children are wrapped in a
	/// `<div>`.
	pub fn new(content: impl IntoView) -> Self {
		let content = match content.into_view() {
			View::Fragment(mut children) if children.len() == 1 => children.remove(0),
			View::Fragment(children) => ElementView::new("div").children(children).into_view(),
			other => other,
		};
		Self {
			content,
			store: None,
		}
	}

	/// Uses `store` instead of the thread's default store.
	pub fn store(mut self, store: LocationStore) -> Self {
		self.store = Some(store);
		self
	}
}

impl IntoView for BrowserRouter {
	fn into_view(self) -> View {
		View::directive(self)
	}
}

impl Directive for BrowserRouter {
	fn mount(&self, svg: bool) -> Result<Node, DomError> {
		let store = self.store.clone().unwrap_or_else(LocationStore::ambient);
		store.reset_stacks();

		let node = StoreScope {
			store: store.clone(),
			content: self.content.clone(),
		}
		.mount(svg)?;

		when_ready(move || {
			if store.mounted_stacks() == 0 {
				error_log!("BrowserRouter: no RouterStack found inside the router tree; add a RouterStack");
			}
		});

		Ok(node)
	}
}
