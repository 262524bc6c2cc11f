//! Integration tests for Client-Side Router
//!
//! These tests verify the routing system functionality:
//! 1. Path pattern matching with parameters
//! 2. Router stacks selecting and rendering rules
//! 3. Navigation, back fallback and host back/forward
//! 4. Router components (Link, BrowserRouter)

#![cfg(not(target_arch = "wasm32"))]

use rstest::rstest;
use serial_test::serial;
use std::cell::Cell;
use std::rc::Rc;
use weft_core::flush_microtasks;
use weft_pages::prelude::*;
use weft_pages::router::{History, MemoryHistory, NavigateOptions, match_path};
use weft_pages::Event;

fn home_view(_: RouteProps) -> View {
	View::text("Home")
}

fn about_view(_: RouteProps) -> View {
	View::text("About")
}

fn user_view(props: RouteProps) -> View {
	View::text(format!("User {}", props.param("id").unwrap_or("?")))
}

fn container() -> Node {
	document().unwrap().create_element("div").unwrap()
}

fn memory_store(path: &str) -> (LocationStore, Rc<MemoryHistory>) {
	let history = Rc::new(MemoryHistory::new(path));
	(LocationStore::from_rc(history.clone()), history)
}

/// Success Criterion 1: Path pattern matching
#[rstest]
fn test_path_matcher_cases() {
	let user = match_path("/user/:id", "/user/7");
	assert!(user.matches);
	assert_eq!(user.params.get("id").map(String::as_str), Some("7"));

	assert!(!match_path("/user/:id", "/user/7/extra").matches);
	assert!(!match_path("/", "/x").matches);
}

/// Success Criterion 2: Layout is rendered once across route changes
#[rstest]
fn test_layout_rendered_once_across_navigation() {
	let (store, _) = memory_store("/");
	let layout_calls = Rc::new(Cell::new(0));
	let calls = layout_calls.clone();
	let root = container();

	let stack = RouterStack::new("/")
		.rules(vec![
			Route::on("/").render(home_view),
			Route::on("/about").render(about_view),
		])
		.layout(move |props| {
			calls.set(calls.get() + 1);
			ElementView::new("main")
				.child(ElementView::new("nav").child("menu"))
				.child(ElementView::new("section").child(props.outlet))
				.into_view()
		})
		.store(store.clone());
	render(stack, &root).unwrap();
	let nav = root.first_child().unwrap().first_child().unwrap();
	assert_eq!(root.text_content(), "menuHome");

	store.navigate("/about", NavigateOptions::default()).unwrap();

	assert_eq!(root.text_content(), "menuAbout");
	assert_eq!(layout_calls.get(), 1);
	assert_eq!(root.first_child().unwrap().first_child().unwrap(), nav);
}

/// Success Criterion 2: Params reach the rendered view
#[rstest]
fn test_params_injected() {
	let (store, _) = memory_store("/users/42");
	let root = container();

	render(
		RouterStack::new("/")
			.rules(vec![Route::on("/users/:id").render(user_view)])
			.store(store.clone()),
		&root,
	)
	.unwrap();
	assert_eq!(root.text_content(), "User 42");

	store.navigate("/users/7", NavigateOptions::default()).unwrap();
	assert_eq!(root.text_content(), "User 7");
}

/// Success Criterion 3: back() with no pushes replaces with the fallback
#[rstest]
fn test_back_without_pushes_replaces() {
	let (store, history) = memory_store("/deep/link");
	let navigation = Navigation::new(store.clone(), "/");

	navigation.back(None).unwrap();

	assert_eq!(history.entries(), vec!["/"]);
	assert_eq!(history.index(), 0);
	assert_eq!(store.current_path(), "/");
}

/// Success Criterion 3: back() after a push is a real back navigation
#[rstest]
fn test_back_after_push() {
	let (store, history) = memory_store("/");
	let root = container();
	render(
		RouterStack::new("/")
			.rules(vec![
				Route::on("/").render(home_view),
				Route::on("/about").render(about_view),
			])
			.store(store.clone()),
		&root,
	)
	.unwrap();
	let navigation = Navigation::new(store.clone(), "/");

	navigation.push("/about").unwrap();
	navigation.back(None).unwrap();
	assert_eq!(root.text_content(), "About");

	flush_microtasks();

	assert_eq!(root.text_content(), "Home");
	assert_eq!(history.entries(), vec!["/", "/about"]);
	assert_eq!(history.index(), 0);
}

/// Success Criterion 3: host back/forward updates every stack
#[rstest]
fn test_host_pop_updates_stack() {
	let (store, history) = memory_store("/");
	let root = container();
	render(
		RouterStack::new("/")
			.rules(vec![
				Route::on("/").render(home_view),
				Route::on("/about").render(about_view),
			])
			.store(store.clone()),
		&root,
	)
	.unwrap();
	store.navigate("/about", NavigateOptions::default()).unwrap();

	history.back().unwrap();
	flush_microtasks();
	assert_eq!(root.text_content(), "Home");

	history.forward().unwrap();
	flush_microtasks();
	assert_eq!(root.text_content(), "About");
}

/// Success Criterion 4: Link uses the scoped navigation from the layout
#[rstest]
fn test_link_in_layout_navigates() {
	let (store, _) = memory_store("/");
	let root = container();
	render(
		RouterStack::new("/")
			.rules(vec![
				Route::on("/").render(home_view),
				Route::on("/about").render(about_view),
			])
			.layout(|props| {
				View::fragment(vec![
					Link::new("/about", "go").navigation(props.navigation).into_view(),
					props.outlet,
				])
			})
			.store(store.clone()),
		&root,
	)
	.unwrap();

	let anchor = root.first_child().unwrap();
	anchor.dispatch_event(&Event::new("click"));

	assert_eq!(store.current_path(), "/about");
	assert_eq!(root.text_content(), "goAbout");
}

/// Success Criterion 4: Link without navigation uses the enclosing store
#[rstest]
fn test_link_uses_ambient_store() {
	let (store, _) = memory_store("/");
	let root = container();
	render(
		BrowserRouter::new(vec![
			Link::new("/about", "go").into_view(),
			RouterStack::new("/")
				.rules(vec![Route::on("/about").render(about_view)])
				.into_view(),
		])
		.store(store.clone()),
		&root,
	)
	.unwrap();

	let anchor = root.first_child().unwrap().first_child().unwrap();
	anchor.dispatch_event(&Event::new("click"));

	assert_eq!(store.current_path(), "/about");
	assert_eq!(root.text_content(), "goAbout");
}

/// Success Criterion 4: BrowserRouter counts the stacks mounted inside it
#[rstest]
fn test_browser_router_counts_stacks() {
	let (store, _) = memory_store("/");
	render(
		BrowserRouter::new(RouterStack::new("/").rules(vec![Route::on("/").render(home_view)]))
			.store(store.clone()),
		&container(),
	)
	.unwrap();
	flush_microtasks();

	assert_eq!(store.mounted_stacks(), 1);
}

/// The thread's default store is used when nothing is injected
#[rstest]
#[serial(router)]
fn test_default_store() {
	let root = container();
	render(
		BrowserRouter::new(
			RouterStack::new("/").rules(vec![
				Route::on("/").render(home_view),
				Route::on("/about").render(about_view),
				Route::not_found().render(|_| View::text("404")),
			]),
		),
		&root,
	)
	.unwrap();
	let store = LocationStore::global();

	store.navigate("/missing", NavigateOptions::default()).unwrap();
	assert_eq!(root.text_content(), "404");

	store.navigate("/", NavigateOptions::replace()).unwrap();
	assert_eq!(root.text_content(), "Home");
}

/// Nested stacks left behind by navigation stop following the store
#[rstest]
fn test_nested_stack_released_on_navigation() {
	let (store, _) = memory_store("/admin");
	let redirects = Rc::new(Cell::new(0));
	let counter = redirects.clone();
	let root = container();
	let stack = RouterStack::new("/")
		.rules(vec![
			Route::on("/admin").render(move |_| {
				let counter = counter.clone();
				RouterStack::new("/admin")
					.rules(vec![
						Route::on("/admin").render(|_| View::text("dashboard")),
						Route::on("/public").then(move |navigation, _| {
							counter.set(counter.get() + 1);
							let _ = navigation.replace("/admin");
						}),
					])
					.into_view()
			}),
			Route::on("/other").render(about_view),
			Route::on("/public").render(home_view),
		])
		.store(store.clone());
	render(stack, &root).unwrap();
	let baseline = store.location().subscriber_count();

	for _ in 0..5 {
		store.navigate("/other", NavigateOptions::default()).unwrap();
		store.navigate("/admin", NavigateOptions::default()).unwrap();
	}
	assert_eq!(store.location().subscriber_count(), baseline);

	store.navigate("/public", NavigateOptions::default()).unwrap();
	flush_microtasks();

	assert_eq!(redirects.get(), 0);
	assert_eq!(store.current_path(), "/public");
	assert_eq!(root.text_content(), "Home");
}

/// Disposing the owner of a routed tree releases the store
#[rstest]
fn test_owner_disposal_releases_router_tree() {
	let (store, _) = memory_store("/");
	let baseline = store.location().subscriber_count();
	let root = container();
	let owner = Owner::new();
	owner
		.with(|| {
			render(
				BrowserRouter::new(RouterStack::new("/").rules(vec![
					Route::on("/").render(home_view),
					Route::on("/about").render(about_view),
				]))
				.store(store.clone()),
				&root,
			)
		})
		.unwrap();
	assert!(store.location().subscriber_count() > baseline);

	owner.dispose();
	store.navigate("/about", NavigateOptions::default()).unwrap();

	assert_eq!(store.location().subscriber_count(), baseline);
	assert_eq!(root.text_content(), "Home");
}
