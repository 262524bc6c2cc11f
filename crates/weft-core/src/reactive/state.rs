//! State - Observable Value Container
//!
//! `State<T>` holds one current value and an insertion-ordered list of
//! subscriber callbacks. Every `set()` replaces the value and synchronously
//! notifies each subscriber with the new value, in subscription order,
//! before returning.
//!
//! ## Notification Rounds
//!
//! The subscriber list is snapshotted when a round starts:
//!
//! - subscribers added during a round are first called on the next round
//! - subscribers disposed during a round are skipped if they have not run yet
//! - a nested `set()` issued by a subscriber runs its own complete round
//!   before the outer round moves on to its remaining subscribers
//!
//! There is no equality check: setting an unchanged value still notifies.
//!
//! ## Example
//!
//! ```ignore
//! use weft_core::reactive::State;
//!
//! let count = State::new(1);
//! let doubled = count.map(|n| n * 2);
//!
//! let _sub = count.subscribe(|n| println!("count is now {n}"));
//!
//! count.set(21);
//! assert_eq!(doubled.get(), 42);
//! ```

use core::cell::{Cell, RefCell};
use core::fmt;

extern crate alloc;
use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;

use super::effect::Trigger;

/// Handle that removes a single subscription when disposed.
///
/// Dropping a `Disposer` without calling [`Disposer::dispose`] leaves the
/// subscription in place; it then lives as long as the container itself.
pub struct Disposer {
	action: Option<Box<dyn FnOnce()>>,
}

impl Disposer {
	/// Wraps an arbitrary teardown action.
	pub fn new<F>(action: F) -> Self
	where
		F: FnOnce() + 'static,
	{
		Self {
			action: Some(Box::new(action)),
		}
	}

	/// A disposer that does nothing.
	pub fn noop() -> Self {
		Self { action: None }
	}

	/// Removes the subscription. Disposing a subscription whose container
	/// is already gone is a no-op.
	pub fn dispose(mut self) {
		if let Some(action) = self.action.take() {
			action();
		}
	}
}

impl fmt::Debug for Disposer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Disposer")
			.field("pending", &self.action.is_some())
			.finish()
	}
}

struct Subscriber<T> {
	id: u64,
	active: Cell<bool>,
	callback: Box<dyn Fn(&T)>,
}

struct Inner<T> {
	value: RefCell<T>,
	subscribers: RefCell<Vec<Rc<Subscriber<T>>>>,
	next_id: Cell<u64>,
	/// Forwarding subscription feeding a derived container, if any.
	upstream: RefCell<Option<Disposer>>,
}

impl<T> Inner<T> {
	fn allocate_id(&self) -> u64 {
		let id = self.next_id.get();
		self.next_id.set(id + 1);
		id
	}

	fn push_subscriber(&self, id: u64, callback: Box<dyn Fn(&T)>) {
		self.subscribers.borrow_mut().push(Rc::new(Subscriber {
			id,
			active: Cell::new(true),
			callback,
		}));
	}

	fn remove_subscriber(&self, id: u64) {
		let mut subscribers = self.subscribers.borrow_mut();
		if let Some(position) = subscribers.iter().position(|s| s.id == id) {
			let removed = subscribers.remove(position);
			removed.active.set(false);
		}
	}
}

/// A boxed, observable value with derived views.
///
/// Cloning a `State` yields another handle to the same value and the same
/// subscriber list.
pub struct State<T: 'static> {
	inner: Rc<Inner<T>>,
}

impl<T: 'static> Clone for State<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<T: 'static> State<T> {
	/// Creates a container holding `value` with no subscribers.
	pub fn new(value: T) -> Self {
		Self {
			inner: Rc::new(Inner {
				value: RefCell::new(value),
				subscribers: RefCell::new(Vec::new()),
				next_id: Cell::new(0),
				upstream: RefCell::new(None),
			}),
		}
	}

	/// Returns a clone of the current value.
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.inner.value.borrow().clone()
	}

	/// Reads the current value by reference.
	///
	/// The value is borrowed for the duration of `f`, so `f` must not call
	/// `set()` or `update()` on this container.
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		f(&self.inner.value.borrow())
	}

	/// Replaces the value and notifies every subscriber with it.
	pub fn set(&self, value: T)
	where
		T: Clone,
	{
		*self.inner.value.borrow_mut() = value.clone();
		self.notify(&value);
	}

	/// Mutates the value in place, then notifies subscribers once.
	pub fn update<F>(&self, f: F)
	where
		T: Clone,
		F: FnOnce(&mut T),
	{
		let value = {
			let mut value = self.inner.value.borrow_mut();
			f(&mut value);
			value.clone()
		};
		self.notify(&value);
	}

	/// Registers `callback` to run after every `set()`.
	///
	/// The returned [`Disposer`] removes exactly this registration, even if
	/// the same closure logic was subscribed more than once.
	pub fn subscribe<F>(&self, callback: F) -> Disposer
	where
		F: Fn(&T) + 'static,
	{
		let id = self.inner.allocate_id();
		self.inner.push_subscriber(id, Box::new(callback));
		let weak = Rc::downgrade(&self.inner);
		Disposer::new(move || {
			if let Some(inner) = weak.upgrade() {
				inner.remove_subscriber(id);
			}
		})
	}

	/// Derives a container whose value is always `f(self)`.
	///
	/// The derived container is kept current by a forwarding subscription on
	/// this container. The forwarding subscription keeps the derived
	/// container alive until [`State::detach`] is called on it.
	pub fn map<R, F>(&self, f: F) -> State<R>
	where
		R: Clone + 'static,
		F: Fn(&T) -> R + 'static,
	{
		let derived = State::new(self.with(&f));
		let target = derived.clone();
		let forwarding = self.subscribe(move |value| target.set(f(value)));
		*derived.inner.upstream.borrow_mut() = Some(forwarding);
		derived
	}

	/// Tears down the forwarding subscription of a derived container.
	///
	/// After this call the container keeps its last value and no longer
	/// follows its source. Has no effect on containers created with
	/// [`State::new`].
	pub fn detach(&self) {
		let upstream = self.inner.upstream.borrow_mut().take();
		if let Some(disposer) = upstream {
			disposer.dispose();
		}
	}

	/// Returns the number of live subscribers.
	pub fn subscriber_count(&self) -> usize {
		self.inner.subscribers.borrow().len()
	}

	/// Returns `true` if both handles refer to the same container.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}

	/// Returns a weak handle that does not keep the container alive.
	pub fn downgrade(&self) -> WeakState<T> {
		WeakState {
			inner: Rc::downgrade(&self.inner),
		}
	}

	fn notify(&self, value: &T) {
		let snapshot: Vec<Rc<Subscriber<T>>> = self.inner.subscribers.borrow().clone();

		#[cfg(feature = "debug-hooks")]
		tracing::trace!(subscribers = snapshot.len(), "state notification round");

		for subscriber in snapshot {
			if subscriber.active.get() {
				(subscriber.callback)(value);
			}
		}
	}
}

impl<T: Default + 'static> Default for State<T> {
	fn default() -> Self {
		Self::new(T::default())
	}
}

impl<T: fmt::Debug + 'static> fmt::Debug for State<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("State")
			.field("value", &*self.inner.value.borrow())
			.field("subscribers", &self.subscriber_count())
			.finish()
	}
}

impl<T: 'static> Trigger for State<T> {
	fn subscribe_trigger(&self, callback: Rc<dyn Fn()>) -> Disposer {
		self.subscribe(move |_| callback())
	}
}

/// Non-owning handle to a [`State`].
pub struct WeakState<T: 'static> {
	inner: Weak<Inner<T>>,
}

impl<T: 'static> WeakState<T> {
	/// Returns the container if it is still alive.
	pub fn upgrade(&self) -> Option<State<T>> {
		self.inner.upgrade().map(|inner| State { inner })
	}
}

impl<T: 'static> Clone for WeakState<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Weak::clone(&self.inner),
		}
	}
}

impl<T: 'static> fmt::Debug for WeakState<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WeakState")
			.field("alive", &(self.inner.strong_count() > 0))
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn recorder<T: Clone + 'static>() -> (Rc<RefCell<Vec<T>>>, impl Fn(&T) + 'static) {
		let seen = Rc::new(RefCell::new(Vec::new()));
		let sink = seen.clone();
		(seen, move |value: &T| sink.borrow_mut().push(value.clone()))
	}

	#[rstest]
	fn test_state_creation() {
		let state = State::new(42);
		assert_eq!(state.get(), 42);
		assert_eq!(state.subscriber_count(), 0);
	}

	#[rstest]
	fn test_state_set_replaces_value() {
		let state = State::new(0);
		state.set(100);
		assert_eq!(state.get(), 100);
	}

	#[rstest]
	fn test_state_clone_shares_value() {
		let first = State::new(String::from("a"));
		let second = first.clone();

		second.set("b".to_string());

		assert_eq!(first.get(), "b");
		assert!(first.ptr_eq(&second));
	}

	#[rstest]
	fn test_subscribers_receive_new_value() {
		let state = State::new(0);
		let (seen, sink) = recorder();
		let _sub = state.subscribe(sink);

		state.set(1);
		state.set(2);

		assert_eq!(*seen.borrow(), vec![1, 2]);
	}

	#[rstest]
	fn test_set_without_change_still_notifies() {
		let state = State::new(7);
		let (seen, sink) = recorder();
		let _sub = state.subscribe(sink);

		state.set(7);
		state.set(7);

		assert_eq!(*seen.borrow(), vec![7, 7]);
	}

	#[rstest]
	fn test_subscribers_run_in_subscription_order() {
		let state = State::new(0);
		let order = Rc::new(RefCell::new(Vec::new()));

		for tag in ["first", "second", "third"] {
			let order = order.clone();
			let _ = state.subscribe(move |_| order.borrow_mut().push(tag));
		}

		state.set(1);

		assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
	}

	#[rstest]
	fn test_subscriber_sees_updated_value_via_get() {
		let state = State::new(0);
		let observed = Rc::new(Cell::new(-1));

		let reader = state.clone();
		let slot = observed.clone();
		let _sub = state.subscribe(move |_| slot.set(reader.get()));

		state.set(5);

		assert_eq!(observed.get(), 5);
	}

	#[rstest]
	fn test_dispose_removes_subscription() {
		let state = State::new(0);
		let (seen, sink) = recorder();
		let sub = state.subscribe(sink);

		state.set(1);
		sub.dispose();
		state.set(2);

		assert_eq!(*seen.borrow(), vec![1]);
		assert_eq!(state.subscriber_count(), 0);
	}

	#[rstest]
	fn test_dispose_removes_only_its_own_registration() {
		let state = State::new(0);
		let hits = Rc::new(Cell::new(0));

		let h1 = hits.clone();
		let first = state.subscribe(move |_| h1.set(h1.get() + 1));
		let h2 = hits.clone();
		let _second = state.subscribe(move |_| h2.set(h2.get() + 10));

		first.dispose();
		state.set(1);

		assert_eq!(hits.get(), 10);
	}

	#[rstest]
	fn test_dispose_after_state_dropped_is_noop() {
		let state = State::new(0);
		let sub = state.subscribe(|_| {});
		drop(state);
		sub.dispose();
	}

	#[rstest]
	fn test_subscriber_added_during_round_waits_for_next_round() {
		let state = State::new(0);
		let late_hits = Rc::new(Cell::new(0));

		let registrar = state.clone();
		let hits = late_hits.clone();
		let added = Rc::new(Cell::new(false));
		let _sub = state.subscribe(move |_| {
			if !added.replace(true) {
				let hits = hits.clone();
				let _ = registrar.subscribe(move |_| hits.set(hits.get() + 1));
			}
		});

		state.set(1);
		assert_eq!(late_hits.get(), 0);

		state.set(2);
		assert_eq!(late_hits.get(), 1);
	}

	#[rstest]
	fn test_subscriber_disposed_during_round_is_skipped() {
		let state = State::new(0);
		let second_hits = Rc::new(Cell::new(0));
		let second_disposer: Rc<RefCell<Option<Disposer>>> = Rc::new(RefCell::new(None));

		let slot = second_disposer.clone();
		let _first = state.subscribe(move |_| {
			if let Some(disposer) = slot.borrow_mut().take() {
				disposer.dispose();
			}
		});
		let hits = second_hits.clone();
		*second_disposer.borrow_mut() = Some(state.subscribe(move |_| hits.set(hits.get() + 1)));

		state.set(1);

		assert_eq!(second_hits.get(), 0);
	}

	#[rstest]
	fn test_nested_set_completes_before_outer_round_continues() {
		let state = State::new(0);
		let log = Rc::new(RefCell::new(Vec::new()));

		let writer = state.clone();
		let first_log = log.clone();
		let _first = state.subscribe(move |v| {
			first_log.borrow_mut().push(("first", *v));
			if *v == 1 {
				writer.set(2);
			}
		});
		let second_log = log.clone();
		let _second = state.subscribe(move |v| second_log.borrow_mut().push(("second", *v)));

		state.set(1);

		assert_eq!(
			*log.borrow(),
			vec![("first", 1), ("first", 2), ("second", 2), ("second", 1)]
		);
		assert_eq!(state.get(), 2);
	}

	#[rstest]
	fn test_update_notifies_once() {
		let state = State::new(vec![1]);
		let (seen, sink) = recorder();
		let _sub = state.subscribe(sink);

		state.update(|v| v.push(2));

		assert_eq!(state.get(), vec![1, 2]);
		assert_eq!(*seen.borrow(), vec![vec![1, 2]]);
	}

	#[rstest]
	fn test_map_initial_value() {
		let state = State::new(3);
		let squared = state.map(|n| n * n);
		assert_eq!(squared.get(), 9);
	}

	#[rstest]
	#[case(0)]
	#[case(-4)]
	#[case(1_000)]
	fn test_map_follows_source(#[case] value: i32) {
		let state = State::new(1);
		let label = state.map(|n| format!("n={n}"));

		state.set(value);

		assert_eq!(label.get(), format!("n={value}"));
	}

	#[rstest]
	fn test_map_chain() {
		let state = State::new(2);
		let doubled = state.map(|n| n * 2);
		let described = doubled.map(|n| n.to_string());

		state.set(10);

		assert_eq!(doubled.get(), 20);
		assert_eq!(described.get(), "20");
	}

	#[rstest]
	fn test_map_outlives_dropped_handle() {
		let state = State::new(1);
		let (seen, sink) = recorder();
		{
			let derived = state.map(|n| n + 100);
			let _sub = derived.subscribe(sink);
		}

		state.set(2);

		assert_eq!(*seen.borrow(), vec![102]);
	}

	#[rstest]
	fn test_detach_stops_forwarding() {
		let state = State::new(1);
		let derived = state.map(|n| n * 10);

		derived.detach();
		state.set(5);

		assert_eq!(derived.get(), 10);
		assert_eq!(state.subscriber_count(), 0);
	}

	#[rstest]
	fn test_weak_state_upgrade() {
		let state = State::new(1);
		let weak = state.downgrade();
		assert!(weak.upgrade().is_some());

		drop(state);
		assert!(weak.upgrade().is_none());
	}

	#[rstest]
	fn test_debug_output() {
		let state = State::new(5);
		let _sub = state.subscribe(|_| {});
		let rendered = format!("{state:?}");
		assert!(rendered.contains("value: 5"));
		assert!(rendered.contains("subscribers: 1"));
	}
}
