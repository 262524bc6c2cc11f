//! Owner - Teardown Scopes
//!
//! An `Owner` collects the teardown callbacks of everything created while it
//! is the current owner. Effects register themselves; directives register
//! the subscriptions they make on their inputs. Disposing the owner first
//! disposes its child owners, then runs its own callbacks, newest first.
//!
//! Without a current owner, [`on_cleanup`] drops the callback: the resource
//! then lives as long as the containers it is subscribed to.
//!
//! ## Example
//!
//! ```ignore
//! use weft_core::reactive::{Owner, State, run_effect};
//!
//! let count = State::new(0);
//! let owner = Owner::new();
//! owner.with(|| {
//!     let reader = count.clone();
//!     run_effect(&[&count], move || println!("{}", reader.get()));
//! });
//!
//! owner.dispose(); // the effect no longer runs
//! count.set(1);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type Cleanup = Box<dyn FnOnce()>;

struct OwnerInner {
	cleanups: RefCell<Vec<Cleanup>>,
	children: RefCell<Vec<Weak<OwnerInner>>>,
	disposed: Cell<bool>,
}

thread_local! {
	static CURRENT: RefCell<Vec<Owner>> = const { RefCell::new(Vec::new()) };
}

/// Handle to a teardown scope. Clones refer to the same scope.
#[derive(Clone)]
pub struct Owner(Rc<OwnerInner>);

impl Default for Owner {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for Owner {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Owner")
			.field("cleanups", &self.0.cleanups.borrow().len())
			.field("children", &self.0.children.borrow().len())
			.field("disposed", &self.0.disposed.get())
			.finish()
	}
}

impl Owner {
	/// Creates a root owner, disposed only explicitly.
	pub fn new() -> Self {
		Self(Rc::new(OwnerInner {
			cleanups: RefCell::new(Vec::new()),
			children: RefCell::new(Vec::new()),
			disposed: Cell::new(false),
		}))
	}

	/// The innermost owner entered with [`Owner::with`], if any.
	pub fn current() -> Option<Self> {
		CURRENT.with(|stack| stack.borrow().last().cloned())
	}

	/// Creates an owner disposed together with this one.
	///
	/// The parent only keeps a weak link: a child dropped without being
	/// disposed is forgotten. A child of a disposed owner starts disposed.
	pub fn child(&self) -> Self {
		let child = Self::new();
		if self.is_disposed() {
			child.0.disposed.set(true);
			return child;
		}
		let mut children = self.0.children.borrow_mut();
		children.retain(|weak| weak.strong_count() > 0);
		children.push(Rc::downgrade(&child.0));
		drop(children);
		child
	}

	/// Child of `parent`, or a root owner when there is none.
	pub fn child_of(parent: Option<&Owner>) -> Self {
		parent.map_or_else(Self::new, Self::child)
	}

	/// Runs `f` with this owner as the current one.
	pub fn with<R>(&self, f: impl FnOnce() -> R) -> R {
		CURRENT.with(|stack| stack.borrow_mut().push(self.clone()));
		let _guard = CurrentGuard(());
		f()
	}

	/// Registers `cleanup` to run when this owner is disposed. On an owner
	/// that is already disposed, `cleanup` runs immediately.
	pub fn add_cleanup<F>(&self, cleanup: F)
	where
		F: FnOnce() + 'static,
	{
		if self.is_disposed() {
			cleanup();
			return;
		}
		self.0.cleanups.borrow_mut().push(Box::new(cleanup));
	}

	/// Disposes child owners, then runs the registered callbacks newest
	/// first. Calling this twice is harmless.
	pub fn dispose(&self) {
		if self.0.disposed.replace(true) {
			return;
		}

		#[cfg(feature = "debug-hooks")]
		tracing::trace!(cleanups = self.0.cleanups.borrow().len(), "owner disposed");

		let children = std::mem::take(&mut *self.0.children.borrow_mut());
		for child in children.iter().rev().filter_map(Weak::upgrade) {
			Owner(child).dispose();
		}

		loop {
			let next = self.0.cleanups.borrow_mut().pop();
			match next {
				Some(cleanup) => cleanup(),
				None => break,
			}
		}
	}

	/// Returns `true` once [`Owner::dispose`] ran (on this owner or an
	/// ancestor).
	pub fn is_disposed(&self) -> bool {
		self.0.disposed.get()
	}

	/// Returns `true` if both handles refer to the same owner.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

/// Registers `cleanup` with the current owner.
///
/// Outside of any owner the callback is dropped without running.
pub fn on_cleanup<F>(cleanup: F)
where
	F: FnOnce() + 'static,
{
	if let Some(owner) = Owner::current() {
		owner.add_cleanup(cleanup);
	}
}

/// Pops the owner pushed by [`Owner::with`].
struct CurrentGuard(());

impl Drop for CurrentGuard {
	fn drop(&mut self) {
		CURRENT.with(|stack| {
			stack.borrow_mut().pop();
		});
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn log_into(log: &Rc<RefCell<Vec<&'static str>>>, tag: &'static str) -> impl FnOnce() + 'static {
		let log = log.clone();
		move || log.borrow_mut().push(tag)
	}

	#[rstest]
	fn test_cleanups_run_newest_first() {
		let log = Rc::new(RefCell::new(Vec::new()));
		let owner = Owner::new();
		owner.with(|| {
			on_cleanup(log_into(&log, "first"));
			on_cleanup(log_into(&log, "second"));
		});

		owner.dispose();

		assert_eq!(*log.borrow(), vec!["second", "first"]);
	}

	#[rstest]
	fn test_dispose_twice_runs_once() {
		let log = Rc::new(RefCell::new(Vec::new()));
		let owner = Owner::new();
		owner.add_cleanup(log_into(&log, "once"));

		owner.dispose();
		owner.dispose();

		assert_eq!(log.borrow().len(), 1);
		assert!(owner.is_disposed());
	}

	#[rstest]
	fn test_children_disposed_before_parent_cleanups() {
		let log = Rc::new(RefCell::new(Vec::new()));
		let parent = Owner::new();
		parent.add_cleanup(log_into(&log, "parent"));
		let child = parent.child();
		child.add_cleanup(log_into(&log, "child"));

		parent.dispose();

		assert!(child.is_disposed());
		assert_eq!(*log.borrow(), vec!["child", "parent"]);
	}

	#[rstest]
	fn test_child_disposal_leaves_parent_alive() {
		let parent = Owner::new();
		let child = parent.child();

		child.dispose();

		assert!(!parent.is_disposed());
	}

	#[rstest]
	fn test_dropped_children_are_pruned() {
		let parent = Owner::new();
		for _ in 0..10 {
			let child = parent.child();
			child.dispose();
		}
		let _live = parent.child();

		assert_eq!(parent.0.children.borrow().len(), 1);
	}

	#[rstest]
	fn test_cleanup_on_disposed_owner_runs_immediately() {
		let log = Rc::new(RefCell::new(Vec::new()));
		let owner = Owner::new();
		owner.dispose();

		owner.add_cleanup(log_into(&log, "late"));
		let child = owner.child();

		assert_eq!(*log.borrow(), vec!["late"]);
		assert!(child.is_disposed());
	}

	#[rstest]
	fn test_current_follows_nesting() {
		let outer = Owner::new();
		let inner = Owner::new();
		assert!(Owner::current().is_none());

		outer.with(|| {
			inner.with(|| assert!(Owner::current().is_some_and(|o| o.ptr_eq(&inner))));
			assert!(Owner::current().is_some_and(|o| o.ptr_eq(&outer)));
		});

		assert!(Owner::current().is_none());
	}

	#[rstest]
	fn test_on_cleanup_without_owner_is_dropped() {
		let log = Rc::new(RefCell::new(Vec::new()));
		on_cleanup(log_into(&log, "never"));
		assert!(log.borrow().is_empty());
	}

	#[rstest]
	#[case(None, false)]
	#[case(Some(false), false)]
	#[case(Some(true), true)]
	fn test_child_of(#[case] parent_disposed: Option<bool>, #[case] expect_disposed: bool) {
		let parent = parent_disposed.map(|disposed| {
			let owner = Owner::new();
			if disposed {
				owner.dispose();
			}
			owner
		});

		let child = Owner::child_of(parent.as_ref());

		assert_eq!(child.is_disposed(), expect_disposed);
	}
}
