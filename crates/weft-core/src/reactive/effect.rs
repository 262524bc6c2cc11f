//! Effect - Explicit-Dependency Side Effects
//!
//! An `Effect` runs its callback once immediately and again every time one
//! of its declared dependencies changes. There is no batching: if three
//! dependencies are each `set()` once, the callback runs three times, each
//! run synchronous with the `set()` that caused it.
//!
//! Dependencies are declared up front as a slice of [`Trigger`]s rather than
//! tracked automatically. The callback receives no argument; it reads the
//! containers it captured. [`Effect::watch`] covers the common
//! single-dependency case and hands the new value to its callback.
//!
//! An effect created while an [`Owner`](super::Owner) is current is disposed
//! together with that owner.
//!
//! ## Example
//!
//! ```ignore
//! use weft_core::reactive::{State, run_effect};
//!
//! let first = State::new(String::from("Ada"));
//! let last = State::new(String::from("Lovelace"));
//!
//! let effect = run_effect(&[&first, &last], {
//!     let (first, last) = (first.clone(), last.clone());
//!     move || println!("{} {}", first.get(), last.get())
//! });
//!
//! last.set("Byron".into()); // prints "Ada Byron"
//! effect.dispose();
//! ```

use core::cell::RefCell;
use core::fmt;

extern crate alloc;
use alloc::rc::Rc;
use alloc::vec::Vec;

use super::owner::on_cleanup;
use super::state::{Disposer, State};

/// Something an [`Effect`] can depend on.
///
/// Implemented by [`State`]; the trait erases the value type so one effect
/// can depend on containers of different types.
pub trait Trigger {
	/// Calls `callback` after every change until the returned disposer runs.
	fn subscribe_trigger(&self, callback: Rc<dyn Fn()>) -> Disposer;
}

/// Handle to a running effect.
///
/// Dropping the handle leaves the effect subscribed; call
/// [`Effect::dispose`] or dispose its owner to stop it.
pub struct Effect {
	disposers: Rc<RefCell<Vec<Disposer>>>,
}

impl Effect {
	/// Runs `f` now and again whenever any of `deps` changes.
	pub fn new<F>(deps: &[&dyn Trigger], f: F) -> Self
	where
		F: FnMut() + 'static,
	{
		let run = guarded(f);
		run();

		let disposers = deps
			.iter()
			.map(|dep| dep.subscribe_trigger(Rc::clone(&run)))
			.collect();

		Self::owned(disposers)
	}

	/// Runs `f` with the current value of `state`, then with every new value.
	pub fn watch<T, F>(state: &State<T>, f: F) -> Self
	where
		T: Clone + 'static,
		F: FnMut(&T) + 'static,
	{
		let f = Rc::new(RefCell::new(f));

		let initial = state.get();
		(f.borrow_mut())(&initial);

		let disposer = state.subscribe(move |value| match f.try_borrow_mut() {
			Ok(mut f) => f(value),
			Err(_) => tracing::warn!("effect re-triggered itself while running; nested run skipped"),
		});

		Self::owned(alloc::vec![disposer])
	}

	fn owned(disposers: Vec<Disposer>) -> Self {
		let disposers = Rc::new(RefCell::new(disposers));
		let registered = Rc::clone(&disposers);
		on_cleanup(move || dispose_all(&registered));
		Self { disposers }
	}

	/// Unsubscribes from every dependency. Calling this twice is harmless.
	pub fn dispose(&self) {
		dispose_all(&self.disposers);
	}

	/// Returns `true` once [`Effect::dispose`] has run (or if the effect
	/// was created without dependencies).
	pub fn is_disposed(&self) -> bool {
		self.disposers.borrow().is_empty()
	}
}

impl fmt::Debug for Effect {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Effect")
			.field("dependencies", &self.disposers.borrow().len())
			.finish()
	}
}

/// Runs `f` immediately and whenever any of `deps` changes.
///
/// Shorthand for [`Effect::new`].
pub fn run_effect<F>(deps: &[&dyn Trigger], f: F) -> Effect
where
	F: FnMut() + 'static,
{
	Effect::new(deps, f)
}

fn dispose_all(disposers: &RefCell<Vec<Disposer>>) {
	let disposers = core::mem::take(&mut *disposers.borrow_mut());
	for disposer in disposers {
		disposer.dispose();
	}
}

fn guarded<F>(f: F) -> Rc<dyn Fn()>
where
	F: FnMut() + 'static,
{
	let f = RefCell::new(f);
	Rc::new(move || match f.try_borrow_mut() {
		Ok(mut f) => f(),
		Err(_) => tracing::warn!("effect re-triggered itself while running; nested run skipped"),
	})
}
