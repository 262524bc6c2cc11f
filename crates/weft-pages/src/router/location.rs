//! The observable current location.
//!
//! A [`LocationStore`] owns one `State<Location>` and the [`History`] it is
//! synchronized with:
//!
//! - host back/forward navigations update the state without adding entries
//! - [`LocationStore::navigate`] updates the host history first, then the
//!   state
//!
//! Stores are explicit values. Applications normally use the thread's
//! default store ([`LocationStore::global`]) and never name one; tests and
//! embedded hosts construct their own with [`LocationStore::new`] and inject
//! it into [`BrowserRouter`](super::BrowserRouter) or
//! [`RouterStack`](super::RouterStack).

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use weft_core::State;

use super::RouterError;
use super::history::{History, MemoryHistory};
use crate::debug_log;

/// The current location.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
	/// Path component, e.g. `/users/7`.
	pub path: String,
}

/// Options for [`LocationStore::navigate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigateOptions {
	/// Replace the current history entry instead of pushing a new one.
	pub replace: bool,
}

impl NavigateOptions {
	/// Options for a replacing navigation.
	pub fn replace() -> Self {
		Self { replace: true }
	}
}

struct StoreInner {
	location: State<Location>,
	history: Rc<dyn History>,
	/// Entries pushed through this store that `back` has not consumed yet.
	pushes: Cell<usize>,
	/// Router stacks mounted since the last `BrowserRouter` projection.
	mounted_stacks: Cell<usize>,
}

/// Shared handle to a location store. Clones refer to the same store.
#[derive(Clone)]
pub struct LocationStore(Rc<StoreInner>);

impl fmt::Debug for LocationStore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LocationStore")
			.field("path", &self.0.location.with(|l| l.path.clone()))
			.field("pushes", &self.0.pushes.get())
			.field("mounted_stacks", &self.0.mounted_stacks.get())
			.finish()
	}
}

thread_local! {
	static GLOBAL: RefCell<Option<LocationStore>> = const { RefCell::new(None) };
	static AMBIENT: RefCell<Vec<LocationStore>> = const { RefCell::new(Vec::new()) };
}

impl LocationStore {
	/// Creates a store seeded from `history` and following its back/forward
	/// navigations.
	pub fn new(history: impl History + 'static) -> Self {
		Self::from_rc(Rc::new(history))
	}

	/// Same as [`LocationStore::new`] for an already shared history.
	pub fn from_rc(history: Rc<dyn History>) -> Self {
		let location = State::new(Location {
			path: history.current_path(),
		});

		let target = location.downgrade();
		let listener = history.on_pop(Rc::new(move |path: String| {
			debug_log!("location: host navigated to {}", path);
			if let Some(location) = target.upgrade() {
				location.set(Location { path });
			}
		}));
		if let Err(err) = listener {
			crate::error_log!("location: cannot follow host navigation: {}", err);
		}

		Self(Rc::new(StoreInner {
			location,
			history,
			pushes: Cell::new(0),
			mounted_stacks: Cell::new(0),
		}))
	}

	/// The thread's default store, created on first use.
	///
	/// In the browser it follows `window.history`; elsewhere it is backed by
	/// a [`MemoryHistory`] starting at `/`.
	pub fn global() -> Self {
		GLOBAL.with(|global| global.borrow_mut().get_or_insert_with(default_store).clone())
	}

	/// The store provided by the innermost enclosing router component during
	/// projection, or [`LocationStore::global`] outside of one.
	pub fn ambient() -> Self {
		AMBIENT
			.with(|stack| stack.borrow().last().cloned())
			.unwrap_or_else(Self::global)
	}

	/// Makes this store the ambient one until the guard is dropped.
	pub(crate) fn provide(&self) -> ProvideGuard {
		AMBIENT.with(|stack| stack.borrow_mut().push(self.clone()));
		ProvideGuard(())
	}

	/// The observable location.
	pub fn location(&self) -> State<Location> {
		self.0.location.clone()
	}

	/// The current path.
	pub fn current_path(&self) -> String {
		self.0.location.with(|location| location.path.clone())
	}

	/// The history this store writes to.
	pub fn history(&self) -> Rc<dyn History> {
		Rc::clone(&self.0.history)
	}

	/// Navigates to `path`.
	///
	/// Does nothing if the host is already at `path`. Otherwise the host
	/// history is updated (a push unless `options.replace`), then the store.
	pub fn navigate(&self, path: &str, options: NavigateOptions) -> Result<(), RouterError> {
		if self.0.history.current_path() == path {
			return Ok(());
		}
		if options.replace {
			self.0.history.replace(path)?;
		} else {
			self.0.history.push(path)?;
			self.0.pushes.set(self.0.pushes.get() + 1);
		}
		debug_log!("location: navigated to {} (replace: {})", path, options.replace);
		self.0.location.set(Location {
			path: path.to_string(),
		});
		Ok(())
	}

	/// Goes back one entry if this store pushed one it has not gone back
	/// over yet; otherwise replaces the current entry with `fallback`.
	pub fn back(&self, fallback: &str) -> Result<(), RouterError> {
		match self.0.pushes.get().checked_sub(1) {
			Some(remaining) => {
				self.0.pushes.set(remaining);
				self.0.history.back()
			}
			None => self.navigate(fallback, NavigateOptions::replace()),
		}
	}

	/// Number of pushed entries `back` can still return over.
	pub fn pending_pushes(&self) -> usize {
		self.0.pushes.get()
	}

	/// Returns `true` if both handles refer to the same store.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}

	pub(crate) fn register_stack(&self) {
		self.0.mounted_stacks.set(self.0.mounted_stacks.get() + 1);
	}

	pub(crate) fn reset_stacks(&self) {
		self.0.mounted_stacks.set(0);
	}

	/// Router stacks mounted since the last `BrowserRouter` projection.
	pub fn mounted_stacks(&self) -> usize {
		self.0.mounted_stacks.get()
	}
}

#[cfg(target_arch = "wasm32")]
fn default_store() -> LocationStore {
	match super::history::BrowserHistory::new() {
		Ok(history) => LocationStore::new(history),
		Err(err) => {
			crate::error_log!("location: {}; falling back to in-memory history", err);
			LocationStore::new(MemoryHistory::new("/"))
		}
	}
}

#[cfg(not(target_arch = "wasm32"))]
fn default_store() -> LocationStore {
	LocationStore::new(MemoryHistory::new("/"))
}

/// Pops the ambient store pushed by [`LocationStore::provide`].
pub(crate) struct ProvideGuard(());

impl Drop for ProvideGuard {
	fn drop(&mut self) {
		AMBIENT.with(|stack| {
			stack.borrow_mut().pop();
		});
	}
}
