//! Navigation context handed to views under a router stack.

use std::fmt;
use std::rc::Rc;

use weft_core::{State, on_cleanup};

use super::RouterError;
use super::location::{LocationStore, NavigateOptions};

/// Scoped navigation API of one [`RouterStack`](super::RouterStack).
///
/// Every stack builds its own context, closed over the stack's root path,
/// so `back()` without a fallback returns to the stack's root.
#[derive(Clone)]
pub struct Navigation {
	store: LocationStore,
	root_path: Rc<str>,
	current_path: State<String>,
}

impl fmt::Debug for Navigation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Navigation")
			.field("root_path", &self.root_path)
			.field("current_path", &self.current_path.with(String::clone))
			.finish()
	}
}

impl Navigation {
	/// Creates a context writing to `store`.
	///
	/// When created under an owner, [`Navigation::current_path`] stops
	/// following the store once that owner is disposed.
	pub fn new(store: LocationStore, root_path: impl Into<Rc<str>>) -> Self {
		let current_path = store.location().map(|location| location.path.clone());
		let followed = current_path.clone();
		on_cleanup(move || followed.detach());
		Self {
			store,
			root_path: root_path.into(),
			current_path,
		}
	}

	/// Navigates to `path`, adding a history entry.
	pub fn push(&self, path: &str) -> Result<(), RouterError> {
		self.store.navigate(path, NavigateOptions::default())
	}

	/// Navigates to `path`, replacing the current history entry.
	pub fn replace(&self, path: &str) -> Result<(), RouterError> {
		self.store.navigate(path, NavigateOptions::replace())
	}

	/// Goes back, or replaces the current entry with `fallback` (the root
	/// path when `None`) if nothing was pushed.
	pub fn back(&self, fallback: Option<&str>) -> Result<(), RouterError> {
		self.store.back(fallback.unwrap_or(&self.root_path))
	}

	/// The current path, kept up to date.
	pub fn current_path(&self) -> State<String> {
		self.current_path.clone()
	}

	/// The root path of the owning stack.
	pub fn root_path(&self) -> &str {
		&self.root_path
	}

	/// The store this context navigates.
	pub fn store(&self) -> &LocationStore {
		&self.store
	}
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
	use super::*;
	use crate::router::MemoryHistory;
	use rstest::rstest;
	use weft_core::Owner;

	#[rstest]
	fn test_current_path_follows_store() {
		let store = LocationStore::new(MemoryHistory::new("/"));
		let navigation = Navigation::new(store.clone(), "/");
		let current = navigation.current_path();

		navigation.push("/settings").unwrap();

		assert_eq!(current.get(), "/settings");
	}

	#[rstest]
	fn test_owner_disposal_detaches_current_path() {
		let store = LocationStore::new(MemoryHistory::new("/"));
		let baseline = store.location().subscriber_count();
		let owner = Owner::new();
		let navigation = owner.with(|| Navigation::new(store.clone(), "/"));
		assert_eq!(store.location().subscriber_count(), baseline + 1);

		owner.dispose();
		navigation.push("/settings").unwrap();

		assert_eq!(store.location().subscriber_count(), baseline);
		assert_eq!(navigation.current_path().get(), "/");
	}

	#[rstest]
	fn test_back_defaults_to_root_path() {
		let store = LocationStore::new(MemoryHistory::new("/admin/users"));
		let navigation = Navigation::new(store.clone(), "/admin");

		navigation.back(None).unwrap();

		assert_eq!(store.current_path(), "/admin");
		assert_eq!(navigation.root_path(), "/admin");
	}

	#[rstest]
	fn test_back_with_explicit_fallback() {
		let store = LocationStore::new(MemoryHistory::new("/admin/users"));
		let navigation = Navigation::new(store.clone(), "/admin");

		navigation.back(Some("/")).unwrap();

		assert_eq!(store.current_path(), "/");
	}
}
