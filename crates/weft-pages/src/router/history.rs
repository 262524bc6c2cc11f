//! Host navigation history backends.
//!
//! [`History`] is the seam between a [`LocationStore`](super::LocationStore)
//! and whatever keeps the real session history:
//!
//! - [`BrowserHistory`] (wasm32 only) drives `window.history` and listens
//!   for `popstate`
//! - [`MemoryHistory`] keeps the entries in memory; it backs non-browser
//!   hosts and tests

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use weft_core::queue_microtask;

use super::RouterError;

/// Callback invoked with the new path after a back/forward navigation.
pub type PopListener = Rc<dyn Fn(String)>;

/// Session history operations a location store relies on.
pub trait History {
	/// Path of the current entry.
	fn current_path(&self) -> String;

	/// Adds an entry for `path` and makes it current.
	fn push(&self, path: &str) -> Result<(), RouterError>;

	/// Replaces the current entry with `path`.
	fn replace(&self, path: &str) -> Result<(), RouterError>;

	/// Asks the host to go back one entry.
	///
	/// Hosts complete this asynchronously: listeners registered with
	/// [`History::on_pop`] are told about the new path later, never from
	/// inside this call.
	fn back(&self) -> Result<(), RouterError>;

	/// Registers a listener for back/forward navigations.
	fn on_pop(&self, listener: PopListener) -> Result<(), RouterError>;
}

/// In-memory session history.
///
/// Mirrors browser semantics: pushing drops every entry after the current
/// one, and going back past the first entry does nothing.
#[derive(Default)]
pub struct MemoryHistory {
	entries: RefCell<Vec<String>>,
	cursor: Cell<usize>,
	listeners: RefCell<Vec<PopListener>>,
}

impl fmt::Debug for MemoryHistory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MemoryHistory")
			.field("entries", &self.entries.borrow())
			.field("cursor", &self.cursor.get())
			.field("listeners", &self.listeners.borrow().len())
			.finish()
	}
}

impl MemoryHistory {
	/// Creates a history with a single entry.
	pub fn new(initial_path: impl Into<String>) -> Self {
		Self {
			entries: RefCell::new(vec![initial_path.into()]),
			cursor: Cell::new(0),
			listeners: RefCell::new(Vec::new()),
		}
	}

	/// All entries, oldest first.
	pub fn entries(&self) -> Vec<String> {
		self.entries.borrow().clone()
	}

	/// Index of the current entry.
	pub fn index(&self) -> usize {
		self.cursor.get()
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.borrow().len()
	}

	/// Returns `true` if there are no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.borrow().is_empty()
	}

	/// Moves forward one entry, if there is one.
	pub fn forward(&self) -> Result<(), RouterError> {
		if self.cursor.get() + 1 < self.len() {
			self.go_to(self.cursor.get() + 1);
		}
		Ok(())
	}

	fn go_to(&self, index: usize) {
		self.cursor.set(index);
		let path = self.current_path();
		let listeners = self.listeners.borrow().clone();
		queue_microtask(move || {
			for listener in listeners {
				listener(path.clone());
			}
		});
	}
}

impl History for MemoryHistory {
	fn current_path(&self) -> String {
		self.entries
			.borrow()
			.get(self.cursor.get())
			.cloned()
			.unwrap_or_else(|| "/".to_string())
	}

	fn push(&self, path: &str) -> Result<(), RouterError> {
		let mut entries = self.entries.borrow_mut();
		entries.truncate(self.cursor.get() + 1);
		entries.push(path.to_string());
		self.cursor.set(entries.len() - 1);
		Ok(())
	}

	fn replace(&self, path: &str) -> Result<(), RouterError> {
		let mut entries = self.entries.borrow_mut();
		match entries.get_mut(self.cursor.get()) {
			Some(entry) => *entry = path.to_string(),
			None => entries.push(path.to_string()),
		}
		Ok(())
	}

	fn back(&self) -> Result<(), RouterError> {
		if let Some(index) = self.cursor.get().checked_sub(1) {
			self.go_to(index);
		}
		Ok(())
	}

	fn on_pop(&self, listener: PopListener) -> Result<(), RouterError> {
		self.listeners.borrow_mut().push(listener);
		Ok(())
	}
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserHistory;

#[cfg(target_arch = "wasm32")]
mod browser {
	use wasm_bindgen::JsCast;
	use wasm_bindgen::JsValue;
	use wasm_bindgen::closure::Closure;

	use super::{History, PopListener, RouterError};

	fn navigation_failed(value: JsValue) -> RouterError {
		RouterError::NavigationFailed(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}

	/// History backed by `window.history` and `window.location`.
	#[derive(Debug, Clone)]
	pub struct BrowserHistory {
		window: web_sys::Window,
	}

	impl BrowserHistory {
		/// Binds to the current window.
		pub fn new() -> Result<Self, RouterError> {
			let window = web_sys::window().ok_or(RouterError::NoWindow)?;
			Ok(Self { window })
		}

		fn history(&self) -> Result<web_sys::History, RouterError> {
			self.window.history().map_err(navigation_failed)
		}
	}

	impl History for BrowserHistory {
		fn current_path(&self) -> String {
			self.window
				.location()
				.pathname()
				.unwrap_or_else(|_| "/".to_string())
		}

		fn push(&self, path: &str) -> Result<(), RouterError> {
			self.history()?
				.push_state_with_url(&JsValue::NULL, "", Some(path))
				.map_err(navigation_failed)
		}

		fn replace(&self, path: &str) -> Result<(), RouterError> {
			self.history()?
				.replace_state_with_url(&JsValue::NULL, "", Some(path))
				.map_err(navigation_failed)
		}

		fn back(&self) -> Result<(), RouterError> {
			self.history()?.back().map_err(navigation_failed)
		}

		fn on_pop(&self, listener: PopListener) -> Result<(), RouterError> {
			let window = self.window.clone();
			let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
				let path = window
					.location()
					.pathname()
					.unwrap_or_else(|_| "/".to_string());
				listener(path);
			});
			self.window
				.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
				.map_err(navigation_failed)?;
			// Lives as long as the page.
			closure.forget();
			Ok(())
		}
	}
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
	use super::*;
	use rstest::rstest;
	use weft_core::flush_microtasks;

	fn recorder(history: &MemoryHistory) -> Rc<RefCell<Vec<String>>> {
		let seen = Rc::new(RefCell::new(Vec::new()));
		let log = seen.clone();
		history
			.on_pop(Rc::new(move |path: String| log.borrow_mut().push(path)))
			.unwrap();
		seen
	}

	#[rstest]
	fn test_push_and_replace() {
		let history = MemoryHistory::new("/");
		history.push("/a").unwrap();
		history.replace("/b").unwrap();

		assert_eq!(history.entries(), vec!["/", "/b"]);
		assert_eq!(history.current_path(), "/b");
	}

	#[rstest]
	fn test_back_notifies_asynchronously() {
		let history = MemoryHistory::new("/");
		let seen = recorder(&history);
		history.push("/a").unwrap();

		history.back().unwrap();

		assert_eq!(history.current_path(), "/");
		assert!(seen.borrow().is_empty());
		flush_microtasks();
		assert_eq!(*seen.borrow(), vec!["/"]);
	}

	#[rstest]
	fn test_back_at_first_entry_is_noop() {
		let history = MemoryHistory::new("/");
		let seen = recorder(&history);

		history.back().unwrap();
		flush_microtasks();

		assert_eq!(history.index(), 0);
		assert!(seen.borrow().is_empty());
	}

	#[rstest]
	fn test_push_drops_forward_entries() {
		let history = MemoryHistory::new("/");
		history.push("/a").unwrap();
		history.push("/b").unwrap();
		history.back().unwrap();
		history.push("/c").unwrap();
		flush_microtasks();

		assert_eq!(history.entries(), vec!["/", "/a", "/c"]);
		history.forward().unwrap();
		assert_eq!(history.current_path(), "/c");
	}
}
