//! Keyed list rendering with minimal DOM changes.
//!
//! Every rendered item owns a range of nodes delimited by two comment
//! markers, and all ranges live before the list's own boundary marker:
//!
//! ```text
//! <!--weft-for-each:start--> ...item 0... <!--weft-for-each:end-->
//! <!--weft-for-each:start--> ...item 1... <!--weft-for-each:end-->
//! <!--weft-for-each-->
//! ```
//!
//! On each update, items are matched to existing ranges by their resolved
//! key. A range is re-rendered only when the item behind it is a different
//! `Rc` than last time; otherwise its nodes are kept (and at most moved).
//! Ranges whose key disappeared are removed.
//!
//! Each range is projected under its own child [`Owner`], disposed when the
//! range is removed or re-rendered. Disposing the owner current at mount
//! time stops the list and releases every range.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use weft_core::{Owner, State, on_cleanup, queue_microtask};

use super::into_view::{IntoView, View};
use super::r#trait::Directive;
use crate::dom::{self, DomError, Node};
use crate::projector::project_in;
use crate::{debug_log, error_log, warn_log};

/// Key an item is reconciled under.
///
/// Positional fallbacks are a separate variant so they never collide with a
/// declared key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolvedKey<K> {
	/// The value returned by the key selector.
	Key(K),
	/// The item's position, used when no selector is set or the selector
	/// gave no usable key.
	Index(usize),
}

/// Where a [`ForEach`] reads its items from.
#[derive(Debug)]
pub enum ItemsSource<T: 'static> {
	/// Re-reconciled on every change.
	Reactive(State<Vec<Rc<T>>>),
	/// Rendered once.
	Fixed(Vec<Rc<T>>),
}

impl<T: 'static> Clone for ItemsSource<T> {
	fn clone(&self) -> Self {
		match self {
			Self::Reactive(state) => Self::Reactive(state.clone()),
			Self::Fixed(items) => Self::Fixed(items.clone()),
		}
	}
}

impl<T: 'static> ItemsSource<T> {
	fn current(&self) -> Vec<Rc<T>> {
		match self {
			Self::Reactive(state) => state.get(),
			Self::Fixed(items) => items.clone(),
		}
	}
}

impl<T: 'static> From<State<Vec<Rc<T>>>> for ItemsSource<T> {
	fn from(state: State<Vec<Rc<T>>>) -> Self {
		Self::Reactive(state)
	}
}

impl<T: 'static> From<&State<Vec<Rc<T>>>> for ItemsSource<T> {
	fn from(state: &State<Vec<Rc<T>>>) -> Self {
		Self::Reactive(state.clone())
	}
}

impl<T: 'static> From<Vec<Rc<T>>> for ItemsSource<T> {
	fn from(items: Vec<Rc<T>>) -> Self {
		Self::Fixed(items)
	}
}

type RenderFn<T> = Rc<dyn Fn(&Rc<T>, usize) -> View>;
type KeyFn<T, K> = Rc<dyn Fn(&T) -> Option<K>>;

/// Keyed list directive.
///
/// ```ignore
/// struct Todo { id: u32, label: String }
///
/// let todos: State<Vec<Rc<Todo>>> = State::new(Vec::new());
/// let list = ElementView::new("ul").child(
///     ForEach::new(&todos, |todo, _| ElementView::new("li").child(todo.label.clone()).into())
///         .key(|todo| Some(todo.id)),
/// );
/// ```
///
/// Items are compared by `Rc` identity: replace an item with a new `Rc` to
/// have it re-rendered, keep the same `Rc` to keep its nodes.
pub struct ForEach<T: 'static, K: 'static = ()> {
	items: ItemsSource<T>,
	render: RenderFn<T>,
	key: Option<KeyFn<T, K>>,
}

impl<T: 'static> ForEach<T> {
	/// Creates a list keyed by position.
	pub fn new<I, F>(items: I, render: F) -> Self
	where
		I: Into<ItemsSource<T>>,
		F: Fn(&Rc<T>, usize) -> View + 'static,
	{
		Self {
			items: items.into(),
			render: Rc::new(render),
			key: None,
		}
	}
}

impl<T: 'static, K: 'static> ForEach<T, K> {
	/// Keys items by `selector`. `None` falls back to the item's position.
	pub fn key<K2, F>(self, selector: F) -> ForEach<T, K2>
	where
		K2: Eq + Hash + Clone + fmt::Debug + 'static,
		F: Fn(&T) -> Option<K2> + 'static,
	{
		ForEach {
			items: self.items,
			render: self.render,
			key: Some(Rc::new(selector)),
		}
	}
}

impl<T: 'static, K: 'static> fmt::Debug for ForEach<T, K> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ForEach")
			.field("keyed", &self.key.is_some())
			.finish_non_exhaustive()
	}
}

impl<T, K> IntoView for ForEach<T, K>
where
	T: 'static,
	K: Eq + Hash + Clone + fmt::Debug + 'static,
{
	fn into_view(self) -> View {
		View::directive(self)
	}
}

impl<T, K> Directive for ForEach<T, K>
where
	T: 'static,
	K: Eq + Hash + Clone + fmt::Debug + 'static,
{
	fn mount(&self, svg: bool) -> Result<Node, DomError> {
		let document = dom::document()?;
		let marker = document.create_comment("weft-for-each");
		let fragment = document.create_fragment();
		fragment.append_child(&marker)?;

		let list = Rc::new(KeyedList {
			marker,
			svg,
			render: Rc::clone(&self.render),
			key: self.key.clone(),
			scope: Owner::new(),
			entries: RefCell::new(HashMap::new()),
		});

		let subscription = match &self.items {
			ItemsSource::Reactive(state) => {
				let list = Rc::clone(&list);
				Some(state.subscribe(move |items| list.reconcile(items)))
			}
			ItemsSource::Fixed(_) => None,
		};
		let held = Rc::clone(&list);
		on_cleanup(move || {
			if let Some(subscription) = subscription {
				subscription.dispose();
			}
			held.scope.dispose();
		});

		// The marker has no parent until the surrounding projection inserts
		// the fragment, so the first pass waits a tick.
		let items = self.items.clone();
		queue_microtask(move || list.reconcile(&items.current()));

		Ok(fragment)
	}
}

struct Entry<T> {
	item: Rc<T>,
	owner: Owner,
	start: Node,
	end: Node,
}

impl<T> Entry<T> {
	/// Nodes from `start` through `end`, inclusive.
	fn range(&self) -> Vec<Node> {
		let mut nodes = vec![self.start.clone()];
		let mut cursor = self.start.next_sibling();
		while let Some(node) = cursor {
			let done = node == self.end;
			cursor = node.next_sibling();
			nodes.push(node);
			if done {
				break;
			}
		}
		nodes
	}

	fn remove(&self) {
		self.owner.dispose();
		for node in self.range() {
			node.remove();
		}
	}
}

struct KeyedList<T: 'static, K: 'static> {
	marker: Node,
	svg: bool,
	render: RenderFn<T>,
	key: Option<KeyFn<T, K>>,
	/// Parent of every entry owner.
	scope: Owner,
	entries: RefCell<HashMap<ResolvedKey<K>, Entry<T>>>,
}

impl<T, K> KeyedList<T, K>
where
	T: 'static,
	K: Eq + Hash + Clone + fmt::Debug + 'static,
{
	fn resolve_key(&self, item: &T, index: usize, seen: &HashSet<ResolvedKey<K>>) -> ResolvedKey<K> {
		let Some(select) = &self.key else {
			return ResolvedKey::Index(index);
		};
		match select(item) {
			None => {
				warn_log!("ForEach: missing key for item at index {}, falling back to index", index);
				ResolvedKey::Index(index)
			}
			Some(key) => {
				let key = ResolvedKey::Key(key);
				if seen.contains(&key) {
					warn_log!("ForEach: duplicate key {:?} at index {}, falling back to index", key, index);
					ResolvedKey::Index(index)
				} else {
					key
				}
			}
		}
	}

	fn reconcile(&self, items: &[Rc<T>]) {
		if self.scope.is_disposed() {
			debug_log!("ForEach: list was released; update skipped");
			return;
		}
		let Ok(mut entries) = self.entries.try_borrow_mut() else {
			warn_log!("ForEach: items changed while reconciling; nested update skipped");
			return;
		};
		let Some(parent) = self.marker.parent() else {
			debug_log!("ForEach: boundary marker is detached; update skipped");
			return;
		};

		let mut next_keys = HashSet::with_capacity(items.len());
		for (index, item) in items.iter().enumerate() {
			let key = self.resolve_key(item, index, &next_keys);
			next_keys.insert(key.clone());

			let result = match entries.get_mut(&key) {
				None => self.create_entry(&parent, item, index).map(|entry| {
					entries.insert(key, entry);
				}),
				Some(entry) => self.refresh_entry(&parent, entry, item, index),
			};
			if let Err(err) = result {
				error_log!("ForEach: failed to render item at index {}: {}", index, err);
			}
		}

		entries.retain(|key, entry| {
			let keep = next_keys.contains(key);
			if !keep {
				entry.remove();
			}
			keep
		});
	}

	/// Renders one item under a fresh entry owner.
	fn project_item(&self, item: &Rc<T>, index: usize) -> Result<(Node, Owner), DomError> {
		let owner = self.scope.child();
		match owner.with(|| project_in((self.render)(item, index), self.svg)) {
			Ok(content) => Ok((content, owner)),
			Err(err) => {
				owner.dispose();
				Err(err)
			}
		}
	}

	fn create_entry(&self, parent: &Node, item: &Rc<T>, index: usize) -> Result<Entry<T>, DomError> {
		let document = dom::document()?;
		let start = document.create_comment("weft-for-each:start");
		let end = document.create_comment("weft-for-each:end");
		let (content, owner) = self.project_item(item, index)?;

		let entry = Entry {
			item: Rc::clone(item),
			owner,
			start,
			end,
		};
		let inserted = parent
			.insert_before(&entry.start, Some(&self.marker))
			.and_then(|()| parent.insert_before(&content, Some(&self.marker)))
			.and_then(|()| parent.insert_before(&entry.end, Some(&self.marker)));
		if let Err(err) = inserted {
			entry.remove();
			return Err(err);
		}
		Ok(entry)
	}

	fn refresh_entry(
		&self,
		parent: &Node,
		entry: &mut Entry<T>,
		item: &Rc<T>,
		index: usize,
	) -> Result<(), DomError> {
		if !Rc::ptr_eq(&entry.item, item) {
			let (content, owner) = self.project_item(item, index)?;
			std::mem::replace(&mut entry.owner, owner).dispose();
			for node in entry.range() {
				if node != entry.start && node != entry.end {
					node.remove();
				}
			}
			parent.insert_before(&content, Some(&entry.end))?;
			entry.item = Rc::clone(item);
		}

		if entry.end.next_sibling().as_ref() != Some(&self.marker) {
			for node in entry.range() {
				parent.insert_before(&node, Some(&self.marker))?;
			}
		}
		Ok(())
	}
}
