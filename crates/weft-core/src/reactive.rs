//! Reactive primitives.
//!
//! - [`State`]: observable value container with derived views
//! - [`Effect`]: callback re-run whenever declared dependencies change
//! - [`Owner`]: teardown scope for effects and subscriptions
//! - [`scheduler`]: the cooperative "next tick" task queue

pub mod effect;
pub mod owner;
pub mod scheduler;
pub mod state;

pub use effect::{Effect, Trigger, run_effect};
pub use owner::{Owner, on_cleanup};
pub use scheduler::{flush_microtasks, pending_microtasks, queue_microtask, when_ready};
pub use state::{Disposer, State, WeakState};

/// Creates a new [`State`] holding `initial`.
pub fn create_state<T: 'static>(initial: T) -> State<T> {
	State::new(initial)
}
