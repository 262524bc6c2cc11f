//! # Weft Core
//!
//! Reactive primitives shared by every weft crate.
//!
//! ## Components
//!
//! - **State containers**: a boxed value plus an ordered subscriber list.
//!   `set()` notifies synchronously, in subscription order, before returning.
//! - **Effects**: a callback run immediately and again on every change of a
//!   declared dependency set. No batching, no automatic tracking.
//! - **Owners**: teardown scopes. Disposing one stops every effect and
//!   subscription registered while it was current.
//! - **Task queue**: the single "next tick" deferral primitive. Browser
//!   microtasks on `wasm32`, an explicitly flushed FIFO elsewhere.
//!
//! Everything here is single-threaded: handles are `!Send` and rely on
//! `Rc`/`RefCell` internally.

#![warn(missing_docs)]

pub mod reactive;

pub use reactive::{
	Disposer, Effect, Owner, State, Trigger, WeakState, create_state, flush_microtasks,
	on_cleanup, queue_microtask, run_effect, when_ready,
};
