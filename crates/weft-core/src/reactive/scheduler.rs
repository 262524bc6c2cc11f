//! Cooperative task queue for "next tick" work.
//!
//! Everything in weft runs synchronously except for a handful of deferrals
//! that must wait for the current projection pass to finish. Those are
//! queued here.
//!
//! On `wasm32` tasks are handed to the host's promise job queue through
//! `wasm_bindgen_futures::spawn_local`, so they run as microtasks once the
//! current JS task yields. On native targets there is no host event loop;
//! tasks accumulate in a thread-local FIFO until [`flush_microtasks`] is
//! called.

#[cfg(not(target_arch = "wasm32"))]
use std::cell::RefCell;
#[cfg(not(target_arch = "wasm32"))]
use std::collections::VecDeque;

#[cfg(not(target_arch = "wasm32"))]
type Task = Box<dyn FnOnce()>;

#[cfg(not(target_arch = "wasm32"))]
thread_local! {
	static QUEUE: RefCell<VecDeque<Task>> = const { RefCell::new(VecDeque::new()) };
}

/// Schedules `task` to run after the current synchronous work completes.
#[cfg(target_arch = "wasm32")]
pub fn queue_microtask<F>(task: F)
where
	F: FnOnce() + 'static,
{
	wasm_bindgen_futures::spawn_local(async move { task() });
}

/// Schedules `task` to run on the next [`flush_microtasks`] call.
#[cfg(not(target_arch = "wasm32"))]
pub fn queue_microtask<F>(task: F)
where
	F: FnOnce() + 'static,
{
	QUEUE.with(|queue| queue.borrow_mut().push_back(Box::new(task)));
}

/// Runs `task` once the current projection pass has finished.
///
/// Alias of [`queue_microtask`] that reads better at call sites doing
/// post-mount validation.
pub fn when_ready<F>(task: F)
where
	F: FnOnce() + 'static,
{
	queue_microtask(task);
}

/// Drains the task queue, including tasks queued while draining.
///
/// Returns the number of tasks that ran. The browser drains its own queue,
/// so this is a no-op returning `0` on `wasm32`.
#[cfg(not(target_arch = "wasm32"))]
pub fn flush_microtasks() -> usize {
	let mut ran = 0;
	loop {
		let next = QUEUE.with(|queue| queue.borrow_mut().pop_front());
		match next {
			Some(task) => {
				task();
				ran += 1;
			}
			None => break,
		}
	}
	ran
}

/// No-op on `wasm32`: the browser drains its own microtask queue.
#[cfg(target_arch = "wasm32")]
pub fn flush_microtasks() -> usize {
	0
}

/// Number of tasks waiting in the queue (always `0` on `wasm32`).
#[cfg(not(target_arch = "wasm32"))]
pub fn pending_microtasks() -> usize {
	QUEUE.with(|queue| queue.borrow().len())
}

/// Number of tasks waiting in the queue (always `0` on `wasm32`).
#[cfg(target_arch = "wasm32")]
pub fn pending_microtasks() -> usize {
	0
}
