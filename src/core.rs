//! Reactive containers and effects.
//!
//! This module provides access to `weft-core`: observable state, the effect
//! runner and the microtask scheduler the directives defer work to.
//!
//! # Examples
//!
//! ```rust
//! use weft::core::State;
//!
//! let count = State::new(1);
//! let doubled = count.map(|n| n * 2);
//! count.set(4);
//! assert_eq!(doubled.get(), 8);
//! ```

pub use weft_core::*;
