//! # Stitching independent result sources into one lazy sequence
//!
//! This library provides a small family of pull-based cursors that join
//! independent result-producing sources (e.g. successive optimization runs)
//! into one continuous, lazily evaluated, splittable sequence. Nothing is
//! materialized and the sequence need not be finite.
//!
//! ## Cursor Variants
//!
//! 1. **Concatenation**: drain a fixed list of cursors one after another
//! 2. **Cycling**: replay a list of cursor factories forever, each round
//!    with freshly built cursors
//! 3. **Generation**: unfold the next segment from the last element produced
//! 4. **Hot swap**: let a producer thread replace the source a consumer
//!    thread is pulling from
//!
//! Every variant implements [`Cursor`]: advance one element at a time until
//! `try_advance` returns `false`, optionally split off a prefix for a second
//! consumer.
//!
//! ## Usage Example
//!
//! ```
//! use stitch::{factory, iter, CyclicCursor, VecCursor};
//! use std::sync::atomic::{AtomicI32, Ordering};
//! use std::sync::Arc;
//!
//! let counter = Arc::new(AtomicI32::new(0));
//! let make = {
//!     let counter = Arc::clone(&counter);
//!     factory(move || {
//!         let start = counter.fetch_add(2, Ordering::Relaxed);
//!         VecCursor::new(vec![start + 1, start + 2])
//!     })
//! };
//!
//! let cycle = CyclicCursor::new([make.clone(), make])?.with_limit(|x| *x < 6);
//! let items: Vec<i32> = iter(cycle).collect();
//! assert_eq!(items, vec![1, 2, 3, 4, 5, 6]);
//! # Ok::<(), stitch::CursorError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod combinator; // Concatenated, cyclic and generated cursors
pub mod cursor; // Cursor contract and leaf sources
pub mod limit; // Continuation predicates
pub mod sync; // Cross-thread updatable cursor

// Re-exports for convenience
pub use combinator::{
    factory, ConcatenatedCursor, CursorFactory, CyclicCursor, GeneratedCursor, Step,
};
pub use cursor::{
    empty, from_fn, iter, once, BoxCursor, Characteristics, Cursor, CursorIter, SizeHint,
    VecCursor,
};
pub use limit::Predicate;
pub use sync::{UpdatableConfig, UpdatableCursor};

use thiserror::Error;

/// Errors reported when a cursor or predicate is constructed
#[derive(Error, Debug)]
pub enum CursorError {
    /// A cyclic cursor needs at least one factory
    #[error("cyclic cursor requires at least one cursor factory")]
    EmptyFactoryList,

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
