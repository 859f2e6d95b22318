//! Shared helpers for integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use stitch::{factory, BoxCursor, Cursor, CursorFactory, VecCursor};
use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber honouring `RUST_LOG`; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Box a buffer cursor.
pub fn boxed<T: Send + 'static>(items: Vec<T>) -> BoxCursor<T> {
    Box::new(VecCursor::new(items))
}

/// Drain a cursor with the raw protocol, ignoring "try again" returns.
pub fn drain<T>(cursor: &mut dyn Cursor<T>) -> Vec<T> {
    let mut out = Vec::new();
    cursor.for_each_remaining(&mut |item| out.push(item));
    out
}

/// Factory whose cursors continue a shared counter two elements at a time.
pub fn counting_pair_factory(counter: &Arc<AtomicI32>) -> CursorFactory<i32> {
    let counter = Arc::clone(counter);
    factory(move || {
        let start = counter.fetch_add(2, Ordering::Relaxed);
        VecCursor::new(vec![start + 1, start + 2])
    })
}

/// Cursor that produces its elements but never agrees to split.
pub struct Unsplittable<T> {
    inner: VecCursor<T>,
}

impl<T> Unsplittable<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            inner: VecCursor::new(items),
        }
    }
}

impl<T: Send + 'static> Cursor<T> for Unsplittable<T> {
    fn try_advance(&mut self, action: &mut dyn FnMut(T)) -> bool {
        self.inner.try_advance(action)
    }

    fn try_split(&mut self) -> Option<BoxCursor<T>> {
        None
    }

    fn estimate_size(&self) -> stitch::SizeHint {
        self.inner.estimate_size()
    }

    fn characteristics(&self) -> stitch::Characteristics {
        self.inner.characteristics()
    }
}
