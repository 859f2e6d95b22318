//! Continuation predicates
//!
//! A predicate decides, per produced element, whether a cyclic or generated
//! cursor keeps going. Stateful limits keep their state behind atomics so a
//! predicate can be shared between a cursor and its splits; the state is
//! shared, not reset, by such a split.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::CursorError;

/// Shared continuation predicate: `true` keeps going, `false` stops.
pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Wrap a closure as a [`Predicate`].
pub fn predicate<T, F>(f: F) -> Predicate<T>
where
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Compose two predicates with short-circuit AND, `first` evaluated first.
pub fn and<T: 'static>(first: Predicate<T>, second: Predicate<T>) -> Predicate<T> {
    Arc::new(move |item: &T| first(item) && second(item))
}

/// Never stop.
pub fn infinite<T: 'static>() -> Predicate<T> {
    Arc::new(|_: &T| true)
}

/// Deliver exactly `count` elements.
///
/// The predicate answers `true` for the first `count - 1` elements and
/// `false` for the `count`th, which the cursor still delivers.
pub fn by_fixed_count<T: 'static>(count: u64) -> Result<Predicate<T>, CursorError> {
    if count == 0 {
        return Err(CursorError::InvalidConfiguration(
            "element count must be > 0".to_string(),
        ));
    }
    let seen = AtomicU64::new(0);
    Ok(Arc::new(move |_: &T| {
        seen.fetch_add(1, Ordering::Relaxed) + 1 < count
    }))
}

/// Keep going while less than `duration` has elapsed since the first test.
pub fn by_execution_time<T: 'static>(duration: Duration) -> Predicate<T> {
    let started = OnceLock::new();
    Arc::new(move |_: &T| started.get_or_init(Instant::now).elapsed() < duration)
}

/// Keep going while elements stay below `threshold`.
pub fn by_threshold<T>(threshold: T) -> Predicate<T>
where
    T: PartialOrd + Send + Sync + 'static,
{
    Arc::new(move |item: &T| *item < threshold)
}

#[derive(Debug)]
struct SteadyState<T> {
    best: Option<T>,
    stale: u64,
}

/// Stop once `generations` consecutive elements failed to strictly improve
/// on the largest element seen so far.
pub fn by_steady_value<T>(generations: u64) -> Result<Predicate<T>, CursorError>
where
    T: PartialOrd + Clone + Send + 'static,
{
    if generations == 0 {
        return Err(CursorError::InvalidConfiguration(
            "steady generations must be > 0".to_string(),
        ));
    }
    let state = Mutex::new(SteadyState {
        best: None,
        stale: 0,
    });
    Ok(Arc::new(move |item: &T| {
        let mut state = state.lock();
        let improved = match &state.best {
            Some(best) => item > best,
            None => true,
        };
        if improved {
            state.best = Some(item.clone());
            state.stale = 0;
        } else {
            state.stale += 1;
        }
        state.stale < generations
    }))
}
