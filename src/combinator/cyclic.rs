//! Infinite repetition of a list of cursor factories

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::{ConcatenatedCursor, Step};
use crate::cursor::{BoxCursor, Characteristics, Cursor, SizeHint};
use crate::limit::{self, Predicate};
use crate::CursorError;

/// Zero-argument function producing a fresh cursor on every call.
pub type CursorFactory<T> = Arc<dyn Fn() -> BoxCursor<T> + Send + Sync>;

/// Wrap a closure returning any sendable cursor as a [`CursorFactory`].
pub fn factory<T, C, F>(make: F) -> CursorFactory<T>
where
    T: 'static,
    C: Cursor<T> + Send + 'static,
    F: Fn() -> C + Send + Sync + 'static,
{
    Arc::new(move || Box::new(make()) as BoxCursor<T>)
}

/// Cursor cycling through its factories forever.
///
/// Each generation is a [`ConcatenatedCursor`] built by invoking every
/// factory once, in order. When a generation drains it is dropped and the
/// next call builds a new one, so the sequence only ends when the
/// continuation predicate says so.
pub struct CyclicCursor<T> {
    factories: Arc<[CursorFactory<T>]>,
    proceed: Predicate<T>,
    current: Option<ConcatenatedCursor<T>>,
    generation: u64,
}

impl<T: Send + 'static> CyclicCursor<T> {
    /// Cycle through `factories` without a stopping condition.
    ///
    /// An empty factory list could never produce an element and never stop,
    /// so it is rejected.
    pub fn new<I>(factories: I) -> Result<Self, CursorError>
    where
        I: IntoIterator<Item = CursorFactory<T>>,
    {
        let factories: Arc<[CursorFactory<T>]> = factories.into_iter().collect();
        if factories.is_empty() {
            return Err(CursorError::EmptyFactoryList);
        }
        Ok(Self {
            factories,
            proceed: limit::infinite(),
            current: None,
            generation: 0,
        })
    }

    /// Add a stopping condition.
    ///
    /// The effective predicate becomes `existing && proceed`, evaluated
    /// left to right with short-circuit.
    pub fn with_limit<F>(self, proceed: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.with_predicate(limit::predicate(proceed))
    }

    /// Add a shared stopping condition, see [`CyclicCursor::with_limit`].
    pub fn with_predicate(mut self, proceed: Predicate<T>) -> Self {
        self.proceed = limit::and(self.proceed, proceed);
        self
    }

    /// Number of generations instantiated so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of factories in one cycle.
    pub fn cycle_len(&self) -> usize {
        self.factories.len()
    }

    /// Advance by one element, reporting why the cursor stopped or retried.
    pub fn step(&mut self) -> Step<T> {
        let factories = &self.factories;
        let generation = &mut self.generation;
        let current = self.current.get_or_insert_with(|| {
            *generation += 1;
            debug!(
                generation = *generation,
                factories = factories.len(),
                "instantiating cycle generation"
            );
            ConcatenatedCursor::new(factories.iter().map(|make| make()))
        });

        let mut slot = None;
        let advanced = current.try_advance(&mut |item| slot = Some(item));
        match slot {
            Some(item) => {
                let verdict = (self.proceed)(&item);
                Step::from_verdict(item, verdict)
            }
            None => {
                if !advanced {
                    self.current = None;
                }
                Step::Retry
            }
        }
    }
}

impl<T> fmt::Debug for CyclicCursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CyclicCursor")
            .field("factories", &self.factories.len())
            .field("generation", &self.generation)
            .field("current", &self.current)
            .finish()
    }
}

impl<T: Send + 'static> Cursor<T> for CyclicCursor<T> {
    /// Delivers one element and returns the predicate's verdict, or returns
    /// `true` without delivering when the current generation just drained.
    fn try_advance(&mut self, action: &mut dyn FnMut(T)) -> bool {
        self.step().deliver(action)
    }

    /// Independent replay of the same cycle sharing factories and predicate.
    fn try_split(&mut self) -> Option<BoxCursor<T>> {
        Some(Box::new(CyclicCursor {
            factories: Arc::clone(&self.factories),
            proceed: Arc::clone(&self.proceed),
            current: None,
            generation: 0,
        }))
    }

    /// A split-off replay shares nothing consumable with this cursor, so
    /// dropping it restores the state before the split.
    fn try_rejoin(&mut self, _replay: BoxCursor<T>) -> Result<(), BoxCursor<T>> {
        Ok(())
    }

    fn estimate_size(&self) -> SizeHint {
        SizeHint::Unknown
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::ORDERED
    }
}
