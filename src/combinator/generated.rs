//! Open-ended sequence unfolded from its own output

use std::fmt;

use tracing::debug;

use super::Step;
use crate::cursor::{BoxCursor, Characteristics, Cursor, SizeHint};
use crate::limit::{self, Predicate};

/// Produces the next segment from the last element seen.
///
/// Called with `None` for the very first segment only.
pub type Generator<T> = Box<dyn FnMut(Option<&T>) -> BoxCursor<T> + Send>;

/// Cursor whose next segment is derived from the last element produced.
///
/// A drained segment is dropped and the following call regenerates from the
/// same last element. Size and characteristics are those of the active
/// segment and change over the cursor's lifetime. Never splittable.
pub struct GeneratedCursor<T> {
    proceed: Predicate<T>,
    generator: Generator<T>,
    current: Option<BoxCursor<T>>,
    last: Option<T>,
    segments: u64,
}

impl<T: Clone + Send + 'static> GeneratedCursor<T> {
    /// Unfold a sequence from `generator` without a stopping condition.
    pub fn new<C, F>(mut generator: F) -> Self
    where
        C: Cursor<T> + Send + 'static,
        F: FnMut(Option<&T>) -> C + Send + 'static,
    {
        Self {
            proceed: limit::infinite(),
            generator: Box::new(move |last: Option<&T>| {
                Box::new(generator(last)) as BoxCursor<T>
            }),
            current: None,
            last: None,
            segments: 0,
        }
    }

    /// Add a stopping condition, AND-composed after the existing one.
    pub fn with_limit<F>(self, proceed: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.with_predicate(limit::predicate(proceed))
    }

    /// Add a shared stopping condition.
    pub fn with_predicate(mut self, proceed: Predicate<T>) -> Self {
        self.proceed = limit::and(self.proceed, proceed);
        self
    }

    /// Last element produced, the seed of the next segment.
    pub fn last(&self) -> Option<&T> {
        self.last.as_ref()
    }

    /// Number of segments generated so far.
    pub fn segments(&self) -> u64 {
        self.segments
    }

    /// Advance by one element, reporting why the cursor stopped or retried.
    pub fn step(&mut self) -> Step<T> {
        let generator = &mut self.generator;
        let last = &self.last;
        let segments = &mut self.segments;
        let current = self.current.get_or_insert_with(|| {
            *segments += 1;
            debug!(
                segment = *segments,
                seeded = last.is_some(),
                "generating next segment"
            );
            generator(last.as_ref())
        });

        let mut slot = None;
        let advanced = current.try_advance(&mut |item| slot = Some(item));
        match slot {
            Some(item) => {
                self.last = Some(item.clone());
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

impl<T: fmt::Debug> fmt::Debug for GeneratedCursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedCursor")
            .field("segments", &self.segments)
            .field("last", &self.last)
            .field("active", &self.current.is_some())
            .finish()
    }
}

impl<T: Clone + Send + 'static> Cursor<T> for GeneratedCursor<T> {
    fn try_advance(&mut self, action: &mut dyn FnMut(T)) -> bool {
        self.step().deliver(action)
    }

    fn try_split(&mut self) -> Option<BoxCursor<T>> {
        None
    }

    fn estimate_size(&self) -> SizeHint {
        self.current
            .as_ref()
            .map_or(SizeHint::Unknown, |segment| segment.estimate_size())
    }

    fn characteristics(&self) -> Characteristics {
        self.current
            .as_ref()
            .map_or(Characteristics::ORDERED, |segment| segment.characteristics())
    }
}
