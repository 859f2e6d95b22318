//! Cursor combinators
//!
//! Stitch independent cursors into one continuous sequence:
//! concatenation of a fixed set, infinite cycling of cursor factories, and
//! feedback-driven generation where each new segment is seeded by the last
//! element produced.

mod concat;
mod cyclic;
mod generated;

pub use concat::ConcatenatedCursor;
pub use cyclic::{factory, CursorFactory, CyclicCursor};
pub use generated::{GeneratedCursor, Generator};

/// Outcome of a single step of a predicate-driven cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<T> {
    /// Element produced and the continuation predicate says keep going.
    Produced(T),
    /// Element produced but the continuation predicate says stop.
    Last(T),
    /// Current generation drained; a fresh one is built on the next call.
    Retry,
}

impl<T> Step<T> {
    /// Boolean form used by [`Cursor::try_advance`](crate::Cursor::try_advance).
    ///
    /// Delivers the element, if any, to `action`. `Retry` maps to `true`
    /// ("call again") and `Last` to `false` even though it delivered.
    pub fn deliver(self, action: &mut dyn FnMut(T)) -> bool {
        match self {
            Step::Produced(item) => {
                action(item);
                true
            }
            Step::Last(item) => {
                action(item);
                false
            }
            Step::Retry => true,
        }
    }

    /// The produced element, if any.
    pub fn into_item(self) -> Option<T> {
        match self {
            Step::Produced(item) | Step::Last(item) => Some(item),
            Step::Retry => None,
        }
    }

    /// Whether the cursor may produce again after this step.
    pub fn is_continuing(&self) -> bool {
        matches!(self, Step::Produced(_) | Step::Retry)
    }

    pub(crate) fn from_verdict(item: T, proceed: bool) -> Self {
        if proceed {
            Step::Produced(item)
        } else {
            Step::Last(item)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deliver_maps_to_boolean_protocol() {
        let mut seen = Vec::new();
        assert!(Step::Produced(1).deliver(&mut |x| seen.push(x)));
        assert!(!Step::Last(2).deliver(&mut |x| seen.push(x)));
        assert!(Step::Retry.deliver(&mut |x| seen.push(x)));
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn test_continuing() {
        assert!(Step::Produced(()).is_continuing());
        assert!(Step::<()>::Retry.is_continuing());
        assert!(!Step::Last(()).is_continuing());
        assert_eq!(Step::<u8>::Retry.into_item(), None);
        assert_eq!(Step::Last(4u8).into_item(), Some(4));
    }
}
