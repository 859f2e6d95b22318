//! Pull-based cursor contract
//!
//! A cursor hands out one element per `try_advance` call and may give away a
//! disjoint prefix of its remaining elements through `try_split`.
//! Exhaustion is permanent: once `try_advance` reports `false` the same
//! generation of a cursor never produces again.

mod adapter;
mod source;

pub use adapter::CursorIter;
pub use source::{empty, from_fn, once, Empty, FromFn, VecCursor};

use bitflags::bitflags;

/// Owned, type-erased cursor that can be handed to another thread.
pub type BoxCursor<T> = Box<dyn Cursor<T> + Send>;

bitflags! {
    /// Structural guarantees about the remaining contents of a cursor.
    pub struct Characteristics: u8 {
        /// Elements are produced in a defined encounter order.
        const ORDERED = 0b0001;
        /// `estimate_size` is exact before traversal starts.
        const SIZED = 0b0010;
        /// Every cursor returned by `try_split` is `SIZED` as well.
        const SUBSIZED = 0b0100;
    }
}

impl Characteristics {
    /// Flags a composition of cursors can carry at most.
    pub const COMPOSABLE: Characteristics = Characteristics::from_bits_truncate(0b0111);

    /// Drop the size related flags.
    pub fn without_size(self) -> Self {
        self - (Characteristics::SIZED | Characteristics::SUBSIZED)
    }
}

/// Estimated number of remaining elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeHint {
    /// Exactly (or at most, for unsized cursors) this many elements remain.
    Known(u64),
    /// The cursor cannot tell, or the sequence is unbounded.
    Unknown,
}

impl SizeHint {
    /// Sum a collection of hints.
    ///
    /// Any `Unknown` member, or a sum overflowing `u64`, yields `Unknown`.
    pub fn checked_sum<I>(hints: I) -> SizeHint
    where
        I: IntoIterator<Item = SizeHint>,
    {
        let mut total = 0u64;
        for hint in hints {
            match hint {
                SizeHint::Known(n) => match total.checked_add(n) {
                    Some(sum) => total = sum,
                    None => return SizeHint::Unknown,
                },
                SizeHint::Unknown => return SizeHint::Unknown,
            }
        }
        SizeHint::Known(total)
    }

    /// The known size, if any.
    pub fn known(self) -> Option<u64> {
        match self {
            SizeHint::Known(n) => Some(n),
            SizeHint::Unknown => None,
        }
    }

    /// Whether the size is known.
    pub fn is_known(self) -> bool {
        matches!(self, SizeHint::Known(_))
    }
}

/// Capability shared by every cursor variant.
///
/// Implementations are single-consumer: a cursor must not be driven from two
/// threads at once. `try_split` is the only way to hand part of the
/// remaining sequence to a second consumer.
pub trait Cursor<T> {
    /// Try to produce exactly one element and pass it to `action`.
    ///
    /// Returns `false` iff no further element is available from this
    /// cursor's current view. Combinators driven by a continuation predicate
    /// may also return `false` right after delivering an element.
    fn try_advance(&mut self, action: &mut dyn FnMut(T)) -> bool;

    /// Remove a disjoint prefix of the remaining elements into a new cursor.
    ///
    /// `None` means the cursor cannot be split right now.
    fn try_split(&mut self) -> Option<BoxCursor<T>>;

    /// Estimated number of remaining elements.
    fn estimate_size(&self) -> SizeHint;

    /// Structural guarantees of this cursor.
    fn characteristics(&self) -> Characteristics;

    /// Feed every remaining element to `action`.
    fn for_each_remaining(&mut self, action: &mut dyn FnMut(T)) {
        while self.try_advance(action) {}
    }

    /// Whether all of `flags` are reported by `characteristics`.
    fn has_characteristics(&self, flags: Characteristics) -> bool {
        self.characteristics().contains(flags)
    }

    /// Take back `prefix`, the cursor this one last returned from
    /// `try_split`, restoring the sequence as it was before the split.
    ///
    /// `prefix` is handed back when the cursor cannot absorb it. The caller
    /// must then deliver `prefix` before this cursor itself, which is only
    /// correct for cursors whose split-off part is a contiguous prefix.
    fn try_rejoin(&mut self, prefix: BoxCursor<T>) -> Result<(), BoxCursor<T>> {
        Err(prefix)
    }

    /// Give up the cursors this one is composed of, in order, leaving it
    /// empty. Leaf cursors have no parts.
    fn take_parts(&mut self) -> Vec<BoxCursor<T>> {
        Vec::new()
    }
}

impl<T, C> Cursor<T> for Box<C>
where
    C: Cursor<T> + ?Sized,
{
    fn try_advance(&mut self, action: &mut dyn FnMut(T)) -> bool {
        (**self).try_advance(action)
    }

    fn try_split(&mut self) -> Option<BoxCursor<T>> {
        (**self).try_split()
    }

    fn estimate_size(&self) -> SizeHint {
        (**self).estimate_size()
    }

    fn characteristics(&self) -> Characteristics {
        (**self).characteristics()
    }

    fn for_each_remaining(&mut self, action: &mut dyn FnMut(T)) {
        (**self).for_each_remaining(action)
    }

    fn try_rejoin(&mut self, prefix: BoxCursor<T>) -> Result<(), BoxCursor<T>> {
        (**self).try_rejoin(prefix)
    }

    fn take_parts(&mut self) -> Vec<BoxCursor<T>> {
        (**self).take_parts()
    }
}

/// Convert a cursor into an [`Iterator`].
pub fn iter<T, C>(cursor: C) -> CursorIter<T, C>
where
    C: Cursor<T>,
{
    CursorIter::new(cursor)
}
