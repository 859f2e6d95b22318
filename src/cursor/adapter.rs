//! Iterator adapter over cursors

use std::marker::PhantomData;

use super::Cursor;

/// [`Iterator`] over the elements of a cursor.
///
/// Calls that report "keep going" without delivering an element (a cyclic
/// or generated cursor rebuilding its source) are retried transparently.
/// Iteration ends after the first `false`, including the element that
/// accompanied it.
#[derive(Debug)]
pub struct CursorIter<T, C> {
    cursor: C,
    finished: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T, C> CursorIter<T, C>
where
    C: Cursor<T>,
{
    /// Wrap `cursor`
    pub fn new(cursor: C) -> Self {
        Self {
            cursor,
            finished: false,
            _marker: PhantomData,
        }
    }

    /// Give back the wrapped cursor
    pub fn into_inner(self) -> C {
        self.cursor
    }
}

impl<T, C> Iterator for CursorIter<T, C>
where
    C: Cursor<T>,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        while !self.finished {
            let mut slot = None;
            let more = self.cursor.try_advance(&mut |item| slot = Some(item));
            if !more {
                self.finished = true;
            }
            if slot.is_some() {
                return slot;
            }
        }
        None
    }
}
