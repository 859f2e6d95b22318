//! Leaf cursors backed by owned buffers or closures

use std::collections::VecDeque;
use std::fmt;
use std::marker::PhantomData;

use super::{BoxCursor, Characteristics, Cursor, SizeHint};

/// Cursor over an owned buffer.
///
/// Sized, subsized and ordered. Splitting hands the first half of the
/// remaining elements to the new cursor.
#[derive(Debug, Clone)]
pub struct VecCursor<T> {
    items: VecDeque<T>,
}

impl<T> VecCursor<T> {
    /// Create cursor over `items`
    pub fn new(items: impl Into<VecDeque<T>>) -> Self {
        Self {
            items: items.into(),
        }
    }

    /// Number of elements not yet produced
    pub fn remaining(&self) -> usize {
        self.items.len()
    }
}

impl<T> FromIterator<T> for VecCursor<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T: Send + 'static> Cursor<T> for VecCursor<T> {
    fn try_advance(&mut self, action: &mut dyn FnMut(T)) -> bool {
        match self.items.pop_front() {
            Some(item) => {
                action(item);
                true
            }
            None => false,
        }
    }

    fn try_split(&mut self) -> Option<BoxCursor<T>> {
        if self.items.len() < 2 {
            return None;
        }
        let mid = self.items.len() / 2;
        let suffix = self.items.split_off(mid);
        let prefix = std::mem::replace(&mut self.items, suffix);
        Some(Box::new(VecCursor { items: prefix }))
    }

    /// Moves the prefix's elements back into the front of the buffer.
    fn try_rejoin(&mut self, mut prefix: BoxCursor<T>) -> Result<(), BoxCursor<T>> {
        if !prefix.has_characteristics(Characteristics::SIZED) {
            return Err(prefix);
        }
        let mut items = VecDeque::with_capacity(self.items.len());
        prefix.for_each_remaining(&mut |item| items.push_back(item));
        items.append(&mut self.items);
        self.items = items;
        Ok(())
    }

    fn estimate_size(&self) -> SizeHint {
        SizeHint::Known(self.items.len() as u64)
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::COMPOSABLE
    }
}

/// Cursor pulling elements from a closure until it returns `None`.
///
/// Never splittable; size unknown.
pub struct FromFn<F> {
    next: Option<F>,
}

/// Create a cursor from a closure producing `Some(element)` until exhausted.
pub fn from_fn<T, F>(next: F) -> FromFn<F>
where
    F: FnMut() -> Option<T>,
{
    FromFn { next: Some(next) }
}

impl<F> fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromFn")
            .field("exhausted", &self.next.is_none())
            .finish()
    }
}

impl<T, F> Cursor<T> for FromFn<F>
where
    F: FnMut() -> Option<T>,
{
    fn try_advance(&mut self, action: &mut dyn FnMut(T)) -> bool {
        let Some(next) = self.next.as_mut() else {
            return false;
        };
        match next() {
            Some(item) => {
                action(item);
                true
            }
            None => {
                // Drop the closure so exhaustion stays permanent
                self.next = None;
                false
            }
        }
    }

    fn try_split(&mut self) -> Option<BoxCursor<T>> {
        None
    }

    fn estimate_size(&self) -> SizeHint {
        if self.next.is_none() {
            SizeHint::Known(0)
        } else {
            SizeHint::Unknown
        }
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::ORDERED
    }
}

/// Cursor that never produces.
pub struct Empty<T> {
    _marker: PhantomData<fn() -> T>,
}

/// Create an exhausted cursor.
pub fn empty<T>() -> Empty<T> {
    Empty {
        _marker: PhantomData,
    }
}

impl<T> fmt::Debug for Empty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Empty")
    }
}

impl<T> Cursor<T> for Empty<T> {
    fn try_advance(&mut self, _action: &mut dyn FnMut(T)) -> bool {
        false
    }

    fn try_split(&mut self) -> Option<BoxCursor<T>> {
        None
    }

    fn estimate_size(&self) -> SizeHint {
        SizeHint::Known(0)
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::COMPOSABLE
    }
}

/// Create a cursor producing `value` once.
pub fn once<T>(value: T) -> VecCursor<T> {
    VecCursor::new(VecDeque::from([value]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<T>(cursor: &mut dyn Cursor<T>) -> Vec<T> {
        let mut out = Vec::new();
        cursor.for_each_remaining(&mut |x| out.push(x));
        out
    }

    #[test]
    fn test_vec_cursor_split_halves() {
        let mut cursor = VecCursor::new(vec![1, 2, 3, 4, 5]);
        let mut prefix = cursor.try_split().expect("five elements split");

        assert_eq!(prefix.estimate_size(), SizeHint::Known(2));
        assert_eq!(cursor.estimate_size(), SizeHint::Known(3));
        assert_eq!(drain(&mut prefix), vec![1, 2]);
        assert_eq!(drain(&mut cursor), vec![3, 4, 5]);
    }

    #[test]
    fn test_vec_cursor_rejoin_restores_order() {
        let mut cursor = VecCursor::new(vec![1, 2, 3, 4, 5]);
        let prefix = cursor.try_split().expect("five elements split");

        assert!(cursor.try_rejoin(prefix).is_ok());
        assert_eq!(cursor.remaining(), 5);
        assert_eq!(drain(&mut cursor), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_vec_cursor_hands_back_unsized_prefix() {
        let mut cursor = VecCursor::new(vec![3]);
        let prefix: BoxCursor<i32> = Box::new(from_fn(|| None::<i32>));

        let mut prefix = cursor.try_rejoin(prefix).expect_err("unsized prefix refused");
        assert_eq!(prefix.estimate_size(), SizeHint::Unknown);
        assert!(!prefix.try_advance(&mut |_| {}));
        assert_eq!(drain(&mut cursor), vec![3]);
    }

    #[test]
    fn test_vec_cursor_refuses_tiny_split() {
        let mut cursor = once(7);
        assert!(cursor.try_split().is_none());
        assert_eq!(drain(&mut cursor), vec![7]);
        assert!(!cursor.try_advance(&mut |_| panic!("exhausted cursor produced")));
    }

    #[test]
    fn test_from_fn_stays_exhausted() {
        let mut calls = 0;
        let mut cursor = from_fn(move || {
            calls += 1;
            // Would resume after the first `None` if the closure were kept
            if calls == 2 {
                None
            } else {
                Some(calls)
            }
        });

        assert_eq!(cursor.estimate_size(), SizeHint::Unknown);
        assert_eq!(drain(&mut cursor), vec![1]);
        assert!(!cursor.try_advance(&mut |_| panic!("exhausted cursor produced")));
        assert_eq!(cursor.estimate_size(), SizeHint::Known(0));
        assert!(cursor.try_split().is_none());
    }

    #[test]
    fn test_empty() {
        let mut cursor = empty::<u8>();
        assert!(!cursor.try_advance(&mut |_| {}));
        assert_eq!(cursor.estimate_size(), SizeHint::Known(0));
    }
}
