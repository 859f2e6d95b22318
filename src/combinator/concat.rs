//! Sequential concatenation of a fixed set of cursors

use std::collections::VecDeque;
use std::fmt;

use tracing::{debug, trace};

use crate::cursor::{empty, BoxCursor, Characteristics, Cursor, SizeHint};

/// Cursor draining its children one after another.
///
/// Exhausted children are dropped from the front of the queue. Size and
/// characteristics are derived when the concatenation is built (and again
/// after a successful split):
/// - size is the sum of the children's sizes, or `Unknown` if any child is
///   unsized or the sum overflows
/// - characteristics are `ORDERED | SIZED | SUBSIZED` intersected with every
///   child's, minus the size flags when the size is `Unknown`
pub struct ConcatenatedCursor<T> {
    children: VecDeque<BoxCursor<T>>,
    size: SizeHint,
    characteristics: Characteristics,
}

impl<T: Send + 'static> ConcatenatedCursor<T> {
    /// Concatenate `children` in iteration order.
    pub fn new<I>(children: I) -> Self
    where
        I: IntoIterator<Item = BoxCursor<T>>,
    {
        let mut cursor = Self {
            children: children.into_iter().collect(),
            size: SizeHint::Unknown,
            characteristics: Characteristics::empty(),
        };
        cursor.derive_attributes();
        cursor
    }

    /// Number of children not yet dropped.
    pub fn pending_children(&self) -> usize {
        self.children.len()
    }

    /// Whether every child has been drained and dropped.
    pub fn is_drained(&self) -> bool {
        self.children.is_empty()
    }

    fn derive_attributes(&mut self) {
        self.size = SizeHint::checked_sum(self.children.iter().map(|c| c.estimate_size()));
        let shared = self
            .children
            .iter()
            .fold(Characteristics::COMPOSABLE, |acc, c| acc & c.characteristics());
        self.characteristics = if self.size.is_known() {
            shared
        } else {
            shared.without_size()
        };
    }

    /// Undo the split of the first `prefixes.len()` children.
    ///
    /// Each child takes its prefix back itself. Only a child that cannot is
    /// wrapped as prefix-then-remainder, which keeps order for children
    /// whose split-off part is a contiguous prefix.
    fn rejoin(&mut self, prefixes: Vec<BoxCursor<T>>) {
        for (index, prefix) in prefixes.into_iter().enumerate() {
            let Err(prefix) = self.children[index].try_rejoin(prefix) else {
                continue;
            };
            let placeholder: BoxCursor<T> = Box::new(empty());
            let remainder = std::mem::replace(&mut self.children[index], placeholder);
            self.children[index] = Box::new(ConcatenatedCursor::new([prefix, remainder]));
        }
        self.derive_attributes();
    }
}

impl<T> fmt::Debug for ConcatenatedCursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcatenatedCursor")
            .field("pending_children", &self.children.len())
            .field("size", &self.size)
            .field("characteristics", &self.characteristics)
            .finish()
    }
}

impl<T: Send + 'static> Cursor<T> for ConcatenatedCursor<T> {
    fn try_advance(&mut self, action: &mut dyn FnMut(T)) -> bool {
        loop {
            let Some(head) = self.children.front_mut() else {
                return false;
            };

            let mut delivered = false;
            let advanced = head.try_advance(&mut |item| {
                delivered = true;
                action(item);
            });
            if advanced {
                return true;
            }

            self.children.pop_front();
            trace!(
                remaining = self.children.len(),
                "dropped exhausted child cursor"
            );

            // A predicate-driven child can stop on the element it delivers;
            // one element per call.
            if delivered {
                return !self.children.is_empty();
            }
        }
    }

    fn try_split(&mut self) -> Option<BoxCursor<T>> {
        if self.children.is_empty() {
            return None;
        }

        let mut prefixes = Vec::with_capacity(self.children.len());
        let mut refused = None;
        for (index, child) in self.children.iter_mut().enumerate() {
            match child.try_split() {
                Some(prefix) => prefixes.push(prefix),
                None => {
                    refused = Some(index);
                    break;
                }
            }
        }

        if let Some(index) = refused {
            debug!(
                child = index,
                rejoined = prefixes.len(),
                "child refused split, concatenation not split"
            );
            self.rejoin(prefixes);
            return None;
        }

        self.derive_attributes();
        Some(Box::new(ConcatenatedCursor::new(prefixes)))
    }

    /// Hands every part of `prefix` back to the child it was split from.
    fn try_rejoin(&mut self, mut prefix: BoxCursor<T>) -> Result<(), BoxCursor<T>> {
        let parts = prefix.take_parts();
        if parts.is_empty() {
            return Err(prefix);
        }
        if parts.len() != self.children.len() {
            let prefix: BoxCursor<T> = Box::new(ConcatenatedCursor::new(parts));
            return Err(prefix);
        }
        self.rejoin(parts);
        Ok(())
    }

    fn take_parts(&mut self) -> Vec<BoxCursor<T>> {
        let parts: Vec<BoxCursor<T>> = std::mem::take(&mut self.children).into();
        self.derive_attributes();
        parts
    }

    fn estimate_size(&self) -> SizeHint {
        self.size
    }

    fn characteristics(&self) -> Characteristics {
        self.characteristics
    }
}
