//! Single-slot cursor holder updated from another thread

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::lock_api::ArcMutexGuard;
use parking_lot::{Condvar, Mutex, RawMutex};
use tracing::{debug, trace, warn};

use super::UpdatableConfig;
use crate::cursor::{BoxCursor, Characteristics, Cursor, SizeHint};
use crate::CursorError;

/// Element transform applied to the first element after each update.
pub type Transform<T> = Arc<dyn Fn(T) -> T + Send + Sync>;

/// Installed cursor, advanced outside the slot lock.
type Installed<T> = Arc<Mutex<BoxCursor<T>>>;

/// Exclusive hold on an installed cursor, independent of the slot.
type Claimed<T> = ArcMutexGuard<RawMutex, BoxCursor<T>>;

struct Slot<T> {
    cursor: Option<Installed<T>>,
    fresh: bool,
    cancelled: bool,
    updates: u64,
}

struct Shared<T> {
    slot: Mutex<Slot<T>>,
    installed: Condvar,
}

/// Thread-safe cursor holder whose source can be swapped while consumers
/// pull from it.
///
/// Clones share the same slot: hand one to the producer thread and keep
/// another for each consumer.
///
/// States: empty until the first [`update`](UpdatableCursor::update); every
/// update marks the slot fresh; the first successful advance after an update
/// passes its element through the transform. The fresh mark is cleared when
/// a consumer reads the slot, even if the installed cursor then has nothing
/// to deliver.
pub struct UpdatableCursor<T> {
    shared: Arc<Shared<T>>,
    transform: Transform<T>,
    config: UpdatableConfig,
}

impl<T: 'static> UpdatableCursor<T> {
    /// Create an empty holder with an identity transform.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                slot: Mutex::new(Slot {
                    cursor: None,
                    fresh: false,
                    cancelled: false,
                    updates: 0,
                }),
                installed: Condvar::new(),
            }),
            transform: Arc::new(|item: T| item),
            config: UpdatableConfig::default(),
        }
    }

    /// Set the transform applied to the first element after each update.
    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        self.transform = Arc::new(transform);
        self
    }

    /// Apply a validated configuration.
    pub fn with_config(mut self, config: UpdatableConfig) -> Result<Self, CursorError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }
}

impl<T> UpdatableCursor<T> {
    /// Install `cursor` as the new source and wake a waiting consumer.
    ///
    /// Never blocks on consumers; updates after [`cancel`](Self::cancel) are
    /// ignored.
    pub fn update<C>(&self, cursor: C)
    where
        C: Cursor<T> + Send + 'static,
    {
        let mut slot = self.shared.slot.lock();
        if slot.cancelled {
            warn!("update after cancellation ignored");
            return;
        }
        let cursor: BoxCursor<T> = Box::new(cursor);
        slot.cursor = Some(Arc::new(Mutex::new(cursor)));
        slot.fresh = true;
        slot.updates += 1;
        debug!(update = slot.updates, "installed cursor");
        self.shared.installed.notify_one();
    }

    /// Abort blocked and future advances; they return `false`.
    pub fn cancel(&self) {
        let mut slot = self.shared.slot.lock();
        if !slot.cancelled {
            slot.cancelled = true;
            debug!(updates = slot.updates, "updatable cursor cancelled");
        }
        self.shared.installed.notify_all();
    }

    /// Whether [`cancel`](Self::cancel) was called.
    ///
    /// Tells a cancelled consumer apart from an exhausted one.
    pub fn is_cancelled(&self) -> bool {
        self.shared.slot.lock().cancelled
    }

    /// Whether a cursor has been installed.
    pub fn has_cursor(&self) -> bool {
        self.shared.slot.lock().cursor.is_some()
    }

    /// Number of updates accepted so far.
    pub fn update_count(&self) -> u64 {
        self.shared.slot.lock().updates
    }

    /// Shared-reference form of [`Cursor::try_advance`].
    ///
    /// Blocks until a cursor is installed, the holder is cancelled, or the
    /// configured wait timeout elapses. The slot lock is released before the
    /// installed cursor is advanced.
    pub fn advance(&self, action: &mut dyn FnMut(T)) -> bool {
        let Some((mut cursor, fresh)) = self.acquire() else {
            return false;
        };

        if fresh {
            let transform = &self.transform;
            cursor.try_advance(&mut |item| action(transform(item)))
        } else {
            cursor.try_advance(action)
        }
    }

    /// Wait for an installed cursor, lock it and consume the fresh mark.
    ///
    /// The consumer clearing the fresh mark locks the cursor before the slot
    /// is released, so no other consumer advances it ahead of the transform.
    /// A freshly installed cursor is not yet shared, so that lock never
    /// blocks while the slot is held.
    fn acquire(&self) -> Option<(Claimed<T>, bool)> {
        let deadline = self.config.wait_timeout.map(|timeout| Instant::now() + timeout);
        let mut slot = self.shared.slot.lock();
        let mut waited = false;

        while slot.cursor.is_none() && !slot.cancelled {
            waited = true;
            match deadline {
                Some(deadline) => {
                    let result = self.shared.installed.wait_until(&mut slot, deadline);
                    if result.timed_out() && slot.cursor.is_none() && !slot.cancelled {
                        debug!("timed out waiting for a cursor");
                        return None;
                    }
                }
                None => self.shared.installed.wait(&mut slot),
            }
        }

        if slot.cancelled {
            trace!("advance on cancelled updatable cursor");
            return None;
        }

        let installed = slot.cursor.clone()?;
        let fresh = std::mem::replace(&mut slot.fresh, false);
        if waited {
            // Pass the wake-up on to any other consumer still waiting
            self.shared.installed.notify_one();
        }

        if fresh {
            let claimed = installed.lock_arc();
            drop(slot);
            Some((claimed, true))
        } else {
            drop(slot);
            Some((installed.lock_arc(), false))
        }
    }
}

impl<T: 'static> Default for UpdatableCursor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for UpdatableCursor<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            transform: Arc::clone(&self.transform),
            config: self.config.clone(),
        }
    }
}

impl<T> fmt::Debug for UpdatableCursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.shared.slot.lock();
        f.debug_struct("UpdatableCursor")
            .field("installed", &slot.cursor.is_some())
            .field("fresh", &slot.fresh)
            .field("cancelled", &slot.cancelled)
            .field("updates", &slot.updates)
            .field("config", &self.config)
            .finish()
    }
}

impl<T> Cursor<T> for UpdatableCursor<T> {
    fn try_advance(&mut self, action: &mut dyn FnMut(T)) -> bool {
        self.advance(action)
    }

    fn try_split(&mut self) -> Option<BoxCursor<T>> {
        None
    }

    fn estimate_size(&self) -> SizeHint {
        SizeHint::Unknown
    }

    fn characteristics(&self) -> Characteristics {
        Characteristics::ORDERED
    }
}
