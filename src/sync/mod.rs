//! Cross-thread cursor hand-off
//!
//! The only thread-safe part of the crate: a producer thread installs
//! cursors into a shared slot while consumer threads pull from whatever was
//! installed last.

mod updatable;

pub use updatable::{Transform, UpdatableCursor};

use std::time::Duration;

use crate::CursorError;

/// Configuration for [`UpdatableCursor`].
#[derive(Debug, Clone, Default)]
pub struct UpdatableConfig {
    /// Longest time a consumer waits for the first cursor to be installed.
    ///
    /// `None` waits until an update or a cancellation arrives. A timed-out
    /// wait ends like a cancelled one: `try_advance` returns `false`.
    pub wait_timeout: Option<Duration>,
}

impl UpdatableConfig {
    /// Bound the consumer's wait.
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = Some(timeout);
        self
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<(), CursorError> {
        match self.wait_timeout {
            Some(timeout) if timeout.is_zero() => Err(CursorError::InvalidConfiguration(
                "wait timeout must be > 0".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
