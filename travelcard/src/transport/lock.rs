// travelcard/src/transport/lock.rs

use std::fmt;

/// A held tag lock. Dropping it releases the lock.
pub struct TagLock {
    exclusive: bool,
    release: Option<Box<dyn FnOnce()>>,
}

impl TagLock {
    /// Wrap a platform lock; `release` runs exactly once, on drop.
    pub fn new(exclusive: bool, release: impl FnOnce() + 'static) -> Self {
        Self {
            exclusive,
            release: Some(Box::new(release)),
        }
    }

    /// A lock with nothing to release, for transports without locking.
    pub fn unmanaged(exclusive: bool) -> Self {
        Self {
            exclusive,
            release: None,
        }
    }

    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }
}

impl Drop for TagLock {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for TagLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagLock")
            .field("exclusive", &self.exclusive)
            .field("managed", &self.release.is_some())
            .finish()
    }
}
