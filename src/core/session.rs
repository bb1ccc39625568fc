use dashmap::DashSet;
use std::sync::Arc;

/// Per-user single-flight guard.
///
/// A user id is in the set for exactly the lifetime of one download.
/// `try_acquire` is a single atomic insert, so two messages racing for the
/// same user can never both win.
#[derive(Clone, Default)]
pub struct SessionTracker {
    active: Arc<DashSet<i64>>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the caller now owns the user's slot, `false` if a download is already active.
    pub fn try_acquire(&self, user_id: i64) -> bool {
        self.active.insert(user_id)
    }

    /// Frees the user's slot. Releasing a user that isn't active is a no-op.
    pub fn release(&self, user_id: i64) {
        self.active.remove(&user_id);
    }

    /// Acquires the slot and ties its release to the returned guard.
    ///
    /// # Example
    ///
    /// ```
    /// use relaybot::core::session::SessionTracker;
    ///
    /// let tracker = SessionTracker::new();
    /// let guard = tracker.acquire(42).unwrap();
    /// assert!(tracker.acquire(42).is_none());
    /// drop(guard);
    /// assert!(!tracker.is_active(42));
    /// ```
    pub fn acquire(&self, user_id: i64) -> Option<SessionGuard> {
        if self.try_acquire(user_id) {
            Some(SessionGuard {
                tracker: self.clone(),
                user_id,
            })
        } else {
            None
        }
    }

    pub fn is_active(&self, user_id: i64) -> bool {
        self.active.contains(&user_id)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

/// Releases its user's slot when dropped, on every exit path.
pub struct SessionGuard {
    tracker: SessionTracker,
    user_id: i64,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.tracker.release(self.user_id);
        log::debug!("Released download slot for user {}", self.user_id);
    }
}
