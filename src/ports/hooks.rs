//! Notification hooks fired around link and unlink mutations.

use uuid::Uuid;

/// Receives link lifecycle events from the store.
///
/// Calls are synchronous on the mutating thread. `before_unlink` runs while
/// the store's lock is held, so implementations must never call back into
/// the store from it. `after_link` and `after_unlink` run once the lock has
/// been released and may read the store freely.
pub trait LinkHooks: Send + Sync {
    /// Called after `local_id` was linked to `external_id`.
    fn after_link(&self, external_id: &str, local_id: Uuid) {
        let _ = (external_id, local_id);
    }

    /// Called inside the lock, right before `local_ids` are unlinked from `external_id`.
    fn before_unlink(&self, local_ids: &[Uuid], external_id: &str) {
        let _ = (local_ids, external_id);
    }

    /// Called after `local_ids` were unlinked from `external_id`.
    fn after_unlink(&self, local_ids: &[Uuid], external_id: &str) {
        let _ = (local_ids, external_id);
    }
}

/// Hooks that ignore every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl LinkHooks for NoopHooks {}
