//! Hooks adapter that reports link events through `tracing`.

use tracing::info;
use uuid::Uuid;

use crate::ports::hooks::LinkHooks;

/// Logs every link and unlink at `info` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHooks;

impl LinkHooks for LoggingHooks {
    fn after_link(&self, external_id: &str, local_id: Uuid) {
        info!(%external_id, %local_id, "account linked");
    }

    fn after_unlink(&self, local_ids: &[Uuid], external_id: &str) {
        info!(%external_id, local_ids = ?local_ids, "accounts unlinked");
    }
}
