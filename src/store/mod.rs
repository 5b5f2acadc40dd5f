//! Link store: the durable association between external and local accounts.
//!
//! An external id (opaque string) may hold any number of local ids
//! (UUIDs); a local id is linked to at most one external id. Both directions
//! are indexed and kept mirror-consistent behind a single lock.
//!
//! The backing file is read once when the store is opened and written only
//! when [`LinkStore::save`] is called. All I/O goes through the
//! [`ServiceContext`] ports.

mod codec;
pub mod handshake;
mod index;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::context::ServiceContext;
use crate::error::StoreError;

pub use handshake::{LinkOutcome, CANONICAL_CODE_LENGTH};
use index::LinkIndex;

/// What a load recovered from the backing file.
#[derive(Debug, Default)]
pub struct LoadSummary {
    /// Pairs present in the store after loading.
    pub links: usize,
    /// Entries recovered by reading them with key and values swapped.
    pub reversed: usize,
    /// One [`StoreError::EntryCorrupt`] per skipped entry.
    pub skipped: Vec<StoreError>,
    /// The file held a bare JSON primitive and was read as empty.
    pub primitive_document: bool,
}

/// Outcome of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    /// External ids written.
    pub accounts: usize,
    /// Pairs written.
    pub links: usize,
    /// Time spent snapshotting and writing.
    pub elapsed: Duration,
    /// When the write completed.
    pub saved_at: DateTime<Utc>,
}

/// Rejects blank and whitespace-only external ids.
fn ensure_external_id(external_id: &str) -> Result<(), StoreError> {
    if external_id.trim().is_empty() {
        return Err(StoreError::InvalidArgument("blank external ids are not allowed".to_string()));
    }
    Ok(())
}

/// Bidirectional external/local account link store.
pub struct LinkStore {
    ctx: ServiceContext,
    path: PathBuf,
    links: Mutex<LinkIndex>,
    last_saved: Mutex<Option<DateTime<Utc>>>,
}

impl LinkStore {
    /// Opens the store backed by `path`, loading whatever it holds.
    ///
    /// The store is always returned. A missing or empty file loads as an
    /// empty store. When the load fails outright the store is empty and the
    /// error comes back alongside it; the file is left untouched.
    pub fn open(
        ctx: ServiceContext,
        path: impl Into<PathBuf>,
    ) -> (Self, Result<LoadSummary, StoreError>) {
        let store = Self {
            ctx,
            path: path.into(),
            links: Mutex::new(LinkIndex::default()),
            last_saved: Mutex::new(None),
        };
        let loaded = store.load();
        if let Err(err) = &loaded {
            error!(%err, "failed to load linked accounts");
        }
        (store, loaded)
    }

    fn load(&self) -> Result<LoadSummary, StoreError> {
        if !self.ctx.fs.exists(&self.path) {
            return Ok(LoadSummary::default());
        }
        let contents = self
            .ctx
            .fs
            .read_to_string(&self.path)
            .map_err(|source| StoreError::Read { path: self.path.clone(), source })?;
        let decoded = codec::decode(&contents)
            .map_err(|reason| StoreError::Parse { path: self.path.clone(), reason })?;

        if decoded.primitive_document {
            warn!(path = %self.path.display(), "links file holds a bare JSON value; treating it as empty");
        }
        for err in &decoded.skipped {
            warn!(
                %err,
                path = %self.path.display(),
                "skipping unreadable entry; deleting the links file is strongly recommended"
            );
        }

        let mut links = self.links.lock();
        for (external_id, local_id) in decoded.pairs {
            links.insert(&external_id, local_id);
        }
        Ok(LoadSummary {
            links: links.link_count(),
            reversed: decoded.reversed,
            skipped: decoded.skipped,
            primitive_document: decoded.primitive_document,
        })
    }

    /// Writes the current links to the backing file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Save`] with the underlying cause when the write
    /// fails. In-memory state and [`LinkStore::last_saved`] are unchanged.
    pub fn save(&self) -> Result<SaveReport, StoreError> {
        let started = self.ctx.clock.now();
        let (document, accounts, links) = {
            let index = self.links.lock();
            (codec::encode(index.by_external()), index.account_count(), index.link_count())
        };

        if let Err(source) = self.ctx.fs.write(&self.path, &document) {
            let err = StoreError::Save { path: self.path.clone(), source };
            error!(%err, "failed to save linked accounts");
            return Err(err);
        }

        let saved_at = self.ctx.clock.now();
        let elapsed = (saved_at - started).to_std().unwrap_or_default();
        *self.last_saved.lock() = Some(saved_at);
        info!(accounts, links, elapsed_ms = %elapsed.as_millis(), "saved linked accounts");
        Ok(SaveReport { accounts, links, elapsed, saved_at })
    }

    /// Links `local_id` to `external_id`.
    ///
    /// A local id already linked elsewhere is unlinked first, within the
    /// same critical section, firing the unlink hooks for the old link.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidArgument`] for a blank external id; the
    /// store is not touched.
    pub fn link(&self, external_id: &str, local_id: Uuid) -> Result<(), StoreError> {
        ensure_external_id(external_id)?;
        debug!(%external_id, %local_id, "file backed link");

        let previous = {
            let mut links = self.links.lock();
            let previous = links.external_of(local_id).map(str::to_owned);
            if let Some(previous) = &previous {
                self.ctx.hooks.before_unlink(&[local_id], previous);
                links.remove_local(local_id);
            }
            links.insert(external_id, local_id);
            previous
        };

        if let Some(previous) = previous {
            self.ctx.hooks.after_unlink(&[local_id], &previous);
        }
        self.ctx.hooks.after_link(external_id, local_id);
        Ok(())
    }

    /// Unlinks a local id. Returns the external id it was linked to.
    ///
    /// Unknown ids are a no-op and fire no hooks.
    pub fn unlink_local(&self, local_id: Uuid) -> Option<String> {
        let external_id = {
            let mut links = self.links.lock();
            let external_id = links.external_of(local_id)?.to_string();
            self.ctx.hooks.before_unlink(&[local_id], &external_id);
            links.remove_local(local_id);
            external_id
        };
        debug!(%external_id, %local_id, "unlinked local account");
        self.ctx.hooks.after_unlink(&[local_id], &external_id);
        Some(external_id)
    }

    /// Unlinks every local id held by an external id, all at once.
    ///
    /// Returns the removed local ids; empty (and no hooks) when there were none.
    pub fn unlink_external(&self, external_id: &str) -> Vec<Uuid> {
        let local_ids = {
            let mut links = self.links.lock();
            let local_ids = links.locals_of(external_id).to_vec();
            if local_ids.is_empty() {
                return local_ids;
            }
            self.ctx.hooks.before_unlink(&local_ids, external_id);
            links.remove_external(external_id);
            local_ids
        };
        debug!(%external_id, count = local_ids.len(), "unlinked external account");
        self.ctx.hooks.after_unlink(&local_ids, external_id);
        local_ids
    }

    /// External id linked to `local_id`.
    #[must_use]
    pub fn external_id(&self, local_id: Uuid) -> Option<String> {
        self.links.lock().external_of(local_id).map(str::to_owned)
    }

    /// Local ids linked to `external_id`, in link order.
    #[must_use]
    pub fn local_ids(&self, external_id: &str) -> Vec<Uuid> {
        self.links.lock().locals_of(external_id).to_vec()
    }

    /// Batch form of [`LinkStore::external_id`]. Unlinked ids are left out.
    #[must_use]
    pub fn many_external_ids(&self, local_ids: &HashSet<Uuid>) -> HashMap<Uuid, String> {
        let links = self.links.lock();
        local_ids
            .iter()
            .filter_map(|l| links.external_of(*l).map(|e| (*l, e.to_string())))
            .collect()
    }

    /// Batch form of [`LinkStore::local_ids`], one row per external id.
    ///
    /// An external id holding several local ids reports only the most
    /// recently linked one. Unlinked ids are left out.
    #[must_use]
    pub fn many_local_ids(&self, external_ids: &HashSet<String>) -> HashMap<String, Uuid> {
        let links = self.links.lock();
        let mut results = HashMap::new();
        for external_id in external_ids {
            for local_id in links.locals_of(external_id) {
                results.insert(external_id.clone(), *local_id);
            }
        }
        results
    }

    /// Number of external ids holding at least one link.
    #[must_use]
    pub fn count(&self) -> usize {
        self.links.lock().account_count()
    }

    /// Total number of `(external, local)` pairs.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.links.lock().link_count()
    }

    /// Snapshot of every external id and its local ids.
    #[must_use]
    pub fn linked_accounts(&self) -> BTreeMap<String, Vec<Uuid>> {
        self.links.lock().by_external().clone()
    }

    /// When the last successful save completed.
    #[must_use]
    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        *self.last_saved.lock()
    }

    /// Backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(test)]
    fn is_consistent(&self) -> bool {
        self.links.lock().is_consistent()
    }
}
