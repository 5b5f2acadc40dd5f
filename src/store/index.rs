//! The two mirror indexes over the link relation.

use std::collections::{BTreeMap, HashMap};

use uuid::Uuid;

/// Paired `external -> [local]` and `local -> external` indexes.
///
/// Every mutation updates both sides, so for each `(e, l)` in
/// `by_external`, `by_local[l] == e` and vice versa. A local id sits under
/// at most one external id, and an external id whose list empties is
/// dropped.
#[derive(Debug, Default)]
pub(crate) struct LinkIndex {
    by_external: BTreeMap<String, Vec<Uuid>>,
    by_local: HashMap<Uuid, String>,
}

impl LinkIndex {
    /// Links `local_id` to `external_id`, detaching it from any prior owner.
    ///
    /// Returns the prior external id, if there was one.
    pub(crate) fn insert(&mut self, external_id: &str, local_id: Uuid) -> Option<String> {
        let previous = self.remove_local(local_id);
        self.by_external.entry(external_id.to_string()).or_default().push(local_id);
        self.by_local.insert(local_id, external_id.to_string());
        previous
    }

    /// Unlinks a single local id. Returns the external id it belonged to.
    pub(crate) fn remove_local(&mut self, local_id: Uuid) -> Option<String> {
        let external_id = self.by_local.remove(&local_id)?;
        if let Some(locals) = self.by_external.get_mut(&external_id) {
            locals.retain(|l| *l != local_id);
            if locals.is_empty() {
                self.by_external.remove(&external_id);
            }
        }
        Some(external_id)
    }

    /// Unlinks every local id held by `external_id`, in set order.
    pub(crate) fn remove_external(&mut self, external_id: &str) -> Vec<Uuid> {
        let locals = self.by_external.remove(external_id).unwrap_or_default();
        for local_id in &locals {
            self.by_local.remove(local_id);
        }
        locals
    }

    pub(crate) fn external_of(&self, local_id: Uuid) -> Option<&str> {
        self.by_local.get(&local_id).map(String::as_str)
    }

    pub(crate) fn locals_of(&self, external_id: &str) -> &[Uuid] {
        self.by_external.get(external_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of external ids holding at least one local id.
    pub(crate) fn account_count(&self) -> usize {
        self.by_external.len()
    }

    /// Number of `(external, local)` pairs.
    pub(crate) fn link_count(&self) -> usize {
        self.by_local.len()
    }

    pub(crate) fn by_external(&self) -> &BTreeMap<String, Vec<Uuid>> {
        &self.by_external
    }

    /// Checks the mirror invariant in both directions.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let forward = self.by_external.iter().all(|(external_id, locals)| {
            !locals.is_empty()
                && locals
                    .iter()
                    .all(|l| self.by_local.get(l).map(String::as_str) == Some(external_id.as_str()))
        });
        let backward = self
            .by_local
            .iter()
            .all(|(local_id, external_id)| self.locals_of(external_id).contains(local_id));
        let pairs: usize = self.by_external.values().map(Vec::len).sum();
        forward && backward && pairs == self.by_local.len()
    }
}
