//! Integration tests for the link store over a real links file.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use linkstore::adapters::memory::MemoryPairingCodes;
use linkstore::ports::LinkHooks;
use linkstore::{LinkOutcome, LinkStore, ServiceContext};
use parking_lot::Mutex;
use uuid::Uuid;

fn open(path: &Path) -> LinkStore {
    let (store, loaded) = LinkStore::open(ServiceContext::live(), path);
    loaded.expect("links file should load");
    store
}

#[test]
fn single_link_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("linkedaccounts.json");
    let local = Uuid::new_v4();

    let store = open(&path);
    store.link("123456789", local).unwrap();
    store.save().unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw, serde_json::json!({ "123456789": local.to_string() }));

    let reloaded = open(&path);
    assert_eq!(reloaded.linked_accounts(), store.linked_accounts());
}

#[test]
fn multiple_links_round_trip_as_a_set() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("linkedaccounts.json");
    let locals: HashSet<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();

    let store = open(&path);
    for local in &locals {
        store.link("123456789", *local).unwrap();
    }
    store.save().unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["123456789"].as_array().map(Vec::len), Some(3));

    let reloaded = open(&path);
    let loaded: HashSet<Uuid> = reloaded.local_ids("123456789").into_iter().collect();
    assert_eq!(loaded, locals);
    assert_eq!(reloaded.count(), 1);
}

#[test]
fn corrupt_entry_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("linkedaccounts.json");
    let good = Uuid::new_v4();
    std::fs::write(&path, format!(r#"{{"111": "{good}", "222": "definitely not a uuid"}}"#))
        .unwrap();

    let (store, loaded) = LinkStore::open(ServiceContext::live(), &path);
    let summary = loaded.unwrap();

    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(store.count(), 1);
    assert_eq!(store.local_ids("111"), vec![good]);
}

#[test]
fn zero_length_file_is_an_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("linkedaccounts.json");
    std::fs::write(&path, "").unwrap();

    let store = open(&path);

    assert_eq!(store.count(), 0);
    assert!(store.linked_accounts().is_empty());
}

#[test]
fn emptied_accounts_are_not_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("linkedaccounts.json");
    let local = Uuid::new_v4();

    let store = open(&path);
    store.link("gone", local).unwrap();
    store.link("kept", Uuid::new_v4()).unwrap();
    store.unlink_local(local);
    store.save().unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(raw.get("gone").is_none());
    assert!(raw.get("kept").is_some());
}

#[test]
fn handshake_links_and_consumes_code() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("linkedaccounts.json");
    let store = open(&path);
    let codes = MemoryPairingCodes::new();
    let local = Uuid::new_v4();
    codes.insert("1234", local);

    let outcome = store.complete_linking("12ab34", "discord-1", &codes).unwrap();
    assert!(outcome.is_linked());
    assert_eq!(store.external_id(local).as_deref(), Some("discord-1"));

    let again = store.complete_linking("12ab34", "discord-1", &codes).unwrap();
    assert_eq!(again, LinkOutcome::UnknownCode { code: "1234".into() });

    let short = store.complete_linking("123", "discord-1", &codes).unwrap();
    assert_eq!(short, LinkOutcome::InvalidCode { code: "123".into() });
}

#[test]
fn issued_code_completes_a_link() {
    let (store, _) = LinkStore::open(ServiceContext::in_memory(), "/links.json");
    let codes = MemoryPairingCodes::new();
    let local = Uuid::new_v4();
    let code = codes.issue(local).unwrap();

    let outcome = store.complete_linking(&format!(" {code} "), "discord-9", &codes).unwrap();

    assert_eq!(
        outcome,
        LinkOutcome::Linked { external_id: "discord-9".into(), local_ids: vec![local] }
    );
}

#[derive(Default)]
struct Counts {
    links: Mutex<usize>,
    unlinks: Mutex<usize>,
}

/// Counts pairs added and removed as reported by the hooks.
struct CountingHooks(Arc<Counts>);

impl LinkHooks for CountingHooks {
    fn after_link(&self, _external_id: &str, _local_id: Uuid) {
        *self.0.links.lock() += 1;
    }

    fn after_unlink(&self, local_ids: &[Uuid], _external_id: &str) {
        *self.0.unlinks.lock() += local_ids.len();
    }
}

#[test]
fn concurrent_mutation_keeps_indexes_mirrored() {
    let counts = Arc::new(Counts::default());
    let ctx = ServiceContext::in_memory().with_hooks(CountingHooks(Arc::clone(&counts)));
    let (store, _) = LinkStore::open(ctx, "/links.json");
    let locals: Vec<Uuid> = (0..16).map(|_| Uuid::new_v4()).collect();
    let externals = ["a", "b", "c", "d"];

    std::thread::scope(|scope| {
        for worker in 0..4usize {
            let store = &store;
            let locals = &locals;
            scope.spawn(move || {
                for step in 0..500usize {
                    let local = locals[(worker * 31 + step * 7) % locals.len()];
                    let external = externals[(worker + step) % externals.len()];
                    match step % 6 {
                        0..=3 => store.link(external, local).unwrap(),
                        4 => {
                            store.unlink_local(local);
                        }
                        _ => {
                            store.unlink_external(external);
                        }
                    }
                }
            });
        }
        scope.spawn(|| {
            for _ in 0..500 {
                let snapshot = store.linked_accounts();
                let mut seen = HashSet::new();
                for ids in snapshot.values() {
                    assert!(!ids.is_empty());
                    for id in ids {
                        assert!(seen.insert(*id), "{id} listed under two external ids");
                    }
                }
            }
        });
    });

    for (external_id, local_ids) in store.linked_accounts() {
        for local_id in local_ids {
            assert_eq!(store.external_id(local_id).as_deref(), Some(external_id.as_str()));
        }
    }
    let linked = *counts.links.lock();
    let unlinked = *counts.unlinks.lock();
    assert_eq!(linked - unlinked, store.link_count());
}
