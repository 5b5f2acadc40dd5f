//! Command dispatch and handlers.

pub mod link;
pub mod list;
pub mod lookup;
pub mod unlink;

use std::env;
use std::path::{Path, PathBuf};

use crate::cli::{Cli, Command};
use crate::context::ServiceContext;
use crate::store::LinkStore;

/// Links file used when neither `--file` nor `LINKSTORE_FILE` is given.
pub const DEFAULT_FILE: &str = "linkedaccounts.json";

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the links file cannot be loaded or the
/// selected command handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let store = open_store(ServiceContext::live(), &store_path(cli.file.as_deref()))?;
    dispatch_with_store(&cli.command, &store)
}

/// Dispatch a command against an already opened store.
fn dispatch_with_store(command: &Command, store: &LinkStore) -> Result<(), String> {
    match command {
        Command::List => list::run(store),
        Command::Link { external_id, local_id } => link::run(store, external_id, *local_id),
        Command::Unlink { target } => unlink::run(store, target),
        Command::Lookup { target } => lookup::run(store, target),
    }
}

/// Opens the store, failing when the file could not be loaded at all.
///
/// Commands that save would otherwise overwrite an unreadable file with an
/// empty document.
fn open_store(ctx: ServiceContext, path: &Path) -> Result<LinkStore, String> {
    let (store, loaded) = LinkStore::open(ctx, path);
    loaded.map_err(|e| e.to_string())?;
    Ok(store)
}

fn store_path(flag: Option<&Path>) -> PathBuf {
    flag.map_or_else(
        || env::var("LINKSTORE_FILE").map_or_else(|_| PathBuf::from(DEFAULT_FILE), PathBuf::from),
        Path::to_path_buf,
    )
}

/// Saves after a mutating command, reporting the save on stderr.
fn save(store: &LinkStore) -> Result<(), String> {
    let report = store.save().map_err(|e| e.to_string())?;
    eprintln!(
        "Saved {} account(s) to {} in {}ms",
        report.accounts,
        store.path().display(),
        report.elapsed.as_millis()
    );
    Ok(())
}
