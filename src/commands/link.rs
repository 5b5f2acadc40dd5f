//! `linkstore link` command.

use uuid::Uuid;

use super::save;
use crate::store::LinkStore;

/// Execute the `link` command: link, then save.
///
/// # Errors
///
/// Returns an error string for a blank external id or a failed save.
pub fn run(store: &LinkStore, external_id: &str, local_id: Uuid) -> Result<(), String> {
    let previous = store.external_id(local_id);
    store.link(external_id, local_id).map_err(|e| e.to_string())?;
    match previous {
        Some(previous) if previous != external_id => {
            println!("Moved {local_id} from {previous} to {external_id}");
        }
        _ => println!("Linked {local_id} to {external_id}"),
    }
    save(store)
}
