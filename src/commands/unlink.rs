//! `linkstore unlink` command.

use super::save;
use crate::cli::Target;
use crate::store::LinkStore;

/// Execute the `unlink` command. Nothing is saved when nothing was linked.
///
/// # Errors
///
/// Returns an error string if the save fails.
pub fn run(store: &LinkStore, target: &Target) -> Result<(), String> {
    let removed = match (target.local, target.external.as_deref()) {
        (Some(local_id), _) => {
            if let Some(external_id) = store.unlink_local(local_id) {
                println!("Unlinked {local_id} from {external_id}");
                true
            } else {
                false
            }
        }
        (None, Some(external_id)) => {
            let local_ids = store.unlink_external(external_id);
            for local_id in &local_ids {
                println!("Unlinked {local_id} from {external_id}");
            }
            !local_ids.is_empty()
        }
        (None, None) => return Err("unlink needs --local or --external".to_string()),
    };

    if removed {
        save(store)
    } else {
        println!("Nothing to unlink.");
        Ok(())
    }
}
