//! `linkstore lookup` command.

use crate::cli::Target;
use crate::store::LinkStore;

/// Execute the `lookup` command.
///
/// # Errors
///
/// Returns an error string when the id has no link.
pub fn run(store: &LinkStore, target: &Target) -> Result<(), String> {
    println!("{}", render(store, target)?);
    Ok(())
}

/// Resolves the counterpart(s) of the target id, one per line.
///
/// # Errors
///
/// Returns an error string when the id has no link.
pub fn render(store: &LinkStore, target: &Target) -> Result<String, String> {
    match (target.local, target.external.as_deref()) {
        (Some(local_id), _) => {
            store.external_id(local_id).ok_or_else(|| format!("{local_id} is not linked"))
        }
        (None, Some(external_id)) => {
            let local_ids = store.local_ids(external_id);
            if local_ids.is_empty() {
                return Err(format!("{external_id} is not linked"));
            }
            let lines: Vec<String> = local_ids.iter().map(ToString::to_string).collect();
            Ok(lines.join("\n"))
        }
        (None, None) => Err("lookup needs --local or --external".to_string()),
    }
}
