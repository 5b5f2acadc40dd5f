//! `linkstore list` command.

use std::fmt::Write;

use crate::store::LinkStore;

/// Execute the `list` command.
///
/// # Errors
///
/// Never fails; the signature matches the other handlers.
pub fn run(store: &LinkStore) -> Result<(), String> {
    print!("{}", render(store));
    Ok(())
}

/// Renders one line per external id, then a total.
#[must_use]
pub fn render(store: &LinkStore) -> String {
    let accounts = store.linked_accounts();
    if accounts.is_empty() {
        return "No linked accounts.\n".to_string();
    }

    let width = accounts.keys().map(String::len).max().unwrap_or(0);
    let mut out = String::new();
    for (external_id, local_ids) in &accounts {
        let locals: Vec<String> = local_ids.iter().map(ToString::to_string).collect();
        let _ = writeln!(out, "{external_id:<width$}  {}", locals.join(", "));
    }
    let _ = writeln!(
        out,
        "\n{} account(s), {} link(s) total.",
        store.count(),
        store.link_count()
    );
    out
}
