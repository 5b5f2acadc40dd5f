//! Bidirectional identity-link store.
//!
//! Associates external-service account ids (strings) with local account
//! ids (UUIDs), persists the association as a flat JSON file, and completes
//! new links from short pairing codes. See [`store::LinkStore`].

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod context;
pub mod error;
pub mod ports;
pub mod store;

pub use context::ServiceContext;
pub use error::StoreError;
pub use store::{LinkOutcome, LinkStore, LoadSummary, SaveReport};

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli)
}
