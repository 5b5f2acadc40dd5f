//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

/// Top-level CLI parser for `linkstore`.
#[derive(Debug, Parser)]
#[command(name = "linkstore", version, about = "Inspect and edit linked accounts")]
pub struct Cli {
    /// Links file to operate on. Falls back to `LINKSTORE_FILE`, then
    /// `linkedaccounts.json`.
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print every external id with its local ids.
    List,
    /// Link a local account to an external account and save.
    Link {
        /// External account id.
        external_id: String,
        /// Local account UUID.
        local_id: Uuid,
    },
    /// Remove links and save.
    Unlink {
        /// Which side to unlink by.
        #[command(flatten)]
        target: Target,
    },
    /// Print the counterpart of an id.
    Lookup {
        /// Which side to look up by.
        #[command(flatten)]
        target: Target,
    },
}

/// Exactly one of a local or an external id.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct Target {
    /// Local account UUID.
    #[arg(long)]
    pub local: Option<Uuid>,
    /// External account id.
    #[arg(long)]
    pub external: Option<String>,
}
