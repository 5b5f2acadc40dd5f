//! Error taxonomy for the link store.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error returned by port implementations.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by [`crate::store::LinkStore`] operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A caller passed an argument the store refuses (e.g. a blank external id).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The backing file exists but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// Backing file path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: PortError,
    },

    /// The backing file is not a usable JSON document.
    #[error("failed to parse {}: {reason}", .path.display())]
    Parse {
        /// Backing file path.
        path: PathBuf,
        /// Parser diagnostic.
        reason: String,
    },

    /// One entry could not be read in either orientation and was skipped.
    #[error("corrupt entry {key:?}: {reason}")]
    EntryCorrupt {
        /// Document key of the skipped entry.
        key: String,
        /// Why neither orientation parsed.
        reason: String,
    },

    /// Writing the backing file failed.
    #[error("failed to save linked accounts to {}: {source}", .path.display())]
    Save {
        /// Backing file path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: PortError,
    },
}
