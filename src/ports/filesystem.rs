//! Filesystem port for the backing links file.

use std::path::Path;

use crate::error::PortError;

/// Provides filesystem access for reading and writing the links file.
///
/// Abstracting the filesystem lets the store run against an in-memory
/// adapter in tests without touching the real disk.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String, PortError>;

    /// Replaces the contents of a file, creating it if needed.
    ///
    /// Implementations should make the replacement atomic where the
    /// platform allows it.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, disk full, etc.).
    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError>;

    /// Returns `true` if the path exists.
    fn exists(&self, path: &Path) -> bool;
}
