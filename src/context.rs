//! Service context bundling the store's port trait objects.

use crate::adapters::live::{LiveClock, LiveFileSystem, LoggingHooks};
use crate::adapters::memory::MemoryFileSystem;
use crate::ports::clock::Clock;
use crate::ports::filesystem::FileSystem;
use crate::ports::hooks::{LinkHooks, NoopHooks};

/// Bundles the ports a [`crate::store::LinkStore`] talks through.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations.
pub struct ServiceContext {
    /// Filesystem holding the links file.
    pub fs: Box<dyn FileSystem>,
    /// Clock for save timing.
    pub clock: Box<dyn Clock>,
    /// Receiver of link and unlink events.
    pub hooks: Box<dyn LinkHooks>,
}

impl ServiceContext {
    /// Creates a live context: real disk, system clock, and hooks that log
    /// each event through `tracing`.
    #[must_use]
    pub fn live() -> Self {
        Self {
            fs: Box::new(LiveFileSystem),
            clock: Box::new(LiveClock),
            hooks: Box::new(LoggingHooks),
        }
    }

    /// Creates a context that never touches the disk and ignores hooks.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            fs: Box::new(MemoryFileSystem::new()),
            clock: Box::new(LiveClock),
            hooks: Box::new(NoopHooks),
        }
    }

    /// Replaces the hooks, keeping the other ports.
    #[must_use]
    pub fn with_hooks(mut self, hooks: impl LinkHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }
}
