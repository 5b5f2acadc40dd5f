//! Live adapters for real external interactions.

pub mod clock;
pub mod filesystem;
pub mod hooks;

pub use clock::LiveClock;
pub use filesystem::LiveFileSystem;
pub use hooks::LoggingHooks;
