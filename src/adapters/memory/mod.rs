//! In-process adapters.
//!
//! Used by tests and by embedders that keep everything in one process
//! (the pairing-code registry has no durable form).

pub mod clock;
pub mod filesystem;
pub mod pairing;

pub use clock::FixedClock;
pub use filesystem::MemoryFileSystem;
pub use pairing::MemoryPairingCodes;
