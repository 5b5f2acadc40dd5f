//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the link store and an
//! external system (time, filesystem, notifications, pairing codes).
//! Implementations live in `src/adapters/`.

pub mod clock;
pub mod filesystem;
pub mod hooks;
pub mod pairing;

pub use clock::Clock;
pub use filesystem::FileSystem;
pub use hooks::{LinkHooks, NoopHooks};
pub use pairing::PairingCodes;
