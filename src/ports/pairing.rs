//! Pairing-code registry port.

use uuid::Uuid;

/// Registry of pending pairing codes, each bound to a local account.
///
/// Codes passed in have already been reduced to ASCII digits.
pub trait PairingCodes: Send + Sync {
    /// Removes a pending code and returns the local id it was bound to.
    ///
    /// Must be atomic: of several concurrent calls with the same code, at
    /// most one gets `Some`.
    fn take(&self, code: &str) -> Option<Uuid>;
}
