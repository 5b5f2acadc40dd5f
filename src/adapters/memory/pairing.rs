//! In-memory pending pairing-code registry.

use std::collections::HashMap;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::ports::pairing::PairingCodes;

/// Distinct four-digit codes.
const CODE_SPACE: u16 = 10_000;

/// Pending codes kept in process memory.
#[derive(Default)]
pub struct MemoryPairingCodes {
    codes: Mutex<HashMap<String, Uuid>>,
}

impl MemoryPairingCodes {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a fresh code for `local_id`.
    ///
    /// Any code previously pending for the same account is replaced, so an
    /// account holds at most one live code. Returns `None` when every code
    /// is already pending.
    pub fn issue(&self, local_id: Uuid) -> Option<String> {
        let mut codes = self.codes.lock();
        codes.retain(|_, pending| *pending != local_id);
        if codes.len() >= usize::from(CODE_SPACE) {
            return None;
        }
        loop {
            let code = format!("{:04}", Uuid::new_v4().as_u128() % u128::from(CODE_SPACE));
            if !codes.contains_key(&code) {
                codes.insert(code.clone(), local_id);
                return Some(code);
            }
        }
    }

    /// Registers a known code, replacing any existing binding for it.
    pub fn insert(&self, code: impl Into<String>, local_id: Uuid) {
        self.codes.lock().insert(code.into(), local_id);
    }

    /// Local id a code is bound to, without consuming it.
    #[must_use]
    pub fn pending(&self, code: &str) -> Option<Uuid> {
        self.codes.lock().get(code).copied()
    }

    /// Number of codes still pending.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.lock().len()
    }

    /// Returns `true` if no codes are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.lock().is_empty()
    }
}

impl PairingCodes for MemoryPairingCodes {
    fn take(&self, code: &str) -> Option<Uuid> {
        self.codes.lock().remove(code)
    }
}
