//! Completing a link with a pairing code.

use std::fmt;

use tracing::debug;
use uuid::Uuid;

use super::{ensure_external_id, LinkStore};
use crate::error::StoreError;
use crate::ports::pairing::PairingCodes;

/// Digits in a well-formed pairing code.
pub const CANONICAL_CODE_LENGTH: usize = 4;

/// Result of [`LinkStore::complete_linking`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The code was pending and the accounts are now linked.
    Linked {
        /// External id that submitted the code.
        external_id: String,
        /// Every local id now linked to `external_id`, in link order.
        local_ids: Vec<Uuid>,
    },
    /// A well-formed code that is not pending (expired, used, or never issued).
    UnknownCode {
        /// The code after stripping non-digits.
        code: String,
    },
    /// Input that cannot be a pairing code.
    InvalidCode {
        /// The code after stripping non-digits.
        code: String,
    },
}

impl LinkOutcome {
    /// Returns `true` for [`LinkOutcome::Linked`].
    #[must_use]
    pub fn is_linked(&self) -> bool {
        matches!(self, Self::Linked { .. })
    }
}

impl fmt::Display for LinkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linked { external_id, local_ids } => {
                let locals: Vec<String> = local_ids.iter().map(Uuid::to_string).collect();
                write!(f, "{external_id} is now linked to {}", locals.join(", "))
            }
            Self::UnknownCode { code } => write!(f, "unknown code {code}"),
            Self::InvalidCode { code } => {
                write!(f, "invalid code {code:?}: expected {CANONICAL_CODE_LENGTH} digits")
            }
        }
    }
}

/// Keeps only ASCII digits.
fn clean_code(code: &str) -> String {
    code.chars().filter(char::is_ascii_digit).collect()
}

impl LinkStore {
    /// Completes a pending link: resolves `code` to a local account and
    /// links it to `external_id`.
    ///
    /// Non-digits are stripped from `code` first, so `"12-34"` matches the
    /// pending code `"1234"`. The code is taken from the registry in one step,
    /// so concurrent submissions of the same code link at most once. An
    /// unresolved code yields [`LinkOutcome::UnknownCode`] when it
    /// has the canonical length and [`LinkOutcome::InvalidCode`] otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidArgument`] for a blank external id; the
    /// code stays pending.
    pub fn complete_linking(
        &self,
        code: &str,
        external_id: &str,
        codes: &dyn PairingCodes,
    ) -> Result<LinkOutcome, StoreError> {
        ensure_external_id(external_id)?;
        let code = clean_code(code);
        let Some(local_id) = codes.take(&code) else {
            debug!(%external_id, %code, "pairing code not recognised");
            return Ok(if code.len() == CANONICAL_CODE_LENGTH {
                LinkOutcome::UnknownCode { code }
            } else {
                LinkOutcome::InvalidCode { code }
            });
        };

        self.link(external_id, local_id)?;

        Ok(LinkOutcome::Linked {
            external_id: external_id.to_string(),
            local_ids: self.local_ids(external_id),
        })
    }
}
