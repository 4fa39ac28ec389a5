//! Outcome of resolving a presented key against the remote authority.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A key the authority recognises, as returned by `/internal/authorized_keys`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizedKey {
    /// Identifier of the key record.
    pub id: i64,
    /// Key material to embed in the authorized entry.
    pub key: String,
}

/// Tagged result of asking the authority about a key.
///
/// `NotFound` and `AuthorityError` render identically for `sshd` but stay
/// distinct so the cause survives into logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The authority mapped the key to a known identity.
    Found(AuthorizedKey),

    /// The authority answered and rejected the key.
    NotFound { reason: String },

    /// The authority could not give an answer (unreachable, 5xx, bad body, deadline).
    AuthorityError { reason: String },
}

impl Resolution {
    /// Whether the key resolved to an identity.
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    /// Stable name of the variant, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Resolution::Found(_) => "found",
            Resolution::NotFound { .. } => "not_found",
            Resolution::AuthorityError { .. } => "authority_error",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Found(key) => write!(f, "found (id {})", key.id),
            Resolution::NotFound { reason } => write!(f, "not found: {reason}"),
            Resolution::AuthorityError { reason } => write!(f, "authority error: {reason}"),
        }
    }
}
