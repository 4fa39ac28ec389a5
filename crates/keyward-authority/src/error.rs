//! Error types for authority lookups.

use keyward_core::{ConfigError, Resolution};
use thiserror::Error;

/// Errors raised while constructing an authority client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The underlying HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Build(String),

    /// The shared secret could not be read.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Ways a key lookup can fail to produce a key record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The authority answered with a 4xx status.
    #[error("authority rejected key ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The authority answered with a status that is neither success nor a rejection.
    #[error("authority returned unexpected status {status}")]
    Status { status: u16 },

    /// The request never produced a response.
    #[error("authority request failed: {0}")]
    Transport(String),

    /// A 2xx response whose body is not a key record.
    #[error("malformed authority response: {0}")]
    MalformedBody(String),

    /// The round trip did not finish before its deadline.
    #[error("authority request timed out")]
    Timeout,
}

impl LookupError {
    /// Whether the authority explicitly said no, as opposed to failing to answer.
    pub fn is_rejection(&self) -> bool {
        matches!(self, LookupError::Rejected { .. })
    }
}

impl From<LookupError> for Resolution {
    fn from(err: LookupError) -> Self {
        let reason = err.to_string();
        if err.is_rejection() {
            Resolution::NotFound { reason }
        } else {
            Resolution::AuthorityError { reason }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_maps_to_not_found() {
        let resolution = Resolution::from(LookupError::Rejected {
            status: 403,
            message: "Forbidden!".to_string(),
        });
        assert_eq!(
            resolution,
            Resolution::NotFound {
                reason: "authority rejected key (403): Forbidden!".to_string()
            }
        );
    }

    #[test]
    fn test_failures_map_to_authority_error() {
        for err in [
            LookupError::Status { status: 500 },
            LookupError::Transport("connection refused".to_string()),
            LookupError::MalformedBody("expected value".to_string()),
            LookupError::Timeout,
        ] {
            assert!(!err.is_rejection());
            assert_eq!(Resolution::from(err).kind(), "authority_error");
        }
    }
}
