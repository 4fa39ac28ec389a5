//! Error types for the resolvers.

use thiserror::Error;

/// Errors that abort a resolution.
///
/// Authority rejections and failures are outcomes, not errors; only the
/// output sink can fail an invocation.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// Writing to the output sink failed.
    #[error("failed to write authorized entry: {0}")]
    Output(#[from] std::io::Error),
}
