//! `AuthorizedKeysCommand` resolution.

use keyward_authority::{KeyAuthority, LookupError};
use keyward_core::{AuthorizedKeysArgs, KeywardConfig, Resolution};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::error::ResolverError;
use crate::line::{self, CommandToken};

/// Deadline used when the configured timeout does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Resolves one presented public key into an authorized entry.
///
/// One instance serves one connection attempt. Configuration and authority
/// are shared read-only between instances.
pub struct KeyResolver {
    config: Arc<KeywardConfig>,
    authority: Arc<dyn KeyAuthority>,
    args: AuthorizedKeysArgs,
}

impl KeyResolver {
    pub fn new(
        config: Arc<KeywardConfig>,
        authority: Arc<dyn KeyAuthority>,
        args: AuthorizedKeysArgs,
    ) -> Self {
        Self {
            config,
            authority,
            args,
        }
    }

    /// Resolve and write the result, bounded by the configured read timeout.
    pub async fn execute<W: Write + ?Sized>(
        &self,
        out: &mut W,
    ) -> Result<Resolution, ResolverError> {
        self.execute_with_deadline(out, self.default_deadline()).await
    }

    /// Resolve and write the result, giving up on the authority at `deadline`.
    ///
    /// Writes exactly one line. Only a failing sink is reported as an error;
    /// rejections and authority failures produce the not-found comment.
    pub async fn execute_with_deadline<W: Write + ?Sized>(
        &self,
        out: &mut W,
        deadline: Instant,
    ) -> Result<Resolution, ResolverError> {
        if !self.args.users_match() {
            // Accepted as-is; mismatch policy is left to sshd configuration.
            tracing::debug!(
                expected_user = %self.args.expected_user,
                actual_user = %self.args.actual_user,
                "Expected and actual user differ"
            );
        }

        let resolution = self.resolve_before(deadline).await;

        match &resolution {
            Resolution::Found(found) => {
                tracing::info!(key_id = found.id, outcome = resolution.kind(), "Key resolved");
            }
            Resolution::NotFound { reason } => {
                tracing::info!(outcome = resolution.kind(), %reason, "Key not found");
            }
            Resolution::AuthorityError { reason } => {
                tracing::warn!(outcome = resolution.kind(), %reason, "Authority lookup failed");
            }
        }

        line::write_line(out, &self.line_for(&resolution))?;
        Ok(resolution)
    }

    /// Resolve without writing, bounded by the configured read timeout.
    pub async fn resolve(&self) -> Resolution {
        self.resolve_before(self.default_deadline()).await
    }

    /// Now plus the configured read timeout, saturating at [`FAR_FUTURE`].
    fn default_deadline(&self) -> Instant {
        let now = Instant::now();
        now.checked_add(self.config.read_timeout())
            .unwrap_or_else(|| now + FAR_FUTURE)
    }

    /// Resolve without writing. A single authority round trip; expiry of
    /// `deadline` cancels it and counts as an authority error.
    pub async fn resolve_before(&self, deadline: Instant) -> Resolution {
        let lookup = self.authority.lookup_key(&self.args.key);

        match tokio::time::timeout_at(deadline, lookup).await {
            Ok(Ok(found)) => Resolution::Found(found),
            Ok(Err(err)) => err.into(),
            Err(_) => LookupError::Timeout.into(),
        }
    }

    /// Line written for a given outcome.
    pub fn line_for(&self, resolution: &Resolution) -> String {
        match resolution {
            Resolution::Found(found) => {
                let command =
                    line::forced_command(&self.config.shell_path(), &CommandToken::Key(found.id));
                line::render(&command, &found.key)
            }
            Resolution::NotFound { .. } | Resolution::AuthorityError { .. } => {
                line::not_found_comment(&self.args.key)
            }
        }
    }
}
