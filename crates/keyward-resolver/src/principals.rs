//! `AuthorizedPrincipalsCommand` resolution.

use keyward_core::{AuthorizedPrincipalsArgs, KeywardConfig};
use std::io::Write;
use std::sync::Arc;

use crate::error::ResolverError;
use crate::line::{self, CommandToken};

/// Fans a certificate key id out over the certificate's principals.
///
/// The certificate has already been validated by `sshd`, so no authority is
/// consulted.
pub struct PrincipalResolver {
    config: Arc<KeywardConfig>,
    args: AuthorizedPrincipalsArgs,
}

impl PrincipalResolver {
    pub fn new(config: Arc<KeywardConfig>, args: AuthorizedPrincipalsArgs) -> Self {
        Self { config, args }
    }

    /// Write one entry per principal, in order. Returns the number written.
    pub fn execute<W: Write + ?Sized>(&self, out: &mut W) -> Result<usize, ResolverError> {
        let token = CommandToken::Username(self.args.key_id.clone());
        let command = line::forced_command(&self.config.shell_path(), &token);

        for principal in &self.args.principals {
            line::write_line(out, &line::render(&command, principal))?;
        }

        tracing::info!(
            key_id = %self.args.key_id,
            principal_count = self.args.principals.len(),
            "Principals resolved"
        );
        Ok(self.args.principals.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn entry(principal: &str) -> String {
        format!(
            "command=\"/tmp/bin/gitlab-shell username-key\",no-port-forwarding,no-X11-forwarding,no-agent-forwarding,no-pty {principal}\n"
        )
    }

    fn run(key_id: &str, principals: &[&str]) -> String {
        let config = Arc::new(KeywardConfig::new("/tmp", "http://localhost"));
        let resolver = PrincipalResolver::new(
            config,
            AuthorizedPrincipalsArgs {
                key_id: key_id.to_string(),
                principals: principals.iter().map(|p| p.to_string()).collect(),
            },
        );
        let mut out = Vec::new();
        let written = resolver.execute(&mut out).unwrap();
        assert_eq!(written, principals.len());
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_single_principal() {
        assert_eq!(run("key", &["principal"]), entry("principal"));
    }

    #[test]
    fn test_multiple_principals_in_order() {
        assert_eq!(
            run("key", &["principal-1", "principal-2"]),
            format!("{}{}", entry("principal-1"), entry("principal-2"))
        );
    }

    #[test]
    fn test_duplicates_preserved() {
        assert_eq!(
            run("key", &["dup", "dup"]),
            format!("{}{}", entry("dup"), entry("dup"))
        );
    }

    #[test]
    fn test_empty_principals_write_nothing() {
        assert_eq!(run("key", &[]), "");
    }

    /// Accepts one write, then fails.
    struct OneShotSink {
        written: Vec<u8>,
        writes: usize,
    }

    impl Write for OneShotSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.writes > 0 {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
            }
            self.writes += 1;
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_stops_at_first_sink_failure() {
        let config = Arc::new(KeywardConfig::new("/tmp", "http://localhost"));
        let resolver = PrincipalResolver::new(
            config,
            AuthorizedPrincipalsArgs {
                key_id: "key".to_string(),
                principals: vec!["principal-1".to_string(), "principal-2".to_string()],
            },
        );

        let mut sink = OneShotSink {
            written: Vec::new(),
            writes: 0,
        };
        let err = resolver.execute(&mut sink).unwrap_err();
        assert!(matches!(err, ResolverError::Output(_)));
        assert_eq!(String::from_utf8(sink.written).unwrap(), entry("principal-1"));
    }
}
