//! `keyward authorized-keys-check <expected-username> <actual-username> <key>`
//!
//! Configured in `sshd_config` as:
//!
//! ```text
//! AuthorizedKeysCommand /opt/keyward/bin/keyward authorized-keys-check git %u %k
//! AuthorizedKeysCommandUser git
//! ```

use keyward_authority::{HttpKeyAuthority, KeyAuthority};
use keyward_core::{AuthorizedKeysArgs, KeywardConfig};
use keyward_resolver::KeyResolver;
use std::io::Write;
use std::sync::Arc;

/// Resolve the presented key and write the entry (or comment) to `out`.
pub async fn run<W: Write + ?Sized>(
    config: Arc<KeywardConfig>,
    args: AuthorizedKeysArgs,
    out: &mut W,
) -> anyhow::Result<()> {
    let authority: Arc<dyn KeyAuthority> = Arc::new(HttpKeyAuthority::new(&config)?);
    let resolver = KeyResolver::new(config, authority, args);
    resolver.execute(out).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyward_authority::testing::TestAuthority;
    use tempfile::tempdir;

    fn args(key: &str) -> AuthorizedKeysArgs {
        AuthorizedKeysArgs::parse(&["git".to_string(), "git".to_string(), key.to_string()])
            .unwrap()
    }

    #[tokio::test]
    async fn test_run_found() {
        let server = TestAuthority::start().await.unwrap();
        let dir = tempdir().unwrap();
        let config = Arc::new(KeywardConfig::new(dir.path(), server.url()));

        let mut out = Vec::new();
        run(config, args("key"), &mut out).await.unwrap();

        let expected = format!(
            "command=\"{}/bin/gitlab-shell key-1\",no-port-forwarding,no-X11-forwarding,no-agent-forwarding,no-pty public-key\n",
            dir.path().display()
        );
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[tokio::test]
    async fn test_run_not_found_still_succeeds() {
        let server = TestAuthority::start().await.unwrap();
        let config = Arc::new(KeywardConfig::new("/tmp", server.url()));

        let mut out = Vec::new();
        run(config, args("missing"), &mut out).await.unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "# No key was found for missing\n"
        );
    }
}
