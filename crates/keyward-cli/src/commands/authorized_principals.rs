//! `keyward authorized-principals-check <key-id> <principal1> [<principal2>...]`
//!
//! Configured in `sshd_config` as:
//!
//! ```text
//! AuthorizedPrincipalsCommand /opt/keyward/bin/keyward authorized-principals-check %i sshUsers
//! AuthorizedPrincipalsCommandUser root
//! ```

use keyward_core::{AuthorizedPrincipalsArgs, KeywardConfig};
use keyward_resolver::PrincipalResolver;
use std::io::Write;
use std::sync::Arc;

/// Write one entry per principal to `out`.
pub fn run<W: Write + ?Sized>(
    config: Arc<KeywardConfig>,
    args: AuthorizedPrincipalsArgs,
    out: &mut W,
) -> anyhow::Result<()> {
    PrincipalResolver::new(config, args).execute(out)?;
    Ok(())
}
