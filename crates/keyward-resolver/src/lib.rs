//! # keyward-resolver
//!
//! Produces the lines `sshd` reads from `AuthorizedKeysCommand` and
//! `AuthorizedPrincipalsCommand`.
//!
//! Every granted entry forces `<root>/bin/gitlab-shell <token>` and disables
//! forwarding and pty allocation:
//!
//! ```text
//! command="/opt/keyward/bin/gitlab-shell key-1",no-port-forwarding,no-X11-forwarding,no-agent-forwarding,no-pty ssh-ed25519 AAAA...
//! ```
//!
//! - [`KeyResolver`] asks the remote authority about a presented key and emits
//!   one entry, or a `# No key was found for ...` comment.
//! - [`PrincipalResolver`] emits one entry per certificate principal.

pub mod error;
pub mod keys;
pub mod line;
pub mod principals;

pub use error::ResolverError;
pub use keys::KeyResolver;
pub use line::{CommandToken, render};
pub use principals::PrincipalResolver;
