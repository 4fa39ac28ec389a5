//! Rendering of `authorized_keys` / `authorized_principals` entries.
//!
//! Neither the forced command nor the payload is escaped. Identifiers come
//! from the authority or from an already validated certificate and are
//! expected to be plain token/key material.

use std::fmt;
use std::io::Write;
use std::path::Path;

use crate::error::ResolverError;

/// Options applied to every entry after the forced command.
const RESTRICTIONS: &str = "no-port-forwarding,no-X11-forwarding,no-agent-forwarding,no-pty";

/// Argument handed to the forced shell, identifying who logged in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandToken {
    /// Key record id from the authority.
    Key(i64),
    /// Certificate key id.
    Username(String),
}

impl fmt::Display for CommandToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandToken::Key(id) => write!(f, "key-{id}"),
            CommandToken::Username(key_id) => write!(f, "username-{key_id}"),
        }
    }
}

/// `<shell_path> <token>`.
pub fn forced_command(shell_path: &Path, token: &CommandToken) -> String {
    format!("{} {}", shell_path.display(), token)
}

/// One complete entry, newline terminated.
pub fn render(forced_command: &str, payload: &str) -> String {
    format!("command=\"{forced_command}\",{RESTRICTIONS} {payload}\n")
}

/// Comment emitted when a presented key does not resolve.
pub fn not_found_comment(presented_key: &str) -> String {
    format!("# No key was found for {presented_key}\n")
}

/// Write one complete line and flush it.
pub(crate) fn write_line<W: Write + ?Sized>(out: &mut W, line: &str) -> Result<(), ResolverError> {
    out.write_all(line.as_bytes())?;
    out.flush()?;
    Ok(())
}
