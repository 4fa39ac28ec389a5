//! Identity claims passed in by `sshd`.
//!
//! `AuthorizedKeysCommand` supplies `<expected-username> <actual-username> <key>`,
//! `AuthorizedPrincipalsCommand` supplies `<key-id> <principal>...`. The error
//! messages are rendered as `#` comments so that anything echoed back to `sshd`
//! can never be mistaken for an authorized entry.

use thiserror::Error;

const KEYS_USAGE: &str =
    "keyward authorized-keys-check <expected-username> <actual-username> <key>";
const PRINCIPALS_USAGE: &str =
    "keyward authorized-principals-check <key-id> <principal1> [<principal2>...]";

/// Errors raised while validating command arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgsError {
    /// Wrong number of arguments.
    #[error("# Insufficient arguments. {count}. Usage\n#\t{usage}")]
    Insufficient { count: usize, usage: &'static str },

    /// Expected or actual username is empty.
    #[error("# No username provided")]
    NoUsername,

    /// Presented key is empty.
    #[error("# No key provided")]
    NoKey,

    /// Certificate key id is empty.
    #[error("# No key_id provided")]
    NoKeyId,

    /// One of the principals is empty.
    #[error("# An invalid principal was provided")]
    InvalidPrincipal,
}

/// Arguments for resolving a presented public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedKeysArgs {
    /// User the key is expected to log in as (`AuthorizedKeysCommandUser` target).
    pub expected_user: String,
    /// User `sshd` is actually authenticating.
    pub actual_user: String,
    /// Public key material as presented by the client.
    pub key: String,
}

impl AuthorizedKeysArgs {
    /// Build and validate from raw positional arguments.
    pub fn parse(args: &[String]) -> Result<Self, ArgsError> {
        let [expected_user, actual_user, key] = args else {
            return Err(ArgsError::Insufficient {
                count: args.len(),
                usage: KEYS_USAGE,
            });
        };

        if expected_user.is_empty() || actual_user.is_empty() {
            return Err(ArgsError::NoUsername);
        }
        if key.is_empty() {
            return Err(ArgsError::NoKey);
        }

        Ok(Self {
            expected_user: expected_user.clone(),
            actual_user: actual_user.clone(),
            key: key.clone(),
        })
    }

    /// Whether the expected and actual usernames agree.
    pub fn users_match(&self) -> bool {
        self.expected_user == self.actual_user
    }
}

/// Arguments for fanning a certificate key id out over its principals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedPrincipalsArgs {
    /// Key id embedded in the already validated certificate.
    pub key_id: String,
    /// Principal names, in certificate order.
    pub principals: Vec<String>,
}

impl AuthorizedPrincipalsArgs {
    /// Build and validate from raw positional arguments.
    pub fn parse(args: &[String]) -> Result<Self, ArgsError> {
        let Some((key_id, principals)) = args.split_first().filter(|_| args.len() >= 2) else {
            return Err(ArgsError::Insufficient {
                count: args.len(),
                usage: PRINCIPALS_USAGE,
            });
        };

        if key_id.is_empty() {
            return Err(ArgsError::NoKeyId);
        }
        if principals.iter().any(String::is_empty) {
            return Err(ArgsError::InvalidPrincipal);
        }

        Ok(Self {
            key_id: key_id.clone(),
            principals: principals.to_vec(),
        })
    }
}
