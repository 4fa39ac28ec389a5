//! Subcommand implementations.

pub mod authorized_keys;
pub mod authorized_principals;
