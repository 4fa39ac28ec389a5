//! # keyward-core
//!
//! Shared types for the Keyward `AuthorizedKeysCommand` /
//! `AuthorizedPrincipalsCommand` helper.
//!
//! - [`args`]: identity claims presented by `sshd` and their validation
//! - [`resolution`]: the tagged outcome of asking the remote authority about a key
//! - [`config`]: runtime configuration loaded once per invocation

pub mod args;
pub mod config;
pub mod resolution;

pub use args::{ArgsError, AuthorizedKeysArgs, AuthorizedPrincipalsArgs};
pub use config::{ConfigError, HttpSettings, KeywardConfig};
pub use resolution::{AuthorizedKey, Resolution};
