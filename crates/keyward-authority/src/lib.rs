//! # keyward-authority
//!
//! Client for the remote authority that owns the mapping from public-key
//! material to key records.
//!
//! The only call is `GET <base>/api/v4/internal/authorized_keys?key=<key>`:
//!
//! | Response | Result |
//! |----------|--------|
//! | `200` + `{"id": n, "key": "..."}` | `Ok(AuthorizedKey)` |
//! | `4xx` | `Err(LookupError::Rejected)` |
//! | other non-2xx | `Err(LookupError::Status)` |
//! | connection failure / bad body | `Err(LookupError::Transport)` / `Err(LookupError::MalformedBody)` |

pub mod client;
pub mod error;

pub use client::{HttpKeyAuthority, KeyAuthority};
pub use error::{ClientError, LookupError};

#[cfg(feature = "testing")]
pub mod testing;
