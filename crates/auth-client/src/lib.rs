//! Authentication client for Henteklar
//!
//! This crate defines the contract against the remote authentication
//! service: the [`AuthApi`] trait, the user/role types it speaks in,
//! and an HTTP implementation. The UI layers consume the trait only;
//! nothing above this crate knows how sessions are transported.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod http;
pub mod test_utils;
pub mod types;

pub use api::{AuthApi, AuthError, LoginOutcome, ResetError};
pub use http::{HttpAuthClient, HttpAuthClientConfig};
pub use types::{Role, User};
