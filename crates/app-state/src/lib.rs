//! Application state management for Henteklar
//!
//! This crate owns the session snapshot, the store that adapts the
//! authentication service into observable state, and the per-session
//! scope that isolates in-app UI state between users.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod scope;
pub mod session;

pub use scope::{ScopeError, SessionScope};
pub use session::{Session, SessionStore};
