//! Per-session scoped storage
//!
//! A [`SessionScope`] holds state that belongs to exactly one signed-in
//! session. It is opened when an authenticated flow mounts and closed
//! when that flow unmounts, so nothing from one user's session can leak
//! into the next.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use auth_client::User;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Errors from scope operations
#[derive(Debug, thiserror::Error)]
pub enum ScopeError {
    /// The scope has been closed; no further writes are accepted
    #[error("session scope is closed")]
    Closed,

    /// A value could not be serialized or deserialized
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// State bound to one signed-in session
pub struct SessionScope {
    user: User,
    opened_at: SystemTime,
    values: RwLock<HashMap<String, serde_json::Value>>,
    closed: AtomicBool,
}

impl SessionScope {
    /// Open a scope for the given user
    pub fn open(user: User) -> Arc<Self> {
        tracing::debug!(user = %user.id, "opening session scope");
        Arc::new(Self {
            user,
            opened_at: SystemTime::now(),
            values: RwLock::new(HashMap::new()),
            closed: AtomicBool::new(false),
        })
    }

    /// The user this scope belongs to
    pub fn user(&self) -> &User {
        &self.user
    }

    /// When the scope was opened
    pub fn opened_at(&self) -> SystemTime {
        self.opened_at
    }

    /// Store a value under a key
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ScopeError> {
        if self.is_closed() {
            return Err(ScopeError::Closed);
        }
        let json = serde_json::to_value(value)?;
        self.values.write().insert(key.to_string(), json);
        Ok(())
    }

    /// Read a value back, if present and of the expected shape
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let values = self.values.read();
        let json = values.get(key)?;
        serde_json::from_value(json.clone()).ok()
    }

    /// Remove a key, returning whether it was present
    pub fn remove(&self, key: &str) -> bool {
        self.values.write().remove(key).is_some()
    }

    /// Close the scope and drop everything it held
    ///
    /// Idempotent; later calls are no-ops.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.values.write().clear();
        tracing::debug!(user = %self.user.id, "session scope closed");
    }

    /// Whether the scope has been closed
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
