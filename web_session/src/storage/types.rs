use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

use crate::storage::errors::StorageError;

/// The full key/value mapping held for one session identifier.
pub type SessionState = HashMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    #[default]
    Strict,
    Lax,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        };
        f.write_str(value)
    }
}

/// Cookie attributes applied when a session is activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieParams {
    /// Cookie lifetime in seconds
    pub lifetime: u64,
    pub path: String,
    /// Empty means the cookie is scoped to the current host
    pub domain: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    /// Cookie name, also used as the session label
    pub name: String,
}

/// The underlying session mechanism a `SessionManager` drives.
///
/// An implementation owns identifier issuance, cookie transport, and the
/// persistence of each session's state. Entry operations act on the currently
/// active session and fail when no session is active.
pub trait SessionStore: Send {
    /// Whether a session is active for the current request.
    fn is_active(&self) -> bool;

    /// Establish or resume the session for the current request.
    ///
    /// Fails with `StorageError::Activation` if a session is already active
    /// or the transport can no longer issue cookies.
    fn activate(&mut self, params: &CookieParams) -> Result<(), StorageError>;

    /// Identifier of the active session, if any.
    fn session_id(&self) -> Option<&str>;

    fn get_entry(&self, key: &str) -> Result<Option<Value>, StorageError>;

    fn set_entry(&mut self, key: &str, value: Value) -> Result<(), StorageError>;

    fn unset_entry(&mut self, key: &str) -> Result<(), StorageError>;

    /// Remove every entry while keeping the identifier.
    fn clear_all(&mut self) -> Result<(), StorageError>;

    /// Discard the state and the identifier. The store is inactive afterwards.
    fn invalidate(&mut self) -> Result<(), StorageError>;
}
