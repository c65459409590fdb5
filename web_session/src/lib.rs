//! web_session - per-client session state for Rust web applications
//!
//! This crate layers key/value session state on top of a cookie-identified
//! session mechanism. It provides lazy session activation, idle-timeout
//! enforcement, key validation, and flash values that can be read exactly once.
//!
//! The transport is abstracted behind the [`SessionStore`] trait. A
//! process-local implementation, [`MemorySessionBackend`] with its per-request
//! [`MemorySessionStore`], is included.
//!
//! ## Configuration
//!
//! [`SessionConfig::from_env`] reads these variables:
//!
//! | Variable              | Meaning                               | Default       |
//! |-----------------------|---------------------------------------|---------------|
//! | `SESSION_TIMEOUT`     | Idle timeout in whole hours (max 9600)| `1`           |
//! | `SERVER_NAME`         | Cookie domain                         | current host  |
//! | `SESSION_PATH`        | Cookie path                           | `/`           |
//! | `SESSION_SECURE`      | Secure cookie (HttpOnly otherwise)    | `false`       |
//! | `SESSION_NAME`        | Cookie name                           | `web_session` |
//! | `SESSION_STRICT_KEYS` | Reject empty keys                     | `true`        |

mod session;
mod storage;
mod utils;

#[cfg(test)]
mod test_utils;

pub use session::{
    DEFAULT_SESSION_NAME, DEFAULT_SESSION_PATH, DEFAULT_SESSION_TIMEOUT_HOURS,
    MAX_SESSION_TIMEOUT_HOURS, SESSION_CONFIG, SessionConfig, SessionError, SessionManager,
};

pub use storage::{
    CookieParams, MemorySessionBackend, MemorySessionStore, SameSite, SessionState, SessionStore,
    StorageError, StorageErrorConversion,
};

pub use utils::UtilError;
