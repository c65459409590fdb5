mod errors;
mod memory;
mod types;

pub use errors::{StorageError, StorageErrorConversion};
pub use memory::{MemorySessionBackend, MemorySessionStore};
pub use types::{CookieParams, SameSite, SessionState, SessionStore};
