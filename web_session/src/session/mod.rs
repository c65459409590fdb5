mod config;
mod errors;
mod main;
mod types;

pub use config::{
    DEFAULT_SESSION_NAME, DEFAULT_SESSION_PATH, DEFAULT_SESSION_TIMEOUT_HOURS,
    MAX_SESSION_TIMEOUT_HOURS, SESSION_CONFIG, SessionConfig,
};
pub use errors::SessionError;
pub use main::SessionManager;
