use std::env;
use std::sync::LazyLock;

use crate::session::errors::SessionError;
use crate::storage::{CookieParams, SameSite};

const SECONDS_PER_HOUR: u64 = 3600;

/// Idle timeout in hours when `SESSION_TIMEOUT` is unset or invalid
pub const DEFAULT_SESSION_TIMEOUT_HOURS: u64 = 1;
/// Longest accepted idle timeout in hours (400 days, the longest cookie
/// lifetime browsers honor)
pub const MAX_SESSION_TIMEOUT_HOURS: u64 = 400 * 24;
pub const DEFAULT_SESSION_PATH: &str = "/";
pub const DEFAULT_SESSION_NAME: &str = "web_session";

/// Session configuration resolved from the process environment on first use.
pub static SESSION_CONFIG: LazyLock<SessionConfig> = LazyLock::new(SessionConfig::from_env);

/// Resolved session settings.
///
/// `timeout` is always in seconds. The `SESSION_TIMEOUT` environment value is
/// read as whole hours and converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Idle seconds after which session state is discarded
    pub timeout: u64,
    /// Cookie domain; empty scopes the cookie to the current host
    pub cookie_domain: String,
    pub cookie_path: String,
    /// Restrict the cookie to encrypted transport
    pub secure: bool,
    pub same_site: SameSite,
    pub session_name: String,
    /// Reject empty keys with a validation error. Disabling this is the
    /// legacy-compatible permissive mode.
    pub strict_keys: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_SESSION_TIMEOUT_HOURS * SECONDS_PER_HOUR,
            cookie_domain: String::new(),
            cookie_path: DEFAULT_SESSION_PATH.to_string(),
            secure: false,
            same_site: SameSite::Strict,
            session_name: DEFAULT_SESSION_NAME.to_string(),
            strict_keys: true,
        }
    }
}

impl SessionConfig {
    /// Resolve the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve the configuration from any environment-like source, such as a
    /// request's server variables.
    ///
    /// Recognized keys: `SESSION_TIMEOUT` (hours), `SERVER_NAME`,
    /// `SESSION_PATH`, `SESSION_SECURE`, `SESSION_NAME`, `SESSION_STRICT_KEYS`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let timeout = lookup("SESSION_TIMEOUT")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|hours| (1..=MAX_SESSION_TIMEOUT_HOURS).contains(hours))
            .map(|hours| hours * SECONDS_PER_HOUR)
            .unwrap_or(defaults.timeout);

        Self {
            timeout,
            cookie_domain: lookup("SERVER_NAME").unwrap_or(defaults.cookie_domain),
            cookie_path: lookup("SESSION_PATH")
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.cookie_path),
            secure: lookup("SESSION_SECURE")
                .and_then(|s| parse_flag(&s))
                .unwrap_or(defaults.secure),
            same_site: defaults.same_site,
            session_name: lookup("SESSION_NAME")
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.session_name),
            strict_keys: lookup("SESSION_STRICT_KEYS")
                .and_then(|s| parse_flag(&s))
                .unwrap_or(defaults.strict_keys),
        }
    }

    /// Check that `timeout` lies between one second and
    /// [`MAX_SESSION_TIMEOUT_HOURS`].
    pub fn validate(&self) -> Result<(), SessionError> {
        let max = MAX_SESSION_TIMEOUT_HOURS * SECONDS_PER_HOUR;
        if self.timeout == 0 || self.timeout > max {
            return Err(SessionError::Config(format!(
                "Session timeout must be between 1 and {max} seconds, got {}",
                self.timeout
            )));
        }
        Ok(())
    }

    /// HttpOnly is set exactly when the cookie is not restricted to secure transport.
    pub fn http_only(&self) -> bool {
        !self.secure
    }

    pub fn cookie_params(&self) -> CookieParams {
        CookieParams {
            lifetime: self.timeout,
            path: self.cookie_path.clone(),
            domain: self.cookie_domain.clone(),
            secure: self.secure,
            http_only: self.http_only(),
            same_site: self.same_site,
            name: self.session_name.clone(),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
