//! Test utilities for session module tests

use chrono::Utc;
use http::header::{COOKIE, HeaderMap, HeaderValue, SET_COOKIE};
use serde_json::Value;

use crate::session::config::SessionConfig;
use crate::session::types::LAST_ACTIVITY_KEY;
use crate::storage::{MemorySessionBackend, MemorySessionStore, SessionState};

use super::manager::SessionManager;

pub(crate) fn test_config() -> SessionConfig {
    SessionConfig {
        timeout: 3600,
        ..SessionConfig::default()
    }
}

pub(crate) fn permissive_config() -> SessionConfig {
    SessionConfig {
        strict_keys: false,
        ..test_config()
    }
}

/// Manager for a request that carries no session cookie
pub(crate) fn new_manager(backend: &MemorySessionBackend) -> SessionManager<MemorySessionStore> {
    SessionManager::new(backend.store(), test_config()).expect("valid test config")
}

/// Build the `Cookie` request header a browser would send back after
/// receiving `response`.
pub(crate) fn request_headers_from_response(response: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some(set_cookie) = response.get(SET_COOKIE).and_then(|v| v.to_str().ok()) {
        let pair = set_cookie.split(';').next().unwrap_or_default();
        headers.insert(COOKIE, HeaderValue::from_str(pair).expect("valid cookie"));
    }
    headers
}

/// Request headers carrying `session_id` under the test cookie name
pub(crate) fn request_headers_for(session_id: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let cookie = format!("{}={}", test_config().session_name, session_id);
    headers.insert(COOKIE, HeaderValue::from_str(&cookie).expect("valid cookie"));
    headers
}

/// Manager for the request following the one served by `previous`
pub(crate) fn next_request_manager(
    backend: &MemorySessionBackend,
    previous: MemorySessionStore,
) -> SessionManager<MemorySessionStore> {
    let headers = request_headers_from_response(previous.response_headers());
    SessionManager::new(backend.store_for_request(&headers), test_config())
        .expect("valid test config")
}

/// Insert a session directly into the backend, bypassing the manager
pub(crate) fn insert_test_session(
    backend: &MemorySessionBackend,
    session_id: &str,
    entries: &[(&str, Value)],
) -> HeaderMap {
    let state: SessionState = entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    backend
        .insert_state(session_id, state)
        .expect("insert test session");
    request_headers_for(session_id)
}

/// Insert a session whose last activity lies `idle_seconds` in the past
pub(crate) fn insert_idle_session(
    backend: &MemorySessionBackend,
    session_id: &str,
    idle_seconds: i64,
    entries: &[(&str, Value)],
) -> HeaderMap {
    let last_activity = Value::from(Utc::now().timestamp() - idle_seconds);
    let mut all: Vec<(&str, Value)> = entries.to_vec();
    all.push((LAST_ACTIVITY_KEY, last_activity));
    insert_test_session(backend, session_id, &all)
}

/// Last activity recorded for `session_id`, if any
pub(crate) fn last_activity_of(backend: &MemorySessionBackend, session_id: &str) -> Option<i64> {
    backend
        .snapshot(session_id)
        .expect("snapshot")
        .and_then(|state| state.get(LAST_ACTIVITY_KEY).and_then(Value::as_i64))
}
