use http::header::{COOKIE, HeaderMap};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::storage::errors::StorageError;
use crate::storage::types::{CookieParams, SessionState, SessionStore};
use crate::utils::{cookie_expires_at, gen_random_string, header_set_cookie};

const SESSION_ID_BYTES: usize = 32;
const MAX_ID_ATTEMPTS: usize = 3;

/// Process-local session storage shared by all requests.
///
/// Cloning the backend yields another handle to the same map.
#[derive(Debug, Clone)]
pub struct MemorySessionBackend {
    entry: Arc<Mutex<HashMap<String, SessionState>>>,
}

impl Default for MemorySessionBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySessionBackend {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory session backend");
        Self {
            entry: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// A store for a request that carries no session cookie.
    pub fn store(&self) -> MemorySessionStore {
        self.store_for_request(&HeaderMap::new())
    }

    /// A store bound to one request; the session cookie is looked up in
    /// `request_headers` when the session is activated.
    pub fn store_for_request(&self, request_headers: &HeaderMap) -> MemorySessionStore {
        MemorySessionStore {
            backend: self.clone(),
            request_headers: request_headers.clone(),
            session_id: None,
            cookie: None,
            response_headers: HeaderMap::new(),
            headers_committed: false,
        }
    }

    /// Copy of the state currently held for `session_id`.
    pub fn snapshot(&self, session_id: &str) -> Result<Option<SessionState>, StorageError> {
        Ok(self.lock()?.get(session_id).cloned())
    }

    pub fn contains(&self, session_id: &str) -> Result<bool, StorageError> {
        Ok(self.lock()?.contains_key(session_id))
    }

    /// Number of live sessions.
    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.lock()?.is_empty())
    }

    #[cfg(test)]
    pub(crate) fn insert_state(
        &self,
        session_id: &str,
        state: SessionState,
    ) -> Result<(), StorageError> {
        self.lock()?.insert(session_id.to_string(), state);
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, SessionState>>, StorageError> {
        self.entry
            .lock()
            .map_err(|e| StorageError::Storage(format!("Session backend lock poisoned: {e}")))
    }
}

/// Per-request handle onto a [`MemorySessionBackend`].
#[derive(Debug)]
pub struct MemorySessionStore {
    backend: MemorySessionBackend,
    request_headers: HeaderMap,
    session_id: Option<String>,
    cookie: Option<CookieParams>,
    response_headers: HeaderMap,
    headers_committed: bool,
}

impl MemorySessionStore {
    /// Headers to attach to the response, holding the `Set-Cookie` issued by
    /// the latest activation or invalidation.
    pub fn response_headers(&self) -> &HeaderMap {
        &self.response_headers
    }

    pub fn take_response_headers(&mut self) -> HeaderMap {
        std::mem::take(&mut self.response_headers)
    }

    /// Mark the response headers as sent. Activation fails from here on.
    pub fn commit_headers(&mut self) {
        self.headers_committed = true;
    }

    fn active_id(&self) -> Result<&str, StorageError> {
        self.session_id
            .as_deref()
            .ok_or_else(|| StorageError::Storage("No active session".to_string()))
    }

    fn new_session_id(sessions: &HashMap<String, SessionState>) -> Result<String, StorageError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = gen_random_string(SESSION_ID_BYTES)?;
            if !sessions.contains_key(&candidate) {
                return Ok(candidate);
            }
            tracing::warn!("Session id collision, regenerating");
        }
        Err(StorageError::Storage(
            "Failed to generate a unique session id".to_string(),
        ))
    }
}

/// Extract the value of the cookie called `cookie_name` from request headers.
pub(crate) fn get_session_id_from_headers<'a>(
    headers: &'a HeaderMap,
    cookie_name: &str,
) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| match value.to_str() {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::debug!("Ignoring non-ascii cookie header: {}", e);
                None
            }
        })
        .flat_map(|cookie_str| cookie_str.split(';'))
        .map(|s| s.trim())
        .find_map(|s| {
            let mut parts = s.splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(k), Some(v)) if k == cookie_name && !v.is_empty() => Some(v),
                _ => None,
            }
        })
}

impl SessionStore for MemorySessionStore {
    fn is_active(&self) -> bool {
        self.session_id.is_some()
    }

    fn activate(&mut self, params: &CookieParams) -> Result<(), StorageError> {
        if self.is_active() {
            return Err(StorageError::Activation(
                "Session is already active".to_string(),
            ));
        }
        if self.headers_committed {
            return Err(StorageError::Activation(
                "Response headers already sent".to_string(),
            ));
        }

        // Checked before a new id is stored so a bad lifetime leaves no state behind
        let max_age = i64::try_from(params.lifetime).map_err(|_| {
            StorageError::Activation(format!(
                "Cookie lifetime {} is out of range",
                params.lifetime
            ))
        })?;
        cookie_expires_at(max_age).map_err(|e| StorageError::Activation(e.to_string()))?;

        let presented = get_session_id_from_headers(&self.request_headers, &params.name);
        let session_id = {
            let mut sessions = self.backend.lock()?;
            match presented {
                Some(id) if sessions.contains_key(id) => {
                    tracing::debug!("Resuming session from cookie '{}'", params.name);
                    id.to_string()
                }
                _ => {
                    if presented.is_some() {
                        tracing::debug!("Unknown session id presented, issuing a new one");
                    }
                    let id = Self::new_session_id(&sessions)?;
                    sessions.insert(id.clone(), SessionState::new());
                    id
                }
            }
        };

        header_set_cookie(&mut self.response_headers, params, &session_id, max_age)?;
        self.session_id = Some(session_id);
        self.cookie = Some(params.clone());
        Ok(())
    }

    fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    fn get_entry(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let id = self.active_id()?;
        Ok(self
            .backend
            .lock()?
            .get(id)
            .and_then(|state| state.get(key))
            .cloned())
    }

    fn set_entry(&mut self, key: &str, value: Value) -> Result<(), StorageError> {
        let id = self.active_id()?;
        self.backend
            .lock()?
            .entry(id.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    fn unset_entry(&mut self, key: &str) -> Result<(), StorageError> {
        let id = self.active_id()?;
        if let Some(state) = self.backend.lock()?.get_mut(id) {
            state.remove(key);
        }
        Ok(())
    }

    fn clear_all(&mut self) -> Result<(), StorageError> {
        let id = self.active_id()?;
        if let Some(state) = self.backend.lock()?.get_mut(id) {
            state.clear();
        }
        Ok(())
    }

    fn invalidate(&mut self) -> Result<(), StorageError> {
        let Some(id) = self.session_id.take() else {
            return Ok(());
        };
        self.backend.lock()?.remove(&id);

        if let Some(params) = self.cookie.take() {
            if !self.headers_committed {
                header_set_cookie(&mut self.response_headers, &params, "", -86400)?;
            }
        }
        tracing::debug!("Session invalidated");
        Ok(())
    }
}
