use http::header::{COOKIE, HeaderMap, HeaderValue, SET_COOKIE};
use web_session::{
    MemorySessionBackend, MemorySessionStore, SessionConfig, SessionError, SessionManager,
};

/// A client that keeps the session cookie between requests
pub struct MockBrowser {
    pub backend: MemorySessionBackend,
    pub config: SessionConfig,
    cookie: Option<String>,
}

impl MockBrowser {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            backend: MemorySessionBackend::new(),
            config,
            cookie: None,
        }
    }

    /// Serve one request with `handler`, then apply the response's `Set-Cookie`.
    pub fn request<F, R>(&mut self, handler: F) -> Result<R, SessionError>
    where
        F: FnOnce(&mut SessionManager<MemorySessionStore>) -> Result<R, SessionError>,
    {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &self.cookie {
            headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        }

        let store = self.backend.store_for_request(&headers);
        let mut session = SessionManager::new(store, self.config.clone())?;
        let result = handler(&mut session)?;

        let response = session.into_store().take_response_headers();
        self.apply_set_cookie(&response);
        Ok(result)
    }

    /// The session cookie currently held, as `name=value`
    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    fn apply_set_cookie(&mut self, response: &HeaderMap) {
        let Some(set_cookie) = response.get(SET_COOKIE).and_then(|v| v.to_str().ok()) else {
            return;
        };
        let pair = set_cookie.split(';').next().unwrap_or_default();
        let expired = set_cookie.contains("Max-Age=0");
        let empty = pair.ends_with('=');
        self.cookie = if expired || empty {
            None
        } else {
            Some(pair.to_string())
        };
    }
}
