use serde_json::{Value, json};
use web_session::{SameSite, SessionConfig, SessionError};

use crate::common::MockBrowser;

fn config() -> SessionConfig {
    SessionConfig {
        timeout: 3600,
        cookie_domain: "example.com".to_string(),
        cookie_path: "/".to_string(),
        secure: true,
        same_site: SameSite::Strict,
        session_name: "app_session".to_string(),
        strict_keys: true,
    }
}

/// Post-redirect-get: a flash message set while handling a form is shown once
#[test]
fn test_flash_message_after_redirect() {
    let mut browser = MockBrowser::new(config());

    // POST /save
    browser
        .request(|session| {
            session.set("user_id", &42)?;
            session.set_flash("msg", "saved")
        })
        .unwrap();
    assert!(browser.cookie().unwrap().starts_with("app_session="));

    // GET /after-redirect
    let shown: Option<String> = browser.request(|session| session.get_flash("msg")).unwrap();
    assert_eq!(shown.as_deref(), Some("saved"));

    // GET /reload
    let shown: Option<String> = browser.request(|session| session.get_flash("msg")).unwrap();
    assert_eq!(shown, None);

    let user_id: Option<i64> = browser.request(|session| session.get("user_id")).unwrap();
    assert_eq!(user_id, Some(42));
}

/// Logging out destroys the session and drops the client's cookie
#[test]
fn test_logout_destroys_session() {
    let mut browser = MockBrowser::new(config());
    browser.request(|session| session.set("user_id", &1)).unwrap();
    assert_eq!(browser.backend.len().unwrap(), 1);

    browser.request(|session| session.destroy()).unwrap();

    assert!(browser.cookie().is_none());
    assert!(browser.backend.is_empty().unwrap());

    let user_id = browser
        .request(|session| session.get_or("user_id", 0))
        .unwrap();
    assert_eq!(user_id, 0);
}

/// The cookie carries the configured attributes
#[test]
fn test_cookie_attributes_follow_config() {
    let browser_config = config();
    let backend = web_session::MemorySessionBackend::new();
    let mut session =
        web_session::SessionManager::new(backend.store(), browser_config).unwrap();

    session.start().unwrap();

    let headers = session.into_store().take_response_headers();
    let cookie = headers
        .get(http::header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("app_session="));
    assert!(cookie.contains("; Max-Age=3600"));
    assert!(cookie.contains("; Domain=example.com"));
    assert!(cookie.contains("; Secure"));
    assert!(!cookie.contains("HttpOnly"));
    assert!(cookie.ends_with("; SameSite=Strict"));
}

/// Several values fetched together keep the requested key set
#[test]
fn test_bulk_set_and_some() {
    let mut browser = MockBrowser::new(config());
    browser
        .request(|session| session.set_many([("theme", json!("dark")), ("lang", json!("en"))]))
        .unwrap();

    let values = browser
        .request(|session| session.some(&["theme", "lang", "tz"], Value::Null))
        .unwrap();

    assert_eq!(values.len(), 3);
    assert_eq!(values["theme"], json!("dark"));
    assert_eq!(values["lang"], json!("en"));
    assert_eq!(values["tz"], Value::Null);
}

/// An invalid key is reported to the handler and leaves no trace
#[test]
fn test_invalid_key_is_a_caller_error() {
    let mut browser = MockBrowser::new(config());

    let result = browser.request(|session| session.set("", "value"));

    assert!(matches!(result, Err(SessionError::Validation(_))));
    assert!(browser.cookie().is_none());
    assert!(browser.backend.is_empty().unwrap());
}
