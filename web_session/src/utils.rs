use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use http::header::{HeaderMap, HeaderValue, SET_COOKIE};
use ring::rand::SecureRandom;
use thiserror::Error;

use crate::storage::CookieParams;

pub(crate) fn base64url_encode(input: Vec<u8>) -> Result<String, UtilError> {
    Ok(URL_SAFE_NO_PAD.encode(input))
}

/// Generate `len` random bytes and return them base64url encoded (no padding).
pub(crate) fn gen_random_string(len: usize) -> Result<String, UtilError> {
    let rng = ring::rand::SystemRandom::new();
    let mut session_id = vec![0u8; len];
    rng.fill(&mut session_id)
        .map_err(|_| UtilError::Crypto("Failed to generate random string".to_string()))?;
    let encoded = base64url_encode(session_id)
        .map_err(|_| UtilError::Crypto("Failed to encode random string".to_string()))?;
    Ok(encoded)
}

/// Absolute expiry of a cookie issued now with the given `max_age` seconds.
pub(crate) fn cookie_expires_at(max_age: i64) -> Result<DateTime<Utc>, UtilError> {
    Duration::try_seconds(max_age)
        .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
        .ok_or_else(|| UtilError::Cookie(format!("Cookie max age {max_age} is out of range")))
}

/// Render a `Set-Cookie` value for the session cookie described by `params`.
///
/// A negative `max_age` produces an already-expired cookie, which tells the
/// client to drop it.
pub(crate) fn render_set_cookie(
    params: &CookieParams,
    value: &str,
    max_age: i64,
) -> Result<String, UtilError> {
    let expires_at = cookie_expires_at(max_age)?;
    let mut cookie = format!(
        "{}={}; Expires={}; Max-Age={}; Path={}",
        params.name,
        value,
        expires_at.format("%a, %d %b %Y %H:%M:%S GMT"),
        max_age.max(0),
        params.path,
    );
    if !params.domain.is_empty() {
        cookie.push_str(&format!("; Domain={}", params.domain));
    }
    if params.secure {
        cookie.push_str("; Secure");
    }
    if params.http_only {
        cookie.push_str("; HttpOnly");
    }
    cookie.push_str(&format!("; SameSite={}", params.same_site));
    Ok(cookie)
}

/// Replace any pending session cookie in `headers` with a freshly rendered one.
pub(crate) fn header_set_cookie<'a>(
    headers: &'a mut HeaderMap,
    params: &CookieParams,
    value: &str,
    max_age: i64,
) -> Result<&'a HeaderMap, UtilError> {
    let cookie = render_set_cookie(params, value, max_age)?;
    tracing::debug!("Cookie: {}", cookie);
    let header_value = HeaderValue::from_str(&cookie)
        .map_err(|_| UtilError::Cookie("Failed to parse cookie".to_string()))?;
    headers.remove(SET_COOKIE);
    headers.append(SET_COOKIE, header_value);
    Ok(headers)
}

#[derive(Debug, Error, Clone)]
pub enum UtilError {
    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Cookie error: {0}")]
    Cookie(String),
}
